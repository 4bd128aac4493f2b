use alloc::boxed::Box;

use crate::Axis;

/// Capability surface the engine requires from a presentation object.
///
/// The engine never depends on concrete widget types; it only reads an
/// item's geometry along the scroll axis and tears the object down through
/// `destroy`. Positions are in content coordinates (the coordinate space
/// the host lays items out in), sizes in pixels along the given axis.
pub trait VisualHandle {
    fn size_along(&self, axis: Axis) -> u32;
    fn position_along(&self, axis: Axis) -> i64;

    /// Consumes the handle and releases its presentation resources.
    ///
    /// Called by the engine only when no remove callback is registered;
    /// otherwise ownership is handed to the host and the host decides.
    fn destroy(self: Box<Self>);

    /// End coordinate along the axis (position + size).
    fn end_along(&self, axis: Axis) -> i64 {
        self.position_along(axis)
            .saturating_add(self.size_along(axis) as i64)
    }
}
