/// The ordering key of an item.
///
/// Total order over items; ties between equal sort values are broken by
/// insertion order inside the store.
pub type SortValue = i64;

/// Default identity key type for lists keyed by plain numeric ids.
pub type ItemId = u64;

/// The scroll axis a list is laid out along.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    Vertical,
    Horizontal,
}

impl Axis {
    /// Returns the perpendicular axis.
    pub fn cross(self) -> Axis {
        match self {
            Self::Vertical => Self::Horizontal,
            Self::Horizontal => Self::Vertical,
        }
    }
}

/// Direction of the total order over sort values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    /// Compares two sort values in this order.
    ///
    /// All position reasoning in the engine goes through this comparator
    /// rather than raw value comparison, so "same position" always means
    /// comparator equivalence.
    pub fn cmp_values(self, a: SortValue, b: SortValue) -> core::cmp::Ordering {
        match self {
            Self::Ascending => a.cmp(&b),
            Self::Descending => b.cmp(&a),
        }
    }
}

/// Policy causing the viewport to auto-follow a content edge across
/// mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StickMode {
    None,
    Home,
    End,
}

impl StickMode {
    pub fn edge(self) -> Option<ScrollEdge> {
        match self {
            Self::None => None,
            Self::Home => Some(ScrollEdge::Home),
            Self::End => Some(ScrollEdge::End),
        }
    }
}

/// A content edge in scroll terms.
///
/// `Home` is the leading edge of the content (first item), `End` the
/// trailing edge (last item), independent of axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollEdge {
    Home,
    End,
}

/// Which point of the visible extent anchors the "first viewport item"
/// lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemsAlign {
    Begin,
    Center,
    End,
}

/// The side of the materialized window a data request targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FetchDirection {
    TowardBegin,
    TowardEnd,
}

/// Where the viewport currently sits relative to the materialized content.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EdgePosition {
    AtBegin,
    AtEnd,
    InMiddle,
}

/// Cause code surfaced when a host-side reload fails.
///
/// The engine's observable behavior stays "fail to empty list"; the cause
/// is recorded separately so hosts can distinguish a permission failure
/// from a genuinely empty dataset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LoadErrorCause {
    PermissionDenied,
    NotFound,
    Interrupted,
    Other,
}

/// Identity + ordering position of a materialized item.
///
/// This is the shape notifications and snapshots carry: it survives the
/// destruction of the item's visual handle, so reconciliation after a
/// mutation never needs to touch presentation objects.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemPos<K> {
    pub id: K,
    pub sort_value: SortValue,
}

bitflags::bitflags! {
    /// Keyboard modifiers forwarded with edge-jump requests.
    ///
    /// The engine never interprets these; they pass through to the host so
    /// it can vary its reload behavior (e.g. select-to-edge).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct JumpModifiers: u8 {
        const SHIFT = 1 << 0;
        const CONTROL = 1 << 1;
        const ALT = 1 << 2;
        const META = 1 << 3;
    }
}
