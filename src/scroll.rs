use core::cell::Cell;

use crate::{Axis, ScrollEdge, StickMode};

/// Scrollbar model mirrored by the host's scrollbar widget.
///
/// `value` runs from 0 (home) to `max` (end); `page_step` is the viewport
/// extent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollbarState {
    pub max: i64,
    pub page_step: u32,
    pub value: i64,
}

/// Orientation-invariant scrolling primitive.
///
/// `pos` is the viewport-space position of the content's leading edge:
/// zero puts the first item flush with the viewport's leading boundary,
/// forward scrolling drives it negative. All geometry is expressed along
/// the configured axis, so the same code serves horizontal and vertical
/// layouts.
#[derive(Clone, Debug)]
pub struct ScrollEngine {
    axis: Axis,
    pos: i64,
    viewport: u32,
    cross_viewport: u32,
    content: u64,
    content_origin: i64,
    cross_content: u32,
    stick: StickMode,
    wheel_step: u32,
    wheel_accum: f64,
    main_bar: ScrollbarState,
    cross_bar: ScrollbarState,
    syncing_bars: Cell<bool>,
}

impl ScrollEngine {
    pub fn new(axis: Axis, stick: StickMode, wheel_step: u32) -> Self {
        Self {
            axis,
            pos: 0,
            viewport: 0,
            cross_viewport: 0,
            content: 0,
            content_origin: 0,
            cross_content: 0,
            stick,
            wheel_step,
            wheel_accum: 0.0,
            main_bar: ScrollbarState::default(),
            cross_bar: ScrollbarState::default(),
            syncing_bars: Cell::new(false),
        }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn set_axis(&mut self, axis: Axis) {
        self.axis = axis;
    }

    pub fn pos(&self) -> i64 {
        self.pos
    }

    pub fn viewport_size(&self) -> u32 {
        self.viewport
    }

    pub fn content_size(&self) -> u64 {
        self.content
    }

    pub fn stick_mode(&self) -> StickMode {
        self.stick
    }

    pub fn set_stick_mode(&mut self, stick: StickMode) {
        self.stick = stick;
        self.clamp();
    }

    pub fn set_wheel_step(&mut self, wheel_step: u32) {
        self.wheel_step = wheel_step;
    }

    pub fn set_viewport(&mut self, main: u32, cross: u32) {
        self.viewport = main;
        self.cross_viewport = cross;
        self.clamp();
    }

    /// Updates content geometry: `origin` is the content coordinate of the
    /// first item's leading edge, `extent` the total content size along
    /// the axis, `cross` the widest cross-axis extent.
    pub fn set_content(&mut self, origin: i64, extent: u64, cross: u32) {
        self.content_origin = origin;
        self.content = extent;
        self.cross_content = cross;
        self.clamp();
    }

    /// Scroll position bounds under the current geometry and stick mode.
    ///
    /// Content larger than the viewport scrolls between `viewport −
    /// content` and 0. Smaller content normally rests at the leading edge;
    /// stick-to-end pins it against the trailing edge instead.
    pub fn range(&self) -> (i64, i64) {
        let view = self.viewport as i64;
        let content = self.content as i64;
        if content >= view {
            (view - content, 0)
        } else if self.stick == StickMode::End {
            let pinned = view - content;
            (pinned, pinned)
        } else {
            (0, 0)
        }
    }

    /// Absolute positioning: the callback receives `(min, max, current)`
    /// and returns the desired position, which is clamped into range.
    pub fn scroll_to(&mut self, f: impl FnOnce(i64, i64, i64) -> i64) -> i64 {
        let (min, max) = self.range();
        let target = f(min, max, self.pos).clamp(min, max);
        ltrace!(pos = target, min, max, "scroll_to");
        self.pos = target;
        target
    }

    /// Bounded delta scroll; positive `delta` scrolls toward the end.
    pub fn scroll(&mut self, delta: i64) -> i64 {
        self.scroll_to(|_, _, cur| cur.saturating_sub(delta))
    }

    /// `End` maps to the minimum position (content pushed fully forward),
    /// `Home` to the maximum.
    pub fn scroll_to_edge(&mut self, edge: ScrollEdge) -> i64 {
        match edge {
            ScrollEdge::End => self.scroll_to(|min, _, _| min),
            ScrollEdge::Home => self.scroll_to(|_, max, _| max),
        }
    }

    /// Pixel-exact edge membership of the scroll position.
    pub fn is_at_edge(&self, edge: ScrollEdge) -> bool {
        let (min, max) = self.range();
        match edge {
            ScrollEdge::End => self.pos == min,
            ScrollEdge::Home => self.pos == max,
        }
    }

    pub(crate) fn clamp(&mut self) {
        let (min, max) = self.range();
        self.pos = self.pos.clamp(min, max);
    }

    /// Whether the content's leading edge is at or inside the viewport's
    /// leading boundary.
    pub fn at_content_begin(&self) -> bool {
        self.pos >= 0
    }

    /// Whether the content's trailing edge is at or inside the viewport's
    /// trailing boundary.
    pub fn at_content_end(&self) -> bool {
        self.pos.saturating_add(self.content as i64) <= self.viewport as i64
    }

    /// Content coordinate under a viewport pixel.
    pub fn content_coord_at(&self, viewport_px: i64) -> i64 {
        viewport_px - self.pos + self.content_origin
    }

    /// Viewport pixel of a content coordinate.
    pub fn viewport_coord_of(&self, content_coord: i64) -> i64 {
        content_coord - self.content_origin + self.pos
    }

    /// Applies a wheel event measured in (possibly fractional) scroll
    /// steps; returns the pixel delta actually applied.
    ///
    /// Sub-step remainders accumulate across events so slow wheel ticks
    /// are not rounded away; a direction reversal resets the accumulator
    /// to avoid overshoot.
    pub fn handle_wheel(&mut self, delta_steps: f64) -> i64 {
        if self.wheel_accum != 0.0
            && delta_steps != 0.0
            && (delta_steps > 0.0) != (self.wheel_accum > 0.0)
        {
            self.wheel_accum = 0.0;
        }
        self.wheel_accum += delta_steps * self.wheel_step as f64;

        let whole = self.wheel_accum as i64;
        self.wheel_accum -= whole as f64;
        if whole == 0 {
            return 0;
        }

        let before = self.pos;
        self.scroll(whole);
        before - self.pos
    }

    /// Recomputes both scrollbar models from the current geometry.
    ///
    /// Runs under the suppression flag: scrollbar events arriving while a
    /// programmatic sync is in flight are ignored, which breaks the
    /// re-entrant notification loop between engine and scrollbar widget.
    pub fn sync_scrollbars(&mut self) {
        self.syncing_bars.set(true);
        let (min, max) = self.range();
        self.main_bar = ScrollbarState {
            max: max - min,
            page_step: self.viewport,
            value: max - self.pos,
        };
        let cross_max = self.cross_content.saturating_sub(self.cross_viewport) as i64;
        self.cross_bar.max = cross_max;
        self.cross_bar.page_step = self.cross_viewport;
        self.cross_bar.value = self.cross_bar.value.clamp(0, cross_max);
        self.syncing_bars.set(false);
    }

    /// Host scrollbar movement; returns `false` when suppressed by an
    /// in-flight programmatic sync.
    pub fn scrollbar_moved(&mut self, value: i64) -> bool {
        if self.syncing_bars.get() {
            return false;
        }
        self.scroll_to(|_, max, _| max - value);
        self.sync_scrollbars();
        true
    }

    pub fn main_scrollbar(&self) -> ScrollbarState {
        self.main_bar
    }

    pub fn cross_scrollbar(&self) -> ScrollbarState {
        self.cross_bar
    }

    #[cfg(test)]
    pub(crate) fn set_sync_guard(&self, active: bool) {
        self.syncing_bars.set(active);
    }
}
