use alloc::boxed::Box;
use alloc::sync::Arc;

use crate::{
    Axis, FetchDirection, ItemId, ItemPos, ItemsAlign, JumpModifiers, ScrollEdge, SortOrder,
    SortValue, StickMode, VisualHandle,
};

/// Fired when the engine needs more data on one side of the materialized
/// window.
///
/// Arguments: the anchor item at that edge (or `None` when nothing is
/// materialized), the number of items wanted, and the side. The host must
/// eventually supply items via `insert_continuous_items`/`insert_item`;
/// there is no synchronous return channel.
pub type RequestItemsCallback<K> =
    Arc<dyn Fn(Option<&ItemPos<K>>, usize, FetchDirection) + Send + Sync>;

/// Fired at most once per update transaction when the visible range
/// actually changed. Arguments: first and last visible item.
pub type ViewportChangedCallback<K> =
    Arc<dyn Fn(Option<&ItemPos<K>>, Option<&ItemPos<K>>) + Send + Sync>;

/// Fired when the materialized first/last item changed, independent of
/// viewport notifications.
pub type ItemRangeChangedCallback<K> =
    Arc<dyn Fn(Option<&ItemPos<K>>, Option<&ItemPos<K>>) + Send + Sync>;

/// Fired when a jump to a true edge needs host data: the host must fetch
/// at that edge and reload. Arguments: the edge, the caller's
/// force-long-jump flag, and pass-through keyboard modifiers.
pub type RequestEdgeCallback = Arc<dyn Fn(ScrollEdge, bool, JumpModifiers) + Send + Sync>;

/// Fired right after an item is materialized, so the host can attach its
/// presentation lifecycle to the handle.
pub type InsertItemCallback<K> = Arc<dyn Fn(&ItemPos<K>, &dyn VisualHandle) + Send + Sync>;

/// Fired with ownership of a handle released from the store; the host
/// detaches and destroys its presentation resources. Without this
/// callback the engine calls `VisualHandle::destroy` itself.
pub type RemoveItemCallback = Arc<dyn Fn(Box<dyn VisualHandle>) + Send + Sync>;

/// Configuration for [`crate::FlyweightList`].
///
/// Cheap to clone: callbacks are stored in `Arc`s so hosts can tweak a
/// few fields and call `FlyweightList::set_options` without reallocating
/// closures.
pub struct ListOptions<K = ItemId> {
    /// Scroll axis the list is laid out along.
    pub axis: Axis,
    /// Direction of the total order over sort values.
    pub sort_order: SortOrder,
    /// Edge the viewport auto-follows across mutations.
    pub stick_mode: StickMode,
    /// Which point of the visible extent anchors first-item lookups.
    pub items_align: ItemsAlign,

    /// Enables the flyweight window. When disabled, no prefetch/eviction
    /// runs and edge jumps always scroll directly.
    pub flyweight: bool,

    /// Lower bound on the prefetch item window.
    pub prefetch_window_hint: usize,
    /// Screens' worth of items kept materialized beyond the viewport.
    pub prefetch_screen_count: u32,
    /// Fraction of the window below which a fetch is requested.
    pub prefetch_threshold_ratio: f64,
    /// Explicit per-request item count, overriding the window size.
    pub prefetch_item_count: Option<usize>,

    /// Enables jump-to-edge mediation. When disabled, `jump_to_edge`
    /// always scrolls directly.
    pub jump_edge_control: bool,
    /// Hidden items toward an edge beyond which a jump defers to the host
    /// even when the true edge is materialized.
    pub jump_edge_hidden_threshold: Option<usize>,

    /// Host-declared sort value of the entire dataset's first element.
    pub min_sort_value: Option<SortValue>,
    /// Host-declared sort value of the entire dataset's last element.
    pub max_sort_value: Option<SortValue>,

    /// Pixels per wheel step.
    pub wheel_step: u32,
    /// Debounce for reflow after resize/content-change events.
    pub reflow_debounce_ms: u64,

    pub on_request_items: Option<RequestItemsCallback<K>>,
    pub on_viewport_changed: Option<ViewportChangedCallback<K>>,
    pub on_item_range_changed: Option<ItemRangeChangedCallback<K>>,
    pub on_request_edge: Option<RequestEdgeCallback>,
    pub on_insert_item: Option<InsertItemCallback<K>>,
    pub on_remove_item: Option<RemoveItemCallback>,
}

impl<K> ListOptions<K> {
    pub fn new() -> Self {
        Self {
            axis: Axis::Vertical,
            sort_order: SortOrder::Ascending,
            stick_mode: StickMode::None,
            items_align: ItemsAlign::Begin,
            flyweight: true,
            prefetch_window_hint: 0,
            prefetch_screen_count: 2,
            prefetch_threshold_ratio: 0.25,
            prefetch_item_count: None,
            jump_edge_control: true,
            jump_edge_hidden_threshold: None,
            min_sort_value: None,
            max_sort_value: None,
            wheel_step: 40,
            reflow_debounce_ms: 50,
            on_request_items: None,
            on_viewport_changed: None,
            on_item_range_changed: None,
            on_request_edge: None,
            on_insert_item: None,
            on_remove_item: None,
        }
    }

    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    pub fn with_sort_order(mut self, sort_order: SortOrder) -> Self {
        self.sort_order = sort_order;
        self
    }

    pub fn with_stick_mode(mut self, stick_mode: StickMode) -> Self {
        self.stick_mode = stick_mode;
        self
    }

    pub fn with_items_align(mut self, items_align: ItemsAlign) -> Self {
        self.items_align = items_align;
        self
    }

    pub fn with_flyweight(mut self, flyweight: bool) -> Self {
        self.flyweight = flyweight;
        self
    }

    pub fn with_prefetch_window_hint(mut self, hint: usize) -> Self {
        self.prefetch_window_hint = hint;
        self
    }

    pub fn with_prefetch_screen_count(mut self, screens: u32) -> Self {
        self.prefetch_screen_count = screens;
        self
    }

    pub fn with_prefetch_threshold_ratio(mut self, ratio: f64) -> Self {
        self.prefetch_threshold_ratio = ratio;
        self
    }

    pub fn with_prefetch_item_count(mut self, count: Option<usize>) -> Self {
        self.prefetch_item_count = count;
        self
    }

    pub fn with_jump_edge_control(mut self, enabled: bool) -> Self {
        self.jump_edge_control = enabled;
        self
    }

    pub fn with_jump_edge_hidden_threshold(mut self, threshold: Option<usize>) -> Self {
        self.jump_edge_hidden_threshold = threshold;
        self
    }

    pub fn with_bounds(
        mut self,
        min_sort_value: Option<SortValue>,
        max_sort_value: Option<SortValue>,
    ) -> Self {
        self.min_sort_value = min_sort_value;
        self.max_sort_value = max_sort_value;
        self
    }

    pub fn with_wheel_step(mut self, wheel_step: u32) -> Self {
        self.wheel_step = wheel_step;
        self
    }

    pub fn with_reflow_debounce_ms(mut self, delay_ms: u64) -> Self {
        self.reflow_debounce_ms = delay_ms;
        self
    }

    pub fn with_on_request_items(
        mut self,
        f: impl Fn(Option<&ItemPos<K>>, usize, FetchDirection) + Send + Sync + 'static,
    ) -> Self {
        self.on_request_items = Some(Arc::new(f));
        self
    }

    pub fn with_on_viewport_changed(
        mut self,
        f: impl Fn(Option<&ItemPos<K>>, Option<&ItemPos<K>>) + Send + Sync + 'static,
    ) -> Self {
        self.on_viewport_changed = Some(Arc::new(f));
        self
    }

    pub fn with_on_item_range_changed(
        mut self,
        f: impl Fn(Option<&ItemPos<K>>, Option<&ItemPos<K>>) + Send + Sync + 'static,
    ) -> Self {
        self.on_item_range_changed = Some(Arc::new(f));
        self
    }

    pub fn with_on_request_edge(
        mut self,
        f: impl Fn(ScrollEdge, bool, JumpModifiers) + Send + Sync + 'static,
    ) -> Self {
        self.on_request_edge = Some(Arc::new(f));
        self
    }

    pub fn with_on_insert_item(
        mut self,
        f: impl Fn(&ItemPos<K>, &dyn VisualHandle) + Send + Sync + 'static,
    ) -> Self {
        self.on_insert_item = Some(Arc::new(f));
        self
    }

    pub fn with_on_remove_item(
        mut self,
        f: impl Fn(Box<dyn VisualHandle>) + Send + Sync + 'static,
    ) -> Self {
        self.on_remove_item = Some(Arc::new(f));
        self
    }

    /// Dataset bound on the visually-begin side under the configured
    /// order.
    pub(crate) fn begin_bound(&self) -> Option<SortValue> {
        match self.sort_order {
            SortOrder::Ascending => self.min_sort_value,
            SortOrder::Descending => self.max_sort_value,
        }
    }

    /// Dataset bound on the visually-end side under the configured order.
    pub(crate) fn end_bound(&self) -> Option<SortValue> {
        match self.sort_order {
            SortOrder::Ascending => self.max_sort_value,
            SortOrder::Descending => self.min_sort_value,
        }
    }
}

impl<K> Default for ListOptions<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Clone for ListOptions<K> {
    fn clone(&self) -> Self {
        Self {
            axis: self.axis,
            sort_order: self.sort_order,
            stick_mode: self.stick_mode,
            items_align: self.items_align,
            flyweight: self.flyweight,
            prefetch_window_hint: self.prefetch_window_hint,
            prefetch_screen_count: self.prefetch_screen_count,
            prefetch_threshold_ratio: self.prefetch_threshold_ratio,
            prefetch_item_count: self.prefetch_item_count,
            jump_edge_control: self.jump_edge_control,
            jump_edge_hidden_threshold: self.jump_edge_hidden_threshold,
            min_sort_value: self.min_sort_value,
            max_sort_value: self.max_sort_value,
            wheel_step: self.wheel_step,
            reflow_debounce_ms: self.reflow_debounce_ms,
            on_request_items: self.on_request_items.clone(),
            on_viewport_changed: self.on_viewport_changed.clone(),
            on_item_range_changed: self.on_item_range_changed.clone(),
            on_request_edge: self.on_request_edge.clone(),
            on_insert_item: self.on_insert_item.clone(),
            on_remove_item: self.on_remove_item.clone(),
        }
    }
}

impl<K> core::fmt::Debug for ListOptions<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ListOptions")
            .field("axis", &self.axis)
            .field("sort_order", &self.sort_order)
            .field("stick_mode", &self.stick_mode)
            .field("items_align", &self.items_align)
            .field("flyweight", &self.flyweight)
            .field("prefetch_window_hint", &self.prefetch_window_hint)
            .field("prefetch_screen_count", &self.prefetch_screen_count)
            .field("prefetch_threshold_ratio", &self.prefetch_threshold_ratio)
            .field("prefetch_item_count", &self.prefetch_item_count)
            .field("jump_edge_control", &self.jump_edge_control)
            .field(
                "jump_edge_hidden_threshold",
                &self.jump_edge_hidden_threshold,
            )
            .field("min_sort_value", &self.min_sort_value)
            .field("max_sort_value", &self.max_sort_value)
            .field("wheel_step", &self.wheel_step)
            .field("reflow_debounce_ms", &self.reflow_debounce_ms)
            .finish_non_exhaustive()
    }
}
