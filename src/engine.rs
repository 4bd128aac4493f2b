use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::edge::{EdgeJumpController, JumpOutcome};
use crate::key::ListKey;
use crate::prefetch::{PrefetchAction, PrefetchController};
use crate::scheduler::SingleShot;
use crate::scroll::{ScrollEngine, ScrollbarState};
use crate::store::{ListItem, OrderedItemStore, StoredItem};
use crate::viewport::{self, RangeCounts, ViewportSnapshot, ViewportTracker};
use crate::{
    Axis, EdgePosition, FetchDirection, ItemId, ItemPos, ItemsAlign, JumpModifiers, ListOptions,
    LoadErrorCause, ScrollEdge, SortOrder, SortValue, StickMode, VisualHandle,
};

const EDGE_SETTLE_DEBOUNCE_MS: u64 = 16;
const SCROLLBAR_SYNC_DEBOUNCE_MS: u64 = 16;

/// A flyweight virtualized list engine.
///
/// Presents a logically unbounded ordered collection while materializing
/// only a bounded window around the viewport. The engine is headless: it
/// owns no widgets and no clock. A host drives it by mutating items inside
/// update transactions, feeding viewport/scroll events, and pumping
/// [`tick`](Self::tick); the engine talks back through the callbacks on
/// [`ListOptions`].
///
/// All state lives in this one owned struct; operations are synchronous
/// and single-threaded.
pub struct FlyweightList<K: ListKey = ItemId> {
    options: ListOptions<K>,
    store: OrderedItemStore<K>,
    tracker: ViewportTracker<K>,
    prefetch: PrefetchController,
    scroll: ScrollEngine,
    edge: EdgeJumpController,
    reflow: SingleShot,
    scrollbar_sync: SingleShot,
    edge_settle: SingleShot,
    update_depth: usize,
    settle_pending: bool,
    last_first: Option<ItemPos<K>>,
    last_last: Option<ItemPos<K>>,
    last_load_error: Option<LoadErrorCause>,
}

impl<K: ListKey> FlyweightList<K> {
    pub fn new(options: ListOptions<K>) -> Self {
        ldebug!(
            flyweight = options.flyweight,
            hint = options.prefetch_window_hint,
            "FlyweightList::new"
        );
        let store = OrderedItemStore::new(options.sort_order);
        let scroll = ScrollEngine::new(options.axis, options.stick_mode, options.wheel_step);
        let prefetch = PrefetchController::new(
            options.prefetch_window_hint,
            options.prefetch_screen_count,
            options.prefetch_threshold_ratio,
            options.prefetch_item_count,
        );
        Self {
            options,
            store,
            tracker: ViewportTracker::new(),
            prefetch,
            scroll,
            edge: EdgeJumpController::new(),
            reflow: SingleShot::new(),
            scrollbar_sync: SingleShot::new(),
            edge_settle: SingleShot::new(),
            update_depth: 0,
            settle_pending: false,
            last_first: None,
            last_last: None,
            last_load_error: None,
        }
    }

    pub fn options(&self) -> &ListOptions<K> {
        &self.options
    }

    /// Replaces the configuration, re-syncing every component, then
    /// re-settles as if a mutation had occurred.
    pub fn set_options(&mut self, options: ListOptions<K>) {
        let sort_changed = self.options.sort_order != options.sort_order;
        self.options = options;
        if sort_changed {
            self.store.set_sort_order(self.options.sort_order);
        }
        self.scroll.set_axis(self.options.axis);
        self.scroll.set_stick_mode(self.options.stick_mode);
        self.scroll.set_wheel_step(self.options.wheel_step);
        self.prefetch.reconfigure(
            self.options.prefetch_window_hint,
            self.options.prefetch_screen_count,
            self.options.prefetch_threshold_ratio,
            self.options.prefetch_item_count,
        );
        self.note_mutation();
    }

    /// Clones the current options, applies `f`, then delegates to
    /// `set_options`.
    pub fn update_options(&mut self, f: impl FnOnce(&mut ListOptions<K>)) {
        let mut next = self.options.clone();
        f(&mut next);
        self.set_options(next);
    }

    pub fn set_stick_mode(&mut self, stick_mode: StickMode) {
        self.update_options(|o| o.stick_mode = stick_mode);
    }

    pub fn set_sort_order(&mut self, sort_order: SortOrder) {
        self.update_options(|o| o.sort_order = sort_order);
    }

    pub fn set_items_align(&mut self, items_align: ItemsAlign) {
        self.update_options(|o| o.items_align = items_align);
    }

    pub fn set_axis(&mut self, axis: Axis) {
        self.update_options(|o| o.axis = axis);
    }

    pub fn set_flyweight_enabled(&mut self, flyweight: bool) {
        self.update_options(|o| o.flyweight = flyweight);
    }

    pub fn set_bounds(&mut self, min: Option<SortValue>, max: Option<SortValue>) {
        self.update_options(|o| {
            o.min_sort_value = min;
            o.max_sort_value = max;
        });
    }

    // Callback rebinding does not touch layout, so no settle.

    pub fn set_on_request_items(
        &mut self,
        f: Option<impl Fn(Option<&ItemPos<K>>, usize, FetchDirection) + Send + Sync + 'static>,
    ) {
        self.options.on_request_items = f.map(|f| Arc::new(f) as _);
    }

    pub fn set_on_viewport_changed(
        &mut self,
        f: Option<impl Fn(Option<&ItemPos<K>>, Option<&ItemPos<K>>) + Send + Sync + 'static>,
    ) {
        self.options.on_viewport_changed = f.map(|f| Arc::new(f) as _);
    }

    pub fn set_on_item_range_changed(
        &mut self,
        f: Option<impl Fn(Option<&ItemPos<K>>, Option<&ItemPos<K>>) + Send + Sync + 'static>,
    ) {
        self.options.on_item_range_changed = f.map(|f| Arc::new(f) as _);
    }

    pub fn set_on_request_edge(
        &mut self,
        f: Option<impl Fn(ScrollEdge, bool, JumpModifiers) + Send + Sync + 'static>,
    ) {
        self.options.on_request_edge = f.map(|f| Arc::new(f) as _);
    }

    pub fn set_on_insert_item(
        &mut self,
        f: Option<impl Fn(&ItemPos<K>, &dyn VisualHandle) + Send + Sync + 'static>,
    ) {
        self.options.on_insert_item = f.map(|f| Arc::new(f) as _);
    }

    pub fn set_on_remove_item(
        &mut self,
        f: Option<impl Fn(Box<dyn VisualHandle>) + Send + Sync + 'static>,
    ) {
        self.options.on_remove_item = f.map(|f| Arc::new(f) as _);
    }

    // ------------------------------------------------------------------
    // Update transactions

    /// Opens a batched mutation. Intermediate notifications are
    /// suppressed; one consolidated settle runs at the matching
    /// `end_update`.
    pub fn begin_update(&mut self) {
        if self.update_depth == 0 {
            self.tracker.keep_current_configuration();
        }
        self.update_depth += 1;
    }

    pub fn end_update(&mut self) {
        debug_assert!(self.update_depth > 0, "unbalanced end_update");
        self.update_depth = self.update_depth.saturating_sub(1);
        if self.update_depth == 0 && core::mem::take(&mut self.settle_pending) {
            self.settle(true);
        }
    }

    /// Runs `f` inside one update transaction.
    pub fn update(&mut self, f: impl FnOnce(&mut Self)) {
        self.begin_update();
        f(self);
        self.end_update();
    }

    fn note_mutation(&mut self) {
        if self.update_depth > 0 {
            self.settle_pending = true;
        } else {
            self.tracker.keep_current_configuration();
            self.settle(true);
        }
    }

    // ------------------------------------------------------------------
    // Mutations

    /// Clears the store and rebuilds it from `items` (pre-sorted by the
    /// host). Clears any recorded load error.
    pub fn load_items(&mut self, items: Vec<ListItem<K>>) {
        ldebug!(count = items.len(), "load_items");
        self.last_load_error = None;
        self.begin_update();
        for handle in self.store.clear() {
            self.release_handle(handle);
        }
        let ids: Vec<K> = items.iter().map(|it| it.id.clone()).collect();
        let (_, displaced) = self.store.insert_continuous(items);
        for handle in displaced {
            self.release_handle(handle);
        }
        for id in &ids {
            self.fire_insert_effect(id);
        }
        self.note_mutation();
        self.end_update();
    }

    /// Records a host-side reload failure: the list empties (the original
    /// behavior of swallow-all reload boundaries) but the cause stays
    /// queryable instead of being indistinguishable from an empty
    /// dataset.
    pub fn load_failed(&mut self, cause: LoadErrorCause) {
        lwarn!(cause = ?cause, "load_failed");
        self.last_load_error = Some(cause);
        self.begin_update();
        for handle in self.store.clear() {
            self.release_handle(handle);
        }
        self.note_mutation();
        self.end_update();
    }

    /// Cause of the last failed reload, if the most recent load failed.
    pub fn last_load_error(&self) -> Option<LoadErrorCause> {
        self.last_load_error
    }

    /// Inserts one item; an existing entry with the same id is replaced
    /// and its handle released. Returns the predecessor-in-order so the
    /// host can splice presentation right after it.
    pub fn insert_item(&mut self, item: ListItem<K>) -> Option<ItemPos<K>> {
        let id = item.id.clone();
        let (predecessor, displaced) = self.store.insert(item);
        if let Some(handle) = displaced {
            self.release_handle(handle);
        }
        self.fire_insert_effect(&id);
        self.note_mutation();
        predecessor
    }

    /// Inserts a pre-sorted contiguous run; the splice point comes from
    /// the first element only.
    pub fn insert_continuous_items(&mut self, items: Vec<ListItem<K>>) -> Option<ItemPos<K>> {
        if items.is_empty() {
            return None;
        }
        let ids: Vec<K> = items.iter().map(|it| it.id.clone()).collect();
        let (predecessor, displaced) = self.store.insert_continuous(items);
        for handle in displaced {
            self.release_handle(handle);
        }
        for id in &ids {
            self.fire_insert_effect(id);
        }
        self.note_mutation();
        predecessor
    }

    /// Moves an item to a new sort position.
    ///
    /// A new position beyond the materialized first/last item keeps the
    /// item only when the viewport currently touches that edge (it will
    /// be spliced and the edge re-stuck); otherwise the item no longer
    /// belongs to the window and is evicted.
    pub fn reorder_item(&mut self, id: &K, new_sort_value: SortValue) {
        if !self.store.contains(id) {
            return;
        }
        let order = self.store.sort_order();
        let beyond_end = self.store.last().is_some_and(|last| {
            last.id() != id && order.cmp_values(new_sort_value, last.sort_value()).is_gt()
        });
        let beyond_begin = self.store.first().is_some_and(|first| {
            first.id() != id && order.cmp_values(new_sort_value, first.sort_value()).is_lt()
        });

        let snapshot = self.tracker.current();
        let evict = (beyond_end && !snapshot.at_end) || (beyond_begin && !snapshot.at_begin);
        if evict && self.options.flyweight {
            ltrace!("reorder_item: left the materialized window");
            if let Some(handle) = self.store.remove(id) {
                self.release_handle(handle);
            }
        } else {
            self.store.reorder(id, new_sort_value);
        }
        self.note_mutation();
    }

    pub fn remove_item(&mut self, id: &K) {
        let Some(handle) = self.store.remove(id) else {
            return;
        };
        self.release_handle(handle);
        self.note_mutation();
    }

    pub fn remove_items(&mut self, ids: &[K]) {
        let handles = self.store.remove_many(ids);
        if handles.is_empty() {
            return;
        }
        for handle in handles {
            self.release_handle(handle);
        }
        self.note_mutation();
    }

    /// Host contract for out-of-band handle destruction: must be called
    /// before the host releases a visual handle the store still owns. The
    /// engine repairs its indices exactly as for removal, but the handle
    /// skips the teardown path; its shell is returned to the caller.
    pub fn notify_handle_destroyed(&mut self, id: &K) -> Option<Box<dyn VisualHandle>> {
        let handle = self.store.remove(id)?;
        self.note_mutation();
        Some(handle)
    }

    // ------------------------------------------------------------------
    // Geometry and scroll events

    /// Reports a new viewport size; reflow runs debounced via `tick`.
    pub fn set_viewport(&mut self, main: u32, cross: u32, now_ms: u64) {
        self.scroll.set_viewport(main, cross);
        self.reflow.schedule(now_ms, self.options.reflow_debounce_ms);
    }

    /// Reports that item sizes/positions changed; reflow runs debounced
    /// via `tick`.
    pub fn note_content_changed(&mut self, now_ms: u64) {
        self.reflow.schedule(now_ms, self.options.reflow_debounce_ms);
    }

    /// Drives all deferred work. The host calls this from its own timer
    /// or frame loop.
    pub fn tick(&mut self, now_ms: u64) {
        if self.reflow.fire_due(now_ms) {
            self.tracker.keep_current_configuration();
            self.settle(true);
        }
        if self.edge_settle.fire_due(now_ms) {
            self.settle(false);
        }
        if self.scrollbar_sync.fire_due(now_ms) {
            self.scroll.sync_scrollbars();
        }
    }

    /// Wheel event in (possibly fractional) steps; returns applied pixels.
    pub fn handle_wheel(&mut self, delta_steps: f64, now_ms: u64) -> i64 {
        let applied = self.scroll.handle_wheel(delta_steps);
        if applied != 0 {
            self.after_scroll(now_ms);
        }
        applied
    }

    /// Bounded relative scroll; positive `delta` goes toward the end.
    pub fn scroll_by(&mut self, delta: i64, now_ms: u64) -> i64 {
        let pos = self.scroll.scroll(delta);
        self.after_scroll(now_ms);
        pos
    }

    /// Absolute positioning through a `(min, max, current)` callback.
    pub fn scroll_to_pos(
        &mut self,
        f: impl FnOnce(i64, i64, i64) -> i64,
        now_ms: u64,
    ) -> i64 {
        let pos = self.scroll.scroll_to(f);
        self.after_scroll(now_ms);
        pos
    }

    /// Scrolls straight to a materialized edge without consulting the
    /// flyweight policy. See [`jump_to_edge`](Self::jump_to_edge) for the
    /// mediated variant.
    pub fn scroll_to_edge(&mut self, edge: ScrollEdge, now_ms: u64) -> i64 {
        let pos = self.scroll.scroll_to_edge(edge);
        self.after_scroll(now_ms);
        pos
    }

    /// Scrollbar movement from the host; suppressed while a programmatic
    /// scrollbar sync is in flight.
    pub fn on_scrollbar_moved(&mut self, value: i64, now_ms: u64) -> bool {
        if !self.scroll.scrollbar_moved(value) {
            return false;
        }
        self.after_scroll(now_ms);
        true
    }

    fn after_scroll(&mut self, now_ms: u64) {
        self.edge_settle.schedule(now_ms, EDGE_SETTLE_DEBOUNCE_MS);
        self.scrollbar_sync
            .schedule(now_ms, SCROLLBAR_SYNC_DEBOUNCE_MS);
    }

    // ------------------------------------------------------------------
    // Edge jumps

    /// Jumps the viewport to an edge of the entire dataset.
    ///
    /// Scrolls directly when the true edge is already materialized (or
    /// flyweight/jump mediation is disabled); otherwise fires the host
    /// edge request, forwarding `force_long` and `modifiers`, and leaves
    /// the scroll position untouched until the host reloads. Returns
    /// `true` when the jump was served by scrolling.
    pub fn jump_to_edge(
        &mut self,
        edge: ScrollEdge,
        force_long: bool,
        modifiers: JumpModifiers,
        now_ms: u64,
    ) -> bool {
        if !self.options.flyweight || !self.options.jump_edge_control {
            self.scroll.scroll_to_edge(edge);
            self.after_scroll(now_ms);
            self.settle(false);
            return true;
        }

        let Some((edge_sort, bound, hidden)) = self.edge_jump_inputs(edge) else {
            // Nothing materialized: the host must load edge data first.
            self.fire_request_edge(edge, force_long, modifiers);
            return false;
        };

        let outcome = self.edge.evaluate_jump(
            edge_sort,
            bound,
            self.store.sort_order(),
            hidden,
            self.options.jump_edge_hidden_threshold,
            force_long,
        );
        match outcome {
            JumpOutcome::Scrolled => {
                ltrace!("jump_to_edge: serving from materialized data");
                self.scroll.scroll_to_edge(edge);
                self.after_scroll(now_ms);
                self.settle(false);
                true
            }
            JumpOutcome::NeedsHost => {
                ldebug!("jump_to_edge: deferring to host");
                self.fire_request_edge(edge, force_long, modifiers);
                false
            }
        }
    }

    fn edge_jump_inputs(&self, edge: ScrollEdge) -> Option<(SortValue, Option<SortValue>, usize)> {
        let counts = viewport::counts(&self.store, self.tracker.current());
        match edge {
            ScrollEdge::Home => self
                .store
                .first()
                .map(|it| (it.sort_value(), self.options.begin_bound(), counts.hidden_before)),
            ScrollEdge::End => self
                .store
                .last()
                .map(|it| (it.sort_value(), self.options.end_bound(), counts.hidden_after)),
        }
    }

    fn fire_request_edge(&self, edge: ScrollEdge, force_long: bool, modifiers: JumpModifiers) {
        if let Some(cb) = self.options.on_request_edge.clone() {
            cb(edge, force_long, modifiers);
        }
    }

    // ------------------------------------------------------------------
    // Queries

    pub fn store(&self) -> &OrderedItemStore<K> {
        &self.store
    }

    pub fn materialized_len(&self) -> usize {
        self.store.len()
    }

    pub fn first_item(&self) -> Option<ItemPos<K>> {
        self.store.first().map(StoredItem::pos)
    }

    pub fn last_item(&self) -> Option<ItemPos<K>> {
        self.store.last().map(StoredItem::pos)
    }

    pub fn first_viewport_item(&self) -> Option<&ItemPos<K>> {
        self.tracker.current().first.as_ref()
    }

    pub fn last_viewport_item(&self) -> Option<&ItemPos<K>> {
        self.tracker.current().last.as_ref()
    }

    pub fn viewport_snapshot(&self) -> &ViewportSnapshot<K> {
        self.tracker.current()
    }

    pub fn is_scroll_at_edge(&self, edge: ScrollEdge) -> bool {
        self.scroll.is_at_edge(edge)
    }

    pub fn edge_position(&self) -> EdgePosition {
        self.edge.position()
    }

    pub fn scroll_pos(&self) -> i64 {
        self.scroll.pos()
    }

    pub fn main_scrollbar(&self) -> ScrollbarState {
        self.scroll.main_scrollbar()
    }

    pub fn cross_scrollbar(&self) -> ScrollbarState {
        self.scroll.cross_scrollbar()
    }

    pub fn prefetch_item_window(&self) -> usize {
        self.prefetch.item_window()
    }

    /// Visits every materialized item in order with its visual handle.
    /// Hosts use this to lay items out along the axis.
    pub fn for_each_item(&self, mut f: impl FnMut(&ItemPos<K>, &dyn VisualHandle)) {
        for item in self.store.iter() {
            f(&item.pos(), item.handle());
        }
    }

    // ------------------------------------------------------------------
    // Settling

    /// One stable layout pass: restore the stuck edge or compensate the
    /// anchor, recompute the viewport, notify, then run the prefetch
    /// policy. `after_mutation` selects whether stick/compensation logic
    /// applies (it never fights user scrolling).
    fn settle(&mut self, after_mutation: bool) {
        if self.update_depth > 0 {
            self.settle_pending = true;
            return;
        }
        self.reflow.cancel();
        self.edge_settle.cancel();

        if self.store.is_empty() {
            self.scroll.set_content(0, 0, 0);
            self.scroll.sync_scrollbars();
            let changed = self
                .tracker
                .commit(ViewportSnapshot::default(), self.options.sort_order);
            if changed {
                self.fire_viewport_changed();
            }
            self.fire_item_range_changed();
            self.edge.update_position(&self.scroll, self.options.stick_mode);
            self.tracker.keep_current_configuration();
            return;
        }

        self.refresh_content_geometry();
        if after_mutation {
            let kept = self.tracker.kept().clone();
            self.edge.restore_after_mutation(
                &kept,
                &self.store,
                &mut self.scroll,
                self.options.stick_mode,
            );
        }
        self.scroll.clamp();
        self.scroll.sync_scrollbars();

        let snapshot =
            ViewportTracker::compute(&self.store, &self.scroll, self.options.items_align);
        let counts = viewport::counts(&self.store, &snapshot);
        let changed = self.tracker.commit(snapshot, self.options.sort_order);

        if self.options.flyweight {
            self.run_prefetch(&counts);
        }

        if changed {
            self.fire_viewport_changed();
        }
        self.fire_item_range_changed();
        self.edge.update_position(&self.scroll, self.options.stick_mode);
        self.tracker.keep_current_configuration();
    }

    fn run_prefetch(&mut self, counts: &RangeCounts) {
        let (Some(first), Some(last)) = (self.store.first(), self.store.last()) else {
            return;
        };
        let first_sort = first.sort_value();
        let last_sort = last.sort_value();

        self.prefetch.refresh_window(counts.visible);
        let mut actions = Vec::new();
        self.prefetch.evaluate(
            counts,
            first_sort,
            last_sort,
            self.options.begin_bound(),
            self.options.end_bound(),
            self.store.sort_order(),
            &mut actions,
        );

        let mut evicted = false;
        for action in actions {
            match action {
                PrefetchAction::Request { direction, count } => {
                    self.fire_request_items(direction, count);
                }
                PrefetchAction::Evict { direction, count } => {
                    self.evict(direction, count);
                    evicted = true;
                }
            }
        }

        if evicted {
            // Eviction changed content extent; re-anchor the viewport so
            // the visible items keep their pixels, then re-sync.
            self.refresh_content_geometry();
            let current = self.tracker.current().clone();
            EdgeJumpController::compensate_size_change(&current, &self.store, &mut self.scroll);
            self.scroll.clamp();
            self.scroll.sync_scrollbars();
        }
    }

    fn fire_request_items(&self, direction: FetchDirection, count: usize) {
        let Some(cb) = self.options.on_request_items.clone() else {
            return;
        };
        let anchor = match direction {
            FetchDirection::TowardBegin => self.store.first().map(StoredItem::pos),
            FetchDirection::TowardEnd => self.store.last().map(StoredItem::pos),
        };
        ldebug!(count, "request_items");
        cb(anchor.as_ref(), count, direction);
    }

    fn evict(&mut self, direction: FetchDirection, count: usize) {
        ldebug!(count, "evict");
        for _ in 0..count {
            let item = match direction {
                FetchDirection::TowardBegin => self.store.pop_first(),
                FetchDirection::TowardEnd => self.store.pop_last(),
            };
            let Some(item) = item else {
                break;
            };
            self.release_handle(item.into_handle());
        }
    }

    fn fire_viewport_changed(&self) {
        let Some(cb) = self.options.on_viewport_changed.clone() else {
            return;
        };
        let snapshot = self.tracker.current();
        cb(snapshot.first.as_ref(), snapshot.last.as_ref());
    }

    fn fire_item_range_changed(&mut self) {
        let first = self.store.first().map(StoredItem::pos);
        let last = self.store.last().map(StoredItem::pos);

        fn same_id<K: ListKey>(a: &Option<ItemPos<K>>, b: &Option<ItemPos<K>>) -> bool {
            match (a, b) {
                (None, None) => true,
                (Some(a), Some(b)) => a.id == b.id,
                _ => false,
            }
        }
        if same_id(&self.last_first, &first) && same_id(&self.last_last, &last) {
            return;
        }
        self.last_first = first.clone();
        self.last_last = last.clone();
        if let Some(cb) = self.options.on_item_range_changed.clone() {
            cb(first.as_ref(), last.as_ref());
        }
    }

    fn fire_insert_effect(&self, id: &K) {
        let Some(cb) = self.options.on_insert_item.clone() else {
            return;
        };
        if let Some(item) = self.store.by_id(id) {
            cb(&item.pos(), item.handle());
        }
    }

    /// Single teardown path for every handle leaving the store.
    fn release_handle(&self, handle: Box<dyn VisualHandle>) {
        if let Some(cb) = self.options.on_remove_item.clone() {
            cb(handle);
        } else {
            handle.destroy();
        }
    }

    fn refresh_content_geometry(&mut self) {
        let axis = self.scroll.axis();
        let (origin, extent) = match (self.store.first(), self.store.last()) {
            (Some(first), Some(last)) => {
                let start = first.handle().position_along(axis);
                let end = last.handle().end_along(axis);
                (start, end.saturating_sub(start).max(0) as u64)
            }
            _ => (0, 0),
        };
        let cross_axis = axis.cross();
        let cross = self
            .store
            .iter()
            .map(|it| it.handle().size_along(cross_axis))
            .max()
            .unwrap_or(0);
        self.scroll.set_content(origin, extent, cross);
    }
}

impl<K: ListKey + core::fmt::Debug> core::fmt::Debug for FlyweightList<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FlyweightList")
            .field("materialized", &self.store.len())
            .field("scroll_pos", &self.scroll.pos())
            .field("edge_position", &self.edge.position())
            .field("update_depth", &self.update_depth)
            .finish_non_exhaustive()
    }
}
