use crate::*;

use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;
use std::sync::Mutex;

const ITEM_PX: i64 = 10;

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        // Deterministic, dependency-free PRNG for tests.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range_i64(&mut self, start: i64, end_exclusive: i64) -> i64 {
        debug_assert!(start < end_exclusive);
        let span = (end_exclusive - start) as u64;
        start + (self.next_u64() % span) as i64
    }
}

struct TestHandle {
    size: u32,
    pos: Rc<Cell<i64>>,
    destroyed: Rc<Cell<usize>>,
}

impl VisualHandle for TestHandle {
    fn size_along(&self, _axis: Axis) -> u32 {
        self.size
    }

    fn position_along(&self, _axis: Axis) -> i64 {
        self.pos.get()
    }

    fn destroy(self: Box<Self>) {
        self.destroyed.set(self.destroyed.get() + 1);
    }
}

fn destroyed_counter() -> Rc<Cell<usize>> {
    Rc::new(Cell::new(0))
}

/// Handle laid out at `sort * ITEM_PX`, the sim-host layout rule: content
/// coordinates follow sort values, so no relayout is ever needed.
fn handle_at(sort: i64, destroyed: &Rc<Cell<usize>>) -> Box<dyn VisualHandle> {
    Box::new(TestHandle {
        size: ITEM_PX as u32,
        pos: Rc::new(Cell::new(sort * ITEM_PX)),
        destroyed: destroyed.clone(),
    })
}

fn item(id: i64, sort: i64, destroyed: &Rc<Cell<usize>>) -> ListItem<i64> {
    ListItem::new(id, sort, handle_at(sort, destroyed))
}

/// Items with id == sort over `range`.
fn test_items(range: core::ops::Range<i64>, destroyed: &Rc<Cell<usize>>) -> Vec<ListItem<i64>> {
    range.map(|i| item(i, i, destroyed)).collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Event {
    Request {
        dir: FetchDirection,
        count: usize,
        anchor: Option<i64>,
    },
    Viewport {
        first: Option<i64>,
        last: Option<i64>,
    },
    Range {
        first: Option<i64>,
        last: Option<i64>,
    },
    EdgeRequest {
        edge: ScrollEdge,
        force_long: bool,
    },
    Inserted {
        id: i64,
        size: u32,
    },
    Removed,
}

type Events = Arc<Mutex<Vec<Event>>>;

fn events() -> Events {
    Arc::new(Mutex::new(Vec::new()))
}

fn drain(events: &Events) -> Vec<Event> {
    core::mem::take(&mut *events.lock().unwrap())
}

fn recording_options(events: &Events) -> ListOptions<i64> {
    let req = events.clone();
    let vp = events.clone();
    let range = events.clone();
    let edge = events.clone();
    let ins = events.clone();
    let rem = events.clone();
    ListOptions::new()
        .with_on_request_items(move |anchor, count, dir| {
            req.lock().unwrap().push(Event::Request {
                dir,
                count,
                anchor: anchor.map(|a| a.sort_value),
            });
        })
        .with_on_viewport_changed(move |first, last| {
            vp.lock().unwrap().push(Event::Viewport {
                first: first.map(|p| p.id),
                last: last.map(|p| p.id),
            });
        })
        .with_on_item_range_changed(move |first, last| {
            range.lock().unwrap().push(Event::Range {
                first: first.map(|p| p.id),
                last: last.map(|p| p.id),
            });
        })
        .with_on_request_edge(move |e, force_long, _modifiers| {
            edge.lock().unwrap().push(Event::EdgeRequest {
                edge: e,
                force_long,
            });
        })
        .with_on_insert_item(move |pos, handle| {
            ins.lock().unwrap().push(Event::Inserted {
                id: pos.id,
                size: handle.size_along(Axis::Vertical),
            });
        })
        .with_on_remove_item(move |handle| {
            rem.lock().unwrap().push(Event::Removed);
            handle.destroy();
        })
}

fn requests(events: &[Event]) -> Vec<&Event> {
    events
        .iter()
        .filter(|e| matches!(e, Event::Request { .. }))
        .collect()
}

fn viewport_events(events: &[Event]) -> Vec<&Event> {
    events
        .iter()
        .filter(|e| matches!(e, Event::Viewport { .. }))
        .collect()
}

fn assert_store_invariants(store: &OrderedItemStore<i64>) {
    let order = store.sort_order();
    let mut prev: Option<SortValue> = None;
    let mut seen = HashSet::new();
    let mut n = 0usize;
    for it in store.iter() {
        if let Some(p) = prev {
            assert!(
                !order.cmp_values(p, it.sort_value()).is_gt(),
                "order index inconsistent with comparator"
            );
        }
        prev = Some(it.sort_value());
        assert!(seen.insert(*it.id()), "duplicate id in order index");
        let by_id = store.by_id(it.id()).expect("identity index lookup");
        assert_eq!(by_id.sort_value(), it.sort_value());
        n += 1;
    }
    assert_eq!(n, store.len());
    assert_eq!(
        store.first().map(|it| *it.id()),
        store.iter().next().map(|it| *it.id())
    );
    assert_eq!(
        store.last().map(|it| *it.id()),
        store.iter().next_back().map(|it| *it.id())
    );
}

// ----------------------------------------------------------------------
// OrderedItemStore

#[test]
fn insert_orders_by_sort_value_with_insertion_ties() {
    let destroyed = destroyed_counter();
    let mut store = OrderedItemStore::new(SortOrder::Ascending);
    store.insert(item(1, 5, &destroyed));
    store.insert(item(2, 3, &destroyed));
    store.insert(item(3, 5, &destroyed));
    store.insert(item(4, 1, &destroyed));

    let ids: Vec<i64> = store.iter().map(|it| *it.id()).collect();
    // Equal sort values keep insertion order: 1 before 3.
    assert_eq!(ids, [4, 2, 1, 3]);
    assert_store_invariants(&store);
}

#[test]
fn insert_returns_predecessor_in_order() {
    let destroyed = destroyed_counter();
    let mut store = OrderedItemStore::new(SortOrder::Ascending);
    let (pred, _) = store.insert(item(5, 5, &destroyed));
    assert!(pred.is_none());
    let (pred, _) = store.insert(item(10, 10, &destroyed));
    assert_eq!(pred.unwrap().id, 5);
    let (pred, _) = store.insert(item(7, 7, &destroyed));
    assert_eq!(pred.unwrap().id, 5);
    let (pred, _) = store.insert(item(1, 1, &destroyed));
    assert!(pred.is_none());
}

#[test]
fn duplicate_insert_replaces_and_returns_displaced_handle() {
    let destroyed = destroyed_counter();
    let mut store = OrderedItemStore::new(SortOrder::Ascending);
    let (_, displaced) = store.insert(item(1, 1, &destroyed));
    assert!(displaced.is_none());

    let replacement = ListItem::new(1, 4, handle_at(9, &destroyed));
    let (_, displaced) = store.insert(replacement);
    assert!(displaced.is_some());
    assert_eq!(store.len(), 1);
    let entry = store.by_id(&1).unwrap();
    assert_eq!(entry.sort_value(), 4);
    assert_eq!(entry.handle().position_along(Axis::Vertical), 9 * ITEM_PX);

    displaced.unwrap().destroy();
    assert_eq!(destroyed.get(), 1);
}

#[test]
fn operations_on_missing_ids_are_noops() {
    let destroyed = destroyed_counter();
    let mut store = OrderedItemStore::new(SortOrder::Ascending);
    store.insert(item(1, 1, &destroyed));

    assert!(store.remove(&99).is_none());
    assert!(store.reorder(&99, 5).is_none());
    assert!(store.by_id(&99).is_none());
    assert!(store.index_of(&99).is_none());
    assert!(store.remove_many(&[98, 99]).is_empty());
    assert_eq!(store.len(), 1);
}

#[test]
fn removing_edge_items_recomputes_first_and_last() {
    let destroyed = destroyed_counter();
    let mut store = OrderedItemStore::new(SortOrder::Ascending);
    for it in test_items(0..5, &destroyed) {
        store.insert(it);
    }

    store.remove(&0);
    assert_eq!(*store.first().unwrap().id(), 1);
    store.remove(&4);
    assert_eq!(*store.last().unwrap().id(), 3);
    assert_store_invariants(&store);
}

#[test]
fn insert_continuous_splices_as_one_run() {
    let destroyed = destroyed_counter();
    let mut store = OrderedItemStore::new(SortOrder::Ascending);
    for it in test_items(10..15, &destroyed) {
        store.insert(it);
    }

    let (pred, displaced) = store.insert_continuous(test_items(0..5, &destroyed));
    assert!(pred.is_none());
    assert!(displaced.is_empty());

    let (pred, _) = store.insert_continuous(test_items(5..10, &destroyed));
    assert_eq!(pred.unwrap().id, 4);

    let ids: Vec<i64> = store.iter().map(|it| *it.id()).collect();
    let expected: Vec<i64> = (0..15).collect();
    assert_eq!(ids, expected);
}

#[test]
fn reorder_rekeys_in_place_keeping_the_handle() {
    let destroyed = destroyed_counter();
    let mut store = OrderedItemStore::new(SortOrder::Ascending);
    for it in test_items(0..5, &destroyed) {
        store.insert(it);
    }
    let old_pos = store.by_id(&2).unwrap().handle().position_along(Axis::Vertical);

    let pred = store.reorder(&2, 17).expect("item is materialized");
    assert_eq!(pred.unwrap().id, 4);

    let entry = store.by_id(&2).unwrap();
    assert_eq!(entry.sort_value(), 17);
    assert_eq!(entry.handle().position_along(Axis::Vertical), old_pos);

    let ids: Vec<i64> = store.iter().map(|it| *it.id()).collect();
    assert_eq!(ids, [0, 1, 3, 4, 2]);
    assert_store_invariants(&store);
}

#[test]
fn descending_store_iterates_in_reverse_value_order() {
    let destroyed = destroyed_counter();
    let mut store = OrderedItemStore::new(SortOrder::Descending);
    store.insert(item(1, 1, &destroyed));
    store.insert(item(2, 9, &destroyed));
    store.insert(item(3, 5, &destroyed));

    let sorts: Vec<SortValue> = store.iter().map(|it| it.sort_value()).collect();
    assert_eq!(sorts, [9, 5, 1]);
    assert_eq!(*store.first().unwrap().id(), 2);
    assert_store_invariants(&store);
}

#[test]
fn set_sort_order_rebuilds_both_indices() {
    let destroyed = destroyed_counter();
    let mut store = OrderedItemStore::new(SortOrder::Ascending);
    for it in test_items(0..6, &destroyed) {
        store.insert(it);
    }

    store.set_sort_order(SortOrder::Descending);
    let sorts: Vec<SortValue> = store.iter().map(|it| it.sort_value()).collect();
    assert_eq!(sorts, [5, 4, 3, 2, 1, 0]);
    assert_store_invariants(&store);
}

#[test]
fn find_sort_eq_and_nearest_resolve_anchors() {
    let destroyed = destroyed_counter();
    let mut store = OrderedItemStore::new(SortOrder::Ascending);
    for sort in [10, 20, 30] {
        store.insert(item(sort, sort, &destroyed));
    }

    assert_eq!(*store.find_sort_eq(20).unwrap().id(), 20);
    assert!(store.find_sort_eq(15).is_none());
    assert_eq!(*store.find_nearest(15).unwrap().id(), 20);
    assert_eq!(*store.find_nearest(99).unwrap().id(), 30);
    assert_eq!(*store.find_nearest(-5).unwrap().id(), 10);
}

#[test]
fn randomized_mutations_keep_indices_consistent() {
    for order in [SortOrder::Ascending, SortOrder::Descending] {
        let destroyed = destroyed_counter();
        let mut store = OrderedItemStore::new(order);
        let mut rng = Lcg::new(0x5eed_0001);

        for _ in 0..600 {
            let id = rng.gen_range_i64(0, 40);
            let sort = rng.gen_range_i64(-25, 25);
            match rng.next_u64() % 3 {
                0 => {
                    store.insert(item(id, sort, &destroyed));
                }
                1 => {
                    store.remove(&id);
                }
                _ => {
                    store.reorder(&id, sort);
                }
            }
            assert_store_invariants(&store);
        }
    }
}

// ----------------------------------------------------------------------
// ScrollEngine

#[test]
fn scroll_clamps_and_maps_edges() {
    let mut scroll = ScrollEngine::new(Axis::Vertical, StickMode::None, 40);
    scroll.set_viewport(35, 0);
    scroll.set_content(0, 100, 0);

    assert_eq!(scroll.range(), (-65, 0));
    assert_eq!(scroll.scroll_to(|min, _, _| min - 100), -65);
    assert!(scroll.is_at_edge(ScrollEdge::End));

    // Already at the end; further forward scrolling is a no-op.
    scroll.scroll(10);
    assert_eq!(scroll.pos(), -65);
    scroll.scroll(-30);
    assert_eq!(scroll.pos(), -35);

    assert_eq!(scroll.scroll_to_edge(ScrollEdge::Home), 0);
    assert!(scroll.is_at_edge(ScrollEdge::Home));
    assert_eq!(scroll.scroll_to_edge(ScrollEdge::End), -65);
}

#[test]
fn stick_end_pins_content_smaller_than_viewport() {
    let mut scroll = ScrollEngine::new(Axis::Vertical, StickMode::End, 40);
    scroll.set_viewport(100, 0);
    scroll.set_content(0, 40, 0);

    assert_eq!(scroll.range(), (60, 60));
    assert_eq!(scroll.pos(), 60);
    assert!(scroll.is_at_edge(ScrollEdge::End));
    assert!(scroll.at_content_end());

    scroll.set_stick_mode(StickMode::None);
    assert_eq!(scroll.range(), (0, 0));
    assert_eq!(scroll.pos(), 0);
}

#[test]
fn wheel_accumulates_fractional_steps() {
    let mut scroll = ScrollEngine::new(Axis::Vertical, StickMode::None, 1);
    scroll.set_viewport(100, 0);
    scroll.set_content(0, 1000, 0);

    assert_eq!(scroll.handle_wheel(0.4), 0);
    assert_eq!(scroll.handle_wheel(0.4), 0);
    // Third slow tick crosses a whole step; nothing was rounded away.
    assert_eq!(scroll.handle_wheel(0.4), 1);
    assert_eq!(scroll.pos(), -1);
}

#[test]
fn wheel_direction_reversal_resets_accumulator() {
    let mut scroll = ScrollEngine::new(Axis::Vertical, StickMode::None, 1);
    scroll.set_viewport(100, 0);
    scroll.set_content(0, 1000, 0);
    scroll.scroll_to(|_, _, _| -500);

    assert_eq!(scroll.handle_wheel(0.4), 0);
    assert_eq!(scroll.handle_wheel(0.4), 0);
    // Reversal discards the +0.8 remainder instead of overshooting.
    assert_eq!(scroll.handle_wheel(-0.4), 0);
    assert_eq!(scroll.handle_wheel(-0.8), -1);
    assert_eq!(scroll.pos(), -499);
}

#[test]
fn scrollbar_sync_maps_value_and_suppresses_reentrancy() {
    let mut scroll = ScrollEngine::new(Axis::Vertical, StickMode::None, 40);
    scroll.set_viewport(35, 20);
    scroll.set_content(0, 100, 50);
    scroll.sync_scrollbars();

    let bar = scroll.main_scrollbar();
    assert_eq!(bar.max, 65);
    assert_eq!(bar.page_step, 35);
    assert_eq!(bar.value, 0);
    assert_eq!(scroll.cross_scrollbar().max, 30);

    scroll.scroll_to_edge(ScrollEdge::End);
    scroll.sync_scrollbars();
    assert_eq!(scroll.main_scrollbar().value, 65);

    assert!(scroll.scrollbar_moved(30));
    assert_eq!(scroll.pos(), -30);

    scroll.set_sync_guard(true);
    assert!(!scroll.scrollbar_moved(10));
    assert_eq!(scroll.pos(), -30);
    scroll.set_sync_guard(false);
}

// ----------------------------------------------------------------------
// SingleShot

#[test]
fn single_shot_supersedes_and_fires_once() {
    let mut shot = SingleShot::new();
    assert!(!shot.fire_due(1000));

    shot.schedule(100, 50);
    assert!(shot.pending());
    assert!(!shot.fire_due(149));

    // Rescheduling supersedes the pending deadline.
    shot.schedule(120, 50);
    assert!(!shot.fire_due(150));
    assert!(shot.fire_due(170));
    assert!(!shot.pending());
    assert!(!shot.fire_due(170));

    shot.schedule(200, 10);
    shot.cancel();
    assert!(!shot.fire_due(1000));
}

// ----------------------------------------------------------------------
// PrefetchController

#[test]
fn prefetch_requests_before_buffer_exhausts_and_caps_hidden_items() {
    let mut prefetch = PrefetchController::new(10, 2, 0.25, None);
    prefetch.refresh_window(5);
    assert_eq!(prefetch.item_window(), 10);
    assert_eq!(prefetch.threshold(), 2);
    assert_eq!(prefetch.max_hidden_beyond_edge(), 20);

    let counts = RangeCounts {
        hidden_before: 1,
        visible: 5,
        hidden_after: 30,
    };
    let mut actions = Vec::new();
    prefetch.evaluate(&counts, 0, 40, Some(-100), Some(100), SortOrder::Ascending, &mut actions);
    assert_eq!(
        actions,
        [
            PrefetchAction::Request {
                direction: FetchDirection::TowardBegin,
                count: 10,
            },
            PrefetchAction::Evict {
                direction: FetchDirection::TowardEnd,
                count: 10,
            },
        ]
    );
}

#[test]
fn prefetch_stops_at_reached_bounds() {
    let mut prefetch = PrefetchController::new(10, 2, 0.25, None);
    prefetch.refresh_window(5);
    let counts = RangeCounts {
        hidden_before: 0,
        visible: 5,
        hidden_after: 0,
    };
    let mut actions = Vec::new();
    // Both true edges materialized: nothing to fetch.
    prefetch.evaluate(&counts, 0, 40, Some(0), Some(40), SortOrder::Ascending, &mut actions);
    assert!(actions.is_empty());

    // Unbounded end keeps fetching.
    prefetch.evaluate(&counts, 0, 40, Some(0), None, SortOrder::Ascending, &mut actions);
    assert_eq!(
        actions,
        [PrefetchAction::Request {
            direction: FetchDirection::TowardEnd,
            count: 10,
        }]
    );
}

#[test]
fn prefetch_skips_without_a_stable_viewport() {
    let prefetch = PrefetchController::new(10, 2, 0.25, None);
    let mut actions = Vec::new();
    prefetch.evaluate(
        &RangeCounts::default(),
        0,
        40,
        None,
        None,
        SortOrder::Ascending,
        &mut actions,
    );
    assert!(actions.is_empty());
}

#[test]
fn explicit_fetch_count_overrides_the_window() {
    let mut prefetch = PrefetchController::new(10, 2, 0.25, Some(64));
    prefetch.refresh_window(5);
    assert_eq!(prefetch.fetch_count_effective(), 64);

    let mut by_window = PrefetchController::new(10, 2, 0.25, None);
    by_window.refresh_window(30);
    assert_eq!(by_window.item_window(), 60);
    assert_eq!(by_window.fetch_count_effective(), 60);
}

// ----------------------------------------------------------------------
// ViewportTracker

#[test]
fn viewport_anchors_resolve_items_and_edges() {
    let destroyed = destroyed_counter();
    let mut store = OrderedItemStore::new(SortOrder::Ascending);
    for it in test_items(0..10, &destroyed) {
        store.insert(it);
    }
    let mut scroll = ScrollEngine::new(Axis::Vertical, StickMode::None, 40);
    scroll.set_viewport(35, 0);
    scroll.set_content(0, 100, 0);

    let snap = ViewportTracker::compute(&store, &scroll, ItemsAlign::Begin);
    assert_eq!(snap.first.as_ref().unwrap().id, 0);
    assert_eq!(snap.last.as_ref().unwrap().id, 3);
    assert!(snap.at_begin);
    assert!(!snap.at_end);
    assert_eq!(snap.first_widget_pos, Some(0));

    scroll.scroll_to_edge(ScrollEdge::End);
    let snap = ViewportTracker::compute(&store, &scroll, ItemsAlign::Begin);
    assert_eq!(snap.first.as_ref().unwrap().id, 6);
    assert_eq!(snap.last.as_ref().unwrap().id, 9);
    assert!(!snap.at_begin);
    assert!(snap.at_end);

    let centered = ViewportTracker::compute(&store, &scroll, ItemsAlign::Center);
    assert_eq!(centered.first.as_ref().unwrap().id, 8);
    let end_aligned = ViewportTracker::compute(&store, &scroll, ItemsAlign::End);
    assert_eq!(end_aligned.first.as_ref().unwrap().id, 9);
}

#[test]
fn viewport_change_detection_uses_comparator_equivalence() {
    let mut tracker: ViewportTracker<i64> = ViewportTracker::new();
    let snap = ViewportSnapshot {
        first: Some(ItemPos { id: 1, sort_value: 10 }),
        last: Some(ItemPos { id: 2, sort_value: 20 }),
        at_begin: true,
        at_end: false,
        first_widget_pos: Some(0),
    };
    assert!(tracker.commit(snap.clone(), SortOrder::Ascending));
    tracker.keep_current_configuration();

    // Same ids and sort values: no change, regardless of pixel anchor.
    let mut same = snap.clone();
    same.first_widget_pos = Some(5);
    assert!(!tracker.commit(same, SortOrder::Ascending));

    let mut moved = snap;
    moved.first = Some(ItemPos { id: 3, sort_value: 10 });
    assert!(tracker.commit(moved, SortOrder::Ascending));
}

// ----------------------------------------------------------------------
// FlyweightList

#[test]
fn load_with_stick_end_prefetches_toward_begin() {
    let ev = events();
    let destroyed = destroyed_counter();
    let mut list = FlyweightList::new(
        recording_options(&ev)
            .with_stick_mode(StickMode::End)
            .with_prefetch_window_hint(20)
            .with_bounds(Some(-20), Some(9)),
    );
    list.set_viewport(100, 100, 0);
    list.load_items(test_items(0..10, &destroyed));

    assert_eq!(list.materialized_len(), 10);
    assert!(list.is_scroll_at_edge(ScrollEdge::End));
    let after_load = drain(&ev);
    let reqs = requests(&after_load);
    assert_eq!(reqs.len(), 1);
    assert_eq!(
        *reqs[0],
        Event::Request {
            dir: FetchDirection::TowardBegin,
            count: 20,
            anchor: Some(0),
        }
    );

    // Host answers asynchronously with 20 items below the anchor.
    list.insert_continuous_items(test_items(-20..0, &destroyed));

    assert_eq!(list.materialized_len(), 30);
    assert_eq!(list.first_item().unwrap().sort_value, -20);
    assert_eq!(list.last_item().unwrap().sort_value, 9);
    assert!(list.is_scroll_at_edge(ScrollEdge::End));
    assert_eq!(list.first_viewport_item().unwrap().id, 0);

    let after_fill = drain(&ev);
    assert!(requests(&after_fill).is_empty());
    // The true begin arrived: the materialized range changed once more.
    assert!(after_fill.contains(&Event::Range {
        first: Some(-20),
        last: Some(9),
    }));
}

#[test]
fn stick_end_survives_repeated_edge_inserts() {
    let ev = events();
    let destroyed = destroyed_counter();
    let mut list = FlyweightList::new(
        recording_options(&ev)
            .with_stick_mode(StickMode::End)
            .with_bounds(Some(0), None),
    );
    list.set_viewport(100, 100, 0);
    list.load_items(test_items(0..10, &destroyed));
    assert!(list.is_scroll_at_edge(ScrollEdge::End));

    for id in 10..15 {
        list.insert_item(item(id, id, &destroyed));
        assert!(list.is_scroll_at_edge(ScrollEdge::End));
        assert_eq!(list.last_viewport_item().unwrap().id, id);
    }
}

#[test]
fn removing_first_visible_mid_window_notifies_once() {
    let ev = events();
    let destroyed = destroyed_counter();
    let mut list =
        FlyweightList::new(recording_options(&ev).with_bounds(Some(0), Some(29)));
    list.set_viewport(100, 100, 0);
    list.load_items(test_items(0..30, &destroyed));

    // Scroll to the middle and settle.
    list.scroll_to_pos(|_, _, _| -100, 0);
    list.tick(16);
    assert_eq!(list.first_viewport_item().unwrap().id, 10);
    drain(&ev);

    list.remove_item(&10);

    let after = drain(&ev);
    let vps = viewport_events(&after);
    assert_eq!(vps.len(), 1);
    assert_eq!(
        *vps[0],
        Event::Viewport {
            first: Some(11),
            last: Some(20),
        }
    );
    // Global first/last did not change, so no range notification.
    assert!(!after.iter().any(|e| matches!(e, Event::Range { .. })));

    // The item after the removed one keeps its pixel anchor.
    assert_eq!(list.viewport_snapshot().first_widget_pos, Some(0));
}

#[test]
fn removing_global_first_fires_range_notification() {
    let ev = events();
    let destroyed = destroyed_counter();
    let mut list =
        FlyweightList::new(recording_options(&ev).with_bounds(Some(0), Some(9)));
    list.set_viewport(100, 100, 0);
    list.load_items(test_items(0..10, &destroyed));
    drain(&ev);

    list.remove_item(&0);

    let after = drain(&ev);
    assert!(after.contains(&Event::Range {
        first: Some(1),
        last: Some(9),
    }));
}

#[test]
fn eviction_trims_to_the_cap_and_stays_contiguous() {
    let ev = events();
    let destroyed = destroyed_counter();
    let mut list = FlyweightList::new(
        recording_options(&ev)
            .with_bounds(Some(0), Some(99))
            .with_flyweight(false),
    );
    list.set_viewport(100, 100, 0);
    list.load_items(test_items(0..100, &destroyed));
    list.scroll_to_edge(ScrollEdge::End, 0);
    list.tick(16);
    drain(&ev);

    // Hidden-before (90) far exceeds the cap of window(20) * screens(2)
    // = 40 once the flyweight policy runs, so 90 - 40 = 50 items go.
    list.set_flyweight_enabled(true);

    assert_eq!(list.materialized_len(), 50);
    assert_eq!(list.first_item().unwrap().sort_value, 50);
    assert_eq!(list.last_item().unwrap().sort_value, 99);
    let sorts: Vec<SortValue> = list.store().iter().map(|it| it.sort_value()).collect();
    let expected: Vec<SortValue> = (50..100).collect();
    assert_eq!(sorts, expected);

    let after = drain(&ev);
    let removed = after.iter().filter(|e| matches!(e, Event::Removed)).count();
    assert_eq!(removed, 50);
    assert_eq!(destroyed.get(), 50);

    // Eviction only touched hidden items; the viewport is still at the end.
    assert_eq!(list.last_viewport_item().unwrap().id, 99);
    assert!(list.is_scroll_at_edge(ScrollEdge::End));
}

#[test]
fn jump_to_materialized_edge_scrolls_without_host() {
    let ev = events();
    let destroyed = destroyed_counter();
    let mut list =
        FlyweightList::new(recording_options(&ev).with_bounds(Some(0), Some(9)));
    list.set_viewport(50, 100, 0);
    list.load_items(test_items(0..10, &destroyed));
    drain(&ev);

    assert!(list.jump_to_edge(ScrollEdge::End, false, JumpModifiers::empty(), 0));
    assert!(list.is_scroll_at_edge(ScrollEdge::End));
    assert_eq!(list.last_viewport_item().unwrap().id, 9);
    assert!(
        !drain(&ev)
            .iter()
            .any(|e| matches!(e, Event::EdgeRequest { .. }))
    );
}

#[test]
fn jump_to_unmaterialized_edge_defers_to_host() {
    let ev = events();
    let destroyed = destroyed_counter();
    let mut list =
        FlyweightList::new(recording_options(&ev).with_bounds(Some(0), Some(99)));
    list.set_viewport(50, 100, 0);
    list.load_items(test_items(0..10, &destroyed));
    drain(&ev);
    let pos_before = list.scroll_pos();

    assert!(!list.jump_to_edge(ScrollEdge::End, false, JumpModifiers::SHIFT, 0));

    // No scroll until the host reloads at the true edge.
    assert_eq!(list.scroll_pos(), pos_before);
    let after = drain(&ev);
    assert!(after.contains(&Event::EdgeRequest {
        edge: ScrollEdge::End,
        force_long: false,
    }));
}

#[test]
fn forced_jump_defers_even_when_materialized() {
    let ev = events();
    let destroyed = destroyed_counter();
    let mut list =
        FlyweightList::new(recording_options(&ev).with_bounds(Some(0), Some(9)));
    list.set_viewport(50, 100, 0);
    list.load_items(test_items(0..10, &destroyed));
    drain(&ev);

    assert!(!list.jump_to_edge(ScrollEdge::Home, true, JumpModifiers::empty(), 0));
    assert!(drain(&ev).contains(&Event::EdgeRequest {
        edge: ScrollEdge::Home,
        force_long: true,
    }));
}

#[test]
fn jump_mediation_disabled_scrolls_directly() {
    let ev = events();
    let destroyed = destroyed_counter();
    let mut list = FlyweightList::new(
        recording_options(&ev)
            .with_bounds(Some(0), Some(99))
            .with_jump_edge_control(false),
    );
    list.set_viewport(50, 100, 0);
    list.load_items(test_items(0..10, &destroyed));
    drain(&ev);

    assert!(list.jump_to_edge(ScrollEdge::End, false, JumpModifiers::empty(), 0));
    assert!(list.is_scroll_at_edge(ScrollEdge::End));
}

#[test]
fn update_transaction_consolidates_viewport_notifications() {
    let ev = events();
    let destroyed = destroyed_counter();
    let mut list =
        FlyweightList::new(recording_options(&ev).with_bounds(Some(0), None));
    list.set_viewport(100, 100, 0);
    list.load_items(test_items(0..5, &destroyed));
    drain(&ev);

    list.update(|l| {
        for id in 5..8 {
            l.insert_item(item(id, id, &destroyed));
        }
    });

    let after = drain(&ev);
    let vps = viewport_events(&after);
    assert_eq!(vps.len(), 1);
    assert_eq!(
        *vps[0],
        Event::Viewport {
            first: Some(0),
            last: Some(7),
        }
    );
}

#[test]
fn unchanged_visible_range_stays_silent() {
    let ev = events();
    let destroyed = destroyed_counter();
    let mut list =
        FlyweightList::new(recording_options(&ev).with_bounds(Some(0), None));
    list.set_viewport(100, 100, 0);
    list.load_items(test_items(0..10, &destroyed));
    drain(&ev);

    // Appending beyond the viewport does not move the visible range.
    list.insert_item(item(10, 10, &destroyed));
    assert!(viewport_events(&drain(&ev)).is_empty());
}

#[test]
fn reorder_beyond_edge_evicts_unless_viewport_touches_it() {
    let ev = events();
    let destroyed = destroyed_counter();
    let mut list =
        FlyweightList::new(recording_options(&ev).with_bounds(Some(0), Some(9)));
    list.set_viewport(50, 100, 0);
    list.load_items(test_items(0..10, &destroyed));
    drain(&ev);

    // Viewport at the begin edge; a move past the materialized end evicts.
    list.reorder_item(&0, 100);
    assert!(!list.store().contains(&0));
    assert_eq!(list.materialized_len(), 9);
    assert!(drain(&ev).iter().any(|e| matches!(e, Event::Removed)));

    // At the end edge, the same move splices instead.
    list.jump_to_edge(ScrollEdge::End, false, JumpModifiers::empty(), 0);
    list.reorder_item(&5, 200);
    assert!(list.store().contains(&5));
    assert_eq!(list.last_item().unwrap().id, 5);
    assert_eq!(list.last_item().unwrap().sort_value, 200);
}

#[test]
fn external_destruction_repairs_without_teardown() {
    let ev = events();
    let destroyed = destroyed_counter();
    let mut list =
        FlyweightList::new(recording_options(&ev).with_bounds(Some(0), Some(4)));
    list.set_viewport(100, 100, 0);
    list.load_items(test_items(0..5, &destroyed));
    drain(&ev);

    let shell = list.notify_handle_destroyed(&0);
    assert!(shell.is_some());
    assert_eq!(list.materialized_len(), 4);
    assert_eq!(list.first_item().unwrap().id, 1);

    let after = drain(&ev);
    // The handle skipped the teardown path.
    assert!(!after.iter().any(|e| matches!(e, Event::Removed)));
    assert_eq!(destroyed.get(), 0);
    assert!(after.contains(&Event::Range {
        first: Some(1),
        last: Some(4),
    }));

    assert!(list.notify_handle_destroyed(&0).is_none());
}

#[test]
fn load_failed_empties_and_records_the_cause() {
    let ev = events();
    let destroyed = destroyed_counter();
    let mut list =
        FlyweightList::new(recording_options(&ev).with_bounds(Some(0), None));
    list.set_viewport(100, 100, 0);
    list.load_items(test_items(0..5, &destroyed));
    drain(&ev);

    list.load_failed(LoadErrorCause::PermissionDenied);
    assert_eq!(list.materialized_len(), 0);
    assert_eq!(list.last_load_error(), Some(LoadErrorCause::PermissionDenied));
    let after = drain(&ev);
    assert_eq!(
        after.iter().filter(|e| matches!(e, Event::Removed)).count(),
        5
    );
    assert!(after.contains(&Event::Range {
        first: None,
        last: None,
    }));

    list.load_items(test_items(0..3, &destroyed));
    assert_eq!(list.last_load_error(), None);
}

#[test]
fn insert_side_effects_expose_the_live_handle() {
    let ev = events();
    let destroyed = destroyed_counter();
    let mut list =
        FlyweightList::new(recording_options(&ev).with_bounds(Some(0), None));
    list.set_viewport(100, 100, 0);
    list.load_items(test_items(0..3, &destroyed));

    let inserted: Vec<Event> = drain(&ev)
        .into_iter()
        .filter(|e| matches!(e, Event::Inserted { .. }))
        .collect();
    assert_eq!(inserted.len(), 3);
    assert!(inserted.contains(&Event::Inserted {
        id: 0,
        size: ITEM_PX as u32,
    }));
}

#[test]
fn reflow_is_debounced_and_superseded() {
    let ev = events();
    let destroyed = destroyed_counter();
    let mut list =
        FlyweightList::new(recording_options(&ev).with_bounds(Some(0), Some(9)));
    list.set_viewport(100, 100, 0);
    list.load_items(test_items(0..10, &destroyed));
    drain(&ev);

    // Two resizes inside the debounce window coalesce into one reflow.
    list.set_viewport(40, 100, 100);
    list.set_viewport(50, 100, 120);
    list.tick(150);
    assert!(viewport_events(&drain(&ev)).is_empty());
    list.tick(170);
    let after = drain(&ev);
    assert_eq!(viewport_events(&after).len(), 1);
    assert_eq!(list.last_viewport_item().unwrap().id, 4);
}

#[test]
fn flyweight_disabled_never_prefetches() {
    let ev = events();
    let destroyed = destroyed_counter();
    let mut list = FlyweightList::new(
        recording_options(&ev)
            .with_flyweight(false)
            .with_bounds(Some(-100), Some(100)),
    );
    list.set_viewport(100, 100, 0);
    list.load_items(test_items(0..10, &destroyed));

    assert!(requests(&drain(&ev)).is_empty());
    // Jumps scroll directly even though the true edge is absent.
    assert!(list.jump_to_edge(ScrollEdge::End, false, JumpModifiers::empty(), 0));
}

#[test]
fn empty_store_settles_without_prefetch_decisions() {
    let ev = events();
    let mut list: FlyweightList<i64> =
        FlyweightList::new(recording_options(&ev).with_bounds(Some(0), Some(9)));
    list.set_viewport(100, 100, 0);
    list.load_items(Vec::new());

    let after = drain(&ev);
    assert!(requests(&after).is_empty());
    assert!(list.first_viewport_item().is_none());
}

#[test]
fn descending_list_prefetches_toward_its_visual_begin() {
    let ev = events();
    let destroyed = destroyed_counter();
    let mut list = FlyweightList::new(
        recording_options(&ev)
            .with_sort_order(SortOrder::Descending)
            .with_prefetch_window_hint(20)
            .with_bounds(Some(0), Some(29)),
    );
    list.set_viewport(100, 100, 0);
    // Newest-first: sorts 29 down to 20, laid out top to bottom in
    // visual order (positions follow the index, not the sort value).
    let items: Vec<ListItem<i64>> = (20..30)
        .rev()
        .enumerate()
        .map(|(idx, sort)| {
            let handle = Box::new(TestHandle {
                size: ITEM_PX as u32,
                pos: Rc::new(Cell::new(idx as i64 * ITEM_PX)),
                destroyed: destroyed.clone(),
            });
            ListItem::new(sort, sort, handle)
        })
        .collect();
    list.load_items(items);

    // The visual begin holds sort 29 == max bound: nothing to fetch there.
    // The visual end holds sort 20 > min bound 0: fetch fires toward end.
    let after = drain(&ev);
    let reqs = requests(&after);
    assert_eq!(reqs.len(), 1);
    assert_eq!(
        *reqs[0],
        Event::Request {
            dir: FetchDirection::TowardEnd,
            count: 20,
            anchor: Some(20),
        }
    );
}
