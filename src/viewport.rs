use crate::key::ListKey;
use crate::scroll::ScrollEngine;
use crate::store::OrderedItemStore;
use crate::{Axis, ItemPos, ItemsAlign, SortOrder};

/// Viewport configuration as of the last stable layout pass.
///
/// `first`/`last` are carried by id + sort value so reconciliation after a
/// mutation survives the destruction of the underlying visual handles.
/// `first_widget_pos` is the viewport-space pixel anchor of the first
/// visible item, used to compensate content-size changes without a visual
/// jump.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportSnapshot<K> {
    pub first: Option<ItemPos<K>>,
    pub last: Option<ItemPos<K>>,
    pub at_begin: bool,
    pub at_end: bool,
    pub first_widget_pos: Option<i64>,
}

impl<K> Default for ViewportSnapshot<K> {
    fn default() -> Self {
        Self {
            first: None,
            last: None,
            at_begin: false,
            at_end: false,
            first_widget_pos: None,
        }
    }
}

/// Counts of materialized items relative to the visible range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RangeCounts {
    pub hidden_before: usize,
    pub visible: usize,
    pub hidden_after: usize,
}

/// Maps viewport anchors to materialized items and diffs viewport
/// configurations across mutations.
#[derive(Clone, Debug)]
pub struct ViewportTracker<K> {
    kept: ViewportSnapshot<K>,
    current: ViewportSnapshot<K>,
}

impl<K: ListKey> ViewportTracker<K> {
    pub fn new() -> Self {
        Self {
            kept: ViewportSnapshot::default(),
            current: ViewportSnapshot::default(),
        }
    }

    pub fn current(&self) -> &ViewportSnapshot<K> {
        &self.current
    }

    pub fn kept(&self) -> &ViewportSnapshot<K> {
        &self.kept
    }

    /// Snapshots the current configuration before a mutation, so the
    /// post-mutation state can be diffed against it.
    pub fn keep_current_configuration(&mut self) {
        self.kept = self.current.clone();
    }

    /// Installs a freshly computed snapshot; returns whether the visible
    /// range differs from the kept configuration.
    pub fn commit(&mut self, snapshot: ViewportSnapshot<K>, order: SortOrder) -> bool {
        let changed = !Self::equivalent(&self.kept, &snapshot, order);
        self.current = snapshot;
        changed
    }

    /// Two configurations are equivalent when first and last match by id
    /// and by comparator equivalence of their sort values. Comparator
    /// equivalence, not raw equality: a comparator may declare distinct
    /// values the same position.
    fn equivalent(a: &ViewportSnapshot<K>, b: &ViewportSnapshot<K>, order: SortOrder) -> bool {
        fn item_eq<K: ListKey>(
            a: &Option<ItemPos<K>>,
            b: &Option<ItemPos<K>>,
            order: SortOrder,
        ) -> bool {
            match (a, b) {
                (None, None) => true,
                (Some(a), Some(b)) => {
                    a.id == b.id && order.cmp_values(a.sort_value, b.sort_value).is_eq()
                }
                _ => false,
            }
        }
        item_eq(&a.first, &b.first, order) && item_eq(&a.last, &b.last, order)
    }

    /// Computes the viewport configuration from the current scroll state
    /// and handle geometry.
    ///
    /// The begin anchor is derived from the alignment (begin/center/end of
    /// the visible extent); the end anchor is always the last visible
    /// pixel. Edge membership is pixel-exact, not sort-value based.
    pub fn compute(
        store: &OrderedItemStore<K>,
        scroll: &ScrollEngine,
        align: ItemsAlign,
    ) -> ViewportSnapshot<K> {
        let view = scroll.viewport_size() as i64;
        if store.is_empty() || view == 0 {
            return ViewportSnapshot::default();
        }

        let begin_px = match align {
            ItemsAlign::Begin => 0,
            ItemsAlign::Center => view / 2,
            ItemsAlign::End => view - 1,
        };
        let end_px = view - 1;

        let axis = scroll.axis();
        let first = Self::item_at(store, scroll.content_coord_at(begin_px), axis, true);
        let last = Self::item_at(store, scroll.content_coord_at(end_px), axis, false);

        let first_widget_pos = first.as_ref().and_then(|f| {
            store
                .by_id(&f.id)
                .map(|it| scroll.viewport_coord_of(it.handle().position_along(axis)))
        });

        ViewportSnapshot {
            first,
            last,
            at_begin: scroll.at_content_begin(),
            at_end: scroll.at_content_end(),
            first_widget_pos,
        }
    }

    /// Resolves a content coordinate to the item covering it.
    ///
    /// Items are laid out in store order along the axis. A coordinate in a
    /// gap resolves to the following item for begin anchors and to the
    /// preceding item for end anchors; outside the content it clamps to
    /// the nearest edge item.
    fn item_at(
        store: &OrderedItemStore<K>,
        coord: i64,
        axis: Axis,
        prefer_following: bool,
    ) -> Option<ItemPos<K>> {
        let mut passed: Option<ItemPos<K>> = None;
        for item in store.iter() {
            let start = item.handle().position_along(axis);
            if coord < start {
                return if prefer_following {
                    Some(item.pos())
                } else {
                    passed.or_else(|| Some(item.pos()))
                };
            }
            if coord < item.handle().end_along(axis) {
                return Some(item.pos());
            }
            passed = Some(item.pos());
        }
        passed
    }
}

/// Distances (in materialized sequence positions) between the store edges
/// and the visible range.
pub(crate) fn counts<K: ListKey>(
    store: &OrderedItemStore<K>,
    snapshot: &ViewportSnapshot<K>,
) -> RangeCounts {
    let (Some(first), Some(last)) = (&snapshot.first, &snapshot.last) else {
        return RangeCounts::default();
    };
    let len = store.len();
    match (store.index_of(&first.id), store.index_of(&last.id)) {
        (Some(a), Some(b)) if b >= a => RangeCounts {
            hidden_before: a,
            visible: b - a + 1,
            hidden_after: len - 1 - b,
        },
        _ => RangeCounts::default(),
    }
}
