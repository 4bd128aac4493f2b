use crate::key::ListKey;
use crate::scroll::ScrollEngine;
use crate::store::OrderedItemStore;
use crate::viewport::ViewportSnapshot;
use crate::{EdgePosition, ScrollEdge, SortOrder, SortValue, StickMode};

/// Outcome of an edge-jump evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JumpOutcome {
    /// The target edge was already materialized; the engine scrolled.
    Scrolled,
    /// The host must fetch true-edge data and reload before any scroll.
    NeedsHost,
}

/// Edge sticking and jump-to-true-edge decisions.
///
/// Tracks where the viewport sits relative to the materialized content;
/// the position is re-derived from scroll state on every settle, never
/// carried forward across mutations.
#[derive(Clone, Copy, Debug)]
pub struct EdgeJumpController {
    position: EdgePosition,
}

impl EdgeJumpController {
    pub fn new() -> Self {
        Self {
            position: EdgePosition::InMiddle,
        }
    }

    pub fn position(&self) -> EdgePosition {
        self.position
    }

    pub fn update_position(&mut self, scroll: &ScrollEngine, stick: StickMode) {
        let begin = scroll.at_content_begin();
        let end = scroll.at_content_end();
        self.position = match (begin, end) {
            (true, true) => {
                // Content no larger than the viewport: both edges touch;
                // the stick mode decides which one we report.
                if stick == StickMode::End {
                    EdgePosition::AtEnd
                } else {
                    EdgePosition::AtBegin
                }
            }
            (true, false) => EdgePosition::AtBegin,
            (false, true) => EdgePosition::AtEnd,
            (false, false) => EdgePosition::InMiddle,
        };
    }

    /// Restores the viewport after a content mutation.
    ///
    /// If the kept configuration was at the configured stick edge (or
    /// nothing was visible yet), the viewport re-follows that edge.
    /// Otherwise the pixel anchor of the previously first-visible item is
    /// preserved so size changes cause no visual jump.
    pub fn restore_after_mutation<K: ListKey>(
        &self,
        kept: &ViewportSnapshot<K>,
        store: &OrderedItemStore<K>,
        scroll: &mut ScrollEngine,
        stick: StickMode,
    ) {
        if store.is_empty() {
            return;
        }
        match stick {
            StickMode::End if kept.at_end || kept.first.is_none() => {
                scroll.scroll_to_edge(ScrollEdge::End);
                return;
            }
            StickMode::Home if kept.at_begin || kept.first.is_none() => {
                scroll.scroll_to_edge(ScrollEdge::Home);
                return;
            }
            _ => {}
        }
        Self::compensate_size_change(kept, store, scroll);
    }

    /// Re-anchors the scroll position to the item that was first visible
    /// before the mutation.
    ///
    /// The anchor item is resolved by id, then by comparator-equal sort
    /// value, then by comparator-nearest match, in that priority order.
    pub fn compensate_size_change<K: ListKey>(
        kept: &ViewportSnapshot<K>,
        store: &OrderedItemStore<K>,
        scroll: &mut ScrollEngine,
    ) {
        let Some(anchor) = &kept.first else {
            return;
        };
        let Some(old_px) = kept.first_widget_pos else {
            return;
        };

        let item = store
            .by_id(&anchor.id)
            .or_else(|| store.find_sort_eq(anchor.sort_value))
            .or_else(|| store.find_nearest(anchor.sort_value));
        let Some(item) = item else {
            return;
        };

        let axis = scroll.axis();
        let new_px = scroll.viewport_coord_of(item.handle().position_along(axis));
        let delta = new_px - old_px;
        if delta != 0 {
            ltrace!(delta, "compensate_size_change");
            scroll.scroll(delta);
        }
    }

    /// Decides whether a jump to an edge can be served from materialized
    /// data.
    ///
    /// `edge_sort` and `bound` belong to the targeted edge. The true edge
    /// counts as materialized only when the edge item's sort value is
    /// comparator-equal to the host-declared bound; an undeclared bound
    /// always defers to the host. `hidden_toward_edge` above the
    /// configured threshold also defers, as reloading at the edge is
    /// cheaper than walking a long materialized tail.
    pub fn evaluate_jump(
        &self,
        edge_sort: SortValue,
        bound: Option<SortValue>,
        order: SortOrder,
        hidden_toward_edge: usize,
        hidden_threshold: Option<usize>,
        force_long: bool,
    ) -> JumpOutcome {
        if force_long {
            return JumpOutcome::NeedsHost;
        }
        let materialized = bound.is_some_and(|b| order.cmp_values(edge_sort, b).is_eq());
        if !materialized {
            return JumpOutcome::NeedsHost;
        }
        if hidden_threshold.is_some_and(|t| hidden_toward_edge > t) {
            return JumpOutcome::NeedsHost;
        }
        JumpOutcome::Scrolled
    }
}

impl Default for EdgeJumpController {
    fn default() -> Self {
        Self::new()
    }
}
