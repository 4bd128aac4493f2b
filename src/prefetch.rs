use alloc::vec::Vec;

use crate::viewport::RangeCounts;
use crate::{FetchDirection, SortOrder, SortValue};

/// What to do about one side of the materialized window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrefetchAction {
    /// Ask the host for `count` more items on the given side.
    Request {
        direction: FetchDirection,
        count: usize,
    },
    /// Release `count` materialized items from the given side.
    Evict {
        direction: FetchDirection,
        count: usize,
    },
}

/// Decides, after each stable layout pass, whether to grow or shrink the
/// materialized window on either side of the viewport.
///
/// The threshold triggers a fetch before the hidden buffer is exhausted so
/// fetch latency stays hidden; the hard cap bounds memory regardless of
/// how the host supplies data. All quantities are derived from the
/// current visible count and never persisted.
#[derive(Clone, Debug)]
pub struct PrefetchController {
    window: usize,
    hint: usize,
    screen_count: u32,
    threshold_ratio: f64,
    explicit_count: Option<usize>,
}

impl PrefetchController {
    pub fn new(
        hint: usize,
        screen_count: u32,
        threshold_ratio: f64,
        explicit_count: Option<usize>,
    ) -> Self {
        Self {
            window: hint,
            hint,
            screen_count,
            threshold_ratio,
            explicit_count,
        }
    }

    pub fn reconfigure(
        &mut self,
        hint: usize,
        screen_count: u32,
        threshold_ratio: f64,
        explicit_count: Option<usize>,
    ) {
        self.hint = hint;
        self.screen_count = screen_count;
        self.threshold_ratio = threshold_ratio;
        self.explicit_count = explicit_count;
        self.window = self.window.max(hint);
    }

    /// Recomputes the working window from the current visible count.
    pub fn refresh_window(&mut self, visible: usize) {
        self.window = self
            .hint
            .max(visible.saturating_mul(self.screen_count as usize));
    }

    /// Items the engine tries to keep materialized beyond the viewport on
    /// each side.
    pub fn item_window(&self) -> usize {
        self.window
    }

    /// Hard cap on materialized-but-hidden items per side.
    pub fn max_hidden_beyond_edge(&self) -> usize {
        self.window.saturating_mul(self.screen_count as usize)
    }

    /// Hidden-count level below which a fetch is requested.
    pub fn threshold(&self) -> usize {
        (self.window as f64 * self.threshold_ratio) as usize
    }

    /// How many items a single request asks the host for.
    pub fn fetch_count_effective(&self) -> usize {
        self.explicit_count.unwrap_or(self.window)
    }

    /// Runs the fetch-or-evict decision for both sides.
    ///
    /// `first_sort`/`last_sort` are the materialized edge sort values;
    /// `begin_bound`/`end_bound` the host-declared bounds of the entire
    /// dataset on the corresponding visual side (`None` = unbounded, the
    /// true edge is never considered reached). Decisions are pushed into
    /// `out`, at most one per side.
    #[allow(clippy::too_many_arguments)]
    pub fn evaluate(
        &self,
        counts: &RangeCounts,
        first_sort: SortValue,
        last_sort: SortValue,
        begin_bound: Option<SortValue>,
        end_bound: Option<SortValue>,
        order: SortOrder,
        out: &mut Vec<PrefetchAction>,
    ) {
        if counts.visible == 0 {
            return;
        }

        let threshold = self.threshold();
        let max_hidden = self.max_hidden_beyond_edge();

        let begin_reached =
            begin_bound.is_some_and(|b| order.cmp_values(first_sort, b).is_le());
        if counts.hidden_before < threshold && !begin_reached {
            out.push(PrefetchAction::Request {
                direction: FetchDirection::TowardBegin,
                count: self.fetch_count_effective(),
            });
        } else if counts.hidden_before > max_hidden {
            out.push(PrefetchAction::Evict {
                direction: FetchDirection::TowardBegin,
                count: counts.hidden_before - max_hidden,
            });
        }

        let end_reached = end_bound.is_some_and(|b| order.cmp_values(last_sort, b).is_ge());
        if counts.hidden_after < threshold && !end_reached {
            out.push(PrefetchAction::Request {
                direction: FetchDirection::TowardEnd,
                count: self.fetch_count_effective(),
            });
        } else if counts.hidden_after > max_hidden {
            out.push(PrefetchAction::Evict {
                direction: FetchDirection::TowardEnd,
                count: counts.hidden_after - max_hidden,
            });
        }
    }
}
