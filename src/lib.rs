//! A headless flyweight list engine for bidirectionally virtualized
//! scrolling.
//!
//! This crate presents a logically unbounded, ordered collection while
//! materializing only a bounded working set around the current viewport:
//! a dual-indexed item store, threshold-driven prefetch and eviction,
//! orientation-invariant scroll math, and edge sticking/jump semantics.
//!
//! It is UI-agnostic. A TUI/GUI layer is expected to provide:
//! - visual handles implementing [`VisualHandle`] (geometry along the
//!   scroll axis plus teardown)
//! - viewport size and scroll/wheel events
//! - data, supplied on demand through the [`ListOptions`] callbacks
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod edge;
mod engine;
mod handle;
mod key;
mod options;
mod prefetch;
mod scheduler;
mod scroll;
mod store;
mod types;
mod viewport;

#[cfg(test)]
mod tests;

pub use edge::{EdgeJumpController, JumpOutcome};
pub use engine::FlyweightList;
pub use handle::VisualHandle;
pub use key::ListKey;
pub use options::{
    InsertItemCallback, ItemRangeChangedCallback, ListOptions, RemoveItemCallback,
    RequestEdgeCallback, RequestItemsCallback, ViewportChangedCallback,
};
pub use prefetch::{PrefetchAction, PrefetchController};
pub use scheduler::SingleShot;
pub use scroll::{ScrollEngine, ScrollbarState};
pub use store::{ListItem, OrderedItemStore, StoredItem};
pub use types::{
    Axis, EdgePosition, FetchDirection, ItemId, ItemPos, ItemsAlign, JumpModifiers,
    LoadErrorCause, ScrollEdge, SortOrder, SortValue, StickMode,
};
pub use viewport::{RangeCounts, ViewportSnapshot, ViewportTracker};
