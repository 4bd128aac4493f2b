#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;
#[cfg(feature = "std")]
use std::collections::HashMap;

use crate::store::OrderKey;

#[cfg(feature = "std")]
pub(crate) type IdIndexMap<K> = HashMap<K, OrderKey>;
#[cfg(not(feature = "std"))]
pub(crate) type IdIndexMap<K> = BTreeMap<K, OrderKey>;

/// Bound for item identity keys.
///
/// With `std` the identity index is a hash map; without it, an ordered map.
#[cfg(feature = "std")]
pub trait ListKey: core::hash::Hash + Eq + Clone {}
#[cfg(feature = "std")]
impl<K: core::hash::Hash + Eq + Clone> ListKey for K {}

#[cfg(not(feature = "std"))]
pub trait ListKey: Ord + Clone {}
#[cfg(not(feature = "std"))]
impl<K: Ord + Clone> ListKey for K {}
