use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::cmp;

use crate::key::{IdIndexMap, ListKey};
use crate::{ItemPos, SortOrder, SortValue, VisualHandle};

/// Composite key of the order index.
///
/// Embeds the store's sort direction so a single `Ord` impl serves both
/// ascending and descending stores; the tiebreaker is a per-store
/// insertion counter, so `(sort_value, tie)` is unique. All keys inside
/// one store carry the same direction.
#[derive(Clone, Copy, Debug)]
pub(crate) struct OrderKey {
    sort_value: SortValue,
    tie: u64,
    order: SortOrder,
}

impl PartialEq for OrderKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other).is_eq()
    }
}

impl Eq for OrderKey {}

impl PartialOrd for OrderKey {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderKey {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        debug_assert!(
            self.order == other.order,
            "order keys from stores with different sort directions"
        );
        self.order
            .cmp_values(self.sort_value, other.sort_value)
            .then(self.tie.cmp(&other.tie))
    }
}

/// An item handed to the store by the host.
pub struct ListItem<K> {
    pub id: K,
    pub sort_value: SortValue,
    pub handle: Box<dyn VisualHandle>,
}

impl<K> ListItem<K> {
    pub fn new(id: K, sort_value: SortValue, handle: Box<dyn VisualHandle>) -> Self {
        Self {
            id,
            sort_value,
            handle,
        }
    }
}

impl<K: core::fmt::Debug> core::fmt::Debug for ListItem<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ListItem")
            .field("id", &self.id)
            .field("sort_value", &self.sort_value)
            .finish_non_exhaustive()
    }
}

/// A materialized item owned by the store.
pub struct StoredItem<K> {
    id: K,
    sort_value: SortValue,
    handle: Box<dyn VisualHandle>,
}

impl<K: Clone> StoredItem<K> {
    pub fn id(&self) -> &K {
        &self.id
    }

    pub fn sort_value(&self) -> SortValue {
        self.sort_value
    }

    pub fn handle(&self) -> &dyn VisualHandle {
        self.handle.as_ref()
    }

    pub fn pos(&self) -> ItemPos<K> {
        ItemPos {
            id: self.id.clone(),
            sort_value: self.sort_value,
        }
    }

    pub(crate) fn into_handle(self) -> Box<dyn VisualHandle> {
        self.handle
    }
}

impl<K: core::fmt::Debug> core::fmt::Debug for StoredItem<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StoredItem")
            .field("id", &self.id)
            .field("sort_value", &self.sort_value)
            .finish_non_exhaustive()
    }
}

/// Dual-indexed collection of materialized items.
///
/// Two synchronized views over the same entries: an order index keyed by
/// `(sort_value, insertion tiebreaker)` under the configured direction,
/// and an identity index keyed by id. Every item occupies exactly one
/// slot of each; every mutation updates both within the same call.
///
/// Operations on ids that are not materialized are no-ops returning
/// `None`/empty, never errors.
pub struct OrderedItemStore<K> {
    order: BTreeMap<OrderKey, StoredItem<K>>,
    ids: IdIndexMap<K>,
    sort_order: SortOrder,
    next_tie: u64,
}

impl<K: ListKey> OrderedItemStore<K> {
    pub fn new(sort_order: SortOrder) -> Self {
        Self {
            order: BTreeMap::new(),
            ids: IdIndexMap::new(),
            sort_order,
            next_tie: 0,
        }
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    /// Rebuilds both indices under a new direction.
    ///
    /// Handles stay materialized; relative order of comparator-equal items
    /// is preserved.
    pub fn set_sort_order(&mut self, sort_order: SortOrder) {
        if self.sort_order == sort_order {
            return;
        }
        let entries: Vec<StoredItem<K>> = core::mem::take(&mut self.order)
            .into_values()
            .collect();
        self.ids.clear();
        self.sort_order = sort_order;
        self.next_tie = 0;
        for entry in entries {
            let key = self.make_key(entry.sort_value);
            self.ids.insert(entry.id.clone(), key);
            self.order.insert(key, entry);
        }
    }

    fn make_key(&mut self, sort_value: SortValue) -> OrderKey {
        let key = OrderKey {
            sort_value,
            tie: self.next_tie,
            order: self.sort_order,
        };
        self.next_tie = self.next_tie.wrapping_add(1);
        key
    }

    fn predecessor_of(&self, key: OrderKey) -> Option<ItemPos<K>> {
        self.order.range(..key).next_back().map(|(_, it)| it.pos())
    }

    /// Inserts an item, replacing any existing entry with the same id.
    ///
    /// Returns the predecessor-in-order (so the caller can splice its
    /// presentation right after it) and, when an entry was replaced, the
    /// displaced visual handle for the caller's teardown path.
    #[allow(clippy::type_complexity)]
    pub fn insert(
        &mut self,
        item: ListItem<K>,
    ) -> (Option<ItemPos<K>>, Option<Box<dyn VisualHandle>>) {
        let displaced = self.remove(&item.id);
        let key = self.make_key(item.sort_value);
        let predecessor = self.predecessor_of(key);
        self.ids.insert(item.id.clone(), key);
        let prev = self.order.insert(
            key,
            StoredItem {
                id: item.id,
                sort_value: item.sort_value,
                handle: item.handle,
            },
        );
        debug_assert!(prev.is_none(), "fresh order key already occupied");
        (predecessor, displaced)
    }

    /// Inserts a pre-sorted run of items as one contiguous block.
    ///
    /// The caller guarantees `items` is sorted per this store's direction
    /// and belongs contiguously at one splice point, which is computed
    /// from the first element only.
    #[allow(clippy::type_complexity)]
    pub fn insert_continuous(
        &mut self,
        items: Vec<ListItem<K>>,
    ) -> (Option<ItemPos<K>>, Vec<Box<dyn VisualHandle>>) {
        let mut displaced = Vec::new();
        let mut iter = items.into_iter();
        let Some(first) = iter.next() else {
            return (None, displaced);
        };

        let (predecessor, old) = self.insert(first);
        displaced.extend(old);
        for item in iter {
            let (_, old) = self.insert(item);
            displaced.extend(old);
        }
        (predecessor, displaced)
    }

    /// Re-keys an existing item under a new sort value, keeping its
    /// materialized handle.
    ///
    /// Returns `None` when the id is not materialized; otherwise the new
    /// predecessor-in-order (which may be `None` at the front).
    pub fn reorder(&mut self, id: &K, new_sort_value: SortValue) -> Option<Option<ItemPos<K>>> {
        let key = *self.ids.get(id)?;
        let entry = self.order.remove(&key);
        debug_assert!(entry.is_some(), "identity index pointed at an empty order slot");
        let entry = entry?;

        let new_key = self.make_key(new_sort_value);
        let predecessor = self.predecessor_of(new_key);
        self.ids.insert(entry.id.clone(), new_key);
        self.order.insert(
            new_key,
            StoredItem {
                sort_value: new_sort_value,
                ..entry
            },
        );
        Some(predecessor)
    }

    /// Removes an item, returning its handle for teardown.
    pub fn remove(&mut self, id: &K) -> Option<Box<dyn VisualHandle>> {
        let key = self.ids.remove(id)?;
        let entry = self.order.remove(&key);
        debug_assert!(entry.is_some(), "identity index pointed at an empty order slot");
        entry.map(StoredItem::into_handle)
    }

    pub fn remove_many(&mut self, ids: &[K]) -> Vec<Box<dyn VisualHandle>> {
        let mut handles = Vec::new();
        for id in ids {
            handles.extend(self.remove(id));
        }
        handles
    }

    /// Drops every entry, returning all handles for teardown.
    pub fn clear(&mut self) -> Vec<Box<dyn VisualHandle>> {
        self.ids.clear();
        core::mem::take(&mut self.order)
            .into_values()
            .map(StoredItem::into_handle)
            .collect()
    }

    pub(crate) fn pop_first(&mut self) -> Option<StoredItem<K>> {
        let (_, entry) = self.order.pop_first()?;
        self.ids.remove(&entry.id);
        Some(entry)
    }

    pub(crate) fn pop_last(&mut self) -> Option<StoredItem<K>> {
        let (_, entry) = self.order.pop_last()?;
        self.ids.remove(&entry.id);
        Some(entry)
    }

    pub fn by_id(&self, id: &K) -> Option<&StoredItem<K>> {
        let key = self.ids.get(id)?;
        self.order.get(key)
    }

    pub fn contains(&self, id: &K) -> bool {
        self.ids.contains_key(id)
    }

    pub fn first(&self) -> Option<&StoredItem<K>> {
        self.order.first_key_value().map(|(_, it)| it)
    }

    pub fn last(&self) -> Option<&StoredItem<K>> {
        self.order.last_key_value().map(|(_, it)| it)
    }

    /// Forward traversal in comparator order. Reversible via `.rev()`.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &StoredItem<K>> {
        self.order.values()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Position of an item in the order index, front being 0.
    pub fn index_of(&self, id: &K) -> Option<usize> {
        let key = self.ids.get(id)?;
        Some(self.order.range(..*key).count())
    }

    /// First item whose sort value is comparator-equal to `sort_value`.
    pub fn find_sort_eq(&self, sort_value: SortValue) -> Option<&StoredItem<K>> {
        let lo = OrderKey {
            sort_value,
            tie: 0,
            order: self.sort_order,
        };
        let hi = OrderKey {
            sort_value,
            tie: u64::MAX,
            order: self.sort_order,
        };
        self.order.range(lo..=hi).next().map(|(_, it)| it)
    }

    /// Comparator-nearest item: the first at-or-after `sort_value` in
    /// store order, falling back to the last item when everything sorts
    /// before it.
    pub fn find_nearest(&self, sort_value: SortValue) -> Option<&StoredItem<K>> {
        let lo = OrderKey {
            sort_value,
            tie: 0,
            order: self.sort_order,
        };
        self.order
            .range(lo..)
            .next()
            .map(|(_, it)| it)
            .or_else(|| self.last())
    }
}

impl<K: core::fmt::Debug> core::fmt::Debug for OrderedItemStore<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("OrderedItemStore")
            .field("len", &self.order.len())
            .field("sort_order", &self.sort_order)
            .finish_non_exhaustive()
    }
}
