use fnv::{FnvBuildHasher, FnvHashMap, FnvHashSet};
use std::hash::Hash;

/// Hash map sized for `capacity` entries using FNV hashing, which is faster than the default
/// hasher on small keys such as cell indices, but not collision attack resistant.
pub fn fnv_hashmap<K: Hash + Eq, V>(capacity: usize) -> FnvHashMap<K, V> {
    FnvHashMap::with_capacity_and_hasher(capacity, FnvBuildHasher::default())
}

/// Hash set counterpart of `fnv_hashmap`.
pub fn fnv_hashset<T: Hash + Eq>(capacity: usize) -> FnvHashSet<T> {
    FnvHashSet::with_capacity_and_hasher(capacity, FnvBuildHasher::default())
}
