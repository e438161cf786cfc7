use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone)]
struct Node<K, V> {
    key: K,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Fixed-capacity map evicting the least-recently-used entry.
///
/// Entries live in a slot vector linked into a recency list (head is the
/// most recent), so lookups, inserts and evictions are O(1). The cache knows
/// nothing about where its values came from; owners clear it when inputs change.
#[derive(Debug, Clone)]
pub struct LruCache<K, V> {
    index: HashMap<K, usize>,
    nodes: Vec<Node<K, V>>,
    head: Option<usize>,
    tail: Option<usize>,
    capacity: usize,
}

impl<K: Eq + Hash + Clone, V> LruCache<K, V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            index: HashMap::with_capacity(capacity),
            nodes: Vec::with_capacity(capacity),
            head: None,
            tail: None,
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Returns the cached value and marks it most recently used.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let idx = *self.index.get(key)?;
        self.move_to_front(idx);
        Some(&self.nodes[idx].value)
    }

    /// Returns the cached value without touching recency.
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.index.get(key).map(|&idx| &self.nodes[idx].value)
    }

    /// Inserts or overwrites `key`. When a new key arrives at capacity, the
    /// least recently used entry is evicted and returned.
    pub fn set(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(&idx) = self.index.get(&key) {
            self.nodes[idx].value = value;
            self.move_to_front(idx);
            return None;
        }
        if self.capacity == 0 {
            return None;
        }

        let node = Node {
            key: key.clone(),
            value,
            prev: None,
            next: None,
        };

        if self.index.len() >= self.capacity {
            let victim = self.tail?;
            self.unlink(victim);
            let old = std::mem::replace(&mut self.nodes[victim], node);
            self.index.remove(&old.key);
            self.index.insert(key, victim);
            self.push_front(victim);
            return Some((old.key, old.value));
        }

        let idx = self.nodes.len();
        self.nodes.push(node);
        self.index.insert(key, idx);
        self.push_front(idx);
        None
    }

    pub fn clear(&mut self) {
        self.index.clear();
        self.nodes.clear();
        self.head = None;
        self.tail = None;
    }

    /// Keys from most to least recently used.
    pub fn keys_by_recency(&self) -> Vec<&K> {
        let mut keys = Vec::with_capacity(self.len());
        let mut cursor = self.head;
        while let Some(idx) = cursor {
            keys.push(&self.nodes[idx].key);
            cursor = self.nodes[idx].next;
        }
        keys
    }

    fn move_to_front(&mut self, idx: usize) {
        if self.head == Some(idx) {
            return;
        }
        self.unlink(idx);
        self.push_front(idx);
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = (self.nodes[idx].prev, self.nodes[idx].next);
        match prev {
            Some(p) => self.nodes[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.nodes[n].prev = prev,
            None => self.tail = prev,
        }
        self.nodes[idx].prev = None;
        self.nodes[idx].next = None;
    }

    fn push_front(&mut self, idx: usize) {
        self.nodes[idx].prev = None;
        self.nodes[idx].next = self.head;
        if let Some(old_head) = self.head {
            self.nodes[old_head].prev = Some(idx);
        }
        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::LruCache;

    fn filled(capacity: usize) -> LruCache<String, usize> {
        let mut cache = LruCache::new(capacity);
        for i in 0..capacity {
            cache.set(format!("k{i}"), i);
        }
        cache
    }

    #[test]
    fn overflow_evicts_least_recent() {
        let mut cache = filled(3);
        let evicted = cache.set("k3".to_string(), 3);
        assert_eq!(evicted, Some(("k0".to_string(), 0)));
        assert_eq!(cache.len(), 3);
        assert!(!cache.contains(&"k0".to_string()));
        assert!(cache.contains(&"k1".to_string()));
    }

    #[test]
    fn get_protects_from_eviction() {
        let mut cache = filled(3);
        assert_eq!(cache.get(&"k0".to_string()), Some(&0));
        let evicted = cache.set("k3".to_string(), 3);
        assert_eq!(evicted.map(|(key, _)| key), Some("k1".to_string()));
        assert!(cache.contains(&"k0".to_string()));
    }

    #[test]
    fn peek_does_not_protect() {
        let mut cache = filled(2);
        assert_eq!(cache.peek(&"k0".to_string()), Some(&0));
        cache.set("k2".to_string(), 2);
        assert!(!cache.contains(&"k0".to_string()));
    }

    #[test]
    fn overwrite_refreshes_without_growth() {
        let mut cache = filled(3);
        assert_eq!(cache.set("k0".to_string(), 10), None);
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.peek(&"k0".to_string()), Some(&10));
        let evicted = cache.set("k3".to_string(), 3);
        assert_eq!(evicted.map(|(key, _)| key), Some("k1".to_string()));
    }

    #[test]
    fn recency_order_is_tracked() {
        let mut cache = filled(4);
        cache.get(&"k1".to_string());
        cache.get(&"k3".to_string());
        let keys: Vec<&str> = cache.keys_by_recency().into_iter().map(String::as_str).collect();
        assert_eq!(keys, ["k3", "k1", "k2", "k0"]);
    }

    #[test]
    fn capacity_one_keeps_latest() {
        let mut cache = filled(1);
        cache.set("k9".to_string(), 9);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&"k9".to_string()), Some(&9));
        assert_eq!(cache.get(&"k0".to_string()), None);
    }

    #[test]
    fn zero_capacity_stores_nothing() {
        let mut cache: LruCache<String, usize> = LruCache::new(0);
        assert_eq!(cache.set("a".to_string(), 1), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn clear_resets_everything() {
        let mut cache = filled(5);
        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.keys_by_recency().is_empty());
        cache.set("fresh".to_string(), 1);
        assert_eq!(cache.get(&"fresh".to_string()), Some(&1));
    }

    #[test]
    fn many_rounds_stay_bounded() {
        let mut cache = LruCache::new(50);
        for i in 0..1_000usize {
            cache.set(i.to_string(), i);
        }
        assert_eq!(cache.len(), 50);
        assert_eq!(cache.keys_by_recency().len(), 50);
        assert!(cache.contains(&"999".to_string()));
        assert!(!cache.contains(&"949".to_string()));
        assert!(cache.contains(&"950".to_string()));
    }
}
