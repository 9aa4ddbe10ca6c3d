//! Priority-selection structures backing the nearest-neighbour queries.
//!
//! `MinHeap` is a plain array-backed binary min-heap; `KMin` retains the k
//! smallest-key items seen so far by running a max-heap over negated keys.

/// A key/value pair held by [`MinHeap`].
#[derive(Debug, Clone, PartialEq)]
pub struct HeapItem<T> {
    pub key: f64,
    pub value: T,
}

/// Array-backed binary min-heap ordered by `f64` key.
#[derive(Debug, Default)]
pub struct MinHeap<T> {
    items: Vec<HeapItem<T>>,
}

impl<T> MinHeap<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn size(&self) -> usize {
        self.items.len()
    }

    /// Raw backing array. No ordering guarantee beyond the heap property.
    pub fn items(&self) -> &[HeapItem<T>] {
        &self.items
    }

    /// Inserts in O(log n) by sifting up from the new last slot.
    pub fn push(&mut self, key: f64, value: T) {
        self.items.push(HeapItem { key, value });
        let mut i = self.items.len() - 1;
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.items[i].key < self.items[parent].key {
                self.items.swap(i, parent);
                i = parent;
            } else {
                break;
            }
        }
    }

    /// Minimum item without removing it. `None` on an empty heap; callers
    /// that cannot tolerate that must check `size()` first.
    pub fn peek(&self) -> Option<&HeapItem<T>> {
        self.items.first()
    }

    /// Removes and returns the minimum.
    ///
    /// # Panics
    /// Panics on an empty heap. That is a programmer error upstream, not a
    /// recoverable condition.
    pub fn pop(&mut self) -> HeapItem<T> {
        assert!(!self.items.is_empty(), "pop() called on empty binary heap");
        let last = self.items.len() - 1;
        self.items.swap(0, last);
        let min = self.items.pop().expect("heap checked non-empty");
        self.sift_down(0);
        min
    }

    /// Combined pop-then-push in a single sift-down pass.
    ///
    /// # Panics
    /// Panics on an empty heap, like [`MinHeap::pop`].
    pub fn pop_push(&mut self, key: f64, value: T) -> HeapItem<T> {
        assert!(!self.items.is_empty(), "pop() called on empty binary heap");
        let min = std::mem::replace(&mut self.items[0], HeapItem { key, value });
        self.sift_down(0);
        min
    }

    // Smallest of {node, left, right}; left is checked before right and wins
    // only when strictly smaller, so equal keys keep the parent in place.
    fn sift_down(&mut self, mut i: usize) {
        let n = self.items.len();
        loop {
            let left = 2 * i + 1;
            let right = 2 * i + 2;
            let mut smallest = i;
            if left < n && self.items[left].key < self.items[smallest].key {
                smallest = left;
            }
            if right < n && self.items[right].key < self.items[smallest].key {
                smallest = right;
            }
            if smallest == i {
                break;
            }
            self.items.swap(i, smallest);
            i = smallest;
        }
    }
}

/// Retains the k smallest-key items from a stream of `add` calls.
#[derive(Debug)]
pub struct KMin<T> {
    k: usize,
    // Max-heap emulated by negating keys before they enter the min-heap.
    heap: MinHeap<T>,
}

impl<T> KMin<T> {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            heap: MinHeap::new(),
        }
    }

    pub fn size(&self) -> usize {
        self.heap.size()
    }

    pub fn add(&mut self, key: f64, value: T) {
        if self.k == 0 {
            return;
        }
        if self.heap.size() < self.k {
            self.heap.push(-key, value);
            return;
        }
        // Full: replace the current k-th smallest only on a strictly
        // smaller key.
        let largest = -self.heap.peek().expect("heap is full").key;
        if key < largest {
            self.heap.pop_push(-key, value);
        }
    }

    /// The k-th smallest key seen so far, `None` when empty.
    pub fn get_largest_key(&self) -> Option<f64> {
        self.heap.peek().map(|item| -item.key)
    }

    /// Held values sorted by ascending original key.
    pub fn get_min_k_items(self) -> Vec<T> {
        let mut items = self.heap.items;
        // Negated keys sort descending, which is ascending original key.
        items.sort_by(|a, b| b.key.total_cmp(&a.key));
        items.into_iter().map(|item| item.value).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peek_tracks_minimum_through_push_pop_sequences() {
        let mut heap = MinHeap::new();
        let keys = [5.0, 3.0, 8.0, 1.0, 9.0, 2.0, 7.0];
        for (i, &k) in keys.iter().enumerate() {
            heap.push(k, i);
            let min = heap
                .items()
                .iter()
                .map(|item| item.key)
                .fold(f64::INFINITY, f64::min);
            assert_eq!(heap.peek().unwrap().key, min);
        }
        let mut drained = Vec::new();
        while heap.size() > 0 {
            drained.push(heap.pop().key);
        }
        let mut sorted = keys.to_vec();
        sorted.sort_by(f64::total_cmp);
        assert_eq!(drained, sorted);
    }

    #[test]
    fn pop_push_is_pop_then_push() {
        let mut heap = MinHeap::new();
        heap.push(4.0, 'a');
        heap.push(2.0, 'b');
        heap.push(6.0, 'c');
        let out = heap.pop_push(3.0, 'd');
        assert_eq!(out.key, 2.0);
        assert_eq!(out.value, 'b');
        assert_eq!(heap.peek().unwrap().key, 3.0);
        assert_eq!(heap.size(), 3);
    }

    #[test]
    #[should_panic(expected = "pop() called on empty binary heap")]
    fn pop_on_empty_heap_panics() {
        let mut heap: MinHeap<u32> = MinHeap::new();
        heap.pop();
    }

    #[test]
    fn kmin_retains_k_smallest() {
        let mut kmin = KMin::new(3);
        kmin.add(5.0, 'a');
        kmin.add(1.0, 'b');
        kmin.add(9.0, 'c');
        kmin.add(2.0, 'd');
        assert_eq!(kmin.get_largest_key(), Some(5.0));
        assert_eq!(kmin.get_min_k_items(), vec!['b', 'd', 'a']);
    }

    #[test]
    fn kmin_ignores_keys_not_below_current_largest() {
        let mut kmin = KMin::new(2);
        kmin.add(1.0, 1);
        kmin.add(2.0, 2);
        kmin.add(2.0, 3); // equal to largest: not admitted
        kmin.add(5.0, 4);
        assert_eq!(kmin.get_largest_key(), Some(2.0));
        assert_eq!(kmin.get_min_k_items(), vec![1, 2]);
    }

    #[test]
    fn kmin_empty_and_zero_capacity() {
        let kmin: KMin<u8> = KMin::new(3);
        assert_eq!(kmin.get_largest_key(), None);
        assert!(kmin.get_min_k_items().is_empty());

        let mut zero: KMin<u8> = KMin::new(0);
        zero.add(1.0, 7);
        assert_eq!(zero.size(), 0);
    }
}
