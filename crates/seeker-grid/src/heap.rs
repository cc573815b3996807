//! A generic bounded binary min-heap.
//!
//! The A* planner uses this as its open set, sized from
//! [`crate::map::grid::Grid::max_size`] so an insert can never legitimately
//! overflow. Capacity and emptiness violations are reported as typed errors
//! rather than panics.

use crate::error::GridError;

/// Bounded binary min-heap over any totally-ordered element.
///
/// Backed by a `Vec<T>` in the usual implicit-tree layout (children of `i` at
/// `2i + 1` and `2i + 2`). The root is always the minimum element.
#[derive(Debug, Clone)]
pub struct MinHeap<T> {
    items: Vec<T>,
    capacity: usize,
}

impl<T: Ord> MinHeap<T> {
    /// Creates an empty heap that can hold at most `capacity` elements.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Builds a heap from `items` in O(n) by sinking every internal node,
    /// starting at the last internal node and ending at the root.
    ///
    /// The resulting heap's capacity equals the element count.
    #[must_use]
    pub fn heapify(items: Vec<T>) -> Self {
        let mut heap = Self {
            capacity: items.len(),
            items,
        };
        for index in (0..heap.items.len() / 2).rev() {
            heap.sift_down(index);
        }
        heap
    }

    /// Inserts an element in O(log n).
    ///
    /// # Errors
    ///
    /// Returns [`GridError::QueueFull`] when the heap already holds
    /// `capacity` elements.
    pub fn insert(&mut self, item: T) -> Result<(), GridError> {
        if self.items.len() >= self.capacity {
            return Err(GridError::QueueFull {
                capacity: self.capacity,
            });
        }
        self.items.push(item);
        self.sift_up(self.items.len() - 1);
        Ok(())
    }

    /// Removes and returns the minimum element in O(log n).
    ///
    /// # Errors
    ///
    /// Returns [`GridError::QueueEmpty`] when the heap is empty.
    pub fn extract_min(&mut self) -> Result<T, GridError> {
        if self.items.is_empty() {
            return Err(GridError::QueueEmpty);
        }
        let last = self.items.len() - 1;
        self.items.swap(0, last);
        let min = self.items.pop().ok_or(GridError::QueueEmpty)?;
        if !self.items.is_empty() {
            self.sift_down(0);
        }
        Ok(min)
    }

    /// Returns the minimum element without removing it.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::QueueEmpty`] when the heap is empty.
    pub fn peek_min(&self) -> Result<&T, GridError> {
        self.items.first().ok_or(GridError::QueueEmpty)
    }

    /// Linear membership scan. O(n), acceptable because the heap is bounded
    /// by the grid cell count.
    pub fn contains(&self, item: &T) -> bool {
        self.items.iter().any(|existing| existing == item)
    }

    /// Replaces one element equal to `old` with `new` and restores the heap
    /// invariant in whichever direction the key moved. O(n) to locate the
    /// element, O(log n) to re-sift.
    ///
    /// Returns `false` (leaving the heap untouched) when no element equals
    /// `old`.
    pub fn update(&mut self, old: &T, new: T) -> bool {
        let Some(index) = self.items.iter().position(|existing| existing == old) else {
            return false;
        };
        self.items[index] = new;
        let index = self.sift_up(index);
        self.sift_down(index);
        true
    }

    /// Drains the heap in ascending order (heapsort).
    #[must_use]
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut sorted = Vec::with_capacity(self.items.len());
        while let Ok(item) = self.extract_min() {
            sorted.push(item);
        }
        sorted
    }

    /// Number of elements currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the heap holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the heap is at capacity.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    /// Maximum number of elements the heap can hold.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Moves the element at `index` toward the root until its parent is no
    /// larger. Returns the element's final index.
    fn sift_up(&mut self, mut index: usize) -> usize {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.items[index] < self.items[parent] {
                self.items.swap(index, parent);
                index = parent;
            } else {
                break;
            }
        }
        index
    }

    /// Moves the element at `index` toward the leaves until both children are
    /// no smaller. Returns the element's final index.
    fn sift_down(&mut self, mut index: usize) -> usize {
        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            let mut smallest = index;
            if left < self.items.len() && self.items[left] < self.items[smallest] {
                smallest = left;
            }
            if right < self.items.len() && self.items[right] < self.items[smallest] {
                smallest = right;
            }
            if smallest == index {
                break;
            }
            self.items.swap(index, smallest);
            index = smallest;
        }
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    #[test]
    fn test_insert_beyond_capacity_fails() {
        let mut heap = MinHeap::new(3);
        heap.insert(5).unwrap();
        heap.insert(1).unwrap();
        heap.insert(9).unwrap();
        assert!(heap.is_full());
        assert_eq!(heap.insert(7), Err(GridError::QueueFull { capacity: 3 }));
        assert_eq!(heap.len(), 3, "failed insert must not change the heap");
    }

    #[test]
    fn test_extract_and_peek_on_empty_fail() {
        let mut heap: MinHeap<u32> = MinHeap::new(4);
        assert_eq!(heap.extract_min(), Err(GridError::QueueEmpty));
        assert_eq!(heap.peek_min(), Err(GridError::QueueEmpty));
    }

    #[test]
    fn test_extracts_in_ascending_order() {
        let mut values: Vec<u32> = (0..50).collect();
        let mut rng = StdRng::seed_from_u64(42);
        values.shuffle(&mut rng);

        let mut heap = MinHeap::new(values.len());
        for value in &values {
            heap.insert(*value).unwrap();
        }
        for expected in 0..50 {
            assert_eq!(heap.extract_min().unwrap(), expected);
        }
        assert!(heap.is_empty());
    }

    #[test]
    fn test_invariant_under_interleaved_operations() {
        let mut heap = MinHeap::new(8);
        heap.insert(30).unwrap();
        heap.insert(10).unwrap();
        heap.insert(20).unwrap();
        assert_eq!(heap.extract_min().unwrap(), 10);
        heap.insert(5).unwrap();
        heap.insert(25).unwrap();
        assert_eq!(heap.extract_min().unwrap(), 5);
        assert_eq!(heap.extract_min().unwrap(), 20);
        heap.insert(15).unwrap();
        assert_eq!(heap.extract_min().unwrap(), 15);
        assert_eq!(heap.extract_min().unwrap(), 25);
        assert_eq!(heap.extract_min().unwrap(), 30);
        assert!(heap.is_empty());
    }

    #[test]
    fn test_peek_does_not_remove() {
        let mut heap = MinHeap::new(2);
        heap.insert(4).unwrap();
        heap.insert(2).unwrap();
        assert_eq!(*heap.peek_min().unwrap(), 2);
        assert_eq!(heap.len(), 2);
        assert_eq!(heap.extract_min().unwrap(), 2);
    }

    #[test]
    fn test_contains() {
        let mut heap = MinHeap::new(4);
        heap.insert(3).unwrap();
        heap.insert(8).unwrap();
        assert!(heap.contains(&3));
        assert!(heap.contains(&8));
        assert!(!heap.contains(&5));
    }

    #[test]
    fn test_heapify_builds_valid_heap() {
        let heap = MinHeap::heapify(vec![9, 3, 7, 1, 8, 2, 5]);
        assert_eq!(heap.capacity(), 7);
        assert!(heap.is_full(), "heapify capacity equals the element count");
        assert_eq!(heap.into_sorted_vec(), vec![1, 2, 3, 5, 7, 8, 9]);
    }

    #[test]
    fn test_heapify_empty_and_single() {
        let empty: MinHeap<u32> = MinHeap::heapify(Vec::new());
        assert!(empty.is_empty());
        let single = MinHeap::heapify(vec![11]);
        assert_eq!(*single.peek_min().unwrap(), 11);
    }

    #[test]
    fn test_into_sorted_vec_matches_std_sort() {
        let mut values: Vec<i32> = (-20..20).collect();
        let mut rng = StdRng::seed_from_u64(7);
        values.shuffle(&mut rng);

        let heap = MinHeap::heapify(values.clone());
        values.sort_unstable();
        assert_eq!(heap.into_sorted_vec(), values);
    }

    #[test]
    fn test_update_decreases_key() {
        let mut heap = MinHeap::new(4);
        heap.insert(10).unwrap();
        heap.insert(20).unwrap();
        heap.insert(30).unwrap();
        assert!(heap.update(&30, 1));
        assert_eq!(heap.extract_min().unwrap(), 1);
        assert_eq!(heap.extract_min().unwrap(), 10);
        assert_eq!(heap.extract_min().unwrap(), 20);
    }

    #[test]
    fn test_update_increases_key() {
        let mut heap = MinHeap::new(4);
        heap.insert(10).unwrap();
        heap.insert(20).unwrap();
        heap.insert(30).unwrap();
        assert!(heap.update(&10, 40));
        assert_eq!(heap.extract_min().unwrap(), 20);
        assert_eq!(heap.extract_min().unwrap(), 30);
        assert_eq!(heap.extract_min().unwrap(), 40);
    }

    #[test]
    fn test_update_missing_element_is_noop() {
        let mut heap = MinHeap::new(4);
        heap.insert(10).unwrap();
        assert!(!heap.update(&99, 1));
        assert_eq!(heap.len(), 1);
        assert_eq!(*heap.peek_min().unwrap(), 10);
    }

    #[test]
    fn test_duplicate_keys_are_allowed() {
        let mut heap = MinHeap::new(5);
        for value in [4, 4, 2, 4, 2] {
            heap.insert(value).unwrap();
        }
        assert_eq!(heap.into_sorted_vec(), vec![2, 2, 4, 4, 4]);
    }

    #[test]
    fn test_zero_capacity_rejects_everything() {
        let mut heap = MinHeap::new(0);
        assert_eq!(heap.insert(1), Err(GridError::QueueFull { capacity: 0 }));
        assert_eq!(heap.extract_min(), Err(GridError::QueueEmpty));
    }
}
