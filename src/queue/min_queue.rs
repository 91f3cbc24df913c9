// This file is part of AlgoB.
// Copyright © 2025 The AlgoB Developers
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Min-priority queue used by the shortest-path oracle.
use crate::network::NodeIndex;

/// Trait representing a min-priority queue.
pub trait MinPriorityQueue {
    type Key;
    type Value;
    /// Remove all the items of the queue.
    fn reset(&mut self);
    /// Push a new item to the priority queue.
    fn push(&mut self, key: Self::Key, value: Self::Value);
    /// Decrease the value of a key already in the queue.
    fn decrease_value(&mut self, key: Self::Key, new_value: Self::Value);
    /// Pop the next item in the queue.
    fn pop(&mut self) -> Option<(Self::Key, Self::Value)>;
    /// Peek the next item in the queue.
    fn peek(&self) -> Option<(&Self::Key, &Self::Value)>;
    /// Return true if the priority queue is empty.
    fn is_empty(&self) -> bool {
        self.peek().is_none()
    }
}

/// Binary min-heap of nodes with a fixed capacity.
///
/// Each node can be in the queue at most once. A position table indexed by node gives the slot of
/// each queued node so that [MinPriorityQueue::decrease_value] does not scan the heap.
///
/// The heap is 1-based: slot 0 is never used. Ties are resolved deterministically: an item moves
/// up only if its parent has a strictly larger value and moves down as long as it is not strictly
/// smaller than its smallest child.
#[derive(Clone, Debug)]
pub struct BinaryHeapQueue<P> {
    keys: Vec<NodeIndex>,
    values: Vec<P>,
    /// Slot of each node in the heap (`None` if the node is not in the queue).
    positions: Vec<Option<usize>>,
    len: usize,
}

impl<P: Copy + Default + PartialOrd> BinaryHeapQueue<P> {
    /// Creates an empty queue able to hold the nodes `0..capacity`.
    pub fn with_capacity(capacity: usize) -> Self {
        BinaryHeapQueue {
            keys: vec![NodeIndex::default(); capacity + 1],
            values: vec![P::default(); capacity + 1],
            positions: vec![None; capacity],
            len: 0,
        }
    }

    /// Returns the number of items in the queue.
    #[cfg(test)]
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    fn swap(&mut self, x: usize, y: usize) {
        self.keys.swap(x, y);
        self.values.swap(x, y);
        self.positions[self.keys[x].index()] = Some(x);
        self.positions[self.keys[y].index()] = Some(y);
    }

    fn fix_up(&mut self, mut n: usize) {
        while n != 1 {
            let p = n / 2;
            if self.values[p] > self.values[n] {
                self.swap(p, n);
                n = p;
            } else {
                return;
            }
        }
    }

    fn fix_down(&mut self, mut n: usize) {
        while 2 * n <= self.len {
            let mut j = 2 * n;
            if j < self.len && self.values[j + 1] < self.values[j] {
                j += 1;
            }
            if self.values[n] < self.values[j] {
                return;
            }
            self.swap(j, n);
            n = j;
        }
    }
}

impl<P: Copy + Default + PartialOrd> MinPriorityQueue for BinaryHeapQueue<P> {
    type Key = NodeIndex;
    type Value = P;
    fn reset(&mut self) {
        for key in &self.keys[1..=self.len] {
            self.positions[key.index()] = None;
        }
        self.len = 0;
    }
    fn push(&mut self, key: NodeIndex, value: P) {
        debug_assert!(self.positions[key.index()].is_none());
        self.len += 1;
        self.keys[self.len] = key;
        self.values[self.len] = value;
        self.positions[key.index()] = Some(self.len);
        self.fix_up(self.len);
    }
    fn decrease_value(&mut self, key: NodeIndex, new_value: P) {
        if let Some(slot) = self.positions[key.index()] {
            self.values[slot] = new_value;
            self.fix_up(slot);
        }
    }
    fn pop(&mut self) -> Option<(NodeIndex, P)> {
        if self.len == 0 {
            return None;
        }
        let item = (self.keys[1], self.values[1]);
        self.positions[item.0.index()] = None;
        if self.len > 1 {
            self.keys[1] = self.keys[self.len];
            self.values[1] = self.values[self.len];
            self.positions[self.keys[1].index()] = Some(1);
        }
        self.len -= 1;
        self.fix_down(1);
        Some(item)
    }
    fn peek(&self) -> Option<(&NodeIndex, &P)> {
        if self.len == 0 {
            None
        } else {
            Some((&self.keys[1], &self.values[1]))
        }
    }
    fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::node_index;

    #[test]
    fn priority_queue_test() {
        let queue: &mut dyn MinPriorityQueue<Key = NodeIndex, Value = f64> =
            &mut BinaryHeapQueue::with_capacity(4);
        queue.push(node_index(0), 3.0);
        queue.push(node_index(1), 2.0);
        assert_eq!(queue.peek(), Some((&node_index(1), &2.0)));
        queue.decrease_value(node_index(0), 1.0);
        assert_eq!(queue.pop(), Some((node_index(0), 1.0)));
        assert_eq!(queue.pop(), Some((node_index(1), 2.0)));
        assert_eq!(queue.pop(), None);
        assert!(queue.is_empty());
        queue.push(node_index(2), 5.0);
        assert_eq!(queue.peek(), Some((&node_index(2), &5.0)));
        queue.reset();
        assert_eq!(queue.peek(), None);
        // The node can be pushed again after a reset.
        queue.push(node_index(2), 4.0);
        assert_eq!(queue.pop(), Some((node_index(2), 4.0)));
    }

    #[test]
    fn heap_order_test() {
        let values = [5.0, 1.0, 4.0, 9.0, 0.5, 7.0, 3.0, 3.0];
        let mut queue = BinaryHeapQueue::with_capacity(values.len());
        for (i, &v) in values.iter().enumerate() {
            queue.push(node_index(i), v);
        }
        assert_eq!(queue.len(), values.len());
        let mut popped = Vec::new();
        while let Some((_, v)) = queue.pop() {
            popped.push(v);
        }
        assert_eq!(popped, vec![0.5, 1.0, 3.0, 3.0, 4.0, 5.0, 7.0, 9.0]);
    }

    #[test]
    fn decrease_value_test() {
        let mut queue = BinaryHeapQueue::with_capacity(5);
        for i in 0..5 {
            queue.push(node_index(i), 10.0 + i as f64);
        }
        queue.decrease_value(node_index(4), 0.0);
        queue.decrease_value(node_index(3), 10.5);
        assert_eq!(queue.pop(), Some((node_index(4), 0.0)));
        assert_eq!(queue.pop(), Some((node_index(0), 10.0)));
        assert_eq!(queue.pop(), Some((node_index(3), 10.5)));
        assert_eq!(queue.pop(), Some((node_index(1), 11.0)));
        assert_eq!(queue.pop(), Some((node_index(2), 12.0)));
        assert!(queue.is_empty());
    }
}
