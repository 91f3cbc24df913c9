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

//! First-in first-out queue with a fixed capacity.

/// Ring buffer holding at most `capacity` items.
///
/// Pushing an item in a full queue is a logic error (it panics in debug builds and overwrites the
/// oldest item otherwise).
#[derive(Clone, Debug)]
pub struct FifoQueue<T> {
    data: Vec<T>,
    front: usize,
    len: usize,
}

impl<T: Copy + Default> FifoQueue<T> {
    /// Creates an empty queue able to hold `capacity` items.
    pub fn with_capacity(capacity: usize) -> Self {
        FifoQueue {
            data: vec![T::default(); capacity.max(1)],
            front: 0,
            len: 0,
        }
    }

    /// Adds an item at the back of the queue.
    pub fn push(&mut self, item: T) {
        debug_assert!(self.len < self.data.len(), "FifoQueue is full");
        let rear = (self.front + self.len) % self.data.len();
        self.data[rear] = item;
        self.len += 1;
    }

    /// Removes the item at the front of the queue.
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let item = self.data[self.front];
        self.front = (self.front + 1) % self.data.len();
        self.len -= 1;
        Some(item)
    }

    #[cfg(test)]
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    #[cfg(test)]
    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifo_test() {
        let mut queue = FifoQueue::with_capacity(3);
        assert!(queue.is_empty());
        queue.push(1);
        queue.push(2);
        queue.push(3);
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.pop(), Some(1));
        // Wraps around the end of the buffer.
        queue.push(4);
        assert_eq!(queue.pop(), Some(2));
        assert_eq!(queue.pop(), Some(3));
        assert_eq!(queue.pop(), Some(4));
        assert_eq!(queue.pop(), None);
        assert!(queue.is_empty());
    }
}
