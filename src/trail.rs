//! Fixed-capacity history of recent positions

use std::collections::VecDeque;

use crate::rod::Point;

/// Bounded FIFO of points; pushing onto a full trail evicts the oldest
///
/// Storage is allocated once at construction and never grows.
#[derive(Debug, Clone)]
pub struct Trail {
    points: VecDeque<Point>,
    capacity: usize,
}

impl Trail {
    /// Create an empty trail holding at most `capacity` points
    ///
    /// A zero capacity is bumped to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a point, evicting the oldest when full
    pub fn push(&mut self, point: Point) {
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    /// Points from oldest to newest
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Point> + '_ {
        self.points.iter()
    }

    /// Most recently pushed point
    pub fn newest(&self) -> Option<Point> {
        self.points.back().copied()
    }

    /// Number of stored points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when no point has been pushed yet
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Maximum number of stored points
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every stored point
    pub fn clear(&mut self) {
        self.points.clear();
    }
}
