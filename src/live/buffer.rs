use std::collections::VecDeque;

/// Fixed-capacity sequence that drops its oldest element on overflow.
///
/// Elements are kept oldest-to-newest. The buffer does no locking of its own;
/// it lives inside a [`LiveSession`](super::LiveSession) which is guarded as a
/// whole, so a snapshot always sees complete appends.
#[derive(Debug, Clone)]
pub struct SlidingWindowBuffer<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T: Clone> SlidingWindowBuffer<T> {
    /// A zero capacity is bumped to one so `append` always retains the newest value.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn append(&mut self, value: T) {
        if self.items.len() == self.capacity {
            self.items.pop_front();
        }
        self.items.push_back(value);
    }

    pub fn snapshot(&self) -> Vec<T> {
        self.items.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn latest(&self) -> Option<&T> {
        self.items.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }
}

impl SlidingWindowBuffer<f64> {
    pub fn mean(&self) -> Option<f64> {
        if self.items.is_empty() {
            return None;
        }
        Some(self.items.iter().sum::<f64>() / self.items.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retains_last_n_in_order() {
        for capacity in 1..=12 {
            for total in 0..=40usize {
                let mut buffer = SlidingWindowBuffer::new(capacity);
                for value in 0..total {
                    buffer.append(value);
                }

                let expected: Vec<usize> = (total.saturating_sub(capacity)..total).collect();
                assert_eq!(buffer.snapshot(), expected, "capacity={capacity} total={total}");
                assert!(buffer.len() <= capacity);
            }
        }
    }

    #[test]
    fn empty_buffer_reports_empty() {
        let buffer: SlidingWindowBuffer<f64> = SlidingWindowBuffer::new(3);
        assert!(buffer.is_empty());
        assert_eq!(buffer.len(), 0);
        assert_eq!(buffer.mean(), None);
        assert!(buffer.latest().is_none());
    }

    #[test]
    fn zero_capacity_keeps_newest() {
        let mut buffer = SlidingWindowBuffer::new(0);
        buffer.append("a");
        buffer.append("b");
        assert_eq!(buffer.capacity(), 1);
        assert_eq!(buffer.snapshot(), vec!["b"]);
    }

    #[test]
    fn mean_tracks_only_retained_values() {
        let mut buffer = SlidingWindowBuffer::new(2);
        buffer.append(10.0);
        buffer.append(20.0);
        buffer.append(40.0);
        assert_eq!(buffer.mean(), Some(30.0));
        assert_eq!(buffer.latest(), Some(&40.0));
    }
}
