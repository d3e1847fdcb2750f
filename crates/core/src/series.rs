use std::collections::VecDeque;

/// Default number of samples kept per metric (one minute at 1 Hz).
pub const DEFAULT_CAPACITY: usize = 60;

/// Bounded FIFO history of samples for one metric; the backing store of a
/// scrolling chart.
///
/// Arrival order is the only ordering; there are no timestamps.  Values are
/// stored as given, NaN and infinities included.
#[derive(Debug, Clone, PartialEq)]
pub struct RollingSeries {
    samples:  VecDeque<f32>,
    capacity: usize,
}

impl RollingSeries {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a new sample, evicting the oldest if at capacity.
    pub fn push(&mut self, value: f32) {
        if self.capacity == 0 {
            return;
        }
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(value);
    }

    /// Oldest-first view of the retained samples.
    pub fn values(&self) -> impl ExactSizeIterator<Item = f32> + DoubleEndedIterator + '_ {
        self.samples.iter().copied()
    }

    /// Most recently pushed sample.
    pub fn latest(&self) -> Option<f32> {
        self.samples.back().copied()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Configured capacity; the chart's horizontal scale is derived from it.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

impl Default for RollingSeries {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl Extend<f32> for RollingSeries {
    fn extend<I: IntoIterator<Item = f32>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}
