use std::collections::VecDeque;

/// Mean over a sliding window of the most recent observations.
#[derive(Debug, Clone)]
pub struct MovingAverage {
    window: usize,
    values: VecDeque<f64>,
    total: f64,
}

impl MovingAverage {
    /// Creates an empty moving average over `window` observations.
    ///
    /// # Panics
    ///
    /// Panics if `window` is zero.
    #[must_use]
    pub fn new(window: usize) -> Self {
        assert!(window > 0, "window must be positive");
        Self {
            window,
            values: VecDeque::with_capacity(window),
            total: 0.0,
        }
    }

    pub fn push(&mut self, value: f64) {
        if self.values.len() == self.window {
            if let Some(old) = self.values.pop_front() {
                self.total -= old;
            }
        }
        self.values.push_back(value);
        self.total += value;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Mean of the observations in the window, or `None` when empty.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn mean(&self) -> Option<f64> {
        (!self.values.is_empty()).then(|| self.total / self.values.len() as f64)
    }
}
