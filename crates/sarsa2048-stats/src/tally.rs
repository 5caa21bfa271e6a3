use std::{collections::BTreeMap, fmt};

/// Occurrence counts of discrete values, ordered by value.
///
/// Used to summarize how often each highest tile was reached across episodes or games.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tally<T> {
    counts: BTreeMap<T, usize>,
    total: usize,
}

impl<T> Default for Tally<T> {
    fn default() -> Self {
        Self {
            counts: BTreeMap::new(),
            total: 0,
        }
    }
}

impl<T> Tally<T>
where
    T: Ord,
{
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut tally = Self::new();
        for value in values {
            tally.add(value);
        }
        tally
    }

    pub fn add(&mut self, value: T) {
        *self.counts.entry(value).or_default() += 1;
        self.total += 1;
    }

    #[must_use]
    pub fn count(&self, value: &T) -> usize {
        self.counts.get(value).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Fraction of observations equal to `value`, or `None` when empty.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn frequency(&self, value: &T) -> Option<f64> {
        (self.total > 0).then(|| self.count(value) as f64 / self.total as f64)
    }

    /// Iterates over `(value, count)` pairs in ascending value order.
    pub fn iter(&self) -> impl Iterator<Item = (&T, usize)> + '_ {
        self.counts.iter().map(|(value, count)| (value, *count))
    }
}

/// Formats as `value x count` pairs, largest value first.
impl<T> fmt::Display for Tally<T>
where
    T: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (value, count)) in self.counts.iter().rev().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{value} x{count}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_order() {
        let tally = Tally::from_values([512, 128, 512, 256, 512]);
        assert_eq!(tally.total(), 5);
        assert_eq!(tally.count(&512), 3);
        assert_eq!(tally.count(&2048), 0);
        assert_eq!(
            tally.iter().collect::<Vec<_>>(),
            vec![(&128, 1), (&256, 1), (&512, 3)]
        );
        assert_eq!(tally.frequency(&128), Some(0.2));
    }

    #[test]
    fn test_display_largest_first() {
        let tally = Tally::from_values([256, 1024, 256]);
        assert_eq!(tally.to_string(), "1024 x1, 256 x2");
        assert_eq!(Tally::<u32>::new().to_string(), "");
    }

    #[test]
    fn test_empty_frequency() {
        let tally = Tally::<u32>::new();
        assert_eq!(tally.frequency(&2), None);
    }
}
