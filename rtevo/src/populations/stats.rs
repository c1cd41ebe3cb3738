use std::fmt;

/// A struct for reporting basic statistical data.
#[derive(Clone, Debug, PartialEq)]
pub struct Stats {
    pub maximum: f64,
    pub minimum: f64,
    pub mean: f64,
    pub median: f64,
}

impl Stats {
    /// Returns statistics about numbers in a sequence,
    /// or `None` if the sequence is empty.
    ///
    /// # Examples
    /// ```
    /// use rtevo::stats::Stats;
    ///
    /// let stats = Stats::from([-2.0, -1.0, 0.5, 1.0, 1.5].iter().copied()).unwrap();
    /// assert_eq!(stats.maximum, 1.5);
    /// assert_eq!(stats.minimum, -2.0);
    /// assert_eq!(stats.mean, 0.0);
    /// assert_eq!(stats.median, 0.5);
    /// ```
    pub fn from(data: impl Iterator<Item = f64>) -> Option<Stats> {
        let mut data: Vec<f64> = data.collect();
        let (mut max, mut min, mut sum) = (f64::MIN, f64::MAX, 0.0);
        for d in &data {
            max = d.max(max);
            min = d.min(min);
            sum += d;
        }
        let mean = sum / data.len() as f64;
        median(&mut data).map(|median| Stats {
            maximum: max,
            minimum: min,
            mean,
            median,
        })
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "max {:.2} / min {:.2} / mean {:.2} / median {:.2}",
            self.maximum, self.minimum, self.mean, self.median
        )
    }
}

/// Returns the median of `data`, averaging the two
/// middle values for even lengths. Reorders `data`.
///
/// # Examples
/// ```
/// use rtevo::stats::median;
///
/// assert_eq!(median(&mut [3.0, 1.0, 2.0]), Some(2.0));
/// assert_eq!(median(&mut [4.0, 1.0, 3.0, 2.0]), Some(2.5));
/// assert_eq!(median(&mut []), None);
/// ```
pub fn median(data: &mut [f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    let mid = data.len() / 2;
    let upper = *data
        .select_nth_unstable_by(mid, |a, b| {
            a.partial_cmp(b)
                .unwrap_or_else(|| panic!("uncomparable value in median"))
        })
        .1;
    if data.len() % 2 == 1 {
        return Some(upper);
    }
    // After selection, everything below `mid` is <= `upper`.
    let lower = data[..mid]
        .iter()
        .copied()
        .fold(f64::MIN, f64::max);
    Some((lower + upper) / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn even_median_averages_middle_pair() {
        let mut v = [10.0, 2.0, 8.0, 4.0, 6.0, 12.0];
        assert_eq!(median(&mut v), Some(7.0));
    }

    #[test]
    fn single_value() {
        assert_eq!(median(&mut [5.0]), Some(5.0));
        let stats = Stats::from(std::iter::once(5.0)).unwrap();
        assert_eq!(stats, Stats { maximum: 5.0, minimum: 5.0, mean: 5.0, median: 5.0 });
    }

    #[test]
    fn empty_sequence_has_no_stats() {
        assert_eq!(Stats::from(std::iter::empty()), None);
    }

    #[test]
    fn report_format() {
        let stats = Stats::from([1.0, 2.0, 4.5].iter().copied()).unwrap();
        assert_eq!(
            stats.to_string(),
            "max 4.50 / min 1.00 / mean 2.50 / median 2.00"
        );
    }
}
