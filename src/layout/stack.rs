//! Stacked layout: tiles each row's sub-group values into contiguous bands.

/// One stacked series: the bands of a single sub-group across all rows.
#[derive(Debug, Clone, PartialEq)]
pub struct StackSeries {
    /// Sub-group name.
    pub key: String,
    /// Position of the sub-group in declaration order.
    pub index: usize,
    /// `[start, end]` per row, in row order.
    pub segments: Vec<[f64; 2]>,
}

/// Stack `rows` by the sub-groups named in `keys`.
///
/// Returns one series per key in declaration order. For every row the series
/// are contiguous: the first starts at zero, each starts where the previous
/// ended, and the last ends at the row's sum. Values missing from a row (row
/// shorter than `keys`) count as zero.
#[must_use]
pub fn stack<R: AsRef<[f64]>>(rows: &[R], keys: &[String]) -> Vec<StackSeries> {
    let mut series: Vec<StackSeries> = keys
        .iter()
        .enumerate()
        .map(|(index, key)| StackSeries {
            key: key.clone(),
            index,
            segments: Vec::with_capacity(rows.len()),
        })
        .collect();

    for row in rows {
        let values = row.as_ref();
        let mut baseline = 0.0;
        for (k, s) in series.iter_mut().enumerate() {
            let end = baseline + values.get(k).copied().unwrap_or(0.0);
            s.segments.push([baseline, end]);
            baseline = end;
        }
    }

    series
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_stack_two_rows() {
        let rows = vec![vec![10.0, 20.0], vec![5.0, 5.0]];
        let series = stack(&rows, &keys(&["s1", "s2"]));

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].key, "s1");
        assert_eq!(series[0].segments, vec![[0.0, 10.0], [0.0, 5.0]]);
        assert_eq!(series[1].segments, vec![[10.0, 30.0], [5.0, 10.0]]);
    }

    #[test]
    fn test_stack_empty_inputs() {
        let rows: Vec<Vec<f64>> = Vec::new();
        let series = stack(&rows, &keys(&["a"]));
        assert_eq!(series.len(), 1);
        assert!(series[0].segments.is_empty());

        assert!(stack(&[vec![1.0]], &[]).is_empty());
    }

    #[test]
    fn test_stack_short_row_counts_zero() {
        let series = stack(&[vec![3.0]], &keys(&["a", "b"]));
        assert_eq!(series[1].segments, vec![[3.0, 3.0]]);
    }
}
