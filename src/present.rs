use crate::aggregate::{SummaryRow, SummaryTable};
use crate::types::NumericField;
use std::cmp::Ordering;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Count,
    Sum,
    Mean,
    Sd,
    Se,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Category,
    Members,
    Stat(NumericField, Metric),
}

impl SortKey {
    fn value(self, row: &SummaryRow) -> Option<f64> {
        match self {
            SortKey::Category => None,
            SortKey::Members => Some(row.members as f64),
            SortKey::Stat(field, metric) => row.stats(field).map(|s| match metric {
                Metric::Count => s.count as f64,
                Metric::Sum => s.sum,
                Metric::Mean => s.mean,
                Metric::Sd => s.sd,
                Metric::Se => s.se,
            }),
        }
    }

    fn compare(self, a: &SummaryRow, b: &SummaryRow) -> Ordering {
        if self == SortKey::Category {
            return a.category.cmp(&b.category);
        }
        match (self.value(a), self.value(b)) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
        }
    }
}

/// Stable sort into a new vector; equal keys keep their relative order in
/// both directions.
pub fn sort_by(rows: &[SummaryRow], key: SortKey, ascending: bool) -> Vec<SummaryRow> {
    let mut sorted = rows.to_vec();
    if ascending {
        sorted.sort_by(|a, b| key.compare(a, b));
    } else {
        sorted.sort_by(|a, b| key.compare(b, a));
    }
    sorted
}

/// Positional partition: `alt` where the row's category is preferred, `base`
/// elsewhere. Recompute after every sort; the result is only valid for the
/// order it was computed from.
pub fn highlight<T: Clone>(
    rows: &[SummaryRow],
    preferred: &HashSet<String>,
    base: T,
    alt: T,
) -> Vec<T> {
    rows.iter()
        .map(|row| {
            if preferred.contains(&row.category) {
                alt.clone()
            } else {
                base.clone()
            }
        })
        .collect()
}

impl SummaryTable {
    pub fn sorted_by(&self, key: SortKey, ascending: bool) -> SummaryTable {
        SummaryTable {
            column: self.column,
            targets: self.targets.clone(),
            rows: sort_by(&self.rows, key, ascending),
        }
    }

    pub fn highlight<T: Clone>(&self, preferred: &HashSet<String>, base: T, alt: T) -> Vec<T> {
        highlight(&self.rows, preferred, base, alt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate_column;
    use crate::loader::RecordStore;
    use crate::types::{CategoryColumn, MovieRecord};
    use proptest::prelude::*;

    fn movie(distributor: &str, revenue: f64) -> MovieRecord {
        MovieRecord {
            title: None,
            revenue: Some(revenue),
            rating: None,
            runtime: None,
            release_date: None,
            distributor: distributor.to_string(),
            genres: vec!["Drama".to_string()],
        }
    }

    fn table(movies: Vec<MovieRecord>) -> SummaryTable {
        let store = RecordStore::from_records(movies);
        aggregate_column(&store, CategoryColumn::Distributor, &[NumericField::Revenue]).unwrap()
    }

    fn labels(rows: &[SummaryRow]) -> Vec<&str> {
        rows.iter().map(|r| r.category.as_str()).collect()
    }

    const MEAN: SortKey = SortKey::Stat(NumericField::Revenue, Metric::Mean);
    const SUM: SortKey = SortKey::Stat(NumericField::Revenue, Metric::Sum);

    #[test]
    fn highlight_follows_sorted_order() {
        let summary = table(vec![movie("A", 300.0), movie("B", 100.0)]);
        let preferred: HashSet<String> = ["A".to_string()].into_iter().collect();

        assert_eq!(summary.highlight(&preferred, "base", "alt"), vec!["alt", "base"]);

        let sorted = summary.sorted_by(MEAN, true);
        assert_eq!(labels(sorted.rows()), vec!["B", "A"]);
        assert_eq!(sorted.highlight(&preferred, "base", "alt"), vec!["base", "alt"]);
        // The source table is untouched.
        assert_eq!(labels(summary.rows()), vec!["A", "B"]);
    }

    #[test]
    fn two_partitions_from_the_same_rows() {
        let summary = table(vec![movie("A", 1.0), movie("B", 2.0), movie("C", 3.0)]);
        let first: HashSet<String> = ["A".to_string()].into_iter().collect();
        let second: HashSet<String> = ["B".to_string(), "C".to_string()].into_iter().collect();
        assert_eq!(summary.highlight(&first, 0, 1), vec![1, 0, 0]);
        assert_eq!(summary.highlight(&second, 0, 1), vec![0, 1, 1]);
    }

    #[test]
    fn descending_keeps_ties_in_original_order() {
        let summary = table(vec![
            movie("A", 5.0),
            movie("B", 9.0),
            movie("C", 5.0),
            movie("D", 9.0),
        ]);
        let desc = summary.sorted_by(SUM, false);
        assert_eq!(labels(desc.rows()), vec!["B", "D", "A", "C"]);
        let asc = summary.sorted_by(SUM, true);
        assert_eq!(labels(asc.rows()), vec!["A", "C", "B", "D"]);
    }

    #[test]
    fn sort_by_category_and_members() {
        let summary = table(vec![movie("b", 1.0), movie("a", 1.0), movie("b", 1.0)]);
        assert_eq!(labels(summary.sorted_by(SortKey::Category, true).rows()), vec!["a", "b"]);
        assert_eq!(labels(summary.sorted_by(SortKey::Members, false).rows()), vec!["b", "a"]);
    }

    proptest! {
        #[test]
        fn sort_is_stable_and_highlight_tracks_it(
            sums in prop::collection::vec(0u8..4, 1..25),
            preferred_mask in prop::collection::vec(any::<bool>(), 25),
        ) {
            let movies: Vec<MovieRecord> = sums
                .iter()
                .enumerate()
                .map(|(i, s)| movie(&format!("d{i:02}"), f64::from(*s)))
                .collect();
            let summary = table(movies);
            let preferred: HashSet<String> = (0..sums.len())
                .filter(|i| preferred_mask[*i])
                .map(|i| format!("d{i:02}"))
                .collect();

            let sorted = summary.sorted_by(SUM, true);
            let keys: Vec<(f64, usize)> = sorted
                .rows()
                .iter()
                .map(|r| {
                    let original = summary.rows().iter().position(|o| o.category == r.category).unwrap();
                    (r.stats(NumericField::Revenue).unwrap().sum, original)
                })
                .collect();
            for pair in keys.windows(2) {
                prop_assert!(pair[0].0 < pair[1].0 || (pair[0].0 == pair[1].0 && pair[0].1 < pair[1].1));
            }

            let colors = sorted.highlight(&preferred, false, true);
            prop_assert_eq!(colors.len(), sorted.len());
            for (row, flag) in sorted.rows().iter().zip(colors) {
                prop_assert_eq!(flag, preferred.contains(&row.category));
            }
        }
    }
}
