use crate::loader::RecordStore;
use crate::types::CategoryColumn;
use std::collections::HashMap;

/// Category universe of one column together with an inverted index from
/// label to the positions of the records carrying it.
///
/// Built in a single pass over the store, so aggregating `k` categories
/// costs one scan plus the postings instead of `k` scans of every record.
#[derive(Debug, Clone)]
pub struct CategoryIndex {
    column: CategoryColumn,
    labels: Vec<String>,
    postings: HashMap<String, Vec<usize>>,
}

impl CategoryIndex {
    pub fn build(store: &RecordStore, column: CategoryColumn) -> Self {
        let mut labels: Vec<String> = Vec::new();
        let mut postings: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, record) in store.records().iter().enumerate() {
            for label in column.labels(record) {
                let entry = postings.entry(label.clone()).or_insert_with(|| {
                    labels.push(label.clone());
                    Vec::new()
                });
                // Labels are unique within a record, but a hand-built store
                // may still repeat one; a record is a member at most once.
                if entry.last() != Some(&idx) {
                    entry.push(idx);
                }
            }
        }
        Self {
            column,
            labels,
            postings,
        }
    }

    pub fn column(&self) -> CategoryColumn {
        self.column
    }

    /// Distinct labels in first-seen order.
    pub fn universe(&self) -> &[String] {
        &self.labels
    }

    /// Record positions holding `label`, ascending. Empty for unknown labels.
    pub fn members(&self, label: &str) -> &[usize] {
        self.postings.get(label).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Distinct labels observed for `column`, multi-valued columns flattened.
pub fn categories(store: &RecordStore, column: CategoryColumn) -> Vec<String> {
    CategoryIndex::build(store, column).labels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MovieRecord;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn movie(distributor: &str, genres: &[&str]) -> MovieRecord {
        MovieRecord {
            title: None,
            revenue: Some(1.0),
            rating: None,
            runtime: None,
            release_date: None,
            distributor: distributor.to_string(),
            genres: genres.iter().map(|g| g.to_string()).collect(),
        }
    }

    #[test]
    fn multi_valued_universe_is_a_union() {
        let store = RecordStore::from_records(vec![
            movie("A", &["Action"]),
            movie("A", &["Action", "Drama"]),
            movie("B", &["Drama"]),
        ]);
        assert_eq!(categories(&store, CategoryColumn::Genres), vec!["Action", "Drama"]);
        assert_eq!(categories(&store, CategoryColumn::Distributor), vec!["A", "B"]);
    }

    #[test]
    fn postings_follow_membership() {
        let store = RecordStore::from_records(vec![
            movie("A", &["Action"]),
            movie("A", &["Action", "Drama"]),
            movie("B", &["Drama"]),
        ]);
        let index = CategoryIndex::build(&store, CategoryColumn::Genres);
        assert_eq!(index.members("Action"), &[0, 1]);
        assert_eq!(index.members("Drama"), &[1, 2]);
        assert!(index.members("Horror").is_empty());
    }

    proptest! {
        #[test]
        fn universe_is_sound_and_complete(
            rows in prop::collection::vec(
                ("[a-c]", prop::collection::hash_set("[a-e]", 1..4)),
                0..30,
            )
        ) {
            let records: Vec<MovieRecord> = rows
                .iter()
                .map(|(d, gs)| {
                    let genres: Vec<&str> = gs.iter().map(String::as_str).collect();
                    movie(d, &genres)
                })
                .collect();
            let store = RecordStore::from_records(records);

            for column in [CategoryColumn::Distributor, CategoryColumn::Genres] {
                let universe = categories(&store, column);
                let distinct: HashSet<&String> = universe.iter().collect();
                prop_assert_eq!(distinct.len(), universe.len());

                let observed: HashSet<&String> = store
                    .records()
                    .iter()
                    .flat_map(|r| column.labels(r))
                    .collect();
                prop_assert_eq!(distinct, observed);
            }
        }
    }
}
