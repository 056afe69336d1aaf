use std::sync::Arc;

use shared::domain::{BlacklistedCreator, Creator, InterestingLink};

/// The text-bearing fields a record exposes to [`SearchFilter`]. Absent
/// fields are excluded from matching, never treated as empty strings.
pub trait Searchable {
    fn text_fields(&self) -> Vec<Option<&str>>;
}

pub type Predicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// Declarative predicate pipeline over a collection snapshot.
///
/// Purely derived state: `apply` recomputes the projection on every call and
/// never mutates the source, so it stays coherent however often the snapshot
/// or the query changes.
pub struct SearchFilter<T> {
    query: String,
    predicates: Vec<Predicate<T>>,
}

impl<T> Default for SearchFilter<T> {
    fn default() -> Self {
        Self {
            query: String::new(),
            predicates: Vec::new(),
        }
    }
}

impl<T: Searchable + Clone> SearchFilter<T> {
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_predicates(&mut self, predicates: Vec<Predicate<T>>) {
        self.predicates = predicates;
    }

    pub fn clear_predicates(&mut self) {
        self.predicates.clear();
    }

    /// Order-preserving subsequence of `rows`: a record passes when any of
    /// its designated text fields, case-folded, contains the case-folded
    /// query as a substring (an empty query matches everything), ANDed with
    /// every extra predicate.
    pub fn apply(&self, rows: &[T]) -> Vec<T> {
        let needle = self.query.to_lowercase();
        rows.iter()
            .filter(|row| Self::matches_query(row, &needle))
            .filter(|row| self.predicates.iter().all(|predicate| predicate(row)))
            .cloned()
            .collect()
    }

    fn matches_query(row: &T, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        row.text_fields()
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

impl Searchable for Creator {
    fn text_fields(&self) -> Vec<Option<&str>> {
        vec![Some(self.name.as_str()), Some(self.homepage.as_str())]
    }
}

impl Searchable for BlacklistedCreator {
    fn text_fields(&self) -> Vec<Option<&str>> {
        vec![Some(self.reason.as_str()), Some(self.date.as_str())]
    }
}

impl Searchable for InterestingLink {
    fn text_fields(&self) -> Vec<Option<&str>> {
        vec![
            Some(self.url.as_str()),
            self.source.as_deref(),
            self.date.as_deref(),
        ]
    }
}
