use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Returns a copy of `current` with `id` removed if present, inserted otherwise.
/// `current` itself is left as it was.
pub fn toggle_id(id: &str, current: &BTreeSet<String>) -> BTreeSet<String> {
    let mut next = current.clone();
    if !next.remove(id) {
        next.insert(id.to_string());
    }
    next
}

/// Ids of the transcript items whose panels are currently open.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpandedIds(BTreeSet<String>);

impl ExpandedIds {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn toggled(&self, id: &str) -> Self {
        Self(toggle_id(id, &self.0))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_set(&self) -> &BTreeSet<String> {
        &self.0
    }
}

impl From<BTreeSet<String>> for ExpandedIds {
    fn from(ids: BTreeSet<String>) -> Self {
        Self(ids)
    }
}

impl<S: Into<String>> FromIterator<S> for ExpandedIds {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
