// Local Crate Imports
use crate::{MatchSet, RowIndex};

// Public API ==========================================================================================================

impl MatchSet {
    #[must_use]
    pub fn first(&self) -> Option<RowIndex> {
        self.0.first().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = RowIndex> + '_ {
        self.0.iter().copied()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[RowIndex] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn contains(&self, row: RowIndex) -> bool {
        self.0.binary_search(&row).is_ok()
    }
}

impl FromIterator<RowIndex> for MatchSet {
    fn from_iter<T: IntoIterator<Item = RowIndex>>(iter: T) -> Self {
        let mut rows: Vec<_> = iter.into_iter().collect();
        rows.sort_unstable();
        rows.dedup();
        Self(rows)
    }
}

// Module Tests ========================================================================================================
