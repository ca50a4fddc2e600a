// Local Crate Imports
use crate::{FeatureKey, FeatureLinks, MatchSet};

// Public API ==========================================================================================================

impl FeatureLinks {
    /// The cached matches of a feature, or `None` if that feature wasn't part of the linking pass
    #[must_use]
    pub fn matches(&self, feature: &FeatureKey) -> Option<&MatchSet> {
        self.0.get(feature)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FeatureKey, &MatchSet)> {
        self.0.iter()
    }

    /// The number of features with at least one matching reference row
    #[must_use]
    pub fn annotated(&self) -> usize {
        self.0.values().filter(|matches| !matches.is_empty()).count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(FeatureKey, MatchSet)> for FeatureLinks {
    fn from_iter<T: IntoIterator<Item = (FeatureKey, MatchSet)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

// Module Tests ========================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_links_lookup() {
        let links: FeatureLinks = [
            (FeatureKey::from("a"), [0, 3].into_iter().collect()),
            (FeatureKey::from("b"), MatchSet::default()),
        ]
        .into_iter()
        .collect();

        assert_eq!(links.len(), 2);
        assert_eq!(links.annotated(), 1);
        assert_eq!(
            links.matches(&FeatureKey::from("a")).map(MatchSet::as_slice),
            Some([0, 3].as_slice())
        );
        assert_eq!(links.matches(&FeatureKey::from("b")), Some(&MatchSet::default()));
        assert_eq!(links.matches(&FeatureKey::from("c")), None);
    }
}
