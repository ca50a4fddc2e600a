// External Crate Imports
use log::warn;

// Local Crate Imports
use crate::{AnnotationDetails, AnnotationType, FeatureKey, RowIndex};

// Public API ==========================================================================================================

/// The address a user should be sent to for more on this annotation: the stored GNPS link with `suffix` appended
#[must_use]
pub fn resolve_link(details: &AnnotationDetails, suffix: &str) -> Option<String> {
    let Some(link) = details.link() else {
        warn!(
            "reference row {} (matched by feature {}) has no link to follow",
            details.row(),
            details.feature()
        );
        return None;
    };

    Some(format!("{link}{suffix}"))
}

impl AnnotationDetails {
    #[must_use]
    pub const fn annotation_type(&self) -> AnnotationType {
        self.annotation_type
    }

    #[must_use]
    pub const fn feature(&self) -> &FeatureKey {
        &self.feature
    }

    #[must_use]
    pub const fn row(&self) -> RowIndex {
        self.row
    }

    #[must_use]
    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }
}

// Crate API ===========================================================================================================

impl AnnotationDetails {
    pub(crate) fn new(feature: FeatureKey, row: RowIndex, link: Option<String>) -> Self {
        Self {
            annotation_type: AnnotationType::Other,
            feature,
            row,
            link,
        }
    }
}

// Module Tests ========================================================================================================
