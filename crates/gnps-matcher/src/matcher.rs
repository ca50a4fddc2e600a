// External Crate Imports
use log::warn;

// Local Crate Imports
use crate::{FeatureValue, MatchSet, ReferenceTable, Tolerances};

// Public API ==========================================================================================================

/// Finds every reference row strictly within `tolerances` of the query, in ascending table order.
///
/// This never fails: without a reference table, or with a coordinate that can't be read as a finite number, a warning
/// is logged and the match set is empty.
#[must_use]
pub fn find_matches(
    reference: Option<&ReferenceTable>,
    query_mass: &FeatureValue,
    query_retention_time: &FeatureValue,
    tolerances: Tolerances,
) -> MatchSet {
    let Some(reference) = reference else {
        warn!("no GNPS reference table is loaded, so no annotations can be matched");
        return MatchSet::default();
    };

    let (Some(mass), Some(retention_time)) = (query_mass.coordinate(), query_retention_time.coordinate()) else {
        warn!(
            "couldn't match a feature with mass {query_mass} and retention time {query_retention_time}, since both \
            must be finite numbers"
        );
        return MatchSet::default();
    };

    reference.matches_within(mass, retention_time, tolerances)
}

// Module Tests ========================================================================================================
