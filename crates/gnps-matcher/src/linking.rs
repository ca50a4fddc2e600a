// External Crate Imports
use ahash::{HashSet, HashSetExt};
use log::{debug, info};

// Local Crate Imports
use crate::{
    Feature, FeatureLinks, GnpsError, LinkMode, ReferenceTable, Result, Tolerances,
    identifier::{identifier_index, parse_identifier},
    matcher::find_matches,
};

// Public API ==========================================================================================================

/// Runs a single linking pass over every feature, returning the match set of each.
///
/// In [`LinkMode::Tolerance`], a feature that matches nothing is simply given an empty [`MatchSet`](crate::MatchSet).
/// In [`LinkMode::Identifier`], every feature key must be an identifier shared by at least one reference row, and any
/// feature that can't be linked is returned as an error. In either mode, feature keys must be unique.
pub fn link_all_features(
    features: &[Feature],
    reference: &ReferenceTable,
    tolerances: Tolerances,
    mode: &LinkMode,
) -> Result<FeatureLinks> {
    check_unique_keys(features)?;

    let links = match mode {
        LinkMode::Tolerance => link_by_tolerance(features, reference, tolerances),
        LinkMode::Identifier(column) => link_by_identifier(features, reference, column)?,
    };

    info!(
        "linked {} of {} features to at least one GNPS annotation",
        links.annotated(),
        links.len()
    );
    Ok(links)
}

// Private Functions ===================================================================================================

fn check_unique_keys(features: &[Feature]) -> Result<()> {
    let mut seen = HashSet::with_capacity(features.len());
    match features.iter().map(Feature::key).find(|&key| !seen.insert(key)) {
        Some(key) => Err(GnpsError::DuplicateFeature { key: key.clone() }),
        None => Ok(()),
    }
}

fn link_by_tolerance(features: &[Feature], reference: &ReferenceTable, tolerances: Tolerances) -> FeatureLinks {
    debug!(
        "matching {} features within ±{} mass and ±{} retention time",
        features.len(),
        tolerances.mass(),
        tolerances.retention_time()
    );

    features
        .iter()
        .map(|feature| {
            let matches = find_matches(
                Some(reference),
                feature.mass(),
                feature.retention_time(),
                tolerances,
            );
            (feature.key().clone(), matches)
        })
        .collect()
}

fn link_by_identifier(features: &[Feature], reference: &ReferenceTable, column: &str) -> Result<FeatureLinks> {
    let index = identifier_index(reference, column)?;
    debug!("found {} distinct identifiers in {column:?}", index.len());

    features
        .iter()
        .map(|feature| {
            let key = feature.key();
            let identifier = parse_identifier(key.as_str())?;
            let matches = index
                .get(&identifier)
                .cloned()
                .ok_or_else(|| GnpsError::unlinked_feature(key, identifier, column))?;
            Ok((key.clone(), matches))
        })
        .collect()
}

// Module Tests ========================================================================================================
