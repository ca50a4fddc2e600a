// External Crate Imports
use log::warn;

// Local Crate Imports
use crate::{
    Annotation, AnnotationDetails, FeatureKey, FeatureLinks, MatchSet, ReferenceColumns, ReferenceTable, RowIndex,
    terms::NOT_APPLICABLE,
};

// Public API ==========================================================================================================

/// Summarises the cached matches of a single feature. Features that weren't part of the linking pass have nothing to
/// summarise, so a warning is logged and nothing is returned.
#[must_use]
pub fn summarize(
    reference: &ReferenceTable,
    columns: &ReferenceColumns,
    links: &FeatureLinks,
    feature: &FeatureKey,
) -> Vec<Annotation> {
    let Some(matches) = links.matches(feature) else {
        warn!("feature {feature} wasn't linked to the GNPS annotations, so it has nothing to summarise");
        return Vec::new();
    };

    summarize_matches(reference, columns, feature, matches)
}

/// Five detail lines describing the first match (mass, retention time, library ID, organism and component), followed
/// by the library ID of every match
#[must_use]
pub fn summarize_matches(
    reference: &ReferenceTable,
    columns: &ReferenceColumns,
    feature: &FeatureKey,
    matches: &MatchSet,
) -> Vec<Annotation> {
    let Some(first) = matches.first() else {
        return Vec::new();
    };

    let details = |row| {
        let link = reference.value(row, &columns.link).map(str::to_owned);
        AnnotationDetails::new(feature.clone(), row, link)
    };
    let text = |row, column: &str| reference.value(row, column).unwrap_or(NOT_APPLICABLE).to_owned();

    let detail_lines = [
        format!("Mass: {:.4}", reference.mass(first).unwrap_or_default()),
        format!("RT: {:.2}", reference.retention_time(first).unwrap_or_default()),
        format!("LibraryID: {}", text(first, &columns.library_id)),
        format!("Organism: {}", text(first, &columns.organism)),
        format!("Component: {}", text(first, &columns.component)),
    ];

    detail_lines
        .into_iter()
        .map(|line| (details(first), line))
        .chain(matches.iter().map(|row: RowIndex| (details(row), text(row, &columns.library_id))))
        .collect()
}

// Module Tests ========================================================================================================
