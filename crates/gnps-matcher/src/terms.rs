// External Crate Imports
use log::warn;

// Local Crate Imports
use crate::{FeatureKey, FeatureLinks, FeatureTerms, GnpsError, MatchSet, ReferenceTable, Result, TermWeights};

// Public API ==========================================================================================================

/// The placeholder GNPS writes into cells that have nothing to say
pub const NOT_APPLICABLE: &str = "N/A";

/// The single term given to a feature whose matches are all [`NOT_APPLICABLE`]
pub const NA_TERM: &str = "na";

/// Collects the distinct `field` values of each feature's matches, each with a weight of 1.
///
/// Missing and [`NOT_APPLICABLE`] values are left out, but a feature matched *only* by such rows still gets the
/// [`NA_TERM`], so that it can be told apart from a feature with no matches at all (which gets no terms).
pub fn terms_for_features<'k>(
    reference: &ReferenceTable,
    links: &FeatureLinks,
    features: impl IntoIterator<Item = &'k FeatureKey>,
    field: &str,
) -> Result<FeatureTerms> {
    if !reference.has_field(field) {
        return Err(GnpsError::unknown_field(field));
    }

    Ok(features
        .into_iter()
        .map(|feature| {
            let terms = links.matches(feature).map_or_else(
                || {
                    warn!("feature {feature} wasn't linked to the GNPS annotations, so it has no terms");
                    TermWeights::new()
                },
                |matches| terms_for_matches(reference, matches, field),
            );
            (feature.clone(), terms)
        })
        .collect())
}

// Private Functions ===================================================================================================

fn terms_for_matches(reference: &ReferenceTable, matches: &MatchSet, field: &str) -> TermWeights {
    let (applicable, not_applicable): (Vec<_>, Vec<_>) = matches
        .iter()
        .map(|row| reference.value(row, field).filter(|&value| value != NOT_APPLICABLE))
        .partition(Option::is_some);

    if applicable.is_empty() && !not_applicable.is_empty() {
        return TermWeights::from([(NA_TERM.to_owned(), 1)]);
    }

    applicable.into_iter().flatten().map(|term| (term.to_owned(), 1)).collect()
}

// Module Tests ========================================================================================================

#[cfg(test)]
mod tests {
    use crate::ReferenceColumns;

    use super::*;

    const GNPS_TABLE: &str = include_str!("../tests/data/gnps_table.tsv");

    fn reference() -> ReferenceTable {
        ReferenceTable::from_delimited(GNPS_TABLE, b'\t', &ReferenceColumns::default()).unwrap()
    }

    fn links(entries: &[(&str, &[usize])]) -> FeatureLinks {
        entries
            .iter()
            .map(|&(key, rows)| (FeatureKey::from(key), rows.iter().copied().collect()))
            .collect()
    }

    fn terms(weights: &TermWeights) -> Vec<(&str, u32)> {
        weights.iter().map(|(term, &weight)| (term.as_str(), weight)).collect()
    }

    #[test]
    fn library_id_terms() {
        let reference = reference();
        let links = links(&[
            ("1", &[0, 1]),
            ("2", &[2]),
            ("3", &[4]),
            ("4", &[]),
            ("6", &[0, 3, 4, 6]),
        ]);
        let features: Vec<_> = ["1", "2", "3", "4", "6"].map(FeatureKey::from).to_vec();

        let feature_terms = terms_for_features(&reference, &links, &features, "LibraryID").unwrap();
        assert_eq!(feature_terms.len(), 5);

        let terms_of = |key: &str| terms(&feature_terms[&FeatureKey::from(key)]);
        assert_eq!(terms_of("1"), [("Hesperetin", 1)]);
        assert_eq!(terms_of("2"), [(NA_TERM, 1)]);
        assert_eq!(terms_of("3"), [("Pyroglutamic acid", 1)]);
        assert!(terms_of("4").is_empty());
        assert_eq!(
            terms_of("6"),
            [
                ("Deoxycholic acid", 1),
                ("Glycocholic acid", 1),
                ("Hesperetin", 1),
                ("Pyroglutamic acid", 1),
            ]
        );
    }

    #[test]
    fn repeated_terms_have_a_weight_of_one() {
        let reference = reference();
        let links = links(&[("1", &[0, 3, 6]), ("2", &[1, 2, 5])]);
        let features = [FeatureKey::from("1"), FeatureKey::from("2")];

        let feature_terms = terms_for_features(&reference, &links, &features, "AllOrganisms").unwrap();
        assert_eq!(terms(&feature_terms[&features[0]]), [("GNPS-LIBRARY", 1)]);
        assert_eq!(terms(&feature_terms[&features[1]]), [(NA_TERM, 1)]);
    }

    #[test]
    fn missing_cells_are_not_applicable() {
        let reference = ReferenceTable::from_columns(
            vec![Some(1.0); 3],
            vec![Some(1.0); 3],
            [("Smiles".to_owned(), vec![None, Some("N/A".to_owned()), Some("CCO".to_owned())])],
        )
        .unwrap();
        let links = links(&[("a", &[0]), ("b", &[0, 1]), ("c", &[0, 2])]);
        let features = ["a", "b", "c"].map(FeatureKey::from);

        let feature_terms = terms_for_features(&reference, &links, &features, "Smiles").unwrap();
        assert_eq!(terms(&feature_terms[&features[0]]), [(NA_TERM, 1)]);
        assert_eq!(terms(&feature_terms[&features[1]]), [(NA_TERM, 1)]);
        assert_eq!(terms(&feature_terms[&features[2]]), [("CCO", 1)]);
    }

    #[test]
    fn unknown_fields_and_features() {
        let reference = reference();
        let links = links(&[("1", &[0])]);
        let features = [FeatureKey::from("1"), FeatureKey::from("missing")];

        let result = terms_for_features(&reference, &links, &features, "Smiles");
        assert!(matches!(result, Err(GnpsError::UnknownField { .. })));

        let feature_terms = terms_for_features(&reference, &links, &features, "LibraryID").unwrap();
        assert!(feature_terms[&features[1]].is_empty());
    }
}
