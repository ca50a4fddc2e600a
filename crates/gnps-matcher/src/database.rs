// External Crate Imports
use log::info;

// Local Crate Imports
use crate::{
    Annotation, AnnotationDetails, Feature, FeatureKey, FeatureLinks, FeatureTerms, GnpsConfig, GnpsError,
    ReferenceTable, Result, link, linking::link_all_features, matcher::find_matches, summary, terms,
};

// Public API ==========================================================================================================

/// The operations a host needs from any annotation source that can be attached to its features
pub trait AnnotationDatabase {
    fn database_name(&self) -> &str;

    /// Runs the linking pass; the returned cache is what every other operation reads from
    fn link_features(&self, features: &[Feature]) -> Result<FeatureLinks>;

    fn annotation_strings(&self, links: &FeatureLinks, feature: &FeatureKey) -> Vec<Annotation>;

    /// Terms from `field` for every feature, or from the library ID column if no `field` is given
    fn feature_terms(&self, links: &FeatureLinks, features: &[FeatureKey], field: Option<&str>) -> Result<FeatureTerms>;

    fn resolve_link(&self, details: &AnnotationDetails) -> Option<String>;
}

/// Annotations from the library matches of a GNPS molecular networking job
#[derive(Clone, Debug)]
pub struct GnpsDatabase {
    config: GnpsConfig,
    reference: ReferenceTable,
}

impl GnpsDatabase {
    pub fn new(config: GnpsConfig, reference: Option<ReferenceTable>) -> Result<Self> {
        let reference = reference.ok_or(GnpsError::MissingReferenceTable)?;
        info!(
            "loaded the {} database with {} reference rows",
            config.database_name(),
            reference.len()
        );

        Ok(Self { config, reference })
    }

    #[must_use]
    pub const fn config(&self) -> &GnpsConfig {
        &self.config
    }

    #[must_use]
    pub const fn reference(&self) -> &ReferenceTable {
        &self.reference
    }

    /// Matches and summarises a single feature without going through a linking pass
    #[must_use]
    pub fn annotate(&self, feature: &Feature) -> Vec<Annotation> {
        let matches = find_matches(
            Some(&self.reference),
            feature.mass(),
            feature.retention_time(),
            self.config.tolerances(),
        );
        summary::summarize_matches(
            &self.reference,
            self.config.reference_columns(),
            feature.key(),
            &matches,
        )
    }
}

impl AnnotationDatabase for GnpsDatabase {
    fn database_name(&self) -> &str {
        self.config.database_name()
    }

    fn link_features(&self, features: &[Feature]) -> Result<FeatureLinks> {
        link_all_features(
            features,
            &self.reference,
            self.config.tolerances(),
            self.config.link_mode(),
        )
    }

    fn annotation_strings(&self, links: &FeatureLinks, feature: &FeatureKey) -> Vec<Annotation> {
        summary::summarize(&self.reference, self.config.reference_columns(), links, feature)
    }

    fn feature_terms(&self, links: &FeatureLinks, features: &[FeatureKey], field: Option<&str>) -> Result<FeatureTerms> {
        let field = field.unwrap_or(&self.config.reference_columns().library_id);
        terms::terms_for_features(&self.reference, links, features, field)
    }

    fn resolve_link(&self, details: &AnnotationDetails) -> Option<String> {
        link::resolve_link(details, self.config.link_suffix())
    }
}

// Module Tests ========================================================================================================
