//! Links GNPS library annotations to the features of an LC-MS experiment, by matching on mass and retention time

mod config;
mod database;
mod errors;
mod feature;
mod feature_links;
mod identifier;
mod link;
mod linking;
mod match_set;
mod matcher;
mod reference_table;
mod summary;
mod terms;
mod tolerances;

// Standard Library Imports
use std::collections::BTreeMap;

// External Crate Imports
use ahash::HashMap;
use derive_more::{Constructor, Display};
use serde::{Deserialize, Serialize};

// Public API ==========================================================================================================

pub use config::{FeatureColumns, GnpsConfig, ReferenceColumns};
pub use database::{AnnotationDatabase, GnpsDatabase};
pub use errors::{GnpsError, Result};
pub use identifier::{IdentifierError, parse_identifier};
pub use link::resolve_link;
pub use linking::link_all_features;
pub use matcher::find_matches;
pub use summary::{summarize, summarize_matches};
pub use terms::{NA_TERM, NOT_APPLICABLE, terms_for_features};

/// The position of a row in a [`ReferenceTable`]
pub type RowIndex = usize;

/// The integer identifier shared by a feature and its reference rows in [`LinkMode::Identifier`]
pub type Identifier = u64;

/// The reference rows that plausibly correspond to a single feature, in ascending table order
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default, Serialize, Deserialize)]
pub struct MatchSet(Vec<RowIndex>);

/// The result of linking every feature of an experiment, computed once and then reused for summaries and terms
#[derive(Clone, Eq, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct FeatureLinks(HashMap<FeatureKey, MatchSet>);

/// The host's opaque identifier for one feature
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display, Serialize, Deserialize)]
pub struct FeatureKey(String);

/// A feature coordinate as supplied by the host, which is not guaranteed to be a usable number
#[derive(Clone, PartialEq, Debug)]
pub enum FeatureValue {
    Number(f64),
    Text(String),
    Missing,
}

#[derive(Clone, PartialEq, Debug, Constructor)]
pub struct Feature {
    key: FeatureKey,
    mass: FeatureValue,
    retention_time: FeatureValue,
}

#[derive(Clone, PartialEq, Debug, Default)]
pub struct FeatureTable(Vec<Feature>);

/// Half-widths of the mass and retention time windows used for matching; both are strictly positive
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Tolerances {
    mass: f64,
    retention_time: f64,
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub enum LinkMode {
    /// Match features to every reference row inside the mass and retention time windows
    Tolerance,
    /// Match feature keys to the identifiers stored in the named reference column
    Identifier(String),
}

/// An immutable, normalised table of GNPS library matches
#[derive(Clone, PartialEq, Debug, Default)]
pub struct ReferenceTable {
    masses: Vec<f64>,
    retention_times: Vec<f64>,
    fields: HashMap<String, Vec<Option<String>>>,
    // NOTE: Row indices sorted by mass, so that a query only has to look inside its mass window
    mass_order: Vec<RowIndex>,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Display, Serialize, Deserialize)]
pub enum AnnotationType {
    #[display("other")]
    Other,
}

/// Everything a host needs to follow up on a single annotation line
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct AnnotationDetails {
    annotation_type: AnnotationType,
    feature: FeatureKey,
    row: RowIndex,
    link: Option<String>,
}

/// An annotation record paired with its short, human-readable summary
pub type Annotation = (AnnotationDetails, String);

/// Terms found for a single feature, each carrying a weight of 1
pub type TermWeights = BTreeMap<String, u32>;

pub type FeatureTerms = HashMap<FeatureKey, TermWeights>;
