// External Crate Imports
use knuffel::Decode;
use miette::Result;

// Local Crate Imports
use crate::{GnpsError, LinkMode, Tolerances};

// Public API ==========================================================================================================

const DEFAULT_KDL: &str = include_str!("../data/gnps.kdl");

/// Everything the GNPS database needs to know about its inputs, injected at construction
#[derive(Clone, PartialEq, Debug)]
pub struct GnpsConfig {
    database_name: String,
    link_mode: LinkMode,
    link_suffix: String,
    tolerances: Tolerances,
    reference_columns: ReferenceColumns,
    feature_columns: FeatureColumns,
}

/// Names of the reference table columns that the matcher reads
#[derive(Clone, Eq, PartialEq, Debug, Decode)]
pub struct ReferenceColumns {
    #[knuffel(child, unwrap(argument))]
    pub mass: String,
    #[knuffel(child, unwrap(argument))]
    pub retention_time: String,
    #[knuffel(child, unwrap(argument))]
    pub library_id: String,
    #[knuffel(child, unwrap(argument))]
    pub organism: String,
    #[knuffel(child, unwrap(argument))]
    pub component: String,
    #[knuffel(child, unwrap(argument))]
    pub link: String,
    #[knuffel(child, unwrap(argument))]
    pub identifier: String,
}

/// Names of the host's feature table columns
#[derive(Clone, Eq, PartialEq, Debug, Decode)]
pub struct FeatureColumns {
    #[knuffel(child, unwrap(argument))]
    pub key: String,
    #[knuffel(child, unwrap(argument))]
    pub mass: String,
    #[knuffel(child, unwrap(argument))]
    pub retention_time: String,
}

impl GnpsConfig {
    pub fn from_kdl(file_name: impl AsRef<str>, text: impl AsRef<str>) -> Result<Self> {
        let parsed_config: GnpsConfigKdl = knuffel::parse(file_name.as_ref(), text.as_ref())?;
        Ok(parsed_config.validate()?)
    }

    /// The configuration shipped with this crate: GNPS column names and moderate matching tolerances
    pub fn packaged() -> Result<Self> {
        Self::from_kdl("gnps.kdl", DEFAULT_KDL)
    }

    #[must_use]
    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    #[must_use]
    pub const fn link_mode(&self) -> &LinkMode {
        &self.link_mode
    }

    #[must_use]
    pub fn link_suffix(&self) -> &str {
        &self.link_suffix
    }

    #[must_use]
    pub const fn tolerances(&self) -> Tolerances {
        self.tolerances
    }

    #[must_use]
    pub const fn reference_columns(&self) -> &ReferenceColumns {
        &self.reference_columns
    }

    #[must_use]
    pub const fn feature_columns(&self) -> &FeatureColumns {
        &self.feature_columns
    }

    #[must_use]
    pub fn with_tolerances(mut self, tolerances: Tolerances) -> Self {
        self.tolerances = tolerances;
        self
    }

    #[must_use]
    pub fn with_link_mode(mut self, link_mode: LinkMode) -> Self {
        self.link_mode = link_mode;
        self
    }
}

// NOTE: Column names are a property of the GNPS export format, so unlike tolerances, they get sensible defaults
impl Default for ReferenceColumns {
    fn default() -> Self {
        Self {
            mass: "parent mass".to_owned(),
            retention_time: "RTMean".to_owned(),
            library_id: "LibraryID".to_owned(),
            organism: "AllOrganisms".to_owned(),
            component: "componentindex".to_owned(),
            link: "ProteoSAFeClusterLink".to_owned(),
            identifier: "cluster index".to_owned(),
        }
    }
}

impl Default for FeatureColumns {
    fn default() -> Self {
        Self {
            key: "id".to_owned(),
            mass: "MZ".to_owned(),
            retention_time: "RT".to_owned(),
        }
    }
}

// KDL File Schema =====================================================================================================

#[derive(Debug, Decode)]
struct GnpsConfigKdl {
    #[knuffel(child, unwrap(argument))]
    database_name: String,
    #[knuffel(child, unwrap(argument))]
    link_mode: String,
    #[knuffel(child, unwrap(argument))]
    link_suffix: String,
    #[knuffel(child)]
    tolerances: TolerancesKdl,
    #[knuffel(child)]
    reference_columns: ReferenceColumns,
    #[knuffel(child)]
    feature_columns: FeatureColumns,
}

#[derive(Debug, Decode)]
struct TolerancesKdl {
    #[knuffel(child, unwrap(argument))]
    mass: f64,
    #[knuffel(child, unwrap(argument))]
    retention_time: f64,
}

// Validation of Parsed KDL ============================================================================================

impl GnpsConfigKdl {
    fn validate(self) -> Result<GnpsConfig, GnpsError> {
        let Self {
            database_name,
            link_mode,
            link_suffix,
            tolerances: TolerancesKdl {
                mass,
                retention_time,
            },
            reference_columns,
            feature_columns,
        } = self;

        let link_mode = match link_mode.as_str() {
            "tolerance" => LinkMode::Tolerance,
            "identifier" => LinkMode::Identifier(reference_columns.identifier.clone()),
            _ => return Err(GnpsError::UnknownLinkMode { mode: link_mode }),
        };
        let tolerances = Tolerances::new(mass, retention_time)?;

        Ok(GnpsConfig {
            database_name,
            link_mode,
            link_suffix,
            tolerances,
            reference_columns,
            feature_columns,
        })
    }
}

// Module Tests ========================================================================================================
