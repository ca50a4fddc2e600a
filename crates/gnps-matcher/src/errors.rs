// External Crate Imports
use miette::Diagnostic;
use polars::error::PolarsError;
use thiserror::Error;

// Local Crate Imports
use crate::{FeatureKey, Identifier, identifier::IdentifierError};

// Public API ==========================================================================================================

pub type Result<T, E = GnpsError> = std::result::Result<T, E>;

// NOTE: Everything in here is a configuration error. Problems with individual features are logged and skipped
// instead, so that one bad feature never aborts a whole linking pass
#[derive(Debug, Diagnostic, Error)]
pub enum GnpsError {
    #[diagnostic(help(
        "the GNPS annotation table must be supplied when loading the experiment, or GNPS annotations can't be linked"
    ))]
    #[error("no GNPS reference table was supplied")]
    MissingReferenceTable,

    #[error("the table has no {column:?} column")]
    MissingColumn { column: String },

    #[error("the {column:?} column has {found} rows, but the table has {expected}")]
    RaggedColumns {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("can't collect terms from {field:?}, since it isn't a column of the reference table")]
    UnknownField { field: String },

    #[diagnostic(help("both tolerances are half-widths of a matching window, so must be greater than 0"))]
    #[error(
        "tolerances must be positive, finite numbers, but got {mass} for mass and {retention_time} for retention time"
    )]
    InvalidTolerances { mass: f64, retention_time: f64 },

    #[diagnostic(help("the supported link modes are \"tolerance\" and \"identifier\""))]
    #[error("unknown link mode {mode:?}")]
    UnknownLinkMode { mode: String },

    #[diagnostic(transparent)]
    #[error(transparent)]
    Identifier(#[from] IdentifierError),

    #[diagnostic(help(
        "in identifier mode, every feature must have a matching row, so check that the {column:?} column belongs to \
        the same GNPS job as these features"
    ))]
    #[error("feature {key} has the identifier {identifier}, but no reference row in {column:?} shares it")]
    UnlinkedFeature {
        key: FeatureKey,
        identifier: Identifier,
        column: String,
    },

    #[diagnostic(help("every feature needs its own key, or their matches can't be told apart"))]
    #[error("more than one feature has the key {key}")]
    DuplicateFeature { key: FeatureKey },

    #[error(transparent)]
    Polars(#[from] PolarsError),
}

impl GnpsError {
    pub(crate) fn missing_column(column: &str) -> Self {
        let column = column.to_owned();

        Self::MissingColumn { column }
    }

    pub(crate) fn unknown_field(field: &str) -> Self {
        let field = field.to_owned();

        Self::UnknownField { field }
    }

    pub(crate) fn unlinked_feature(key: &FeatureKey, identifier: Identifier, column: &str) -> Self {
        let key = key.clone();
        let column = column.to_owned();

        Self::UnlinkedFeature {
            key,
            identifier,
            column,
        }
    }
}

// Module Tests ========================================================================================================

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;

    #[test]
    fn error_messages() {
        assert_snapshot!(
            GnpsError::missing_column("RTMean"),
            @r#"the table has no "RTMean" column"#
        );
        assert_snapshot!(
            GnpsError::unknown_field("Smiles"),
            @r#"can't collect terms from "Smiles", since it isn't a column of the reference table"#
        );
        assert_snapshot!(
            GnpsError::DuplicateFeature { key: FeatureKey::from("3") },
            @"more than one feature has the key 3"
        );
        assert_snapshot!(
            GnpsError::unlinked_feature(&FeatureKey::from(42_u64), 42, "cluster index"),
            @r#"feature 42 has the identifier 42, but no reference row in "cluster index" shares it"#
        );
    }
}
