// Standard Library Imports
use std::{fmt, io::Cursor};

// External Crate Imports
use log::warn;
use polars::prelude::*;

// Local Crate Imports
use crate::{
    Feature, FeatureKey, FeatureTable, FeatureValue, GnpsError, Result, config::FeatureColumns,
};

// Public API ==========================================================================================================

impl Feature {
    #[must_use]
    pub const fn key(&self) -> &FeatureKey {
        &self.key
    }

    #[must_use]
    pub const fn mass(&self) -> &FeatureValue {
        &self.mass
    }

    #[must_use]
    pub const fn retention_time(&self) -> &FeatureValue {
        &self.retention_time
    }
}

impl FeatureKey {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for FeatureKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl From<&str> for FeatureKey {
    fn from(key: &str) -> Self {
        Self(key.to_owned())
    }
}

impl From<u64> for FeatureKey {
    fn from(key: u64) -> Self {
        Self(key.to_string())
    }
}

impl FeatureValue {
    /// The value as a finite float, or `None` if the host gave us something we can't match against
    #[must_use]
    pub fn coordinate(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(text) => text.trim().parse().ok(),
            Self::Missing => None,
        }
        .filter(|value: &f64| value.is_finite())
    }
}

impl From<f64> for FeatureValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<Option<f64>> for FeatureValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Missing, Self::Number)
    }
}

impl From<&str> for FeatureValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for FeatureValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(text) => write!(f, "{text:?}"),
            Self::Missing => write!(f, "<missing>"),
        }
    }
}

impl FeatureTable {
    /// Reads features from delimited text, keeping every cell as text so that malformed coordinates make it through
    /// to the matcher (which skips them with a warning) instead of failing the whole table
    pub fn from_delimited(text: &str, separator: u8, columns: &FeatureColumns) -> Result<Self> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .with_parse_options(CsvParseOptions::default().with_separator(separator))
            .into_reader_with_file_handle(Cursor::new(text))
            .finish()?;

        let names: Vec<_> = df.get_column_names().into_iter().map(ToString::to_string).collect();
        for column in [&columns.key, &columns.mass, &columns.retention_time] {
            if !names.contains(column) {
                return Err(GnpsError::missing_column(column));
            }
        }

        let df = df
            .lazy()
            .select(
                [&columns.key, &columns.mass, &columns.retention_time]
                    .map(|column| col(column.as_str()).cast(DataType::String)),
            )
            .collect()?;

        let text_column = |name: &str| -> Result<Vec<Option<String>>> {
            Ok(df
                .column(name)?
                .as_materialized_series()
                .str()?
                .into_iter()
                .map(|cell| cell.map(str::to_owned))
                .collect())
        };
        let keys = text_column(&columns.key)?;
        let masses = text_column(&columns.mass)?;
        let retention_times = text_column(&columns.retention_time)?;

        let features = keys
            .into_iter()
            .zip(masses)
            .zip(retention_times)
            .enumerate()
            .filter_map(|(row, ((key, mass), retention_time))| {
                let Some(key) = key else {
                    warn!("feature row {row} has no {:?}, so it can't be linked", columns.key);
                    return None;
                };
                Some(Feature::new(key.into(), cell_value(mass), cell_value(retention_time)))
            })
            .collect();

        Ok(Self(features))
    }

    #[must_use]
    pub fn features(&self) -> &[Feature] {
        &self.0
    }

    pub fn keys(&self) -> impl Iterator<Item = &FeatureKey> {
        self.0.iter().map(Feature::key)
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

// Private Functions ===================================================================================================

fn cell_value(cell: Option<String>) -> FeatureValue {
    cell.map_or(FeatureValue::Missing, FeatureValue::from)
}

// Module Tests ========================================================================================================

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;

    const FEATURES: &str = include_str!("../tests/data/features.csv");

    #[test]
    fn feature_value_coordinate() {
        assert_eq!(FeatureValue::from(301.141).coordinate(), Some(301.141));
        assert_eq!(FeatureValue::from(" 301.141 ").coordinate(), Some(301.141));
        assert_eq!(FeatureValue::from("2e2").coordinate(), Some(200.0));
        assert_eq!(FeatureValue::from(Some(12.5)).coordinate(), Some(12.5));

        assert_eq!(FeatureValue::from("").coordinate(), None);
        assert_eq!(FeatureValue::from("N/A").coordinate(), None);
        assert_eq!(FeatureValue::from("inf").coordinate(), None);
        assert_eq!(FeatureValue::from(f64::NAN).coordinate(), None);
        assert_eq!(FeatureValue::from(None).coordinate(), None);
        assert_eq!(FeatureValue::Missing.coordinate(), None);
    }

    #[test]
    fn feature_key_conversions() {
        assert_eq!(FeatureKey::from(42_u64), FeatureKey::from("42"));
        assert_eq!(FeatureKey::from(String::from("abc")).as_str(), "abc");
        assert_eq!(FeatureKey::from(7_u64).to_string(), "7");
    }

    #[test]
    fn feature_table_from_delimited() {
        let table = FeatureTable::from_delimited(FEATURES, b',', &FeatureColumns::default()).unwrap();
        assert_eq!(table.len(), 5);

        let keys: Vec<_> = table.keys().map(FeatureKey::as_str).collect();
        assert_eq!(keys, ["1", "2", "3", "4", "5"]);

        let first = &table.features()[0];
        assert_eq!(first.mass().coordinate(), Some(301.1412));
        assert_eq!(first.retention_time().coordinate(), Some(182.4));

        // NOTE: Bad coordinates are kept, not rejected, since it's the matcher's job to skip them
        let unparseable = &table.features()[3];
        assert_eq!(unparseable.mass(), &FeatureValue::from("n/d"));
        assert_eq!(unparseable.mass().coordinate(), None);

        let missing = &table.features()[4];
        assert_eq!(missing.retention_time(), &FeatureValue::Missing);
    }

    #[test]
    fn feature_table_skips_keyless_rows() {
        let csv = indoc! {"
            id,MZ,RT
            1,301.1412,182.4
            2,455.2901,310.0
            ,128.0951,45.2
            3,612.3087,15.0
        "};
        let table = FeatureTable::from_delimited(csv, b',', &FeatureColumns::default()).unwrap();

        let keys: Vec<_> = table.keys().map(FeatureKey::as_str).collect();
        assert_eq!(keys, ["1", "2", "3"]);
        assert_eq!(table.features()[2].mass().coordinate(), Some(612.3087));
    }

    #[test]
    fn feature_table_missing_columns() {
        let csv = indoc! {"
            id,MZ
            1,301.1412
        "};
        let result = FeatureTable::from_delimited(csv, b',', &FeatureColumns::default());
        assert!(matches!(result, Err(GnpsError::MissingColumn { column }) if column == "RT"));
    }
}
