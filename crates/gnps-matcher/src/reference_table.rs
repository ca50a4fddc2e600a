// Standard Library Imports
use std::io::Cursor;

// External Crate Imports
use ahash::HashMap;
use log::debug;
use polars::prelude::*;

// Local Crate Imports
use crate::{
    GnpsError, MatchSet, ReferenceTable, Result, RowIndex, Tolerances, config::ReferenceColumns,
};

// Public API ==========================================================================================================

impl ReferenceTable {
    /// Builds a table from raw columns. This is the only place rows are normalised: missing or non-finite masses and
    /// retention times become `0.0`, and every column must have the same number of rows
    pub fn from_columns(
        masses: Vec<Option<f64>>,
        retention_times: Vec<Option<f64>>,
        fields: impl IntoIterator<Item = (String, Vec<Option<String>>)>,
    ) -> Result<Self> {
        let rows = masses.len();
        let check_length = |column: &str, found: usize| {
            if found == rows {
                Ok(())
            } else {
                Err(GnpsError::RaggedColumns {
                    column: column.to_owned(),
                    expected: rows,
                    found,
                })
            }
        };

        check_length("retention time", retention_times.len())?;
        let fields = fields
            .into_iter()
            .map(|(name, values)| {
                check_length(&name, values.len())?;
                Ok((name, values))
            })
            .collect::<Result<HashMap<_, _>>>()?;

        let masses = normalise(masses);
        let retention_times = normalise(retention_times);

        let mut mass_order: Vec<_> = (0..rows).collect();
        mass_order.sort_unstable_by(|&a, &b| masses[a].total_cmp(&masses[b]));

        Ok(Self {
            masses,
            retention_times,
            fields,
            mass_order,
        })
    }

    /// Builds a table from a `DataFrame`: the mass and retention time columns are read as numbers (anything that
    /// can't be read as one becomes `0.0`), and every column is also kept as text for summaries and terms
    pub fn from_dataframe(df: DataFrame, columns: &ReferenceColumns) -> Result<Self> {
        let names: Vec<_> = df.get_column_names().into_iter().map(ToString::to_string).collect();
        for column in [&columns.mass, &columns.retention_time] {
            if !names.contains(column) {
                return Err(GnpsError::missing_column(column));
            }
        }

        let coordinates = df
            .clone()
            .lazy()
            .select([&columns.mass, &columns.retention_time].map(|column| {
                col(column.as_str()).cast(DataType::Float64)
            }))
            .collect()?;
        let masses = float_column(&coordinates, &columns.mass)?;
        let retention_times = float_column(&coordinates, &columns.retention_time)?;

        let text = df
            .lazy()
            .select(
                names
                    .iter()
                    .map(|column| col(column.as_str()).cast(DataType::String))
                    .collect::<Vec<_>>(),
            )
            .collect()?;
        let fields = names
            .into_iter()
            .map(|name| {
                let values = text_column(&text, &name)?;
                Ok((name, values))
            })
            .collect::<Result<Vec<_>>>()?;

        let table = Self::from_columns(masses, retention_times, fields)?;
        debug!(
            "loaded a reference table with {} rows and {} columns",
            table.len(),
            table.fields.len()
        );
        Ok(table)
    }

    /// Parses delimited text (GNPS exports are tab-separated) into a reference table
    pub fn from_delimited(text: &str, separator: u8, columns: &ReferenceColumns) -> Result<Self> {
        // NOTE: Every column is read as text, since an `N/A` far down a numeric column would otherwise fail the whole
        // read. Numeric columns are cast (and normalised) afterwards, in `from_dataframe()`
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .with_parse_options(CsvParseOptions::default().with_separator(separator))
            .into_reader_with_file_handle(Cursor::new(text))
            .finish()?;

        Self::from_dataframe(df, columns)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.masses.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.masses.is_empty()
    }

    #[must_use]
    pub fn mass(&self, row: RowIndex) -> Option<f64> {
        self.masses.get(row).copied()
    }

    #[must_use]
    pub fn retention_time(&self, row: RowIndex) -> Option<f64> {
        self.retention_times.get(row).copied()
    }

    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn field(&self, field: &str) -> Result<&[Option<String>]> {
        self.fields
            .get(field)
            .map(Vec::as_slice)
            .ok_or_else(|| GnpsError::unknown_field(field))
    }

    /// The text of one cell, or `None` if either the column or the value is missing
    #[must_use]
    pub fn value(&self, row: RowIndex, field: &str) -> Option<&str> {
        self.fields.get(field)?.get(row)?.as_deref()
    }

    /// All rows strictly within both tolerances of the query, in ascending row order
    #[must_use]
    pub fn matches_within(&self, mass: f64, retention_time: f64, tolerances: Tolerances) -> MatchSet {
        self.mass_window(mass, tolerances.mass())
            .iter()
            .copied()
            .filter(|&row| {
                tolerances.mass_contains(mass, self.masses[row])
                    && tolerances.retention_time_contains(retention_time, self.retention_times[row])
            })
            .collect()
    }
}

// Private Methods =====================================================================================================

impl ReferenceTable {
    // NOTE: This window is padded by a few ULPs, so that rounding in `mass ± tolerance` can't drop a row that the exact
    // comparison in `Tolerances::mass_contains()` would keep. The filter afterwards makes the final decision
    fn mass_window(&self, mass: f64, tolerance: f64) -> &[RowIndex] {
        let padding = 4.0 * f64::EPSILON * mass.abs().max(tolerance).max(1.0);
        let (min_mass, max_mass) = (mass - tolerance - padding, mass + tolerance + padding);

        let start = self.mass_order.partition_point(|&row| self.masses[row] < min_mass);
        let end = self.mass_order.partition_point(|&row| self.masses[row] <= max_mass);

        &self.mass_order[start..end.max(start)]
    }
}

// Private Functions ===================================================================================================

fn normalise(values: Vec<Option<f64>>) -> Vec<f64> {
    let mut replaced = 0;
    let values = values
        .into_iter()
        .map(|value| {
            value.filter(|v| v.is_finite()).unwrap_or_else(|| {
                replaced += 1;
                0.0
            })
        })
        .collect();

    if replaced > 0 {
        debug!("replaced {replaced} missing or malformed numeric values with 0");
    }
    values
}

fn float_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    Ok(df
        .column(name)?
        .as_materialized_series()
        .f64()?
        .into_iter()
        .collect())
}

fn text_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    Ok(df
        .column(name)?
        .as_materialized_series()
        .str()?
        .into_iter()
        .map(|cell| cell.map(str::to_owned))
        .collect())
}

// Module Tests ========================================================================================================

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;

    const GNPS_TABLE: &str = include_str!("../tests/data/gnps_table.tsv");

    fn coordinates_only(coordinates: &[(f64, f64)]) -> ReferenceTable {
        let (masses, retention_times): (Vec<_>, Vec<_>) = coordinates.iter().map(|&(m, rt)| (Some(m), Some(rt))).unzip();
        ReferenceTable::from_columns(masses, retention_times, []).unwrap()
    }

    #[test]
    fn from_columns_normalises_missing_values() {
        let table = ReferenceTable::from_columns(
            vec![Some(100.0), None, Some(f64::NAN)],
            vec![None, Some(12.0), Some(f64::INFINITY)],
            [("LibraryID".to_owned(), vec![Some("a".to_owned()), None, Some("N/A".to_owned())])],
        )
        .unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.mass(0), Some(100.0));
        assert_eq!(table.mass(1), Some(0.0));
        assert_eq!(table.mass(2), Some(0.0));
        assert_eq!(table.retention_time(0), Some(0.0));
        assert_eq!(table.retention_time(1), Some(12.0));
        assert_eq!(table.retention_time(2), Some(0.0));
        assert_eq!(table.mass(3), None);

        assert_eq!(table.value(0, "LibraryID"), Some("a"));
        assert_eq!(table.value(1, "LibraryID"), None);
        assert_eq!(table.value(2, "LibraryID"), Some("N/A"));
        assert_eq!(table.value(0, "Smiles"), None);
    }

    #[test]
    fn from_columns_rejects_ragged_columns() {
        let result = ReferenceTable::from_columns(vec![Some(1.0), Some(2.0)], vec![Some(1.0)], []);
        assert!(matches!(
            result,
            Err(GnpsError::RaggedColumns { expected: 2, found: 1, .. })
        ));

        let result = ReferenceTable::from_columns(
            vec![Some(1.0)],
            vec![Some(1.0)],
            [("LibraryID".to_owned(), vec![None, None])],
        );
        assert!(matches!(
            result,
            Err(GnpsError::RaggedColumns { column, expected: 1, found: 2 }) if column == "LibraryID"
        ));
    }

    #[test]
    fn from_delimited() {
        let table = ReferenceTable::from_delimited(GNPS_TABLE, b'\t', &ReferenceColumns::default()).unwrap();
        assert_eq!(table.len(), 8);

        assert_eq!(table.mass(0), Some(301.1410));
        assert_eq!(table.retention_time(0), Some(181.9));
        assert_eq!(table.value(0, "LibraryID"), Some("Hesperetin"));
        assert_eq!(table.value(0, "AllOrganisms"), Some("GNPS-LIBRARY"));
        assert!(table.value(0, "ProteoSAFeClusterLink").unwrap().starts_with("https://gnps.ucsd.edu/"));

        // NOTE: The row with no parent mass is normalised to 0, but its text cells are still available
        assert_eq!(table.mass(7), Some(0.0));
        assert_eq!(table.value(7, "LibraryID"), Some("Unknown-7"));

        assert!(table.has_field("parent mass"));
        assert!(table.has_field("cluster index"));
        assert!(!table.has_field("Smiles"));
        assert!(matches!(table.field("Smiles"), Err(GnpsError::UnknownField { .. })));
    }

    #[test]
    fn from_delimited_late_placeholders() {
        let mut tsv = String::from("parent mass\tRTMean\tLibraryID\n");
        for row in 0..150 {
            tsv.push_str(&format!("{}.5\t{row}.25\tCompound-{row}\n", 100 + row));
        }
        tsv.push_str("N/A\t12.5\tLate mass\n");
        tsv.push_str("480.5\tN/A\tLate retention time\n");
        tsv.push_str("481.5\t13.0\t42\n");

        let table = ReferenceTable::from_delimited(&tsv, b'\t', &ReferenceColumns::default()).unwrap();
        assert_eq!(table.len(), 153);
        assert_eq!(table.mass(149), Some(249.5));
        assert_eq!(table.retention_time(149), Some(149.25));

        assert_eq!(table.mass(150), Some(0.0));
        assert_eq!(table.retention_time(150), Some(12.5));
        assert_eq!(table.mass(151), Some(480.5));
        assert_eq!(table.retention_time(151), Some(0.0));
        assert_eq!(table.value(152, "LibraryID"), Some("42"));
    }

    #[test]
    fn from_delimited_missing_columns() {
        let tsv = indoc! {"
            parent mass\tLibraryID
            301.141\tHesperetin
        "};
        let result = ReferenceTable::from_delimited(tsv, b'\t', &ReferenceColumns::default());
        assert!(matches!(result, Err(GnpsError::MissingColumn { column }) if column == "RTMean"));
    }

    #[test]
    fn matches_within_strict_boundaries() {
        let table = coordinates_only(&[
            (100.0, 10.0),  // 0: exact hit
            (100.5, 10.0),  // 1: exactly one mass tolerance away
            (100.25, 10.0), // 2: inside the mass window
            (99.5, 10.0),   // 3: exactly one mass tolerance below
            (99.75, 11.5),  // 4: inside both windows
            (100.0, 12.0),  // 5: exactly one retention time tolerance away
            (100.0, 8.5),   // 6: inside the retention time window
            (250.0, 10.0),  // 7: nowhere near
        ]);
        let tolerances = Tolerances::new(0.5, 2).unwrap();

        let matches = table.matches_within(100.0, 10.0, tolerances);
        assert_eq!(matches.as_slice(), [0, 2, 4, 6]);
    }

    #[test]
    fn matches_within_unsorted_masses() {
        let table = coordinates_only(&[
            (500.0, 30.0),
            (200.02, 31.0),
            (900.0, 30.0),
            (199.99, 29.5),
            (200.0, 60.0),
        ]);
        let tolerances = Tolerances::new(0.05, 5).unwrap();

        // NOTE: Results come back in table order, not in the mass order used for the search
        let matches = table.matches_within(200.0, 30.0, tolerances);
        assert_eq!(matches.as_slice(), [1, 3]);
    }

    #[test]
    fn matches_within_empty_table() {
        let table = ReferenceTable::default();
        assert!(table.is_empty());

        let tolerances = Tolerances::new(20, 100).unwrap();
        assert!(table.matches_within(301.141, 182.4, tolerances).is_empty());
    }
}
