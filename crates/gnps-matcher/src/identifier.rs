// External Crate Imports
use ahash::{HashMap, HashMapExt};
use log::warn;
use miette::{Diagnostic, SourceSpan};
use nom::{
    Finish, IResult,
    branch::alt,
    bytes::complete::{tag, take_till, take_until},
    character::complete::{self, char},
    combinator::{all_consuming, map_parser, rest},
    multi::many1_count,
    sequence::{preceded, terminated},
};
use thiserror::Error;

// Local Crate Imports
use crate::{GnpsError, Identifier, MatchSet, ReferenceTable, Result, RowIndex};

// Public API ==========================================================================================================

#[derive(Clone, Eq, PartialEq, Debug, Diagnostic, Error)]
#[diagnostic(help(
    "identifiers are either plain integers, like 42, or compound identifiers, like abc:42###xyz"
))]
#[error("couldn't read an integer identifier from {identifier:?}")]
pub struct IdentifierError {
    identifier: String,
    // NOTE: The additional space is added so that the label can point to the end of the input
    #[source_code]
    source_code: String,
    #[label("expected an identifier here")]
    span: SourceSpan,
}

/// Reads the integer out of a plain (`42`) or compound (`abc:42###xyz`) identifier
pub fn parse_identifier(input: &str) -> Result<Identifier, IdentifierError> {
    all_consuming(identifier)(input)
        .finish()
        .map(|(_, id)| id)
        .map_err(|e| IdentifierError::new(input, e.input))
}

// Crate API ===========================================================================================================

/// Maps every identifier found in `column` to the reference rows that carry it
pub(crate) fn identifier_index(
    reference: &ReferenceTable,
    column: &str,
) -> Result<HashMap<Identifier, MatchSet>> {
    let cells = reference
        .field(column)
        .map_err(|_| GnpsError::missing_column(column))?;

    let mut rows_by_identifier: HashMap<Identifier, Vec<RowIndex>> = HashMap::new();
    for (row, cell) in cells.iter().enumerate() {
        let Some(cell) = cell else {
            warn!("reference row {row} has no value in {column:?}, so it can't be linked by identifier");
            continue;
        };
        let identifier = parse_identifier(cell)?;
        rows_by_identifier.entry(identifier).or_default().push(row);
    }

    Ok(rows_by_identifier
        .into_iter()
        .map(|(identifier, rows)| (identifier, rows.into_iter().collect()))
        .collect())
}

// Private Parsers =====================================================================================================

/// Identifier = Compound Identifier | Integer ;
fn identifier(i: &str) -> IResult<&str, Identifier> {
    alt((compound_identifier, complete::u64))(i)
}

/// Compound Identifier = Prefix , Integer , "###" , Suffix ;
/// Prefix = { Segment , ":" }- ;
///
/// The integer is the one between the *last* `:` and the first `###`, so prefixes may contain colons too
fn compound_identifier(i: &str) -> IResult<&str, Identifier> {
    let prefix = many1_count(terminated(take_till(|c: char| c == ':'), char(':')));
    let head = terminated(take_until("###"), tag("###"));
    terminated(map_parser(head, all_consuming(preceded(prefix, complete::u64))), rest)(i)
}

// Private Methods =====================================================================================================

impl IdentifierError {
    fn new(input: &str, unparsed: &str) -> Self {
        let start = input.len() - unparsed.len();
        let length = unparsed.len().max(1);

        Self {
            identifier: input.to_owned(),
            source_code: format!("{input} "),
            span: SourceSpan::from(start..start + length),
        }
    }
}

// Module Tests ========================================================================================================
