// Standard Library Imports
use std::fmt::Write;

// External Crate Imports
use gnps_matcher::{AnnotationDatabase, Feature, FeatureKey, FeatureValue, GnpsDatabase};
use itertools::Itertools;
use miette::{GraphicalReportHandler, GraphicalTheme, IntoDiagnostic, Report, Result, miette};
use rustyline::DefaultEditor;

// Public API ==========================================================================================================

pub fn run(database: &GnpsDatabase) -> Result<()> {
    let mut rl = DefaultEditor::new().into_diagnostic()?;
    let mut queries = 0_u64;

    while let Ok(line) = rl.readline("Mass and RT: ") {
        if line.trim().is_empty() {
            continue;
        }
        rl.add_history_entry(&line).into_diagnostic()?;

        queries += 1;
        match query_info(database, queries, &line) {
            Ok(info) => print!("{info}"),
            Err(report) => render_error(&report),
        }
    }

    Ok(())
}

// Private Functions ===================================================================================================

fn query_info(database: &GnpsDatabase, query: u64, line: &str) -> Result<String> {
    let (mass, retention_time) = line.split_whitespace().collect_tuple().ok_or_else(|| {
        miette!(
            help = "enter a mass followed by a retention time, like `301.1412 182.4`",
            "expected two numbers, but got {line:?}"
        )
    })?;

    let feature = Feature::new(
        FeatureKey::from(format!("query-{query}")),
        FeatureValue::from(mass),
        FeatureValue::from(retention_time),
    );
    if feature.mass().coordinate().is_none() || feature.retention_time().coordinate().is_none() {
        return Err(miette!(
            help = "both the mass and the retention time must be finite numbers",
            "couldn't read a mass and retention time from {line:?}"
        ));
    }

    let mut buf = String::new();
    let annotations = database.annotate(&feature);
    if annotations.is_empty() {
        let tolerances = database.config().tolerances();
        writeln!(
            buf,
            "No {} annotations within ±{} mass and ±{} retention time",
            database.database_name(),
            tolerances.mass(),
            tolerances.retention_time()
        )
        .into_diagnostic()?;
    }

    // NOTE: The first five lines describe the best match, and are followed by one line per match
    for (index, (details, text)) in annotations.iter().enumerate() {
        if index < 5 {
            writeln!(buf, "{text}").into_diagnostic()?;
        } else {
            let link = database.resolve_link(details).unwrap_or_default();
            writeln!(buf, "  [{}] {text} {link}", details.row()).into_diagnostic()?;
        }
    }
    writeln!(buf).into_diagnostic()?;

    Ok(buf)
}

fn render_error(report: &Report) {
    let mut buf = String::new();
    match GraphicalReportHandler::new_themed(GraphicalTheme::unicode()).render_report(&mut buf, &**report) {
        Ok(()) => println!("{buf}"),
        Err(_) => println!("{report}"),
    }
}

// Module Tests ========================================================================================================
