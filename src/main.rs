mod repl;

// Standard Library Imports
use std::{
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};

// External Crate Imports
use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use gnps_matcher::{AnnotationDatabase, FeatureTable, GnpsConfig, GnpsDatabase, ReferenceTable};
use itertools::Itertools;
use log::{LevelFilter, info};
use miette::{IntoDiagnostic, Result, WrapErr};
use polars::prelude::*;

/// Links GNPS library annotations to the features of an LC-MS experiment
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Log everything down to debug messages (otherwise controlled by `GNPS_LINK_LOG`)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Link every feature in a table and write out their matches and terms
    Link {
        #[command(flatten)]
        database: DatabaseArgs,
        /// A CSV (or TSV) file of features, with a key, mass and retention time for each
        #[arg(short, long)]
        features: PathBuf,
        /// The reference column to collect terms from (the library ID column by default)
        #[arg(long)]
        field: Option<String>,
        /// Where to write the results (standard output by default)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Interactively look up the annotations near a mass and retention time
    Query {
        #[command(flatten)]
        database: DatabaseArgs,
    },
}

#[derive(Args, Debug)]
struct DatabaseArgs {
    /// A KDL configuration file (the packaged GNPS configuration by default)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// The GNPS library matches, as exported from a molecular networking job
    #[arg(short, long)]
    reference: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match cli.command {
        Command::Link {
            database,
            features,
            field,
            output,
        } => link(&database.load()?, &features, field.as_deref(), output.as_deref()),
        Command::Query { database } => repl::run(&database.load()?),
    }
}

fn init_logger(verbose: bool) {
    let mut builder = env_logger::Builder::default();
    builder
        .filter_level(LevelFilter::Warn)
        .parse_env(Env::default().filter_or("GNPS_LINK_LOG", "warn,gnps_matcher=info"));
    if verbose {
        builder
            .filter_module("gnps_matcher", LevelFilter::Debug)
            .filter_level(LevelFilter::Debug);
    }
    builder.init();
}

impl DatabaseArgs {
    fn load(&self) -> Result<GnpsDatabase> {
        let config = match &self.config {
            Some(path) => GnpsConfig::from_kdl(path.display().to_string(), read_file(path)?)?,
            None => GnpsConfig::packaged()?,
        };

        let text = read_file(&self.reference)?;
        let reference = ReferenceTable::from_delimited(&text, separator(&self.reference), config.reference_columns())
            .wrap_err_with(|| format!("failed to load the reference table {}", self.reference.display()))?;

        Ok(GnpsDatabase::new(config, Some(reference))?)
    }
}

fn link(database: &GnpsDatabase, features: &Path, field: Option<&str>, output: Option<&Path>) -> Result<()> {
    let text = read_file(features)?;
    let features = FeatureTable::from_delimited(&text, separator(features), database.config().feature_columns())
        .wrap_err_with(|| format!("failed to load the feature table {}", features.display()))?;
    info!("read {} features", features.len());

    let links = database.link_features(features.features())?;
    let keys: Vec<_> = features.keys().cloned().collect();
    let terms = database.feature_terms(&links, &keys, field)?;

    let matches: Vec<_> = keys
        .iter()
        .map(|key| links.matches(key).map(|matches| matches.iter().join(";")).unwrap_or_default())
        .collect();
    let feature_terms: Vec<_> = keys
        .iter()
        .map(|key| terms.get(key).map(|terms| terms.keys().join(";")).unwrap_or_default())
        .collect();
    let feature_keys: Vec<_> = keys.iter().map(ToString::to_string).collect();

    let mut df = df!(
        "Feature" => feature_keys,
        "Matches" => matches,
        "Terms" => feature_terms,
    )
    .into_diagnostic()?;

    let writer: Box<dyn Write> = match output {
        Some(path) => Box::new(
            File::create(path)
                .into_diagnostic()
                .wrap_err_with(|| format!("failed to create {}", path.display()))?,
        ),
        None => Box::new(io::stdout()),
    };
    CsvWriter::new(writer).finish(&mut df).into_diagnostic()
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to read {}", path.display()))
}

// NOTE: GNPS exports tables as TSV, but feature tables are more often CSV
fn separator(path: &Path) -> u8 {
    match path.extension().and_then(|extension| extension.to_str()) {
        Some(extension) if extension.eq_ignore_ascii_case("tsv") => b'\t',
        _ => b',',
    }
}
