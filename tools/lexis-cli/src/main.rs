mod config;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use lexis_binder::bind_document;
use lexis_ecs::DocumentWorld;
use lexis_protocol::{TaggedDocument, Thesaurus};
use lexis_salience::{SimilarityEngine, SynonymGraph, WeightEntry, WeightPropagator, WeightReport};
use rkyv::ser::{serializers::AllocSerializer, Serializer};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lexis")]
#[command(author, version, about = "Role binding and salience scoring for tagged documents")]
struct Cli {
    /// Log binding and propagation passes
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compiles a JSON thesaurus to an rkyv archive
    CompileThesaurus {
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },
    /// Binds roles and scores every word and phrase of a document
    Analyze {
        /// Tagged document: `.json`, or bracketed chunk notation otherwise
        #[arg(short, long, value_name = "FILE")]
        document: PathBuf,

        /// Thesaurus: `.json`, or an archive from `compile-thesaurus`
        #[arg(short, long, value_name = "FILE")]
        thesaurus: Option<PathBuf>,

        /// TOML file with propagation settings
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Only print the N heaviest phrases
        #[arg(long, value_name = "N")]
        top: Option<usize>,
    },
}

#[derive(Serialize)]
struct Failure {
    sentence: String,
    error: String,
}

#[derive(Serialize)]
struct Analysis<'a> {
    bound: usize,
    skipped: usize,
    failures: Vec<Failure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    weights: Option<&'a WeightReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top: Option<Vec<&'a WeightEntry>>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    match cli.command {
        Command::CompileThesaurus { input, output } => compile_thesaurus(&input, &output),
        Command::Analyze { document, thesaurus, config, top } => {
            analyze(&document, thesaurus.as_deref(), config.as_deref(), top)
        }
    }
}

fn compile_thesaurus(input: &Path, output: &Path) -> anyhow::Result<()> {
    tracing::info!(input = %input.display(), "reading thesaurus");
    let data = fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))?;
    let thesaurus: Thesaurus = serde_json::from_str(&data)?;

    tracing::info!(
        version = thesaurus.version,
        lexemes = thesaurus.lexemes.len(),
        synsets = thesaurus.synsets.len(),
        "compiling thesaurus"
    );

    let mut serializer = AllocSerializer::<256>::default();
    serializer
        .serialize_value(&thesaurus)
        .map_err(|err| anyhow::anyhow!("failed to serialize thesaurus: {:?}", err))?;
    let bytes = serializer.into_serializer().into_inner();

    fs::write(output, &bytes).with_context(|| format!("writing {}", output.display()))?;
    tracing::info!(output = %output.display(), bytes = bytes.len(), "thesaurus written");
    Ok(())
}

fn analyze(document: &Path, thesaurus: Option<&Path>, config: Option<&Path>, top: Option<usize>) -> anyhow::Result<()> {
    let config = config::load(config)?;
    let propagator = WeightPropagator::new(config)?;
    let synonyms = load_synonyms(thesaurus)?;

    let mut doc = DocumentWorld::from_tagged(&read_document(document)?);
    tracing::info!(sentences = doc.sentences().len(), phrases = doc.phrases().len(), "document loaded");

    let report = bind_document(&mut doc);
    tracing::info!(bound = report.bound, skipped = report.skipped, failed = report.failures.len(), "roles bound");

    let engine = SimilarityEngine::new(&synonyms);
    propagator.propagate(&mut doc, &engine);
    let weights = WeightReport::collect(&doc);

    let analysis = Analysis {
        bound: report.bound,
        skipped: report.skipped,
        failures: report
            .failures
            .iter()
            .map(|failure| Failure { sentence: failure.sentence.to_string(), error: failure.error.to_string() })
            .collect(),
        weights: top.is_none().then_some(&weights),
        top: top.map(|n| weights.top_phrases(n)),
    };
    println!("{}", serde_json::to_string_pretty(&analysis)?);
    Ok(())
}

fn read_document(path: &Path) -> anyhow::Result<TaggedDocument> {
    let data = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    if is_json(path) {
        Ok(serde_json::from_str(&data)?)
    } else {
        Ok(lexis_ecs::notation::parse_document(&data)?)
    }
}

fn load_synonyms(path: Option<&Path>) -> anyhow::Result<SynonymGraph> {
    let Some(path) = path else {
        tracing::info!("no thesaurus given, only identical words are synonyms");
        return Ok(SynonymGraph::new());
    };

    if is_json(path) {
        let data = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let thesaurus: Thesaurus = serde_json::from_str(&data)?;
        return Ok(SynonymGraph::from_thesaurus(&thesaurus));
    }

    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let mut aligned = rkyv::AlignedVec::with_capacity(bytes.len());
    aligned.extend_from_slice(&bytes);
    Ok(SynonymGraph::load_archived(&aligned)?)
}

fn is_json(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext.eq_ignore_ascii_case("json"))
}
