use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::labeler::Variant;

#[derive(Parser, Debug)]
#[command(
    name = "limitations",
    version,
    about = "Rule-based recognition of limitation sentences in scientific articles"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Classify(ClassifyArgs),
    GenerateDataset(GenerateDatasetArgs),
    Evaluate(EvaluateArgs),
    EvaluateDocuments(EvaluateDocumentsArgs),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// JSON array of per-document limitation summaries.
    Summary,
    /// `<documentId>\t<POS|NEG>` per document.
    Documents,
    /// `<documentId>\t<sentenceId>\t<label>\t<text>` per sentence.
    Sentences,
}

#[derive(Args, Debug, Clone)]
pub struct ClassifyArgs {
    /// Article JSON file or a directory of them.
    #[arg(long)]
    pub input: PathBuf,

    #[arg(long)]
    pub output: PathBuf,

    #[arg(long, value_enum, default_value_t = Variant::Strict)]
    pub variant: Variant,

    #[arg(long, value_enum, default_value_t = OutputFormat::Summary)]
    pub format: OutputFormat,
}

#[derive(Args, Debug, Clone)]
pub struct GenerateDatasetArgs {
    #[arg(long)]
    pub input_dir: PathBuf,

    #[arg(long)]
    pub output: PathBuf,

    #[arg(long, default_value_t = 100)]
    pub seed_count: usize,

    #[arg(long, default_value_t = 200)]
    pub test_count: usize,

    /// Negatives kept per positive when negatives exceed the cap.
    #[arg(long, default_value_t = 1)]
    pub split_ratio: usize,

    #[arg(long, default_value_t = 4)]
    pub negative_cap: usize,

    #[arg(long, default_value_t = 30)]
    pub min_sentence_chars: usize,

    #[arg(long, default_value_t = 17)]
    pub rng_seed: u64,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct EvaluateArgs {
    #[arg(long)]
    pub input_dir: PathBuf,

    /// Dataset file with gold sentence labels.
    #[arg(long)]
    pub gold: PathBuf,

    #[arg(long)]
    pub output: PathBuf,

    #[arg(long, value_enum, default_value_t = Variant::Strict)]
    pub variant: Variant,
}

#[derive(Args, Debug, Clone)]
pub struct EvaluateDocumentsArgs {
    #[arg(long)]
    pub input_dir: PathBuf,

    /// One positive document id per line.
    #[arg(long)]
    pub positive_docs: PathBuf,

    #[arg(long)]
    pub output: PathBuf,

    #[arg(long, value_enum, default_value_t = Variant::DocumentLevel)]
    pub variant: Variant,
}
