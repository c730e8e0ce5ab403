//! CLI command definitions and argument parsing.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Astrolit - Classify citation relationships and track hypotheses.
#[derive(Debug, Parser)]
#[command(name = "astrolit")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Database file path
    #[arg(short, long, global = true, env = "ASTROLIT_DATABASE")]
    pub database: Option<PathBuf>,

    /// Classifier mode (model, pattern, model-only)
    #[arg(long, global = true, value_enum)]
    pub classifier: Option<ModeArg>,

    /// Completion model identifier
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (identifiers only)
    Quiet,
}

/// Classifier mode argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ModeArg {
    /// Model first, pattern fallback
    #[value(alias = "llm")]
    Model,
    /// Pattern classifier only
    #[value(alias = "regex")]
    Pattern,
    /// Model only, no fallback
    ModelOnly,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Classify one pair, or every citing paper in a network file
    Classify(ClassifyArgs),

    /// Summarize stored classifications
    Summary(SummaryArgs),

    /// Re-run the classifier over stored citations
    Reclassify(ReclassifyArgs),

    /// Manage stored citations
    Citations(CitationsArgs),

    /// Manage stored papers
    Papers(PapersArgs),

    /// Manage hypotheses
    Hypothesis(HypothesisArgs),

    /// Show database statistics
    Stats,
}

/// Arguments for the classify command.
#[derive(Debug, Args)]
pub struct ClassifyArgs {
    /// Network JSON file with `target_paper` and `citing_papers`
    #[arg(short, long, conflicts_with = "citing_abstract")]
    pub input: Option<PathBuf>,

    /// Abstract of the citing paper
    #[arg(long)]
    pub citing_abstract: Option<String>,

    /// Abstract of the cited paper
    #[arg(long, requires = "citing_abstract")]
    pub cited_abstract: Option<String>,

    /// Title of the cited paper
    #[arg(long, requires = "citing_abstract")]
    pub cited_title: Option<String>,

    /// Store papers and classifications from the network file
    #[arg(long, requires = "input")]
    pub persist: bool,
}

/// Arguments for the summary command.
#[derive(Debug, Args)]
pub struct SummaryArgs {
    /// Only citations of this paper
    #[arg(short, long)]
    pub bibcode: Option<String>,
}

/// Arguments for the reclassify command.
#[derive(Debug, Args)]
pub struct ReclassifyArgs {
    /// Report changes without writing them
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for citation management.
#[derive(Debug, Args)]
pub struct CitationsArgs {
    #[command(subcommand)]
    pub action: CitationsAction,
}

/// Citation management actions.
#[derive(Debug, Subcommand)]
pub enum CitationsAction {
    /// Record a citation classification by hand
    Add {
        /// Citing paper bibcode
        citing: String,
        /// Cited paper bibcode
        cited: String,
        /// Relationship category
        #[arg(short = 't', long)]
        category: String,
        /// Confidence (0.0-1.0)
        #[arg(short = 'p', long, default_value = "1.0")]
        confidence: f64,
        /// Justification
        #[arg(short, long, default_value = "")]
        reasoning: String,
    },

    /// List stored citations
    List {
        /// Citations where this paper is on either side
        #[arg(short, long)]
        bibcode: Option<String>,
        /// Citations made by this paper
        #[arg(long)]
        citing: Option<String>,
        /// Citations received by this paper
        #[arg(long)]
        cited: Option<String>,
        /// Filter by category
        #[arg(short = 't', long)]
        category: Option<String>,
        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

/// Arguments for paper management.
#[derive(Debug, Args)]
pub struct PapersArgs {
    #[command(subcommand)]
    pub action: PapersAction,
}

/// Paper management actions.
#[derive(Debug, Subcommand)]
pub enum PapersAction {
    /// Add or refresh a paper
    Add {
        /// Bibcode
        bibcode: String,
        /// Title
        #[arg(short, long)]
        title: Option<String>,
        /// Abstract text
        #[arg(short, long = "abstract")]
        abstract_text: Option<String>,
        /// Publication year
        #[arg(short, long)]
        year: Option<i32>,
        /// Journal or venue
        #[arg(short, long)]
        publication: Option<String>,
        /// Citation count
        #[arg(long, default_value = "0")]
        citation_count: u32,
    },

    /// Show one paper
    Get {
        /// Bibcode
        bibcode: String,
    },

    /// List papers by citation count
    List {
        /// Filter by year
        #[arg(short, long)]
        year: Option<i32>,
        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

/// Arguments for hypothesis management.
#[derive(Debug, Args)]
pub struct HypothesisArgs {
    #[command(subcommand)]
    pub action: HypothesisAction,
}

/// Hypothesis management actions.
#[derive(Debug, Subcommand)]
pub enum HypothesisAction {
    /// Record a hypothesis
    Add {
        /// Short name
        name: String,
        /// Description
        #[arg(long)]
        description: Option<String>,
        /// Paper that proposed it
        #[arg(short, long)]
        origin: Option<String>,
        /// Initial status
        #[arg(short, long)]
        status: Option<String>,
    },

    /// List hypotheses
    List {
        /// Filter by status
        #[arg(short, long)]
        status: Option<String>,
    },

    /// Update a hypothesis
    Update {
        /// Hypothesis id
        id: i64,
        /// New status
        #[arg(short, long)]
        status: Option<String>,
        /// Name of the hypothesis that replaced it
        #[arg(long)]
        superseded_by: Option<String>,
    },

    /// Mark a hypothesis as ruled out
    RuledOut {
        /// Hypothesis id
        id: i64,
        /// Paper that ruled it out
        #[arg(short, long)]
        bibcode: String,
        /// Why it was ruled out
        #[arg(short, long)]
        reason: Option<String>,
    },
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<ModeArg> for astrolit_classifier::ClassifierMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Model => astrolit_classifier::ClassifierMode::Model,
            ModeArg::Pattern => astrolit_classifier::ClassifierMode::Pattern,
            ModeArg::ModelOnly => astrolit_classifier::ClassifierMode::ModelOnly,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use astrolit_classifier::ClassifierMode;

    #[test]
    fn test_classify_pair() {
        let cli = Cli::parse_from([
            "astrolit",
            "classify",
            "--citing-abstract",
            "We confirm it.",
            "--cited-title",
            "A Disk",
        ]);
        match cli.command {
            Command::Classify(args) => {
                assert_eq!(args.citing_abstract.as_deref(), Some("We confirm it."));
                assert_eq!(args.cited_title.as_deref(), Some("A Disk"));
                assert!(args.input.is_none());
            }
            _ => panic!("Expected Classify command"),
        }
    }

    #[test]
    fn test_persist_requires_input() {
        let result = Cli::try_parse_from(["astrolit", "classify", "--persist"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["astrolit", "stats", "-vv", "--classifier", "regex"]);
        assert_eq!(cli.verbose, 2);
        let mode: ClassifierMode = cli.classifier.unwrap().into();
        assert_eq!(mode, ClassifierMode::Pattern);
    }

    #[test]
    fn test_hypothesis_ruled_out() {
        let cli = Cli::parse_from([
            "astrolit",
            "hypothesis",
            "ruled-out",
            "3",
            "--bibcode",
            "2021ApJ",
        ]);
        match cli.command {
            Command::Hypothesis(HypothesisArgs {
                action: HypothesisAction::RuledOut { id, bibcode, reason },
            }) => {
                assert_eq!(id, 3);
                assert_eq!(bibcode, "2021ApJ");
                assert!(reason.is_none());
            }
            _ => panic!("Expected hypothesis ruled-out"),
        }
    }

    #[test]
    fn test_format_conversion() {
        let format: crate::config::OutputFormat = CliFormat::Json.into();
        assert_eq!(format, crate::config::OutputFormat::Json);
    }
}
