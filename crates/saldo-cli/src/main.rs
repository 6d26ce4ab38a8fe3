mod commands;
mod logging;
mod output;

use clap::{Parser, Subcommand};
use output::OutputFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "saldo",
    version,
    about = "Bank statement parser and new-transaction digests"
)]
struct Cli {
    /// Log parser decisions to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the text extracted from a statement PDF
    Text {
        /// Path to statement PDF
        pdf_file: PathBuf,

        #[command(flatten)]
        extraction: ExtractionArgs,
    },
    /// Parse a statement (PDF or extracted .txt) into transactions and balance
    Parse {
        /// Path to statement PDF, or a .txt file with already extracted text
        input_file: PathBuf,

        #[command(flatten)]
        rules: RulesArgs,

        #[command(flatten)]
        extraction: ExtractionArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,

        /// Write parsed output to a JSON file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,

        /// Sort transactions oldest first instead of statement order
        #[arg(long)]
        chronological: bool,
    },
    /// Build a digest of transactions not notified before
    Digest {
        /// Path to statement PDF or extracted .txt
        input_file: PathBuf,

        /// State file remembering notified transactions
        #[arg(short, long, value_name = "FILE")]
        state: PathBuf,

        #[command(flatten)]
        rules: RulesArgs,

        #[command(flatten)]
        extraction: ExtractionArgs,

        /// Write the webhook payload to a file instead of stdout
        #[arg(long, value_name = "FILE")]
        payload_out: Option<PathBuf>,

        /// Currency code shown next to amounts
        #[arg(long, default_value = "EUR")]
        currency: String,

        /// Transactions listed in the embed before summarizing the rest
        #[arg(long, default_value_t = saldo_core::digest::DEFAULT_MAX_EMBEDDED)]
        max_embedded: usize,
    },
    /// Inspect or update the state file
    State {
        #[command(subcommand)]
        action: StateAction,
    },
    /// Manage and inspect rule tables
    Rules {
        #[command(subcommand)]
        action: RulesAction,
    },
}

#[derive(clap::Args)]
pub struct RulesArgs {
    /// Built-in rule table (default: n26)
    #[arg(short, long = "preset", value_name = "NAME", conflicts_with = "rules")]
    pub preset: Option<String>,

    /// Custom JSON rule table
    #[arg(short, long = "rules", value_name = "FILE")]
    pub rules: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct ExtractionArgs {
    /// Keep the physical page layout (pdftotext -layout) when reading PDFs
    #[arg(long)]
    pub layout: bool,
}

#[derive(Subcommand)]
enum StateAction {
    /// Print the stored session and notified transactions
    Show {
        /// State file
        #[arg(short, long, value_name = "FILE")]
        state: PathBuf,
    },
    /// Store new session credentials
    SetSession {
        /// Session value (cookie header)
        value: String,

        /// State file
        #[arg(short, long, value_name = "FILE")]
        state: PathBuf,
    },
}

#[derive(Subcommand)]
enum RulesAction {
    /// List built-in rule tables
    List,
    /// Print a built-in rule table as JSON
    Show {
        /// Preset name (e.g., "n26")
        preset: String,
    },
    /// Print the JSON schema with field descriptions
    Schema,
    /// Validate a custom rule table
    Validate {
        /// Path to JSON rule file
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose);

    let result = match cli.command {
        Commands::Text {
            pdf_file,
            extraction,
        } => commands::text::run(&pdf_file, &extraction),
        Commands::Parse {
            input_file,
            rules,
            extraction,
            output,
            out,
            chronological,
        } => commands::parse::run(&input_file, &rules, &extraction, output, out, chronological),
        Commands::Digest {
            input_file,
            state,
            rules,
            extraction,
            payload_out,
            currency,
            max_embedded,
        } => commands::digest::run(
            &input_file,
            &state,
            &rules,
            &extraction,
            payload_out,
            currency,
            max_embedded,
        ),
        Commands::State { action } => match action {
            StateAction::Show { state } => commands::state::show(&state),
            StateAction::SetSession { value, state } => {
                commands::state::set_session(&state, &value)
            }
        },
        Commands::Rules { action } => match action {
            RulesAction::List => commands::rules::list(),
            RulesAction::Show { preset } => commands::rules::show(&preset),
            RulesAction::Schema => commands::rules::schema(),
            RulesAction::Validate { file } => commands::rules::validate(&file),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_output_format() {
        let cli = Cli::try_parse_from(["saldo", "parse", "s.pdf", "-o", "json", "--layout"]).unwrap();
        match cli.command {
            Commands::Parse {
                output, extraction, ..
            } => {
                assert_eq!(output, OutputFormat::Json);
                assert!(extraction.layout);
            }
            _ => panic!("expected parse command"),
        }
    }

    #[test]
    fn test_unknown_output_format_rejected() {
        assert!(Cli::try_parse_from(["saldo", "parse", "s.pdf", "-o", "csv"]).is_err());
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["saldo", "parse", "s.txt"]).unwrap();
        match cli.command {
            Commands::Parse {
                output, extraction, ..
            } => {
                assert_eq!(output, OutputFormat::Table);
                assert!(!extraction.layout);
            }
            _ => panic!("expected parse command"),
        }
    }

    #[test]
    fn test_preset_conflicts_with_rules() {
        let result = Cli::try_parse_from([
            "saldo", "parse", "s.pdf", "--preset", "n26", "--rules", "my.json",
        ]);
        assert!(result.is_err());
    }
}
