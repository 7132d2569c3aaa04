use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use ft_scrappers::init_logging;
use tracing::Level;

mod commands;

use commands::{AnalyzeArgs, CliError};

#[derive(Parser, Debug)]
#[command(author, version, about = "Fashion trend research from live fashion blogs", long_about = None)]
pub struct Cli {
    /// Show debug output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,
    /// Only show warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn log_level(&self) -> Level {
        if self.verbose {
            Level::DEBUG
        } else if self.quiet {
            Level::WARN
        } else {
            Level::INFO
        }
    }
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Discover blogs for a topic, analyze them and print the report
    Analyze(AnalyzeArgs),
    /// Print the effective vocabulary as JSON
    Vocabulary {
        #[arg(long)]
        vocabulary: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level());

    let result = match cli.command {
        Commands::Analyze(args) => commands::analyze(args).await,
        Commands::Vocabulary { vocabulary } => commands::vocabulary(vocabulary.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => match e.downcast_ref::<CliError>() {
            Some(cli_error) => {
                eprintln!("{}", cli_error);
                ExitCode::from(cli_error.exit_code())
            }
            None => {
                eprintln!("Error generating report: {:#}", e);
                ExitCode::FAILURE
            }
        },
    }
}
