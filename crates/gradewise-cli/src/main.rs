//! gradewise CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "gradewise", version, about = "TF-IDF answer grader")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grade a student answer against a reference answer
    Evaluate {
        /// Student name
        #[arg(long, default_value = "")]
        student: String,

        /// Subject name
        #[arg(long, default_value = "")]
        subject: String,

        /// Reference answer (.txt)
        #[arg(long)]
        reference: Option<PathBuf>,

        /// Scanned student answer (.png, .jpg, .jpeg), read with OCR
        #[arg(long, conflicts_with = "answer_text")]
        answer_image: Option<PathBuf>,

        /// Student answer that is already plain text
        #[arg(long)]
        answer_text: Option<PathBuf>,

        /// Directory holding evaluation_results.csv (overrides config)
        #[arg(long)]
        dataset_dir: Option<PathBuf>,

        /// Do not open the dataset after saving
        #[arg(long)]
        no_open: bool,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print the saved evaluation results
    Show {
        /// Dataset file (default: the configured canonical dataset)
        #[arg(long)]
        dataset: Option<PathBuf>,

        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter config file
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gradewise=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Evaluate {
            student,
            subject,
            reference,
            answer_image,
            answer_text,
            dataset_dir,
            no_open,
            format,
            config,
        } => {
            commands::evaluate::execute(commands::evaluate::EvaluateArgs {
                student,
                subject,
                reference,
                answer_image,
                answer_text,
                dataset_dir,
                no_open,
                format,
                config,
            })
            .await
        }
        Commands::Show {
            dataset,
            format,
            config,
        } => commands::show::execute(dataset, format, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
