mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use sprint_core::cancel::CancelToken;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "sprint",
    about = "File-based sprint and story management — lifecycle, drift repair, and burndown",
    version,
    propagate_version = true
)]
struct Cli {
    /// Workspace root (default: auto-detect from sprints/ or .git/)
    #[arg(long, global = true, env = "SPRINT_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the sprints directory in the current workspace
    Init,

    /// Create a sprint in planning state
    Plan {
        /// Identifier (auto-names Sprint_NN when omitted)
        name: Option<String>,
        /// Free-text description encoded in the folder name
        #[arg(long)]
        description: Option<String>,
    },

    /// Activate a sprint (creates a dated one when the name is unknown);
    /// archives the previously active sprint
    Start {
        /// Identifier, full or partial
        name: Option<String>,
        /// Sprint length in days
        #[arg(long, default_value = "14")]
        duration: u32,
    },

    /// Archive the active sprint
    Close,

    /// List all sprints
    List,

    /// Detect drift between folder names and status markers
    Doctor {
        /// Repair detected inconsistencies
        #[arg(long)]
        fix: bool,
    },

    /// Daily remaining-work series reconstructed from git history
    Burndown {
        /// Sprint identifier (defaults to the current sprint)
        sprint: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    let cancel = CancelToken::new();
    {
        let cancel = cancel.clone();
        // Second Ctrl+C falls through to the default handler via exit.
        let _ = ctrlc::set_handler(move || {
            if cancel.is_cancelled() {
                std::process::exit(130);
            }
            cancel.cancel();
        });
    }

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root),
        Commands::Plan { name, description } => {
            cmd::sprint::plan(&root, name.as_deref(), description.as_deref(), cli.json)
        }
        Commands::Start { name, duration } => {
            cmd::sprint::start(&root, name.as_deref(), duration, cli.json)
        }
        Commands::Close => cmd::sprint::close(&root, cli.json),
        Commands::List => cmd::sprint::list(&root, cli.json),
        Commands::Doctor { fix } => cmd::doctor::run(&root, fix, cli.json, &cancel),
        Commands::Burndown { sprint } => {
            cmd::burndown::run(&root, sprint.as_deref(), cli.json, &cancel)
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
