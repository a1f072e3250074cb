use std::io::Read;

use clap::{Parser, Subcommand};
use plangate::commands;
use plangate::commands::add::NewTask;
use plangate::model::Status;
use plangate::output::Format;
use plangate::store::plan::find_repo_root;

#[derive(Parser)]
#[command(
    name = "plangate",
    version,
    about = "Plan-scoped task tracker with edit gating for agentic workflows"
)]
struct Cli {
    /// Output format
    #[arg(long, global = true, value_enum, default_value = "json")]
    format: Format,
    /// Shorthand for --format pretty
    #[arg(long, global = true, hide = true)]
    pretty: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new plan and make it the active one
    Init {
        /// Plan name (becomes .plangate/plans/<name>)
        plan: String,
        /// Project name recorded in the tracker
        #[arg(long)]
        project: Option<String>,
    },
    /// Switch the active plan
    Use {
        /// Plan name
        plan: String,
    },
    /// Add a pending task to the active plan
    Add {
        /// Task ID (e.g. TASK-001)
        id: String,
        /// Task title
        #[arg(long)]
        title: String,
        /// Task description
        #[arg(long, short)]
        description: Option<String>,
        /// Phase label (e.g. backend)
        #[arg(long)]
        phase: Option<String>,
        /// Estimated hours
        #[arg(long)]
        estimate: Option<f64>,
        /// Completion criterion (repeatable)
        #[arg(long = "criterion")]
        criterion: Vec<String>,
        /// Test case (repeatable)
        #[arg(long = "test")]
        test: Vec<String>,
    },
    /// Start a task, pausing whichever task was active
    Start {
        /// Task ID to start
        id: String,
    },
    /// Complete a task
    Complete {
        /// Task ID to complete
        id: String,
    },
    /// Pre-edit hook: allow or block based on the active task (exit 0/1)
    Gate,
    /// Close mirrored issues for merged tasks (post-merge hook when no ids)
    Sweep {
        /// Task IDs to sweep (omit to derive from the last merge)
        ids: Vec<String>,
    },
    /// Show the active plan, active task, and progress
    Status,
    /// List tasks in the active plan
    List {
        /// Filter by status
        #[arg(long, value_enum)]
        status: Option<Status>,
    },
    /// Display a single task
    Show {
        /// Task ID to show
        id: String,
    },
}

fn run(cli: Cli, format: Format) -> plangate::error::Result<()> {
    // Commands dispatched before `.plangate` discovery
    match &cli.command {
        Commands::Init { plan, project } => {
            let cwd = std::env::current_dir()?;
            return commands::plan::init(&cwd, plan, project.clone(), format);
        }
        Commands::Gate => {
            let mut payload = String::new();
            // Gating must stay fail-open; an unreadable stdin acts like an
            // empty payload.
            let _ = std::io::stdin().read_to_string(&mut payload);
            let allowed = commands::gate::run(&payload);
            std::process::exit(if allowed { 0 } else { 1 });
        }
        _ => {}
    }

    let root = find_repo_root()?;

    match cli.command {
        Commands::Init { .. } | Commands::Gate => unreachable!(),
        Commands::Use { plan } => commands::plan::use_plan(&root, &plan, format),
        Commands::Add {
            id,
            title,
            description,
            phase,
            estimate,
            criterion,
            test,
        } => commands::add::run(
            &root,
            NewTask {
                id,
                title,
                description,
                phase,
                estimated_hours: estimate,
                completion_criteria: criterion,
                test_cases: test,
            },
            format,
        ),
        Commands::Start { id } => commands::start::run(&root, &id, format),
        Commands::Complete { id } => commands::complete::run(&root, &id, format),
        Commands::Sweep { ids } => commands::sweep::run(&root, &ids, format),
        Commands::Status => commands::status::run(&root, format),
        Commands::List { status } => commands::list::run(&root, status, format),
        Commands::Show { id } => commands::show::run(&root, &id, format),
    }
}

fn main() {
    let cli = Cli::parse();
    let format = if cli.pretty {
        Format::Pretty
    } else {
        cli.format
    };
    if let Err(e) = run(cli, format) {
        match format {
            Format::Json => {
                eprintln!(
                    "{}",
                    serde_json::json!({
                        "error": e.code(),
                        "message": e.to_string()
                    })
                );
            }
            _ => eprintln!("error: {e}"),
        }
        std::process::exit(1);
    }
}
