//! Task board client.
//!
//! Keeps the board in a local store file and talks to the extraction
//! service for transcript extraction. Every command loads the board, applies
//! one operation, saves, and prints a notification. A failed operation leaves
//! the stored task list untouched.

use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taskmaster::board::client::DEFAULT_SERVER_URL;
use taskmaster::board::{
    ExtractionClient, LocalStore, NewTask, Priority, SortKey, StatCategory, StatusFilter,
    Task, TaskQuery,
};

#[derive(Debug, Parser)]
#[command(name = "taskboard", version, about = "Meeting transcript task board")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Extraction service URL
    #[arg(long, global = true, env = "TASKMASTER_SERVER", default_value = DEFAULT_SERVER_URL)]
    server: String,

    /// Board store file
    #[arg(long, global = true, env = "TASKMASTER_STORE", default_value = ".taskmaster/board.json")]
    store: PathBuf,

    /// Timeout for the extraction request, in seconds
    #[arg(long, global = true, default_value_t = 120)]
    timeout: u64,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Edit the saved transcript
    Transcript {
        #[command(subcommand)]
        action: TranscriptAction,
    },
    /// Extract tasks from the saved transcript (or the one given) and add them
    Extract {
        /// Read the transcript from a file (`-` for stdin)
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,
        /// Transcript text
        #[arg(long)]
        text: Option<String>,
    },
    /// Add a task manually
    Add {
        description: String,
        #[arg(long)]
        assignee: String,
        /// `YYYY-MM-DD`, `YYYY-MM-DD HH:MM` or free text
        #[arg(long)]
        due: Option<String>,
        #[arg(long, default_value = "P3")]
        priority: Priority,
    },
    /// Mark a task completed, or pending again
    Toggle { id: String },
    /// Delete a task
    Delete { id: String },
    /// List tasks
    List {
        #[arg(long)]
        priority: Option<Priority>,
        /// all, pending or completed
        #[arg(long, default_value = "all")]
        status: StatusFilter,
        #[arg(long, default_value = "")]
        search: String,
        /// priority or assignee
        #[arg(long, default_value = "priority")]
        sort: SortKey,
    },
    /// Show board counters, or the tasks behind one
    Stats {
        /// total, completed, pending or high-priority
        #[arg(long)]
        category: Option<StatCategory>,
    },
}

#[derive(Debug, Subcommand)]
enum TranscriptAction {
    /// Replace the saved transcript
    Set {
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,
        text: Option<String>,
    },
    /// Print the saved transcript
    Show,
    /// Clear the saved transcript
    Clear,
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("taskboard error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut store = LocalStore::open(&cli.store)?;
    let mut board = store.load_board();

    match cli.command {
        Commands::Transcript { action } => match action {
            TranscriptAction::Set { file, text } => {
                let transcript = read_transcript(file, text)?
                    .context("provide the transcript as an argument or with --file")?;
                board.set_transcript(transcript);
                store.save_board(&board)?;
                println!("Transcript saved ({} characters).", board.transcript().len());
            }
            TranscriptAction::Show => println!("{}", board.transcript()),
            TranscriptAction::Clear => {
                board.set_transcript("");
                store.save_board(&board)?;
                println!("Transcript cleared.");
            }
        },
        Commands::Extract { file, text } => {
            if let Some(transcript) = read_transcript(file, text)? {
                board.set_transcript(transcript);
                // keep what the user typed even if extraction fails
                store.save_board(&board)?;
            }

            let client = ExtractionClient::new(cli.server, Duration::from_secs(cli.timeout))?;
            tracing::info!("Extracting tasks via {}", client.endpoint());
            let added = client
                .extract_into(&mut board)
                .await
                .context("Extraction Failed")?;
            store.save_board(&board)?;

            println!(
                "Tasks Extracted Successfully! {} tasks have been added to your board.",
                added.len()
            );
            print_tasks(&added.iter().collect::<Vec<_>>(), cli.json)?;
        }
        Commands::Add {
            description,
            assignee,
            due,
            priority,
        } => {
            let task = board
                .add_task(NewTask {
                    description,
                    assignee,
                    due_date: due,
                    priority,
                })?
                .clone();
            store.save_board(&board)?;
            println!("Task Added. New task has been added successfully.");
            print_tasks(&[&task], cli.json)?;
        }
        Commands::Toggle { id } => {
            let task = board.toggle(&id)?.clone();
            store.save_board(&board)?;
            let state = if task.completed { "completed" } else { "pending" };
            println!("Task {} marked {}.", task.id, state);
        }
        Commands::Delete { id } => {
            let task = board.delete(&id)?;
            store.save_board(&board)?;
            println!("Task Deleted. '{}' has been removed from your board.", task.description);
        }
        Commands::List {
            priority,
            status,
            search,
            sort,
        } => {
            let query = TaskQuery {
                priority,
                status,
                search,
                sort,
            };
            let view = board.view(&query);
            if view.is_empty() && !cli.json {
                if query.is_filtered() {
                    println!("No tasks found. Try adjusting your filters or search terms.");
                } else {
                    println!("No tasks yet. Extract a transcript or add tasks manually to get started.");
                }
            } else {
                if !cli.json {
                    println!("{} tasks", view.len());
                }
                print_tasks(&view, cli.json)?;
            }
        }
        Commands::Stats { category } => match category {
            Some(category) => {
                let tasks = board.tasks_in(category);
                if !cli.json {
                    println!("{} ({})", category.title(), tasks.len());
                }
                print_tasks(&tasks, cli.json)?;
            }
            None => {
                let stats = board.stats();
                if cli.json {
                    println!("{}", serde_json::to_string_pretty(&stats)?);
                } else {
                    println!("Total:         {}", stats.total);
                    println!("Completed:     {}", stats.completed);
                    println!("Pending:       {}", stats.pending);
                    println!("High priority: {}", stats.high_priority);
                }
            }
        },
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "taskmaster=debug" } else { "taskmaster=warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn read_transcript(file: Option<PathBuf>, text: Option<String>) -> anyhow::Result<Option<String>> {
    match (file, text) {
        (Some(path), _) if path.as_os_str() == "-" => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read transcript from stdin")?;
            Ok(Some(buf))
        }
        (Some(path), _) => std::fs::read_to_string(&path)
            .map(Some)
            .with_context(|| format!("failed to read transcript from {}", path.display())),
        (None, text) => Ok(text),
    }
}

fn print_tasks(tasks: &[&Task], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(tasks)?);
        return Ok(());
    }
    for task in tasks {
        let mark = if task.completed { "x" } else { " " };
        println!(
            "[{}] {} {:<6} {}  ({} · {})  id={}",
            mark,
            task.priority,
            task.priority.label(),
            task.description,
            task.assignee,
            task.due_date,
            task.id
        );
    }
    Ok(())
}
