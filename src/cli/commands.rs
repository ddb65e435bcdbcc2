use clap::{Parser, Subcommand};
use std::path::PathBuf;
use anyhow::{Context, Result};

use crate::board::{BoardLayout, DragCoordinator, DropOutcome, GestureInput, Point, TaskBoard};
use crate::cli::error::{parse_point, user_error, validate_non_empty, validate_stage, validate_task_id};
use crate::cli::output::{format_board, format_stage, format_stages_table, get_terminal_width, is_tty};
use crate::db::{DbConnection, RcConfig, SqliteKv};
use crate::models::TaskId;
use crate::utils::export_csv;

/// Default height of the simulated drag surface, in rows
const DEFAULT_DRAG_HEIGHT: f64 = 24.0;

#[derive(Parser)]
#[command(name = "taskboard")]
#[command(about = "Taskboard - A kanban task board with stages you can move tasks through")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new task to the Stories column
    Add {
        /// Task description
        #[arg(short = 'd', long)]
        description: Option<String>,
        /// Task title (words are joined with spaces)
        title: Vec<String>,
    },
    /// Show the board, or a single stage
    List {
        /// Stage to show (e.g. "in-progress")
        stage: Option<String>,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Move a task to another stage
    Move {
        /// Task ID
        task_id: String,
        /// Destination stage
        stage: String,
    },
    /// Delete a task (only from Stories unless forced)
    Delete {
        /// Task ID
        task_id: String,
        /// Delete even when the task has left Stories
        #[arg(long)]
        force: bool,
    },
    /// List the board stages
    Stages {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Export the board as CSV
    Export {
        /// Write to a file instead of stdout
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },
    /// Drag a task across the board and drop it at a point
    Drag {
        /// Task ID
        task_id: String,
        /// Release point as x,y (columns split the board width evenly)
        #[arg(long)]
        to: String,
        /// Replay the gesture as touch input instead of a pointer
        #[arg(long)]
        touch: bool,
        /// Board width (defaults to the terminal width)
        #[arg(long)]
        width: Option<f64>,
        /// Board height
        #[arg(long)]
        height: Option<f64>,
    },
}

pub fn run() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            e.print()?;
            // --help and --version land here too; only real parse errors fail
            if e.use_stderr() {
                std::process::exit(1);
            }
            return Ok(());
        }
    };

    handle_command(cli)
}

fn handle_command(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Add { description, title } => handle_task_add(title, description),
        Commands::List { stage, json } => handle_task_list(stage, json),
        Commands::Move { task_id, stage } => handle_task_move(task_id, stage),
        Commands::Delete { task_id, force } => handle_task_delete(task_id, force),
        Commands::Stages { json } => handle_stages(json),
        Commands::Export { output } => handle_export(output),
        Commands::Drag { task_id, to, touch, width, height } => {
            handle_drag(task_id, to, touch, width, height)
        }
    }
}

/// Open the configured board over its SQLite key-value store
pub fn open_board() -> Result<TaskBoard> {
    let config = RcConfig::load();
    let db_path = DbConnection::resolve_path(&config);
    let conn = DbConnection::connect_at(&db_path)
        .context("Failed to connect to database")?;
    Ok(TaskBoard::open(Box::new(SqliteKv::new(conn)), config.storage_key()))
}

fn parse_task_id_or_exit(id: &str) -> TaskId {
    validate_task_id(id).unwrap_or_else(|e| user_error(&e))
}

fn handle_task_add(title: Vec<String>, description: Option<String>) -> Result<()> {
    let title = title.join(" ");
    if let Err(e) = validate_non_empty(&title, "Task title") {
        user_error(&e);
    }
    let description = description.unwrap_or_default();

    let mut board = open_board()?;
    let Some(task) = board.create_task(title.trim(), &description) else {
        user_error("Task title cannot be empty");
    };
    println!("Created task {} in {}.", task.id, task.status.label());
    Ok(())
}

fn handle_task_list(stage: Option<String>, json: bool) -> Result<()> {
    let stage = stage.map(|s| validate_stage(&s).unwrap_or_else(|e| user_error(&e)));
    let board = open_board()?;

    if json {
        let tasks: Vec<_> = match stage {
            Some(stage) => board.list_by_stage(stage),
            None => board.tasks().iter().collect(),
        };
        println!("{}", serde_json::to_string_pretty(&tasks)?);
        return Ok(());
    }

    let width = get_terminal_width();
    let tty = is_tty();
    match stage {
        Some(stage) => print!("{}", format_stage(stage, &board.list_by_stage(stage), width, tty)),
        None => print!("{}", format_board(&board.columns(), width, tty)),
    }
    Ok(())
}

fn handle_task_move(task_id: String, stage: String) -> Result<()> {
    let id = parse_task_id_or_exit(&task_id);
    let destination = validate_stage(&stage).unwrap_or_else(|e| user_error(&e));

    let mut board = open_board()?;
    if !board.contains(id) {
        user_error(&format!("Task {} not found", id));
    }

    if board.move_task(id, destination) {
        println!("Moved task {} to {}.", id, destination.label());
    } else {
        println!("Task {} is already in {}.", id, destination.label());
    }
    Ok(())
}

fn handle_task_delete(task_id: String, force: bool) -> Result<()> {
    let id = parse_task_id_or_exit(&task_id);

    let mut board = open_board()?;
    let Some(task) = board.get(id) else {
        user_error(&format!("Task {} not found", id));
    };
    if !task.is_deletable() && !force {
        user_error(&format!(
            "Task {} is in {}; only tasks in Stories can be deleted (use --force to override)",
            id,
            task.status.label()
        ));
    }

    board.delete_task(id);
    println!("Deleted task {}.", id);
    Ok(())
}

fn handle_stages(json: bool) -> Result<()> {
    let board = open_board()?;
    let counts = board.stage_counts();

    if json {
        let stages: Vec<serde_json::Value> = counts
            .iter()
            .map(|(stage, count)| {
                serde_json::json!({
                    "id": stage.id(),
                    "label": stage.label(),
                    "color": stage.color(),
                    "tasks": count,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&stages)?);
        return Ok(());
    }

    println!("{}", format_stages_table(&counts, is_tty()));
    Ok(())
}

fn handle_export(output: Option<PathBuf>) -> Result<()> {
    let board = open_board()?;
    let csv = export_csv(board.tasks());

    match output {
        Some(path) => {
            std::fs::write(&path, format!("{}\n", csv))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Exported {} tasks to {}.", board.len(), path.display());
        }
        None => println!("{}", csv),
    }
    Ok(())
}

fn handle_drag(
    task_id: String,
    to: String,
    touch: bool,
    width: Option<f64>,
    height: Option<f64>,
) -> Result<()> {
    let id = parse_task_id_or_exit(&task_id);
    let release = parse_point(&to).unwrap_or_else(|e| user_error(&e));
    let width = width.unwrap_or_else(|| get_terminal_width() as f64);
    let height = height.unwrap_or(DEFAULT_DRAG_HEIGHT);
    if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
        user_error("Board width and height must be positive numbers");
    }

    let mut board = open_board()?;
    let Some(status) = board.get(id).map(|t| t.status) else {
        user_error(&format!("Task {} not found", id));
    };

    let mut coordinator = DragCoordinator::new(BoardLayout::columns(width, height));
    // Pick the task up from the middle of its current column
    let origin = coordinator
        .layout()
        .bounds_of(status)
        .map(|r| Point::new(r.x + r.width / 2.0, r.y + r.height / 2.0))
        .unwrap_or(release);
    let input = if touch { GestureInput::Touch } else { GestureInput::Pointer };

    coordinator.start(&board, id, input, origin);
    coordinator.update(release);
    match coordinator.end(&mut board, release) {
        DropOutcome::Moved { task_id, from, to } => {
            println!("Moved task {} from {} to {}.", task_id, from.label(), to.label());
        }
        DropOutcome::Unchanged { task_id, stage } => {
            println!("Task {} stays in {}.", task_id, stage.label());
        }
        DropOutcome::Cancelled { task_id } => {
            println!("Dropped task {} outside the board; nothing changed.", task_id);
        }
        DropOutcome::Ignored => {
            println!("No drag in progress; nothing changed.");
        }
    }
    Ok(())
}
