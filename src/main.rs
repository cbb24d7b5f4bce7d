use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use knoll::{CandidateListBuilder, Database, SortKey, tui, utils};

/// knoll - heading-aware note lookup for a personal knowledge base
#[derive(Parser)]
#[command(name = "knoll")]
#[command(about = "Retrieve and select note headings from a knowledge base")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Print the candidate list in pipeline order
    List(ListCommand),
    /// Interactively pick a node and print its location
    Find(FindCommand),
}

/// Print candidates to stdout
#[derive(Parser)]
struct ListCommand {
    /// Path to the node store (defaults to the platform data directory)
    #[arg(long, value_name = "PATH")]
    db: Option<PathBuf>,

    /// Ordering of the candidate list
    #[arg(long, value_enum, default_value = "mtime")]
    sort: SortArg,

    /// Print the underlying nodes as JSON instead of display labels
    #[arg(long)]
    json: bool,
}

/// Pick a node interactively
#[derive(Parser)]
struct FindCommand {
    /// Path to the node store (defaults to the platform data directory)
    #[arg(long, value_name = "PATH")]
    db: Option<PathBuf>,
}

/// CLI-facing sort options, mapped onto the builder's sort keys.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortArg {
    /// Most recently modified file first
    Mtime,
    /// Most recently accessed file first
    Atime,
    /// Title, ascending
    Title,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Mtime => SortKey::FileMtime,
            SortArg::Atime => SortKey::FileAtime,
            SortArg::Title => SortKey::Title,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::List(cmd) => handle_list(cmd),
        Commands::Find(cmd) => handle_find(cmd),
    };

    if let Err(e) = result {
        // Determine exit code based on error type
        let exit_code = if is_user_error(&e) { 1 } else { 2 };
        eprintln!("Error: {e}");
        std::process::exit(exit_code);
    }
}

/// Determines if an error is a user error (vs internal error).
///
/// User errors include an empty store; internal errors include database
/// failures and terminal I/O errors.
fn is_user_error(error: &anyhow::Error) -> bool {
    error.to_string().contains("no nodes")
}

/// Opens the store at the given path, falling back to the platform default.
fn open_database(path: Option<&PathBuf>) -> Result<Database> {
    let db_path = match path {
        Some(path) => path.clone(),
        None => utils::default_database_path()?,
    };
    utils::ensure_database_directory(&db_path)?;
    Database::open(&db_path).context("Failed to open database")
}

/// Handles the list command by printing candidates in pipeline order.
fn handle_list(cmd: &ListCommand) -> Result<()> {
    let db = open_database(cmd.db.as_ref())?;

    let candidates = CandidateListBuilder::new(&db)
        .sort_key(cmd.sort.into())
        .list()
        .context("Failed to build candidate list")?;

    if cmd.json {
        let nodes: Vec<_> = candidates.iter().map(|c| c.node()).collect();
        println!("{}", serde_json::to_string_pretty(&nodes)?);
    } else {
        for candidate in &candidates {
            println!("{candidate}");
        }
    }

    Ok(())
}

/// Handles the find command by running the interactive picker.
///
/// Prints `id<TAB>file<TAB>point` of the selection for the host to act on;
/// a cancelled pick prints nothing and exits successfully.
fn handle_find(cmd: &FindCommand) -> Result<()> {
    let db = open_database(cmd.db.as_ref())?;

    let candidates = CandidateListBuilder::new(&db)
        .list()
        .context("Failed to build candidate list")?;

    if candidates.is_empty() {
        anyhow::bail!("There are no nodes in the store");
    }

    if let Some(candidate) = tui::pick(candidates)? {
        let node = candidate.node();
        println!("{}\t{}\t{}", node.id(), node.file().display(), node.point());
    }

    Ok(())
}
