//! Command-line front end over `brainstall_core`.
//!
//! # Responsibility
//! - Map subcommands onto core services against one vault directory.
//! - Report failures as a one-line notice and a non-zero exit code.

use brainstall_core::search::query::date_labels;
use brainstall_core::stats::activity::HEATMAP_WEEKS;
use brainstall_core::{
    collect_activity, default_log_level, init_logging, run_query, CaptureService, FsVaultStore,
    PostService, PromoteKind, QueryState, Settings, SystemClock, TopicService,
    VaultDocumentRepository,
};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use log::error;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

const STATE_DIR: &str = ".brainstall";
const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Capture memos, browse them and promote them into topics.
#[derive(Debug, Parser)]
#[command(name = "brainstall", version)]
struct Cli {
    /// Vault root directory.
    #[arg(long, default_value = ".")]
    vault: PathBuf,

    /// Settings file. Defaults to `<vault>/.brainstall/settings.json`.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log directory. Defaults to `<vault>/.brainstall/logs`.
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Save a memo.
    Memo {
        /// Memo text; the first line becomes its context.
        text: String,
        /// Document the memo refers to.
        #[arg(long)]
        source: Option<String>,
    },
    /// List captured documents, pinned first and newest first.
    List(ListArgs),
    /// Archive a document.
    Archive { path: String },
    /// Restore an archived document.
    Unarchive { path: String },
    /// Toggle the pin of a document.
    Pin { path: String },
    /// Click star 1-5 on a document.
    Star { path: String, index: u8 },
    /// Delete a document permanently.
    Delete { path: String },
    /// Print the share text of a document.
    Share { path: String },
    /// Merge a document into its topic.
    Promote {
        path: String,
        /// Topic folder; defaults to the configured one.
        #[arg(long)]
        target: Option<String>,
    },
    /// Print the activity heatmap and counters.
    Stats {
        /// Anchor day (`YYYY-MM-DD`); defaults to today.
        #[arg(long)]
        today: Option<NaiveDate>,
    },
}

#[derive(Debug, clap::Args)]
struct ListArgs {
    /// Include archived documents.
    #[arg(long)]
    archived: bool,
    /// Hashtag filter, e.g. `#rust`.
    #[arg(long)]
    keyword: Option<String>,
    /// Calendar day filter (`YYYY-MM-DD`).
    #[arg(long)]
    date: Option<NaiveDate>,
    /// Document type filter, e.g. `memo`.
    #[arg(long = "type")]
    doc_type: Option<String>,
    /// Accepted priorities; repeatable.
    #[arg(long = "priority", value_parser = clap::value_parser!(u8).range(0..=5))]
    priorities: Vec<u8>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_command module=cli status=error error={}", err);
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let state_dir = cli.vault.join(STATE_DIR);
    let log_dir = cli.log_dir.unwrap_or_else(|| state_dir.join("logs"));
    let log_level = cli.log_level.as_deref().unwrap_or(default_log_level());
    if let Err(err) = init_logging(log_level, &log_dir) {
        eprintln!("warning: logging disabled: {err}");
    }

    let settings = Settings::load(
        cli.config
            .unwrap_or_else(|| state_dir.join("settings.json")),
    )?;
    let store = FsVaultStore::open(&cli.vault)?;
    let repo = VaultDocumentRepository::new(&store);

    match cli.command {
        Command::Memo { text, source } => {
            let service = CaptureService::new(repo, SystemClock, settings);
            let path = service.create_memo(&text, source.as_deref())?;
            println!("{path}");
        }
        Command::List(args) => {
            let state = QueryState {
                show_archived: args.archived,
                search_keyword: args.keyword,
                search_date: args.date,
                search_type: args.doc_type,
                selected_priorities: args.priorities.into_iter().collect(),
            };
            let outcome = run_query(&repo, settings.base_folder(), &state)?;
            println!("{} documents", outcome.visible_count);
            for item in &outcome.items {
                println!(
                    "{} {}{} {:<5} {}  {}",
                    item.effective_date.format("%Y-%m-%d %H:%M"),
                    if item.pinned { "P" } else { "-" },
                    if item.archived { "A" } else { "-" },
                    "*".repeat(usize::from(item.priority)),
                    item.context.as_deref().unwrap_or(""),
                    item.path
                );
            }
            if !outcome.hashtags.is_empty() {
                println!("hashtags: {}", outcome.hashtags.join(" "));
            }
            if !outcome.dates.is_empty() {
                println!("days: {}", date_labels(&outcome).join(" "));
            }
        }
        Command::Archive { path } => PostService::new(repo).archive(&path)?,
        Command::Unarchive { path } => PostService::new(repo).unarchive(&path)?,
        Command::Pin { path } => {
            let pinned = PostService::new(repo).toggle_pin(&path)?;
            println!("{}", if pinned { "pinned" } else { "unpinned" });
        }
        Command::Star { path, index } => {
            let priority = PostService::new(repo).click_star(&path, index)?;
            println!("priority {priority}");
        }
        Command::Delete { path } => PostService::new(repo).delete(&path)?,
        Command::Share { path } => println!("{}", PostService::new(repo).share_text(&path)?),
        Command::Promote { path, target } => {
            let service = TopicService::new(repo, SystemClock, settings.clone());
            let target = target.unwrap_or_else(|| settings.topic_folder().to_string());
            let outcome = service.promote_into(&path, &target)?;
            let verb = match outcome.kind {
                PromoteKind::Created => "created",
                PromoteKind::Updated => "updated",
            };
            println!("{verb} {}", outcome.topic_path);
            if outcome.notification_path.is_none() {
                eprintln!("warning: topic notification was not written");
            }
        }
        Command::Stats { today } => {
            let today = today.unwrap_or_else(|| Local::now().date_naive());
            let stats = collect_activity(&repo, settings.base_folder(), today)?;
            for (row, cells) in stats.heatmap.rows.iter().enumerate() {
                let line: String = cells.iter().map(|cell| heat_glyph(cell.count)).collect();
                println!("{} {line}", WEEKDAY_LABELS[row]);
            }
            println!(
                "last {HEATMAP_WEEKS} weeks, busiest day {}",
                stats.heatmap.max_count_in_window
            );
            println!(
                "archived {} / {}",
                stats.archived_documents, stats.total_documents
            );
            println!("active documents {}", stats.active_documents);
            println!("active days {}", stats.active_days);
            println!("characters {}", stats.total_chars);
            println!("characters per day {}", stats.average_chars_per_day);
        }
    }
    Ok(())
}

fn heat_glyph(count: usize) -> char {
    match count {
        0 => '.',
        1..=9 => char::from(b'0' + count as u8),
        _ => '#',
    }
}
