use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use pageforge::batch::{batch_rename, HistoryLog};
use pageforge::resolve_page_spec;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "pageforge",
    about = "Page-indexing and batch tooling for paginated documents",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a page spec against a document of a given size
    Pages {
        /// Page spec, e.g. "1-3,5,7-10"
        spec: String,

        /// Total pages in the document
        #[arg(short, long)]
        total: usize,
    },

    /// Rename files according to a pattern
    Rename {
        /// Files to rename, in order
        files: Vec<PathBuf>,

        /// Name pattern; placeholders {index}, {name}, {ext}, {date}
        #[arg(short, long)]
        pattern: String,

        /// Move renamed files into this directory
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Show recent entries from an operation history file
    History {
        /// Path to the history JSON file
        file: PathBuf,

        /// How many entries to show, newest first
        #[arg(short, long, default_value = "10")]
        limit: usize,

        /// Delete every entry instead of listing
        #[arg(long)]
        clear: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Pages { spec, total } => {
            let indices = resolve_page_spec(&spec, total)
                .with_context(|| format!("cannot resolve page spec {spec:?}"))?;
            let pages: Vec<String> = indices.iter().map(|i| (i + 1).to_string()).collect();
            println!("{}", pages.join(","));
        }

        Commands::Rename {
            files,
            pattern,
            output_dir,
        } => {
            if files.is_empty() {
                bail!("no files given");
            }

            let outcomes = batch_rename(&files, &pattern, output_dir.as_deref());
            let mut failures = 0;
            for outcome in &outcomes {
                match (&outcome.renamed, &outcome.error) {
                    (Some(renamed), _) => {
                        println!("{} -> {}", outcome.original.display(), renamed.display())
                    }
                    (None, error) => {
                        failures += 1;
                        eprintln!(
                            "{}: {}",
                            outcome.original.display(),
                            error.as_deref().unwrap_or("unknown error")
                        );
                    }
                }
            }

            if failures > 0 {
                bail!("{failures} of {} file(s) failed", outcomes.len());
            }
        }

        Commands::History { file, limit, clear } => {
            let mut log = HistoryLog::open(&file);

            if clear {
                let removed = log.len();
                log.clear()?;
                println!("cleared {removed} record(s)");
                return Ok(());
            }

            if log.is_empty() {
                println!("no history");
                return Ok(());
            }

            for record in log.recent(limit) {
                let status = if record.success { "ok" } else { "failed" };
                let detail = record
                    .error_message
                    .as_deref()
                    .map(|e| format!(" ({e})"))
                    .unwrap_or_default();
                println!(
                    "{}  {:<14} {status}{detail}  {} in, {} out",
                    record.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    record.operation,
                    record.input_files.len(),
                    record.output_files.len()
                );
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_command_parses() {
        let cli = Cli::try_parse_from(["pageforge", "pages", "1-3,5", "--total", "10"]).unwrap();
        match cli.command {
            Commands::Pages { spec, total } => {
                assert_eq!(spec, "1-3,5");
                assert_eq!(total, 10);
            }
            _ => panic!("wrong command"),
        }
    }

    #[test]
    fn test_rename_requires_pattern() {
        assert!(Cli::try_parse_from(["pageforge", "rename", "a.pdf"]).is_err());
    }
}
