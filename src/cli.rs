//! Command-line interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{PROJECT_COLLECTION, SYSTEM_COLLECTION};

#[derive(Debug, Parser)]
#[command(name = "ark", about = "Local assistant for this machine and its projects")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive agent REPL (default).
    Agent,

    /// Plain knowledge-base query REPL, no agent loop.
    Ask {
        /// Collection to query.
        #[arg(long, default_value = SYSTEM_COLLECTION)]
        collection: String,
    },

    /// Gather the system profile and write it to disk.
    Acquire,

    /// Ingest knowledge: the system profile by default, or a directory of
    /// documents with --path.
    Ingest {
        /// Directory to ingest instead of the system profile.
        #[arg(long)]
        path: Option<PathBuf>,

        /// Target collection for directory ingestion.
        #[arg(long, default_value = PROJECT_COLLECTION)]
        collection: String,
    },

    /// Delete ingested documents originating from a source directory.
    Forget {
        /// Collection to delete from.
        #[arg(long)]
        collection: String,

        /// Source directory prefix whose documents are removed.
        #[arg(long)]
        path: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_args_defaults_to_agent() {
        let cli = Cli::parse_from(["ark"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn ask_defaults_to_system_collection() {
        let cli = Cli::parse_from(["ark", "ask"]);
        match cli.command {
            Some(Command::Ask { collection }) => assert_eq!(collection, SYSTEM_COLLECTION),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn ingest_with_path_and_collection() {
        let cli = Cli::parse_from(["ark", "ingest", "--path", "/tmp/proj", "--collection", "x"]);
        match cli.command {
            Some(Command::Ingest { path, collection }) => {
                assert_eq!(path, Some(PathBuf::from("/tmp/proj")));
                assert_eq!(collection, "x");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn forget_requires_both_args() {
        assert!(Cli::try_parse_from(["ark", "forget", "--collection", "x"]).is_err());
    }
}
