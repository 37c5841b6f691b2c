// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::env::current_dir;
use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

use crate::cmd::boxes::print_boxes;
use crate::cmd::check::check_collection;
use crate::cmd::due::list_due;
use crate::cmd::export::ExportFormat;
use crate::cmd::export::export_collection;
use crate::cmd::orphans::delete_orphans;
use crate::cmd::orphans::list_orphans;
use crate::cmd::stats::StatsFormat;
use crate::cmd::stats::print_stats;
use crate::cmd::study::study;
use crate::error::Fallible;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Study the cards that are due.
    Study {
        /// Path to the collection directory.
        directory: Option<String>,
        /// Maximum number of cards to study.
        #[arg(long)]
        limit: Option<usize>,
        /// Study due cards in deck order.
        #[arg(long)]
        no_shuffle: bool,
    },
    /// List the cards that are due.
    Due {
        /// Path to the collection directory.
        directory: Option<String>,
        /// List every card, with the days until it is due.
        #[arg(long)]
        all: bool,
    },
    /// Show how many cards are in each box.
    Boxes {
        /// Path to the collection directory.
        directory: Option<String>,
    },
    /// Print collection statistics.
    Stats {
        /// Path to the collection directory.
        directory: Option<String>,
        /// Which format to use.
        #[arg(long, default_value_t = StatsFormat::Text)]
        format: StatsFormat,
    },
    /// Check the integrity of a collection.
    Check {
        /// Path to the collection directory.
        directory: Option<String>,
    },
    /// Commands relating to orphaned progress records.
    Orphans {
        #[command(subcommand)]
        command: OrphanCommand,
    },
    /// Export cards, progress, and review history.
    Export {
        /// Path to the collection directory.
        directory: Option<String>,
        /// Which format to use.
        #[arg(long, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
    },
}

#[derive(Subcommand)]
enum OrphanCommand {
    /// List the IDs of orphaned progress records.
    List {
        /// Path to the collection directory.
        directory: Option<String>,
    },
    /// Delete orphaned progress records and their review history.
    Delete {
        /// Path to the collection directory.
        directory: Option<String>,
    },
}

pub fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Study {
            directory,
            limit,
            no_shuffle,
        } => study(directory, limit, no_shuffle),
        Command::Due { directory, all } => list_due(directory, all),
        Command::Boxes { directory } => print_boxes(directory),
        Command::Stats { directory, format } => print_stats(directory, format),
        Command::Check { directory } => {
            let directory: PathBuf = match directory {
                Some(dir) => PathBuf::from(dir),
                None => current_dir()?,
            };
            check_collection(&directory)
        }
        Command::Orphans { command } => match command {
            OrphanCommand::List { directory } => list_orphans(directory),
            OrphanCommand::Delete { directory } => delete_orphans(directory),
        },
        Command::Export { directory, format } => export_collection(directory, format),
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Command::command().debug_assert();
    }

    #[test]
    fn test_parse_study_flags() {
        let cli = Command::parse_from(["leitcards", "study", "decks", "--limit", "10", "--no-shuffle"]);
        match cli {
            Command::Study {
                directory,
                limit,
                no_shuffle,
            } => {
                assert_eq!(directory.as_deref(), Some("decks"));
                assert_eq!(limit, Some(10));
                assert!(no_shuffle);
            }
            _ => panic!("Expected study command"),
        }
    }

    #[test]
    fn test_parse_orphans_delete() {
        let cli = Command::parse_from(["leitcards", "orphans", "delete"]);
        assert!(matches!(
            cli,
            Command::Orphans {
                command: OrphanCommand::Delete { directory: None }
            }
        ));
    }
}
