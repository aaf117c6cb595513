//! Command implementations for the CO2 CLI.
//!
//! Provides subcommands for managing projects and exporting historical
//! emissions as date-aligned CSV.

use clap::Subcommand;
use co2_core::client::ApiClient;

pub mod history;
pub mod projects;

pub use history::HistoryKind;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List all projects as CSV
    Projects,

    /// Show one project with its SDLC overview as JSON
    Project {
        /// Project id
        id: u64,
    },

    /// Create a project
    CreateProject {
        #[arg(short, long)]
        name: String,

        #[arg(short, long, default_value = "")]
        description: String,

        /// Tag name, repeatable
        #[arg(short, long = "tag")]
        tags: Vec<String>,
    },

    /// Replace a project's name, description and tags
    UpdateProject {
        /// Project id
        id: u64,

        #[arg(short, long)]
        name: String,

        #[arg(short, long, default_value = "")]
        description: String,

        /// Tag name, repeatable
        #[arg(short, long = "tag")]
        tags: Vec<String>,
    },

    /// Delete a project
    DeleteProject {
        /// Project id
        id: u64,
    },

    /// Export historical emissions as one column per series
    History {
        #[arg(value_enum)]
        kind: HistoryKind,

        /// Element id for `service`, pipeline id for `pipeline`
        #[arg(long)]
        id: Option<u64>,

        /// First day, YYYY-MM-DD (default 2024-07-04). Records stamped
        /// exactly 00:00 on this day are excluded
        #[arg(long)]
        start: Option<String>,

        /// Last day, YYYY-MM-DD (default 2024-07-25)
        #[arg(long)]
        end: Option<String>,

        /// Project tag, repeatable
        #[arg(short, long = "tag")]
        tags: Vec<String>,

        /// Output CSV path, stdout when omitted
        #[arg(short, long)]
        output: Option<String>,
    },
}

pub async fn run(command: Command, client: &ApiClient) -> anyhow::Result<()> {
    match command {
        Command::Projects => projects::run_list(client).await,
        Command::Project { id } => projects::run_show(client, id).await,
        Command::CreateProject {
            name,
            description,
            tags,
        } => projects::run_create(client, name, description, tags).await,
        Command::UpdateProject {
            id,
            name,
            description,
            tags,
        } => projects::run_update(client, id, name, description, tags).await,
        Command::DeleteProject { id } => projects::run_delete(client, id).await,
        Command::History {
            kind,
            id,
            start,
            end,
            tags,
            output,
        } => {
            let range = history::parse_range(start.as_deref(), end.as_deref())?;
            let view = kind.view(id)?;
            history::run_export(client, view, range, tags, output.as_deref()).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser};

    #[derive(Parser)]
    struct TestCli {
        #[command(subcommand)]
        command: Command,
    }

    #[test]
    fn test_parse_history_command() {
        let cli = TestCli::parse_from([
            "co2-cli", "history", "pipeline", "--id", "5", "--start", "2024-07-03", "-t", "shop",
            "-t", "payments",
        ]);
        match cli.command {
            Command::History {
                kind,
                id,
                start,
                end,
                tags,
                output,
            } => {
                assert_eq!(kind, HistoryKind::Pipeline);
                assert_eq!(id, Some(5));
                assert_eq!(start.as_deref(), Some("2024-07-03"));
                assert!(end.is_none());
                assert_eq!(tags, vec!["shop", "payments"]);
                assert!(output.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_history_start_help_mentions_midnight() {
        let cmd = TestCli::command();
        let history = cmd.find_subcommand("history").unwrap();
        let start = history
            .get_arguments()
            .find(|arg| arg.get_id() == "start")
            .unwrap();
        assert!(start.get_help().unwrap().to_string().contains("00:00"));
    }

    #[test]
    fn test_parse_create_project() {
        let cli = TestCli::parse_from(["co2-cli", "create-project", "--name", "Checkout", "--tag", "shop"]);
        match cli.command {
            Command::CreateProject {
                name,
                description,
                tags,
            } => {
                assert_eq!(name, "Checkout");
                assert_eq!(description, "");
                assert_eq!(tags, vec!["shop"]);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
