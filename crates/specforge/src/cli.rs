//! CLI argument parsing.
//!
//! Defines the command-line interface for specforge using clap: five
//! single-document commands, the batch `run` pipeline, and `prompts`
//! management subcommands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::app::App;

/// specforge - generate requirements, stories, Gherkin features, updated
/// code, and tests from Python sources.
#[derive(Parser)]
#[command(name = "specforge")]
#[command(author, version, about)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Available specforge commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Generate a functional requirements document for one Python file.
    Requirements {
        file: PathBuf,
        /// Write the document here instead of the output workspace.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Generate a JIRA-style user story for one Python file.
    Story {
        file: PathBuf,
        /// Write the document here instead of the output workspace.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Generate a Gherkin feature file for one Python file.
    Feature {
        file: PathBuf,
        /// Existing requirements document to pass along.
        #[arg(long)]
        requirements: Option<PathBuf>,
        /// Write the document here instead of the output workspace.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Rewrite one Python file against a requirements document.
    Update {
        file: PathBuf,
        /// Requirements document driving the update; generated on the fly
        /// when omitted.
        #[arg(long)]
        requirements: Option<PathBuf>,
        /// Write the updated file here instead of the output workspace.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Generate pytest unit tests for one Python file.
    Tests {
        file: PathBuf,
        /// Write the tests here instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Run the batch pipeline: requirements, feature file, and updated
    /// code for every input file.
    Run {
        /// Python files to process.
        files: Vec<PathBuf>,
        /// Also discover .py files under this directory.
        #[arg(long)]
        input_dir: Option<PathBuf>,
    },

    /// Inspect or edit the persisted prompt templates.
    Prompts {
        #[command(subcommand)]
        action: PromptsAction,
    },
}

/// Prompt store management.
#[derive(Subcommand)]
pub enum PromptsAction {
    /// List template names and where each resolves from.
    List,
    /// Print one effective template.
    Show { name: String },
    /// Replace all overrides from a JSON mapping file.
    Import { file: PathBuf },
    /// Print the effective mapping as JSON.
    Export {
        /// Write here instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Clear every override, restoring the built-in templates.
    Reset,
}

impl Cli {
    /// Executes the parsed CLI command.
    pub async fn run(self) -> Result<()> {
        let mut app = App::new();

        let output = match self.command {
            Commands::Requirements { file, out } => {
                app.requirements(&file, out.as_deref()).await?
            }
            Commands::Story { file, out } => app.story(&file, out.as_deref()).await?,
            Commands::Feature {
                file,
                requirements,
                out,
            } => {
                app.feature(&file, requirements.as_deref(), out.as_deref())
                    .await?
            }
            Commands::Update {
                file,
                requirements,
                out,
            } => {
                app.update(&file, requirements.as_deref(), out.as_deref())
                    .await?
            }
            Commands::Tests { file, out } => {
                return emit(&app.tests(&file).await?, out.as_deref());
            }
            Commands::Run { files, input_dir } => app.run_batch(files, input_dir.as_deref()).await?,
            Commands::Prompts { action } => match action {
                PromptsAction::List => app.prompts_list(),
                PromptsAction::Show { name } => app.prompts_show(&name),
                PromptsAction::Import { file } => app.prompts_import(&file)?,
                PromptsAction::Export { out } => {
                    return emit(&app.prompts_export()?, out.as_deref());
                }
                PromptsAction::Reset => app.prompts_reset()?,
            },
        };

        println!("{output}");
        Ok(())
    }
}

/// Print to stdout, or write to the `--out` path when given.
fn emit(output: &str, out: Option<&Path>) -> Result<()> {
    match out {
        Some(path) => std::fs::write(path, output)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{output}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_single_document_command() {
        let cli =
            Cli::try_parse_from(["specforge", "requirements", "app.py", "--out", "req.md"])
                .unwrap();
        match cli.command {
            Commands::Requirements { file, out } => {
                assert_eq!(file, PathBuf::from("app.py"));
                assert_eq!(out, Some(PathBuf::from("req.md")));
            }
            _ => panic!("parsed into the wrong command"),
        }
    }

    #[test]
    fn test_parse_update_with_requirements() {
        let cli = Cli::try_parse_from([
            "specforge",
            "update",
            "app.py",
            "--requirements",
            "req.md",
        ])
        .unwrap();
        match cli.command {
            Commands::Update {
                file,
                requirements,
                out,
            } => {
                assert_eq!(file, PathBuf::from("app.py"));
                assert_eq!(requirements, Some(PathBuf::from("req.md")));
                assert_eq!(out, None);
            }
            _ => panic!("parsed into the wrong command"),
        }
    }

    #[test]
    fn test_parse_run_with_input_dir() {
        let cli =
            Cli::try_parse_from(["specforge", "run", "extra.py", "--input-dir", "./src"]).unwrap();
        match cli.command {
            Commands::Run { files, input_dir } => {
                assert_eq!(files, vec![PathBuf::from("extra.py")]);
                assert_eq!(input_dir, Some(PathBuf::from("./src")));
            }
            _ => panic!("parsed into the wrong command"),
        }
    }

    #[test]
    fn test_parse_prompts_subcommands() {
        let cli = Cli::try_parse_from(["specforge", "prompts", "show", "requirements"]).unwrap();
        match cli.command {
            Commands::Prompts {
                action: PromptsAction::Show { name },
            } => assert_eq!(name, "requirements"),
            _ => panic!("parsed into the wrong command"),
        }

        let cli = Cli::try_parse_from(["specforge", "prompts", "reset"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Prompts {
                action: PromptsAction::Reset
            }
        ));
    }
}
