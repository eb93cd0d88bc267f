use clap::{Parser, Subcommand};
use std::path::PathBuf;
use trellis::validation::clap_id_validator;

const HELP_TEMPLATE: &str = "
   ┌┬┐┬─┐┌─┐┬  ┬  ┬┌─┐
    │ ├┬┘├┤ │  │  │└─┐
    ┴ ┴└─└─┘┴─┘┴─┘┴└─┘

{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}";

#[derive(Parser)]
#[command(name = "trellis")]
#[command(about = "Start, promote and organize projects with a single CLI", long_about = None)]
#[command(version)]
#[command(help_template = HELP_TEMPLATE)]
#[command(subcommand_help_heading = "Commands")]
pub struct Cli {
    /// Show debug logs on stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new project
    New {
        /// Stage for the new project (default: playground; archive is not allowed)
        #[arg(long, visible_alias = "type")]
        stage: Option<String>,

        /// Project id to use instead of a generated AdjectiveNoun1234 id
        #[arg(long, value_parser = clap_id_validator)]
        name: Option<String>,

        /// Write a starter file (python, js, rust)
        #[arg(long)]
        lang: Option<String>,

        /// Open the new project in VS Code
        #[arg(long)]
        open: bool,

        /// Projects root for this invocation
        #[arg(long)]
        root: Option<PathBuf>,
    },

    /// Promote a project to its next stage
    ///
    /// Leaving the playground generates a name, description and category for
    /// the project and renames it after the generated name.
    Promote {
        /// Target stage
        #[arg(long, required_unless_present = "archive")]
        stage: Option<String>,

        /// Archive the project instead
        #[arg(long, conflicts_with = "stage")]
        archive: bool,

        /// Override the generated project name (and id)
        #[arg(long)]
        name: Option<String>,

        /// Skip GitHub repository creation (also skips git unless --git)
        #[arg(long)]
        no_github: bool,

        /// Initialize git even with --no-github
        #[arg(long)]
        git: bool,

        /// Write an Obsidian note into the project
        #[arg(long)]
        obsidian: bool,

        /// Print the planned actions without changing anything
        #[arg(long)]
        dry_run: bool,

        #[command(flatten)]
        target: ProjectArgs,
    },

    /// Archive a project (no git or GitHub side effects)
    Archive {
        /// Print the planned actions without changing anything
        #[arg(long)]
        dry_run: bool,

        #[command(flatten)]
        target: ProjectArgs,
    },

    /// Generate metadata for a project without moving it
    Describe {
        /// Overwrite fields that already have values
        #[arg(long)]
        force: bool,

        /// Print metadata without writing project.yaml
        #[arg(long)]
        dry_run: bool,

        #[command(flatten)]
        target: ProjectArgs,
    },

    /// Persist a config value (root, llm, llm_key, llm_model, openai_model, gemini_model, max_retries)
    Set {
        /// Config key
        key: String,

        /// Config value
        value: String,
    },

    /// List projects by stage
    List {
        /// Only list this stage
        #[arg(long)]
        stage: Option<String>,

        /// Only list projects with this tag
        #[arg(long)]
        tag: Option<String>,
    },
}

/// How a command finds its project; defaults to the current directory.
#[derive(clap::Args)]
pub struct ProjectArgs {
    /// Path to the project directory
    #[arg(long, conflicts_with = "id")]
    pub path: Option<PathBuf>,

    /// Project id to look up under the projects root
    #[arg(long, value_parser = clap_id_validator)]
    pub id: Option<String>,
}
