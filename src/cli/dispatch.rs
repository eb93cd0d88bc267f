use trellis::commands::describe::DescribeOptions;
use trellis::commands::list::ListOptions;
use trellis::commands::new::NewOptions;
use trellis::commands::promote::{ArchiveOptions, PromoteOptions};
use trellis::commands::{describe, list, new, promote, set};
use trellis::config::Settings;
use trellis::error::Result;
use trellis::registry::StageRegistry;

use super::types::Commands;

pub fn dispatch(command: Commands, settings: &Settings, registry: &StageRegistry) -> Result<()> {
    match command {
        Commands::New {
            stage,
            name,
            lang,
            open,
            root,
        } => {
            let options = NewOptions {
                stage,
                name,
                lang,
                open,
            };
            let created = match root {
                Some(root) => {
                    let settings = settings.clone().with_projects_root(&root);
                    new::execute(&settings, registry, &options)
                }
                None => new::execute(settings, registry, &options),
            };
            created.map(|_| ())
        }
        Commands::Promote {
            stage,
            archive,
            name,
            no_github,
            git,
            obsidian,
            dry_run,
            target,
        } => {
            let options = PromoteOptions {
                stage,
                archive,
                id: target.id,
                path: target.path,
                name,
                git,
                no_github,
                obsidian,
                dry_run,
            };
            promote::execute(settings, registry, &options).map(|_| ())
        }
        Commands::Archive { dry_run, target } => {
            let options = ArchiveOptions {
                id: target.id,
                path: target.path,
                dry_run,
            };
            promote::archive(settings, registry, &options).map(|_| ())
        }
        Commands::Describe {
            force,
            dry_run,
            target,
        } => {
            let options = DescribeOptions {
                path: target.path,
                id: target.id,
                force,
                dry_run,
            };
            describe::execute(settings, registry, &options).map(|_| ())
        }
        Commands::Set { key, value } => set::execute(&key, &value),
        Commands::List { stage, tag } => {
            list::execute(settings, registry, &ListOptions { stage, tag }).map(|_| ())
        }
    }
}
