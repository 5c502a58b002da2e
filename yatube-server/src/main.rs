use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;
mod server;

use application::group_service::GroupService;
use data::repositories::postgres::group_repository::PostgresGroupRepository;
use domain::group::CreateGroupRequest;
use infrastructure::database::{create_pool, run_migrations};
use infrastructure::logging::init_logging;
use infrastructure::settings::Settings;
use presentation::AppState;

#[derive(Debug, Parser)]
#[command(name = "yatube-server", about = "Yatube blog REST API server")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply migrations and serve HTTP (default).
    Serve,
    /// Apply migrations and exit.
    Migrate,
    /// Create a community group.
    CreateGroup {
        #[arg(long)]
        title: String,
        #[arg(long)]
        slug: String,
        #[arg(long)]
        description: String,
    },
    /// Delete a group; its posts stay without a group.
    DeleteGroup {
        #[arg(long)]
        slug: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let settings = Settings::from_env()?;

    init_logging(&settings.log_level)?;

    let pool = create_pool(&settings.database_url, settings.database_max_connections).await?;
    run_migrations(&pool).await?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let state = AppState::new(pool, &settings);
            server::run_http(&settings, state).await?;
        }
        Command::Migrate => {
            info!("migrations are up to date");
        }
        Command::CreateGroup {
            title,
            slug,
            description,
        } => {
            let service = GroupService::new(PostgresGroupRepository::new(pool));
            let group = service
                .create_group(CreateGroupRequest {
                    title,
                    slug,
                    description,
                })
                .await
                .context("failed to create group")?;
            println!("created group #{} ({})", group.id, group.slug);
        }
        Command::DeleteGroup { slug } => {
            GroupService::new(PostgresGroupRepository::new(pool))
                .delete_group(&slug)
                .await
                .context("failed to delete group")?;
            println!("deleted group {slug}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Cli, Command};

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["yatube-server"]).expect("args must parse");
        assert!(cli.command.is_none());
    }

    #[test]
    fn create_group_requires_all_fields() {
        let cli = Cli::try_parse_from([
            "yatube-server",
            "create-group",
            "--title",
            "Cats",
            "--slug",
            "cats",
            "--description",
            "all about cats",
        ])
        .expect("args must parse");
        assert!(matches!(cli.command, Some(Command::CreateGroup { ref slug, .. }) if slug == "cats"));

        assert!(Cli::try_parse_from(["yatube-server", "create-group", "--title", "Cats"]).is_err());
    }

    #[test]
    fn delete_group_takes_slug() {
        let cli = Cli::try_parse_from(["yatube-server", "delete-group", "--slug", "cats"])
            .expect("args must parse");
        assert!(matches!(cli.command, Some(Command::DeleteGroup { ref slug }) if slug == "cats"));
    }
}
