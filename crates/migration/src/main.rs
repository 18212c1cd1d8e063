use clap::{Parser, Subcommand};
use sea_orm::Database;
use sea_orm_migration::prelude::*;

/// Applies the local backend's schema.
#[derive(Debug, Parser)]
#[command(name = "migration")]
struct Args {
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:./corrida.db?mode=rwc")]
    database_url: String,
    /// Defaults to `up`.
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Subcommand)]
enum Command {
    /// Apply pending migrations.
    Up,
    /// Roll back the last migration.
    Down,
    /// Drop everything and apply all migrations again.
    Fresh,
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();
    let db = Database::connect(&args.database_url).await?;

    match args.command.unwrap_or(Command::Up) {
        Command::Up => migration::Migrator::up(&db, None).await?,
        Command::Down => migration::Migrator::down(&db, Some(1)).await?,
        Command::Fresh => migration::Migrator::fresh(&db).await?,
        Command::Status => migration::Migrator::status(&db).await?,
    }

    Ok(())
}
