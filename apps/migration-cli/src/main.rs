use clap::{Parser, ValueEnum};
use matchday::config::db::RuntimeEnv;
use matchday::infra::db::run_migration;
use migration::MigrationCommand;

#[derive(Clone, Copy, ValueEnum)]
enum Command {
    Up,
    Down,
    Fresh,
    Reset,
    Refresh,
    Status,
}

impl From<Command> for MigrationCommand {
    fn from(c: Command) -> Self {
        match c {
            Command::Up => MigrationCommand::Up,
            Command::Down => MigrationCommand::Down,
            Command::Fresh => MigrationCommand::Fresh,
            Command::Reset => MigrationCommand::Reset,
            Command::Refresh => MigrationCommand::Refresh,
            Command::Status => MigrationCommand::Status,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Env {
    Prod,
    Test,
}

/// Schema migrations for the matchday Postgres database.
///
/// The in-memory SQLite backend is migrated by the service itself on
/// startup, so only Postgres is reachable from here.
#[derive(Parser)]
#[command(name = "migration-cli")]
struct Args {
    #[arg(value_enum)]
    command: Command,

    /// Selects PROD_DB or TEST_DB
    #[arg(short, long, value_enum, default_value = "test")]
    env: Env,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stdout)
        .without_time()
        .with_target(false)
        .with_env_filter("migration=info,matchday=info,sqlx=warn")
        .init();

    let args = Args::parse();
    let env = match args.env {
        Env::Prod => RuntimeEnv::Prod,
        Env::Test => RuntimeEnv::Test,
    };

    if let Err(e) = run_migration(env, args.command.into()).await {
        eprintln!("Migration failed: {e}");
        std::process::exit(1);
    }
}
