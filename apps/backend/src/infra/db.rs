//! Connection pools, per-connection session settings and schema bootstrap.

use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

use migration::MigrationCommand;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, SqlxPostgresConnector,
    SqlxSqliteConnector, Statement,
};
use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::{info, trace, warn};

use crate::config::db::{db_url, DbKind, DbOwner, RuntimeEnv};
use crate::error::AppError;

const PG_POOL_MIN: u32 = 1;
const PG_POOL_MAX: u32 = 10;
const PG_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);
const PG_APP_NAME: &str = "matchday";
const PG_STATEMENT_TIMEOUT: &str = "15s";
const PG_IDLE_IN_TXN_TIMEOUT: &str = "30s";
const CONNECT_MAX_ATTEMPTS: u32 = 5;
const CONNECT_RETRY_INTERVAL_MS: u64 = 500;

fn engine_name(db_kind: DbKind) -> &'static str {
    match db_kind {
        DbKind::Postgres => "postgresql",
        DbKind::SqliteMemory => "sqlite",
    }
}

/// Retry a connection attempt with fixed interval delays.
/// Returns the last error once all attempts are used.
pub(crate) async fn retry_connection<T, F, Fut>(
    mut connect_fn: F,
    max_attempts: u32,
    interval_ms: u64,
) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    let mut attempt = 1;
    loop {
        match connect_fn().await {
            Ok(result) => {
                if attempt > 1 {
                    info!(attempts = attempt, interval_ms, "connection_retry=success");
                }
                return Ok(result);
            }
            Err(e) if attempt >= max_attempts => return Err(e),
            Err(e) => {
                warn!(
                    attempt,
                    max_attempts,
                    interval_ms,
                    error = %e,
                    "connection_retry=failed"
                );
                tokio::time::sleep(Duration::from_millis(interval_ms)).await;
                attempt += 1;
            }
        }
    }
}

/// Ordered session statements run on every new connection.
fn session_statements(db_kind: DbKind) -> Vec<String> {
    match db_kind {
        DbKind::SqliteMemory => vec!["PRAGMA foreign_keys = ON;".to_string()],
        DbKind::Postgres => vec![
            format!(
                "SET application_name = '{}';",
                PG_APP_NAME.replace('\'', "''")
            ),
            "SET timezone = 'UTC';".to_string(),
            format!("SET statement_timeout = '{PG_STATEMENT_TIMEOUT}';"),
            format!("SET idle_in_transaction_session_timeout = '{PG_IDLE_IN_TXN_TIMEOUT}';"),
        ],
    }
}

/// Build the application pool for `db_kind`.
///
/// SQLite in-memory uses exactly one long-lived connection: every handle on
/// the pool must see the same private database.
pub async fn build_pool(env: RuntimeEnv, db_kind: DbKind) -> Result<DatabaseConnection, AppError> {
    let url = db_url(db_kind, env.into(), DbOwner::App)?;

    match db_kind {
        DbKind::SqliteMemory => {
            let connect_opts = SqliteConnectOptions::from_str(&url)
                .map_err(|e| AppError::config(format!("invalid SQLite connection options: {e}")))?
                .create_if_missing(true);

            let pool = SqlitePoolOptions::new()
                .min_connections(1)
                .max_connections(1)
                .acquire_timeout(Duration::from_secs(30))
                .idle_timeout(None)
                .max_lifetime(None)
                .after_connect(|conn, _meta| {
                    Box::pin(async move {
                        for stmt in session_statements(DbKind::SqliteMemory) {
                            sqlx::query(&stmt).execute(&mut *conn).await?;
                        }
                        trace!("db=sqlite hook=after_connect ok");
                        Ok::<_, sqlx::Error>(())
                    })
                })
                .connect_with(connect_opts)
                .await
                .map_err(|e| {
                    AppError::config(format!("failed to create SQLite connection pool: {e}"))
                })?;

            info!(engine = "sqlite", path = %url, min = 1, max = 1, "pool=create");
            Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
        }
        DbKind::Postgres => {
            info!(
                engine = "postgres",
                min = PG_POOL_MIN,
                max = PG_POOL_MAX,
                acquire_timeout_ms = PG_ACQUIRE_TIMEOUT.as_millis() as u64,
                "pool=connecting"
            );

            let sqlx_pool = retry_connection(
                || {
                    let url = url.clone();
                    async move {
                        PgPoolOptions::new()
                            .min_connections(PG_POOL_MIN)
                            .max_connections(PG_POOL_MAX)
                            .acquire_timeout(PG_ACQUIRE_TIMEOUT)
                            .idle_timeout(Duration::from_secs(30))
                            .after_connect(|conn, _meta| {
                                Box::pin(async move {
                                    for stmt in session_statements(DbKind::Postgres) {
                                        sqlx::query(&stmt).execute(&mut *conn).await?;
                                    }
                                    Ok::<_, sqlx::Error>(())
                                })
                            })
                            .connect(&url)
                            .await
                            .map_err(|e| {
                                AppError::config(format!("failed to connect to Postgres: {e}"))
                            })
                    }
                },
                CONNECT_MAX_ATTEMPTS,
                CONNECT_RETRY_INTERVAL_MS,
            )
            .await?;

            info!(engine = "postgres", "pool=create");
            Ok(SqlxPostgresConnector::from_sqlx_postgres_pool(sqlx_pool))
        }
    }
}

/// Single-connection owner pool used to run migrations on Postgres.
async fn build_admin_pool(env: RuntimeEnv) -> Result<DatabaseConnection, AppError> {
    let url = db_url(DbKind::Postgres, env.into(), DbOwner::Owner)?;

    let mut opt = ConnectOptions::new(url);
    opt.min_connections(1)
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(2))
        .sqlx_logging(false);

    retry_connection(
        || {
            let opt = opt.clone();
            async move {
                Database::connect(opt).await.map_err(|e| {
                    AppError::config(format!("failed to connect to Postgres (admin pool): {e}"))
                })
            }
        },
        CONNECT_MAX_ATTEMPTS,
        CONNECT_RETRY_INTERVAL_MS,
    )
    .await
}

/// Run one migration command on the Postgres database for `env` through a
/// short-lived owner pool. Backs both bootstrap and the migration CLI.
pub async fn run_migration(env: RuntimeEnv, command: MigrationCommand) -> Result<(), AppError> {
    let admin = build_admin_pool(env).await?;
    let result = migration::migrate(&admin, command).await;
    if let Err(e) = admin.close().await {
        warn!(error = %e, "admin pool close failed");
    }
    Ok(result?)
}

/// Connect and bring the schema up to date. Single entrypoint for states.
pub async fn bootstrap_db(env: RuntimeEnv, db_kind: DbKind) -> Result<DatabaseConnection, AppError> {
    info!(
        env = ?env,
        db_kind = ?db_kind,
        engine = engine_name(db_kind),
        pid = std::process::id(),
        "bootstrap=start"
    );

    let db = match db_kind {
        // the in-memory database lives on the pool's only connection,
        // so it has to be migrated through that same pool
        DbKind::SqliteMemory => {
            let db = build_pool(env, db_kind).await?;
            migration::migrate(&db, MigrationCommand::Up).await?;
            db
        }
        DbKind::Postgres => {
            run_migration(env, MigrationCommand::Up).await?;
            build_pool(env, db_kind).await?
        }
    };

    info!("bootstrap=ready");
    Ok(db)
}

/// Round-trip a trivial query; used by the health endpoint.
pub async fn ping(db: &DatabaseConnection) -> Result<(), AppError> {
    let backend = db.get_database_backend();
    db.query_one(Statement::from_string(backend, "SELECT 1".to_string()))
        .await?;
    Ok(())
}
