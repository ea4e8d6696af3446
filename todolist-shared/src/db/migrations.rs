/// Schema migrations
///
/// The SQL files under the workspace `migrations/` directory are embedded at
/// compile time. They are applied only on request (`todolist-api migrate` or
/// `todolist-api serve --migrate`); starting the server never alters the
/// schema on its own.
///
/// # Example
///
/// ```no_run
/// use todolist_shared::db::pool::{create_pool, DatabaseConfig};
/// use todolist_shared::db::migrations::run_migrations;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let pool = create_pool(DatabaseConfig {
///         url: std::env::var("DATABASE_URL")?,
///         ..Default::default()
///     })
///     .await?;
///
///     let applied = run_migrations(&pool).await?;
///     println!("Applied {} new migrations", applied.len());
///     Ok(())
/// }
/// ```

use sqlx::migrate::{Migrate, MigrateDatabase, MigrateError, Migrator};
use sqlx::{PgPool, Postgres};
use tracing::{debug, info};

static MIGRATOR: Migrator = sqlx::migrate!("../migrations");

/// Versions of every embedded forward migration, in apply order
pub fn known_versions() -> Vec<i64> {
    MIGRATOR
        .iter()
        .filter(|migration| !migration.migration_type.is_down_migration())
        .map(|migration| migration.version)
        .collect()
}

/// Embedded versions missing from `applied`, in apply order
fn pending_versions(applied: &[i64]) -> Vec<i64> {
    known_versions()
        .into_iter()
        .filter(|version| !applied.contains(version))
        .collect()
}

/// Applies every pending migration
///
/// # Returns
///
/// The versions applied by this call; empty when the schema was already
/// current.
///
/// # Errors
///
/// Fails if a migration does not execute, or if an applied migration no
/// longer matches its embedded file.
pub async fn run_migrations(pool: &PgPool) -> Result<Vec<i64>, MigrateError> {
    let applied: Vec<i64> = {
        let mut conn = pool.acquire().await?;
        conn.ensure_migrations_table().await?;
        conn.list_applied_migrations()
            .await?
            .into_iter()
            .map(|migration| migration.version)
            .collect()
    };

    let pending = pending_versions(&applied);
    if pending.is_empty() {
        debug!(applied = applied.len(), "No pending migrations");
        return Ok(pending);
    }

    MIGRATOR.run(pool).await?;

    for version in &pending {
        info!(version, "Applied migration");
    }
    Ok(pending)
}

/// Creates the database named in `database_url` when it is missing
///
/// # Returns
///
/// True if the database was created by this call
pub async fn ensure_database_exists(database_url: &str) -> Result<bool, sqlx::Error> {
    if Postgres::database_exists(database_url).await? {
        return Ok(false);
    }

    Postgres::create_database(database_url).await?;
    info!("Created database");
    Ok(true)
}
