// storage/migrations.rs
// Database migration management

use sqlx::SqlitePool;

use crate::error_handling::DatabaseError;

/// Runs SQLx migrations located in the `migrations/` directory.
///
/// Creates the relational tables (`domains`, `domain_enrichment`) and the
/// graph tables (`graph_nodes`, `graph_edges`). Safe to run on every start.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), DatabaseError> {
    let migrations_dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("migrations");
    let migrator = sqlx::migrate::Migrator::new(migrations_dir.as_path()).await?;
    migrator.run(pool).await?;
    Ok(())
}
