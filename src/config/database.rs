//! Database configuration module for Budget Buddy.
//!
//! This module handles database connection and table creation using `SeaORM`. Tables are
//! generated from the entity definitions with `Schema::create_table_from_entity`, so the
//! schema always matches the Rust structs. Creation uses `IF NOT EXISTS`, which makes
//! [`create_tables`] safe to call on every start-up.

use crate::entities::{Category, GroceryItem, GroceryList, Transaction, User, WalletCard};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use std::path::Path;
use tracing::debug;

/// Default database location when neither config nor environment provide one.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/budget_buddy.sqlite?mode=rwc";

/// Creates the parent directory of a file-backed `SQLite` database.
///
/// In-memory databases and non-`SQLite` URLs are left alone.
pub fn prepare_sqlite_path(database_url: &str) -> Result<()> {
    let Some(rest) = database_url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let path = rest.split('?').next().unwrap_or_default();
    if path.is_empty() || path == ":memory:" {
        return Ok(());
    }

    if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Establishes a connection to the database at `database_url`.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    debug!("Connecting to database at {database_url}");
    Database::connect(database_url).await.map_err(Into::into)
}

async fn create_table<E>(db: &DatabaseConnection, schema: &Schema, entity: E) -> Result<()>
where
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(builder.build(&statement)).await?;
    Ok(())
}

/// Creates all tables from the entity definitions.
///
/// Parents are created before children so foreign keys resolve: categories before
/// transactions, grocery lists before grocery items.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let schema = Schema::new(db.get_database_backend());

    create_table(db, &schema, User).await?;
    create_table(db, &schema, Category).await?;
    create_table(db, &schema, Transaction).await?;
    create_table(db, &schema, GroceryList).await?;
    create_table(db, &schema, GroceryItem).await?;
    create_table(db, &schema, WalletCard).await?;

    Ok(())
}
