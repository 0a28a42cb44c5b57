//! Database Module
//!
//! Embedded SurrealDB (RocksDB engine). Tables are schemaless; the UNIQUE
//! indexes below are the real enforcement point for the global uniqueness
//! invariants (`area_id`, `area_no`, the neighbor link pair) — application
//! level duplicate checks are an optimization in front of them.

pub mod models;
pub mod repository;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

const NAMESPACE: &str = "rtls";
const DATABASE: &str = "edge";

/// Table and index definitions, idempotent
const SCHEMA: &str = "
    DEFINE TABLE IF NOT EXISTS switch_area SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS switch_area_area_id ON TABLE switch_area FIELDS area_id UNIQUE;
    DEFINE INDEX IF NOT EXISTS switch_area_area_no ON TABLE switch_area FIELDS area_no UNIQUE;

    DEFINE TABLE IF NOT EXISTS switch_line SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS switch_line_area ON TABLE switch_line FIELDS area;

    DEFINE TABLE IF NOT EXISTS area_neighbor SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS area_neighbor_link ON TABLE area_neighbor FIELDS switch_area, neighbor_area UNIQUE;

    DEFINE TABLE IF NOT EXISTS anchor SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS anchor_anchor_id ON TABLE anchor FIELDS anchor_id UNIQUE;

    DEFINE TABLE IF NOT EXISTS anchor_config SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS anchor_config_anchor_id ON TABLE anchor_config FIELDS anchor_id UNIQUE;

    DEFINE TABLE IF NOT EXISTS anchor_group SCHEMALESS;
    DEFINE TABLE IF NOT EXISTS site_map SCHEMALESS;

    DEFINE TABLE IF NOT EXISTS sys_config SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS sys_config_code ON TABLE sys_config FIELDS cfg_code UNIQUE;
";

/// Database service — owns the embedded store handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the embedded database at `db_path`
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        define_schema(&db)
            .await
            .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?;

        tracing::info!("Database connection established (SurrealDB RocksDB, {db_path})");
        Ok(Self { db })
    }
}

/// Apply table and index definitions
///
/// Also used by test harnesses running against the in-memory engine.
pub async fn define_schema(db: &Surreal<Db>) -> Result<(), surrealdb::Error> {
    db.query(SCHEMA).await?.check()?;
    Ok(())
}
