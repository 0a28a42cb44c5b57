//! Repository Module
//!
//! CRUD and specialized queries over the embedded store. Multi-write
//! operations (area + boundary lines, cascade deletes) run inside a single
//! `BEGIN TRANSACTION .. COMMIT TRANSACTION` query so partial failures never
//! leave orphaned segments or relations behind.

pub mod anchor;
pub mod anchor_group;
pub mod site_map;
pub mod switch_area;
pub mod sys_config;

pub use anchor::AnchorRepository;
pub use anchor_group::AnchorGroupRepository;
pub use site_map::SiteMapRepository;
pub use switch_area::{AreaFilter, MapAreaCount, SwitchAreaRepository};
pub use sys_config::SysConfigRepository;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
