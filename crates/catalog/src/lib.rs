//! Read-only course catalog.
//!
//! Courses (each owning ordered lessons, each lesson owning test cases) are
//! loaded once from a directory of record files and kept in memory for the
//! lifetime of the [`CatalogStore`]. The [`Router`] turns
//! `courseID[/lessons/lessonID]` paths into lookups against the store and a
//! small [`RouterOutcome`] vocabulary: found, not found, or bad request.
//!
//! # Architecture
//! - **Records** ([`Record`]): one JSON (optionally gzipped) file per course.
//!   Malformed records are skipped at load time, never fatal.
//! - **Catalog** ([`Catalog`]): the immutable load result, indexed by course
//!   id. Summaries and details are two views of the same cached record.
//! - **Store** ([`CatalogStore`]): owns the backing source and a once-guarded
//!   [`Catalog`]; concurrent first queries trigger a single load.
//! - **Router** ([`Router`]): the two-level path grammar on top of the store.

mod catalog;
pub mod error;
pub mod models;
mod record;
pub mod route;
mod store;

pub use crate::catalog::Catalog;
pub use crate::record::Record;
pub use crate::route::{Router, RouterOutcome};
pub use crate::store::CatalogStore;
