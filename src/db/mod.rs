//! Database module: models, write payloads, and schema for persistent storage.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `ops.rs`: insert/replace payloads built from validated forms
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `actor.rs`: the actor owning the SQLite pool, plus its RPC handle

pub mod actor;
pub mod models;
pub mod ops;
pub mod schema;

pub use models::{DbCafe, DbUser};
pub use ops::{CafeUpsert, UserCreate};
pub use schema::SQLITE_INIT;

pub use actor::{DbHandle, spawn};
