pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod forms;
pub mod server;

pub use error::AppError;
