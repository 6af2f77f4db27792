pub mod auth;
pub mod cafes;
pub mod pages;
