//! # owr Common Library
//!
//! Shared code for the owr weather monitor:
//! - Database bootstrap, record types and queries
//! - Configuration loading
//! - Timestamp utilities

pub mod config;
pub mod db;
pub mod error;
pub mod time;

pub use error::{Error, Result};
