//! Cutover migration of legacy space exports into the classification-based
//! space model: classification bootstrap, space updates, and (opt-in)
//! occupation import.

pub mod access;
pub mod audit;
pub mod blueprint;
pub mod classification;
pub mod config;
pub mod db;
pub mod error;
pub mod legacy;
pub mod metadata;
pub mod migration;
pub mod occupations;
pub mod oid;
pub mod recurrence;
pub mod spaces;

pub use error::{MigrationError, Result};
