//! Integration test support for the `sqltime` column types.
//!
//! Provides database settings, throwaway database provisioning and the
//! Diesel schema the integration tests write to.

pub mod config;
pub mod db;
pub mod schema;
