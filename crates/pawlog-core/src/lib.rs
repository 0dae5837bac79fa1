//! Core domain + application logic for the pet health diary bot.
//!
//! This crate is intentionally framework-agnostic. Telegram and SQLite live
//! behind adapter crates; the dialog state machines and the summary builder
//! here are pure and unit-testable.

pub mod config;
pub mod dialog;
pub mod domain;
pub mod errors;
pub mod formatting;
pub mod logging;
pub mod storage;
pub mod summary;
pub mod validate;

pub use errors::{Error, Result};
