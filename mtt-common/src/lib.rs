//! # MTT Common Library
//!
//! Shared code for the Mouse Training Tracker services including:
//! - Training document model (mice, steps, daily records, display order)
//! - Document store (single JSON file, default initialization, backup)
//! - Session gate (shared-secret login with 24-hour expiry)
//! - Spreadsheet import pipeline (row classification and document seeding)
//! - Configuration resolution

pub mod config;
pub mod error;
pub mod import;
pub mod model;
pub mod session;
pub mod store;

pub use error::{Error, Result};
pub use model::TrainingDocument;
