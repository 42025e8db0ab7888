//! Whole-store JSON backup: export snapshot and destructive restore.

mod backup_model;
mod backup_service;

pub use backup_model::*;
pub use backup_service::*;
