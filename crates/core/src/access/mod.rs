//! Remote access-window domain model.

mod access_model;

pub use access_model::*;
