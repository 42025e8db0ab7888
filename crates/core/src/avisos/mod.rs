//! Aviso domain models and services.

mod avisos_model;
mod avisos_service;
mod avisos_traits;

pub use avisos_model::*;
pub use avisos_service::*;
pub use avisos_traits::*;
