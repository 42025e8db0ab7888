//! Client for the remote auth/access REST API.

pub mod client;
pub mod error;
pub mod session;
pub mod types;

pub use client::ConnectClient;
pub use error::{ApiRetryClass, ConnectError, Result};
pub use session::ConnectSession;
