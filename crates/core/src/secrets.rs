//! Pluggable secret persistence, used for the remote-API auth token.

use async_trait::async_trait;

use crate::errors::Result;

/// Key-value secret storage. Reads are synchronous; writes go through the
/// owning store's serialized write path.
#[async_trait]
pub trait SecretStore: Send + Sync {
    fn get_secret(&self, key: &str) -> Result<Option<String>>;

    async fn set_secret(&self, key: &str, value: &str) -> Result<()>;

    async fn delete_secret(&self, key: &str) -> Result<()>;
}
