//! Repository contract for Aviso persistence.

use async_trait::async_trait;

use super::{Aviso, Estado};
use crate::errors::Result;

#[async_trait]
pub trait AvisoRepositoryTrait: Send + Sync {
    /// All records, newest `fecha_creacion` first.
    fn load_avisos(&self) -> Result<Vec<Aviso>>;

    fn load_aviso(&self, aviso_id: i32) -> Result<Option<Aviso>>;

    /// Records whose stored estado equals the argument.
    fn load_by_estado(&self, estado: Estado) -> Result<Vec<Aviso>>;

    fn count_by_estado(&self, estado: Estado) -> Result<i64>;

    /// Inserts a fully-normalized record; the id field is ignored and
    /// reassigned by the store.
    async fn insert_new_aviso(&self, aviso: Aviso) -> Result<Aviso>;

    /// Persists the full merged row. NotFound when the id does not exist.
    async fn update_aviso(&self, aviso: Aviso) -> Result<Aviso>;

    /// Removes a record. Deleting a missing id is not an error.
    async fn delete_aviso(&self, aviso_id: i32) -> Result<usize>;

    /// Destructive restore: clears the store, then bulk-inserts the given
    /// records in one transaction.
    async fn replace_all(&self, avisos: Vec<Aviso>) -> Result<usize>;
}
