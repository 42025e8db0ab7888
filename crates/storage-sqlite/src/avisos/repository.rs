//! Repository for Aviso persistence.

use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;

use avisos_core::avisos::{Aviso, AvisoRepositoryTrait, Estado};
use avisos_core::errors::{Error, Result};

use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::avisos;
use crate::schema::avisos::dsl::*;

use super::model::{enum_to_db, AvisoDB, NewAvisoDB};

pub struct AvisoRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl AvisoRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        AvisoRepository { pool, writer }
    }

    fn load_avisos_impl(&self) -> Result<Vec<Aviso>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = avisos
            .order(fecha_creacion.desc())
            .select(AvisoDB::as_select())
            .load::<AvisoDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Aviso::from).collect())
    }

    fn load_aviso_impl(&self, aviso_id: i32) -> Result<Option<Aviso>> {
        let mut conn = get_connection(&self.pool)?;
        let row = avisos
            .find(aviso_id)
            .select(AvisoDB::as_select())
            .first::<AvisoDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(row.map(Aviso::from))
    }
}

#[async_trait]
impl AvisoRepositoryTrait for AvisoRepository {
    fn load_avisos(&self) -> Result<Vec<Aviso>> {
        self.load_avisos_impl()
    }

    fn load_aviso(&self, aviso_id: i32) -> Result<Option<Aviso>> {
        self.load_aviso_impl(aviso_id)
    }

    fn load_by_estado(&self, estado_value: Estado) -> Result<Vec<Aviso>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = avisos
            .filter(estado.eq(enum_to_db(&estado_value)?))
            .order(fecha_creacion.desc())
            .select(AvisoDB::as_select())
            .load::<AvisoDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Aviso::from).collect())
    }

    fn count_by_estado(&self, estado_value: Estado) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        let total = avisos
            .filter(estado.eq(enum_to_db(&estado_value)?))
            .count()
            .get_result::<i64>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(total)
    }

    async fn insert_new_aviso(&self, aviso: Aviso) -> Result<Aviso> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Aviso> {
                let new_row = NewAvisoDB::from(&aviso);
                let row = diesel::insert_into(avisos::table)
                    .values(&new_row)
                    .returning(AvisoDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(Aviso::from(row))
            })
            .await
    }

    async fn update_aviso(&self, aviso: Aviso) -> Result<Aviso> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Aviso> {
                let row = AvisoDB::from(&aviso);
                let affected = diesel::update(avisos.find(aviso.id))
                    .set(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                if affected == 0 {
                    return Err(Error::NotFound(format!("Aviso {}", aviso.id)));
                }

                let stored = avisos
                    .find(aviso.id)
                    .select(AvisoDB::as_select())
                    .first::<AvisoDB>(conn)
                    .map_err(StorageError::from)?;
                Ok(Aviso::from(stored))
            })
            .await
    }

    async fn delete_aviso(&self, aviso_id: i32) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let affected = diesel::delete(avisos.find(aviso_id))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(affected)
            })
            .await
    }

    async fn replace_all(&self, records: Vec<Aviso>) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                diesel::delete(avisos::table)
                    .execute(conn)
                    .map_err(StorageError::from)?;

                if records.is_empty() {
                    return Ok(0);
                }

                let rows = records.iter().map(NewAvisoDB::from).collect::<Vec<_>>();
                diesel::insert_into(avisos::table)
                    .values(&rows)
                    .execute(conn)
                    .map_err(StorageError::from)?;

                Ok(rows.len())
            })
            .await
    }
}
