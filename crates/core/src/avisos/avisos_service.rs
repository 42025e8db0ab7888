use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::debug;

use super::{derive_estado, Aviso, AvisoRepositoryTrait, AvisoUpdate, ChecklistPaso, Estado, NewAviso};
use crate::errors::{Error, Result};

#[async_trait]
pub trait AvisoServiceTrait: Send + Sync {
    async fn create_aviso(&self, new_aviso: NewAviso) -> Result<Aviso>;
    fn get_avisos(&self) -> Result<Vec<Aviso>>;
    fn get_aviso(&self, aviso_id: i32) -> Result<Aviso>;
    async fn update_aviso(&self, aviso_id: i32, changes: AvisoUpdate) -> Result<Aviso>;
    async fn set_checklist(&self, aviso_id: i32, paso: ChecklistPaso, marcado: bool) -> Result<Aviso>;
    async fn delete_aviso(&self, aviso_id: i32) -> Result<()>;
    fn filter_by_estado(&self, estado: Estado) -> Result<Vec<Aviso>>;
    fn count_pendientes(&self) -> Result<i64>;
}

pub struct AvisoService {
    repository: Arc<dyn AvisoRepositoryTrait>,
}

impl AvisoService {
    pub fn new(repository: Arc<dyn AvisoRepositoryTrait>) -> Self {
        Self { repository }
    }

    fn load_existing(&self, aviso_id: i32) -> Result<Aviso> {
        self.repository
            .load_aviso(aviso_id)?
            .ok_or_else(|| Error::NotFound(format!("Aviso {aviso_id}")))
    }

    fn merge_changes(current: &Aviso, changes: &AvisoUpdate) -> Aviso {
        let mut merged = current.clone();

        if let Some(value) = &changes.direccion {
            merged.direccion = value.clone();
        }
        if let Some(value) = &changes.nombre {
            merged.nombre = value.clone();
        }
        if let Some(value) = &changes.telefono {
            merged.telefono = value.clone();
        }
        if let Some(value) = &changes.motivo {
            merged.motivo = value.clone();
        }
        if let Some(value) = &changes.administracion {
            merged.administracion = value.clone();
        }
        if let Some(value) = &changes.contacto_admin {
            merged.contacto_admin = value.clone();
        }
        if let Some(value) = &changes.detalle_trabajo_realizado {
            merged.detalle_trabajo_realizado = value.clone();
        }
        if let Some(value) = changes.mantenimiento {
            merged.mantenimiento = value;
        }
        if let Some(value) = changes.fecha_visto {
            merged.fecha_visto = value;
        }
        if let Some(value) = changes.fecha_presupuesto_enviado {
            merged.fecha_presupuesto_enviado = value;
        }
        if let Some(value) = changes.fecha_presupuesto_aceptado {
            merged.fecha_presupuesto_aceptado = value;
        }
        if let Some(value) = changes.fecha_hecho {
            merged.fecha_hecho = value;
        }
        if let Some(value) = changes.cita_at {
            merged.cita_at = value;
        }

        merged
    }
}

#[async_trait]
impl AvisoServiceTrait for AvisoService {
    async fn create_aviso(&self, new_aviso: NewAviso) -> Result<Aviso> {
        let now = Utc::now();
        let fechas = super::ChecklistFechas {
            visto: new_aviso.fecha_visto,
            presupuesto_enviado: new_aviso.fecha_presupuesto_enviado,
            presupuesto_aceptado: new_aviso.fecha_presupuesto_aceptado,
            hecho: new_aviso.fecha_hecho,
        };

        let aviso = Aviso {
            id: 0,
            direccion: new_aviso.direccion,
            nombre: new_aviso.nombre,
            telefono: new_aviso.telefono,
            motivo: new_aviso.motivo,
            administracion: new_aviso.administracion,
            contacto_admin: new_aviso.contacto_admin,
            detalle_trabajo_realizado: new_aviso.detalle_trabajo_realizado,
            mantenimiento: new_aviso.mantenimiento,
            estado: derive_estado(&fechas),
            fecha_visto: new_aviso.fecha_visto,
            fecha_presupuesto_enviado: new_aviso.fecha_presupuesto_enviado,
            fecha_presupuesto_aceptado: new_aviso.fecha_presupuesto_aceptado,
            fecha_hecho: new_aviso.fecha_hecho,
            cita_at: new_aviso.cita_at,
            fecha_creacion: now,
            fecha_actualizacion: now,
        };

        self.repository.insert_new_aviso(aviso).await
    }

    fn get_avisos(&self) -> Result<Vec<Aviso>> {
        self.repository.load_avisos()
    }

    fn get_aviso(&self, aviso_id: i32) -> Result<Aviso> {
        self.load_existing(aviso_id)
    }

    async fn update_aviso(&self, aviso_id: i32, changes: AvisoUpdate) -> Result<Aviso> {
        let current = self.load_existing(aviso_id)?;

        let mut merged = Self::merge_changes(&current, &changes);
        merged.estado = derive_estado(&merged.checklist());
        merged.fecha_actualizacion = Utc::now();

        self.repository.update_aviso(merged).await
    }

    async fn set_checklist(&self, aviso_id: i32, paso: ChecklistPaso, marcado: bool) -> Result<Aviso> {
        let current = self.load_existing(aviso_id)?;
        let now = Utc::now();

        let mut fechas = current.checklist();
        if marcado {
            fechas.mark(paso, now);
        } else {
            fechas.unmark(paso);
        }

        let mut merged = current;
        merged.set_checklist(fechas);
        merged.estado = derive_estado(&fechas);
        merged.fecha_actualizacion = now;

        self.repository.update_aviso(merged).await
    }

    async fn delete_aviso(&self, aviso_id: i32) -> Result<()> {
        let deleted = self.repository.delete_aviso(aviso_id).await?;
        if deleted == 0 {
            debug!("delete_aviso: id {aviso_id} was already gone");
        }
        Ok(())
    }

    fn filter_by_estado(&self, estado: Estado) -> Result<Vec<Aviso>> {
        self.repository.load_by_estado(estado)
    }

    fn count_pendientes(&self) -> Result<i64> {
        self.repository.count_by_estado(Estado::Pendiente)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory repository mirroring the store contracts.
    #[derive(Default)]
    struct InMemoryAvisoRepository {
        rows: Mutex<HashMap<i32, Aviso>>,
        next_id: Mutex<i32>,
    }

    #[async_trait]
    impl AvisoRepositoryTrait for InMemoryAvisoRepository {
        fn load_avisos(&self) -> Result<Vec<Aviso>> {
            let mut avisos: Vec<Aviso> = self.rows.lock().unwrap().values().cloned().collect();
            avisos.sort_by(|a, b| b.fecha_creacion.cmp(&a.fecha_creacion));
            Ok(avisos)
        }

        fn load_aviso(&self, aviso_id: i32) -> Result<Option<Aviso>> {
            Ok(self.rows.lock().unwrap().get(&aviso_id).cloned())
        }

        fn load_by_estado(&self, estado: Estado) -> Result<Vec<Aviso>> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .values()
                .filter(|a| a.estado == estado)
                .cloned()
                .collect())
        }

        fn count_by_estado(&self, estado: Estado) -> Result<i64> {
            Ok(self.load_by_estado(estado)?.len() as i64)
        }

        async fn insert_new_aviso(&self, mut aviso: Aviso) -> Result<Aviso> {
            let mut next_id = self.next_id.lock().unwrap();
            *next_id += 1;
            aviso.id = *next_id;
            self.rows.lock().unwrap().insert(aviso.id, aviso.clone());
            Ok(aviso)
        }

        async fn update_aviso(&self, aviso: Aviso) -> Result<Aviso> {
            let mut rows = self.rows.lock().unwrap();
            if !rows.contains_key(&aviso.id) {
                return Err(Error::NotFound(format!("Aviso {}", aviso.id)));
            }
            rows.insert(aviso.id, aviso.clone());
            Ok(aviso)
        }

        async fn delete_aviso(&self, aviso_id: i32) -> Result<usize> {
            Ok(self.rows.lock().unwrap().remove(&aviso_id).map_or(0, |_| 1))
        }

        async fn replace_all(&self, avisos: Vec<Aviso>) -> Result<usize> {
            let mut rows = self.rows.lock().unwrap();
            rows.clear();
            let count = avisos.len();
            for aviso in avisos {
                let mut next_id = self.next_id.lock().unwrap();
                *next_id += 1;
                let mut stored = aviso;
                stored.id = *next_id;
                rows.insert(stored.id, stored);
            }
            Ok(count)
        }
    }

    fn service() -> AvisoService {
        AvisoService::new(Arc::new(InMemoryAvisoRepository::default()))
    }

    #[tokio::test]
    async fn create_fills_defaults_and_derives_estado() {
        let service = service();
        let created = service
            .create_aviso(NewAviso {
                direccion: "Av. del Puerto 3".to_string(),
                ..Default::default()
            })
            .await
            .expect("create");

        assert!(created.id > 0);
        assert_eq!(created.estado, Estado::Pendiente);
        assert_eq!(created.nombre, "");
        assert!(!created.mantenimiento);
        assert_eq!(created.fecha_creacion, created.fecha_actualizacion);
    }

    #[tokio::test]
    async fn create_with_checklist_dates_derives_estado() {
        let service = service();
        let created = service
            .create_aviso(NewAviso {
                direccion: "Plaza Nueva 1".to_string(),
                fecha_visto: Some(Utc::now()),
                ..Default::default()
            })
            .await
            .expect("create");

        assert_eq!(created.estado, Estado::Visto);
    }

    #[tokio::test]
    async fn update_rederives_estado_from_merged_timestamps() {
        let service = service();
        let created = service
            .create_aviso(NewAviso {
                direccion: "Calle Luna 8".to_string(),
                ..Default::default()
            })
            .await
            .expect("create");

        let updated = service
            .update_aviso(
                created.id,
                AvisoUpdate {
                    fecha_hecho: Some(Some(Utc::now())),
                    ..Default::default()
                },
            )
            .await
            .expect("update");

        assert_eq!(updated.estado, Estado::Hecho);

        let cleared = service
            .update_aviso(
                created.id,
                AvisoUpdate {
                    fecha_hecho: Some(None),
                    ..Default::default()
                },
            )
            .await
            .expect("update");

        assert_eq!(cleared.estado, Estado::Pendiente);
        assert_eq!(cleared.fecha_hecho, None);
    }

    #[tokio::test]
    async fn update_missing_id_is_not_found() {
        let service = service();
        let result = service.update_aviso(99, AvisoUpdate::default()).await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn set_checklist_hecho_backfills_all_steps() {
        let service = service();
        let created = service
            .create_aviso(NewAviso {
                direccion: "Camino Real 21".to_string(),
                ..Default::default()
            })
            .await
            .expect("create");

        let marked = service
            .set_checklist(created.id, ChecklistPaso::Hecho, true)
            .await
            .expect("mark hecho");

        assert_eq!(marked.estado, Estado::Hecho);
        assert!(marked.fecha_visto.is_some());
        assert!(marked.fecha_presupuesto_enviado.is_some());
        assert!(marked.fecha_presupuesto_aceptado.is_some());
        assert_eq!(marked.fecha_visto, marked.fecha_hecho);
    }

    #[tokio::test]
    async fn unmarking_visto_clears_later_steps() {
        let service = service();
        let created = service
            .create_aviso(NewAviso {
                direccion: "Travesía Sur 5".to_string(),
                ..Default::default()
            })
            .await
            .expect("create");

        service
            .set_checklist(created.id, ChecklistPaso::Hecho, true)
            .await
            .expect("mark hecho");
        let cleared = service
            .set_checklist(created.id, ChecklistPaso::Visto, false)
            .await
            .expect("unmark visto");

        assert_eq!(cleared.estado, Estado::Pendiente);
        assert_eq!(cleared.fecha_visto, None);
        assert_eq!(cleared.fecha_presupuesto_enviado, None);
        assert_eq!(cleared.fecha_presupuesto_aceptado, None);
        assert_eq!(cleared.fecha_hecho, None);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let service = service();
        let created = service
            .create_aviso(NewAviso::default())
            .await
            .expect("create");

        service.delete_aviso(created.id).await.expect("first delete");
        service.delete_aviso(created.id).await.expect("second delete");
    }

    #[tokio::test]
    async fn count_pendientes_tracks_stored_estado() {
        let service = service();
        for _ in 0..3 {
            service
                .create_aviso(NewAviso::default())
                .await
                .expect("create");
        }
        let avisos = service.get_avisos().expect("load");
        service
            .set_checklist(avisos[0].id, ChecklistPaso::Hecho, true)
            .await
            .expect("mark hecho");

        assert_eq!(service.count_pendientes().expect("count"), 2);
    }
}
