//! Database models for the avisos table.
//!
//! Timestamps live in TEXT columns as RFC-3339 strings; conversion happens
//! here at the model boundary. Unreadable legacy values degrade to safe
//! defaults instead of failing the row.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use avisos_core::avisos::{derive_estado, Aviso, ChecklistFechas, Estado};

pub(crate) fn enum_to_db<T: serde::Serialize>(value: &T) -> avisos_core::Result<String> {
    Ok(serde_json::to_string(value)?.trim_matches('"').to_string())
}

pub(crate) fn enum_from_db<T: serde::de::DeserializeOwned>(value: &str) -> avisos_core::Result<T> {
    Ok(serde_json::from_str(&format!("\"{}\"", value))?)
}

pub(crate) fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_optional_datetime(value: Option<&String>) -> Option<DateTime<Utc>> {
    value.and_then(|text| parse_datetime(text))
}

#[derive(
    Queryable,
    Identifiable,
    AsChangeset,
    Selectable,
    Debug,
    Clone,
    Serialize,
    Deserialize,
)]
#[diesel(table_name = crate::schema::avisos)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AvisoDB {
    pub id: i32,
    pub nombre: String,
    pub telefono: String,
    pub motivo: String,
    pub administracion: String,
    pub contacto_admin: String,
    pub estado: String,
    pub fecha_creacion: String,
    pub fecha_actualizacion: String,
    pub mantenimiento: bool,
    pub fecha_visto: Option<String>,
    pub fecha_presupuesto_aceptado: Option<String>,
    pub direccion: String,
    pub detalle_trabajo_realizado: String,
    pub fecha_presupuesto_enviado: Option<String>,
    pub fecha_hecho: Option<String>,
    pub cita_at: Option<String>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::avisos)]
pub struct NewAvisoDB {
    pub nombre: String,
    pub telefono: String,
    pub motivo: String,
    pub administracion: String,
    pub contacto_admin: String,
    pub estado: String,
    pub fecha_creacion: String,
    pub fecha_actualizacion: String,
    pub mantenimiento: bool,
    pub fecha_visto: Option<String>,
    pub fecha_presupuesto_aceptado: Option<String>,
    pub direccion: String,
    pub detalle_trabajo_realizado: String,
    pub fecha_presupuesto_enviado: Option<String>,
    pub fecha_hecho: Option<String>,
    pub cita_at: Option<String>,
}

impl From<AvisoDB> for Aviso {
    fn from(row: AvisoDB) -> Self {
        let fechas = ChecklistFechas {
            visto: parse_optional_datetime(row.fecha_visto.as_ref()),
            presupuesto_enviado: parse_optional_datetime(row.fecha_presupuesto_enviado.as_ref()),
            presupuesto_aceptado: parse_optional_datetime(row.fecha_presupuesto_aceptado.as_ref()),
            hecho: parse_optional_datetime(row.fecha_hecho.as_ref()),
        };
        let estado = enum_from_db::<Estado>(&row.estado).unwrap_or_else(|_| derive_estado(&fechas));

        Aviso {
            id: row.id,
            direccion: row.direccion,
            nombre: row.nombre,
            telefono: row.telefono,
            motivo: row.motivo,
            administracion: row.administracion,
            contacto_admin: row.contacto_admin,
            detalle_trabajo_realizado: row.detalle_trabajo_realizado,
            mantenimiento: row.mantenimiento,
            estado,
            fecha_visto: fechas.visto,
            fecha_presupuesto_enviado: fechas.presupuesto_enviado,
            fecha_presupuesto_aceptado: fechas.presupuesto_aceptado,
            fecha_hecho: fechas.hecho,
            cita_at: parse_optional_datetime(row.cita_at.as_ref()),
            fecha_creacion: parse_datetime(&row.fecha_creacion).unwrap_or_else(Utc::now),
            fecha_actualizacion: parse_datetime(&row.fecha_actualizacion).unwrap_or_else(Utc::now),
        }
    }
}

fn fecha_to_db(value: Option<DateTime<Utc>>) -> Option<String> {
    value.map(|dt| dt.to_rfc3339())
}

impl From<&Aviso> for NewAvisoDB {
    fn from(aviso: &Aviso) -> Self {
        NewAvisoDB {
            nombre: aviso.nombre.clone(),
            telefono: aviso.telefono.clone(),
            motivo: aviso.motivo.clone(),
            administracion: aviso.administracion.clone(),
            contacto_admin: aviso.contacto_admin.clone(),
            estado: enum_to_db(&aviso.estado).unwrap_or_else(|_| "pendiente".to_string()),
            fecha_creacion: aviso.fecha_creacion.to_rfc3339(),
            fecha_actualizacion: aviso.fecha_actualizacion.to_rfc3339(),
            mantenimiento: aviso.mantenimiento,
            fecha_visto: fecha_to_db(aviso.fecha_visto),
            fecha_presupuesto_aceptado: fecha_to_db(aviso.fecha_presupuesto_aceptado),
            direccion: aviso.direccion.clone(),
            detalle_trabajo_realizado: aviso.detalle_trabajo_realizado.clone(),
            fecha_presupuesto_enviado: fecha_to_db(aviso.fecha_presupuesto_enviado),
            fecha_hecho: fecha_to_db(aviso.fecha_hecho),
            cita_at: fecha_to_db(aviso.cita_at),
        }
    }
}

impl From<&Aviso> for AvisoDB {
    fn from(aviso: &Aviso) -> Self {
        AvisoDB {
            id: aviso.id,
            nombre: aviso.nombre.clone(),
            telefono: aviso.telefono.clone(),
            motivo: aviso.motivo.clone(),
            administracion: aviso.administracion.clone(),
            contacto_admin: aviso.contacto_admin.clone(),
            estado: enum_to_db(&aviso.estado).unwrap_or_else(|_| "pendiente".to_string()),
            fecha_creacion: aviso.fecha_creacion.to_rfc3339(),
            fecha_actualizacion: aviso.fecha_actualizacion.to_rfc3339(),
            mantenimiento: aviso.mantenimiento,
            fecha_visto: fecha_to_db(aviso.fecha_visto),
            fecha_presupuesto_aceptado: fecha_to_db(aviso.fecha_presupuesto_aceptado),
            direccion: aviso.direccion.clone(),
            detalle_trabajo_realizado: aviso.detalle_trabajo_realizado.clone(),
            fecha_presupuesto_enviado: fecha_to_db(aviso.fecha_presupuesto_enviado),
            fecha_hecho: fecha_to_db(aviso.fecha_hecho),
            cita_at: fecha_to_db(aviso.cita_at),
        }
    }
}
