//! Backup document model and defensive record normalization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::avisos::{derive_estado, Aviso, ChecklistFechas};

/// Current backup document generation. Matches the store schema generation.
pub const BACKUP_VERSION: i32 = 3;

/// Whole-store snapshot, serialized with camelCase fields and RFC-3339 dates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupPayload {
    pub version: i32,
    pub fecha: DateTime<Utc>,
    pub avisos: Vec<Aviso>,
}

/// Parses a date-like JSON value. Strings must be RFC-3339; numbers are taken
/// as epoch milliseconds. Anything unparsable is treated as absent.
pub fn parse_fecha(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(text) => DateTime::parse_from_rfc3339(text)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Number(number) => number
            .as_i64()
            .and_then(|millis| DateTime::from_timestamp_millis(millis)),
        _ => None,
    }
}

fn field_str(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn field_fecha(value: &Value, key: &str) -> Option<DateTime<Utc>> {
    value.get(key).and_then(parse_fecha)
}

/// Builds a well-formed Aviso out of arbitrary JSON, substituting defaults
/// for anything missing or malformed and re-deriving the estado. The id is
/// left at zero; the store reassigns it on insert.
pub fn normalize_aviso(value: &Value, now: DateTime<Utc>) -> Aviso {
    let fechas = ChecklistFechas {
        visto: field_fecha(value, "fechaVisto"),
        presupuesto_enviado: field_fecha(value, "fechaPresupuestoEnviado"),
        presupuesto_aceptado: field_fecha(value, "fechaPresupuestoAceptado"),
        hecho: field_fecha(value, "fechaHecho"),
    };

    Aviso {
        id: 0,
        direccion: field_str(value, "direccion"),
        nombre: field_str(value, "nombre"),
        telefono: field_str(value, "telefono"),
        motivo: field_str(value, "motivo"),
        administracion: field_str(value, "administracion"),
        contacto_admin: field_str(value, "contactoAdmin"),
        detalle_trabajo_realizado: field_str(value, "detalleTrabajoRealizado"),
        mantenimiento: value
            .get("mantenimiento")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        estado: derive_estado(&fechas),
        fecha_visto: fechas.visto,
        fecha_presupuesto_enviado: fechas.presupuesto_enviado,
        fecha_presupuesto_aceptado: fechas.presupuesto_aceptado,
        fecha_hecho: fechas.hecho,
        cita_at: field_fecha(value, "citaAt"),
        fecha_creacion: field_fecha(value, "fechaCreacion").unwrap_or(now),
        fecha_actualizacion: field_fecha(value, "fechaActualizacion").unwrap_or(now),
    }
}

/// Extracts and normalizes the record list of an import document. A missing
/// or non-array `avisos` field yields zero records rather than an error.
pub fn normalize_payload(payload: &Value, now: DateTime<Utc>) -> Vec<Aviso> {
    payload
        .get("avisos")
        .and_then(Value::as_array)
        .map(|items| items.iter().map(|item| normalize_aviso(item, now)).collect())
        .unwrap_or_default()
}
