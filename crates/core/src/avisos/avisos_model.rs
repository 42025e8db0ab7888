//! Aviso domain model: record shape, lifecycle status and checklist rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of an Aviso.
///
/// Derived from the checklist timestamps, never set directly by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Estado {
    #[default]
    Pendiente,
    Visto,
    PresupuestoEnviado,
    PresupuestoAceptado,
    Hecho,
}

/// Checklist steps in lifecycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChecklistPaso {
    Visto,
    PresupuestoEnviado,
    PresupuestoAceptado,
    Hecho,
}

impl ChecklistPaso {
    pub const ALL: [ChecklistPaso; 4] = [
        ChecklistPaso::Visto,
        ChecklistPaso::PresupuestoEnviado,
        ChecklistPaso::PresupuestoAceptado,
        ChecklistPaso::Hecho,
    ];
}

/// The four optional checklist timestamps of an Aviso.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChecklistFechas {
    pub visto: Option<DateTime<Utc>>,
    pub presupuesto_enviado: Option<DateTime<Utc>>,
    pub presupuesto_aceptado: Option<DateTime<Utc>>,
    pub hecho: Option<DateTime<Utc>>,
}

impl ChecklistFechas {
    pub fn get(&self, paso: ChecklistPaso) -> Option<DateTime<Utc>> {
        match paso {
            ChecklistPaso::Visto => self.visto,
            ChecklistPaso::PresupuestoEnviado => self.presupuesto_enviado,
            ChecklistPaso::PresupuestoAceptado => self.presupuesto_aceptado,
            ChecklistPaso::Hecho => self.hecho,
        }
    }

    fn set(&mut self, paso: ChecklistPaso, value: Option<DateTime<Utc>>) {
        match paso {
            ChecklistPaso::Visto => self.visto = value,
            ChecklistPaso::PresupuestoEnviado => self.presupuesto_enviado = value,
            ChecklistPaso::PresupuestoAceptado => self.presupuesto_aceptado = value,
            ChecklistPaso::Hecho => self.hecho = value,
        }
    }

    /// Marks a step at `now`, backfilling any unset earlier step with the
    /// same timestamp.
    pub fn mark(&mut self, paso: ChecklistPaso, now: DateTime<Utc>) {
        for earlier in ChecklistPaso::ALL.into_iter().filter(|p| *p < paso) {
            if self.get(earlier).is_none() {
                self.set(earlier, Some(now));
            }
        }
        self.set(paso, Some(now));
    }

    /// Clears a step together with every later step.
    pub fn unmark(&mut self, paso: ChecklistPaso) {
        for later in ChecklistPaso::ALL.into_iter().filter(|p| *p >= paso) {
            self.set(later, None);
        }
    }
}

/// Derives the lifecycle status from the checklist timestamps.
///
/// Priority order: hecho > presupuesto_aceptado > presupuesto_enviado > visto;
/// a record with no step marked is pendiente.
pub fn derive_estado(fechas: &ChecklistFechas) -> Estado {
    if fechas.hecho.is_some() {
        return Estado::Hecho;
    }
    if fechas.presupuesto_aceptado.is_some() {
        return Estado::PresupuestoAceptado;
    }
    if fechas.presupuesto_enviado.is_some() {
        return Estado::PresupuestoEnviado;
    }
    if fechas.visto.is_some() {
        return Estado::Visto;
    }
    Estado::Pendiente
}

/// A logged service request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aviso {
    pub id: i32,

    /// Primary descriptive field (address/community).
    pub direccion: String,

    pub nombre: String,
    pub telefono: String,
    pub motivo: String,
    pub administracion: String,
    pub contacto_admin: String,
    pub detalle_trabajo_realizado: String,

    /// Simplified recurring-maintenance record.
    pub mantenimiento: bool,

    pub estado: Estado,

    pub fecha_visto: Option<DateTime<Utc>>,
    pub fecha_presupuesto_enviado: Option<DateTime<Utc>>,
    pub fecha_presupuesto_aceptado: Option<DateTime<Utc>>,
    pub fecha_hecho: Option<DateTime<Utc>>,

    /// Scheduled visit, set manually.
    pub cita_at: Option<DateTime<Utc>>,

    pub fecha_creacion: DateTime<Utc>,
    pub fecha_actualizacion: DateTime<Utc>,
}

impl Aviso {
    pub fn checklist(&self) -> ChecklistFechas {
        ChecklistFechas {
            visto: self.fecha_visto,
            presupuesto_enviado: self.fecha_presupuesto_enviado,
            presupuesto_aceptado: self.fecha_presupuesto_aceptado,
            hecho: self.fecha_hecho,
        }
    }

    pub fn set_checklist(&mut self, fechas: ChecklistFechas) {
        self.fecha_visto = fechas.visto;
        self.fecha_presupuesto_enviado = fechas.presupuesto_enviado;
        self.fecha_presupuesto_aceptado = fechas.presupuesto_aceptado;
        self.fecha_hecho = fechas.hecho;
    }
}

/// Input for creating an Aviso. Every field is optional on the wire; absent
/// fields take their defaults (empty string / false / none).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewAviso {
    pub direccion: String,
    pub nombre: String,
    pub telefono: String,
    pub motivo: String,
    pub administracion: String,
    pub contacto_admin: String,
    pub detalle_trabajo_realizado: String,
    pub mantenimiento: bool,
    pub fecha_visto: Option<DateTime<Utc>>,
    pub fecha_presupuesto_enviado: Option<DateTime<Utc>>,
    pub fecha_presupuesto_aceptado: Option<DateTime<Utc>>,
    pub fecha_hecho: Option<DateTime<Utc>>,
    pub cita_at: Option<DateTime<Utc>>,
}

/// Partial update for an Aviso.
///
/// Outer `None` leaves a field untouched. For the nullable timestamps,
/// `Some(None)` clears the stored value.
#[derive(Debug, Clone, Default)]
pub struct AvisoUpdate {
    pub direccion: Option<String>,
    pub nombre: Option<String>,
    pub telefono: Option<String>,
    pub motivo: Option<String>,
    pub administracion: Option<String>,
    pub contacto_admin: Option<String>,
    pub detalle_trabajo_realizado: Option<String>,
    pub mantenimiento: Option<bool>,
    pub fecha_visto: Option<Option<DateTime<Utc>>>,
    pub fecha_presupuesto_enviado: Option<Option<DateTime<Utc>>>,
    pub fecha_presupuesto_aceptado: Option<Option<DateTime<Utc>>>,
    pub fecha_hecho: Option<Option<DateTime<Utc>>>,
    pub cita_at: Option<Option<DateTime<Utc>>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn estado_defaults_to_pendiente() {
        assert_eq!(derive_estado(&ChecklistFechas::default()), Estado::Pendiente);
    }

    #[test]
    fn estado_priority_order() {
        let mut fechas = ChecklistFechas {
            visto: Some(ts(1)),
            ..Default::default()
        };
        assert_eq!(derive_estado(&fechas), Estado::Visto);

        fechas.presupuesto_enviado = Some(ts(2));
        assert_eq!(derive_estado(&fechas), Estado::PresupuestoEnviado);

        fechas.presupuesto_aceptado = Some(ts(3));
        assert_eq!(derive_estado(&fechas), Estado::PresupuestoAceptado);

        fechas.hecho = Some(ts(4));
        assert_eq!(derive_estado(&fechas), Estado::Hecho);
    }

    #[test]
    fn estado_ignores_gaps_in_earlier_steps() {
        let fechas = ChecklistFechas {
            hecho: Some(ts(9)),
            ..Default::default()
        };
        assert_eq!(derive_estado(&fechas), Estado::Hecho);
    }

    #[test]
    fn marking_hecho_backfills_every_earlier_step() {
        let mut fechas = ChecklistFechas::default();
        fechas.mark(ChecklistPaso::Hecho, ts(100));

        assert_eq!(fechas.visto, Some(ts(100)));
        assert_eq!(fechas.presupuesto_enviado, Some(ts(100)));
        assert_eq!(fechas.presupuesto_aceptado, Some(ts(100)));
        assert_eq!(fechas.hecho, Some(ts(100)));
        assert_eq!(derive_estado(&fechas), Estado::Hecho);
    }

    #[test]
    fn marking_keeps_existing_earlier_timestamps() {
        let mut fechas = ChecklistFechas {
            visto: Some(ts(10)),
            ..Default::default()
        };
        fechas.mark(ChecklistPaso::PresupuestoAceptado, ts(50));

        assert_eq!(fechas.visto, Some(ts(10)));
        assert_eq!(fechas.presupuesto_enviado, Some(ts(50)));
        assert_eq!(fechas.presupuesto_aceptado, Some(ts(50)));
        assert_eq!(fechas.hecho, None);
    }

    #[test]
    fn unmarking_visto_clears_all_later_steps() {
        let mut fechas = ChecklistFechas::default();
        fechas.mark(ChecklistPaso::Hecho, ts(100));
        fechas.unmark(ChecklistPaso::Visto);

        assert_eq!(fechas, ChecklistFechas::default());
        assert_eq!(derive_estado(&fechas), Estado::Pendiente);
    }

    #[test]
    fn unmarking_middle_step_keeps_earlier_ones() {
        let mut fechas = ChecklistFechas::default();
        fechas.mark(ChecklistPaso::Hecho, ts(100));
        fechas.unmark(ChecklistPaso::PresupuestoAceptado);

        assert_eq!(fechas.visto, Some(ts(100)));
        assert_eq!(fechas.presupuesto_enviado, Some(ts(100)));
        assert_eq!(fechas.presupuesto_aceptado, None);
        assert_eq!(fechas.hecho, None);
        assert_eq!(derive_estado(&fechas), Estado::PresupuestoEnviado);
    }

    #[test]
    fn estado_serializes_snake_case() {
        let actual = [
            Estado::Pendiente,
            Estado::Visto,
            Estado::PresupuestoEnviado,
            Estado::PresupuestoAceptado,
            Estado::Hecho,
        ]
        .iter()
        .map(|estado| serde_json::to_string(estado).expect("serialize estado"))
        .collect::<Vec<_>>();

        let expected = vec![
            "\"pendiente\"",
            "\"visto\"",
            "\"presupuesto_enviado\"",
            "\"presupuesto_aceptado\"",
            "\"hecho\"",
        ];

        assert_eq!(actual, expected);
    }

    #[test]
    fn aviso_serializes_camel_case_fields() {
        let aviso = Aviso {
            id: 1,
            direccion: "Calle Mayor 12".to_string(),
            nombre: String::new(),
            telefono: String::new(),
            motivo: String::new(),
            administracion: String::new(),
            contacto_admin: String::new(),
            detalle_trabajo_realizado: String::new(),
            mantenimiento: false,
            estado: Estado::Pendiente,
            fecha_visto: None,
            fecha_presupuesto_enviado: None,
            fecha_presupuesto_aceptado: None,
            fecha_hecho: None,
            cita_at: None,
            fecha_creacion: ts(0),
            fecha_actualizacion: ts(0),
        };

        let json = serde_json::to_value(&aviso).expect("serialize aviso");
        assert!(json.get("contactoAdmin").is_some());
        assert!(json.get("detalleTrabajoRealizado").is_some());
        assert!(json.get("fechaVisto").is_some());
        assert!(json.get("citaAt").is_some());
        assert_eq!(json["estado"], "pendiente");
    }
}
