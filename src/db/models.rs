//! Registros persistidos del onsen.
//!
//! Los constructores aplican los invariantes del modelo; los documentos leídos
//! del almacén se consideran válidos porque solo se escriben a través de ellos.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::{AppError, AppResult};

/// Asientos fijos por mesa de banquete
pub const SEATS_PER_TABLE: i32 = 6;

/// Formato de fecha almacenado en las reservas
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Servicio {
    #[serde(rename = "_id")]
    pub id: String,
    pub nombre: String,
    pub costo: i64, // EILT
    pub descripcion: String,
    pub imagen: String,
    pub calificacion: f64,
    #[serde(default = "default_capacity")]
    pub capacidad_por_turno: i32,
    #[serde(default)]
    pub duracion_minutos: Option<i64>,
}

fn default_capacity() -> i32 {
    1
}

impl Servicio {
    pub fn new(id: &str, nombre: &str, costo: i64) -> AppResult<Self> {
        if id.trim().is_empty() {
            return Err(AppError::validation_field("id", "El identificador es requerido"));
        }
        if costo < 0 {
            return Err(AppError::validation_field("costo", "El costo no puede ser negativo"));
        }
        Ok(Servicio {
            id: id.to_string(),
            nombre: nombre.to_string(),
            costo,
            descripcion: String::new(),
            imagen: String::new(),
            calificacion: 0.0,
            capacidad_por_turno: default_capacity(),
            duracion_minutos: None,
        })
    }

    pub fn with_capacity(mut self, capacidad: i32) -> AppResult<Self> {
        if capacidad < 1 {
            return Err(AppError::validation_field(
                "capacidad_por_turno",
                "La capacidad por turno debe ser al menos 1",
            ));
        }
        self.capacidad_por_turno = capacidad;
        Ok(self)
    }

    pub fn with_duration(mut self, minutos: i64) -> AppResult<Self> {
        if minutos <= 0 {
            return Err(AppError::validation_field(
                "duracion_minutos",
                "La duración debe ser positiva",
            ));
        }
        self.duracion_minutos = Some(minutos);
        Ok(self)
    }
}

/// Estancia de un espíritu en el onsen
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Cuenta {
    #[serde(rename = "_id")]
    pub id: String,
    pub id_espiritu: String,
    pub id_habitacion: String,
    pub saldo: i64, // EILT
    pub inicio_estancia: NaiveDateTime,
    pub fin_estancia: NaiveDateTime,
    pub pin: String,
}

impl Cuenta {
    pub fn new(
        id: &str,
        id_espiritu: &str,
        id_habitacion: &str,
        saldo: i64,
        inicio_estancia: NaiveDateTime,
        fin_estancia: NaiveDateTime,
    ) -> AppResult<Self> {
        if saldo < 0 {
            return Err(AppError::validation_field("saldo", "El saldo no puede ser negativo"));
        }
        if fin_estancia <= inicio_estancia {
            return Err(AppError::validation_field(
                "fin_estancia",
                "La estancia debe terminar después de comenzar",
            ));
        }
        Ok(Cuenta {
            id: id.to_string(),
            id_espiritu: id_espiritu.to_string(),
            id_habitacion: id_habitacion.to_string(),
            saldo,
            inicio_estancia,
            fin_estancia,
            pin: String::new(),
        })
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Asiento {
    pub id_mesa: i32,
    pub numero: i32,
    pub items_consumidos: i32,
}

/// Mesa de banquete. La ocupación no se guarda aquí: se deriva de las reservas.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Mesa {
    #[serde(rename = "_id")]
    pub id: i32,
    pub capacidad: i32,
    pub asientos: Vec<Asiento>,
    pub activa: bool,
}

impl Mesa {
    pub fn new(id: i32, activa: bool) -> Self {
        let asientos = (1..=SEATS_PER_TABLE)
            .map(|numero| Asiento {
                id_mesa: id,
                numero,
                items_consumidos: 0,
            })
            .collect();
        Mesa {
            id,
            capacidad: SEATS_PER_TABLE,
            asientos,
            activa,
        }
    }

    pub fn has_seat(&self, numero: i32) -> bool {
        self.asientos.iter().any(|asiento| asiento.numero == numero)
    }
}

/// Reserva de un asiento de banquete o de un turno de servicio
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Reserva {
    #[serde(rename = "_id")]
    pub id: String,
    pub id_cuenta: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_servicio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_mesa: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numero_asiento: Option<i32>,
    /// Unidad de capacidad ocupada dentro del turno de un servicio (0..capacidad)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cupo: Option<i32>,
    pub fecha: String,
    pub hora: String,
    pub inicio: NaiveDateTime,
    pub fin: NaiveDateTime,
    pub canjeada: bool,
    #[serde(default)]
    pub calificacion: Option<i32>,
    pub creada_en: i64, // timestamp unix
}

impl Reserva {
    /// Reserva de un asiento de banquete
    pub fn banquete(
        id_cuenta: &str,
        id_mesa: i32,
        numero_asiento: i32,
        fecha: NaiveDate,
        hora: &str,
        inicio: NaiveDateTime,
        duracion: Duration,
    ) -> AppResult<Self> {
        let mut reserva = Self::build(id_cuenta, fecha, hora, inicio, duracion)?;
        reserva.id_mesa = Some(id_mesa);
        reserva.numero_asiento = Some(numero_asiento);
        Ok(reserva)
    }

    /// Reserva de un turno de servicio general
    pub fn servicio(
        id_cuenta: &str,
        id_servicio: &str,
        fecha: NaiveDate,
        hora: &str,
        inicio: NaiveDateTime,
        duracion: Duration,
    ) -> AppResult<Self> {
        let mut reserva = Self::build(id_cuenta, fecha, hora, inicio, duracion)?;
        reserva.id_servicio = Some(id_servicio.to_string());
        Ok(reserva)
    }

    fn build(
        id_cuenta: &str,
        fecha: NaiveDate,
        hora: &str,
        inicio: NaiveDateTime,
        duracion: Duration,
    ) -> AppResult<Self> {
        let fin = inicio + duracion;
        if fin <= inicio {
            return Err(AppError::validation_field(
                "fin",
                "La reserva debe terminar después de comenzar",
            ));
        }
        Ok(Reserva {
            id: Uuid::new_v4().to_string(),
            id_cuenta: id_cuenta.to_string(),
            id_servicio: None,
            id_mesa: None,
            numero_asiento: None,
            cupo: None,
            fecha: fecha.format(DATE_FORMAT).to_string(),
            hora: hora.to_string(),
            inicio,
            fin,
            canjeada: false,
            calificacion: None,
            creada_en: chrono::Utc::now().timestamp(),
        })
    }

    pub fn is_banquet(&self) -> bool {
        self.id_mesa.is_some()
    }

    /// La reserva se puede canjear solo dentro de su ventana
    pub fn check_redeemable(&self, now: NaiveDateTime) -> AppResult<()> {
        if self.canjeada {
            return Err(AppError::Conflict("La reserva ya fue canjeada".to_string()));
        }
        if now < self.inicio || now >= self.fin {
            return Err(AppError::validation_field(
                "hora",
                "La reserva solo se puede canjear dentro de su horario",
            ));
        }
        Ok(())
    }

    /// Solo se califica una reserva canjeada, con nota de 1 a 5
    pub fn check_rateable(&self, calificacion: i32) -> AppResult<()> {
        if !(1..=5).contains(&calificacion) {
            return Err(AppError::validation_field(
                "calificacion",
                "La calificación debe estar entre 1 y 5",
            ));
        }
        if !self.canjeada {
            return Err(AppError::validation_field(
                "calificacion",
                "Solo se pueden calificar reservas canjeadas",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Insumo {
    #[serde(rename = "_id")]
    pub id: String,
    pub nombre: String,
    pub unidad: String,
    pub cantidad: i64,
}

impl Insumo {
    pub fn new(id: &str, nombre: &str, unidad: &str, cantidad: i64) -> AppResult<Self> {
        if cantidad < 0 {
            return Err(AppError::validation_field("cantidad", "El stock no puede ser negativo"));
        }
        Ok(Insumo {
            id: id.to_string(),
            nombre: nombre.to_string(),
            unidad: unidad.to_string(),
            cantidad,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RequisitoInsumo {
    pub id_insumo: String,
    pub cantidad: i64,
}

impl RequisitoInsumo {
    pub fn new(id_insumo: &str, cantidad: i64) -> AppResult<Self> {
        if cantidad <= 0 {
            return Err(AppError::validation_field(
                "cantidad",
                "La cantidad requerida debe ser mayor a 0",
            ));
        }
        Ok(RequisitoInsumo {
            id_insumo: id_insumo.to_string(),
            cantidad,
        })
    }
}

/// Insumos que consume un servicio, indexados por la clave del servicio
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RequisitosServicio {
    #[serde(rename = "_id")]
    pub id_servicio: String,
    pub insumos: Vec<RequisitoInsumo>,
}
