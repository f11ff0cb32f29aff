//! # Módulo API
//!
//! Rutas HTTP sobre el motor de reservas.
//!
//! ## Módulos principales
//!
//! - [`banquet`] - Turnos, asientos y reservas del banquete
//! - [`service`] - Turnos y reservas de servicios, disponibilidad de insumos
//! - [`reservation`] - Ciclo de vida de reservas existentes
//! - [`identity`] - Identidad reenviada por la pasarela
//! - [`errors`] - Manejo de errores de la aplicación

pub mod banquet;
pub mod errors;
pub mod identity;
pub mod middleware;
pub mod reservation;
pub mod service;

// Re-exportar tipos comunes para facilitar su uso
pub use errors::{AppError, AppResult, ErrorResponse};

use actix_web::{web, HttpResponse};
use chrono::NaiveDate;

use crate::db::models::DATE_FORMAT;
use crate::db::BookingStore;

/// Parsea una fecha en formato YYYY-MM-DD
pub(crate) fn parse_date(fecha: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(fecha.trim(), DATE_FORMAT)
        .map_err(|_| AppError::validation_field("fecha", "Formato de fecha inválido, use YYYY-MM-DD"))
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// Configura todas las rutas de la API para un almacén concreto
///
/// ```no_run
/// use actix_web::{web, App};
/// use dogo_onsen_reservas::{api, db::MemoryRepo};
///
/// let app = App::new().configure(api::init_routes::<MemoryRepo>);
/// ```
pub fn init_routes<S: BookingStore>(cfg: &mut web::ServiceConfig) {
    banquet::routes::<S>(cfg);
    service::routes::<S>(cfg);
    reservation::routes::<S>(cfg);
    cfg.route("/health", web::get().to(health));
}
