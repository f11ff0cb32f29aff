//! # API de Reservas
//!
//! Consulta y ciclo de vida de reservas ya confirmadas:
//! - Listar las reservas de una cuenta
//! - Cancelar antes del canje
//! - Canjear dentro del horario
//! - Calificar una reserva canjeada
//!
//! Todas las rutas requieren identidad de la pasarela.

use actix_web::{web, HttpRequest, HttpResponse};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::identity::{authorize_account, extract_identity};
use super::{AppError, AppResult};
use crate::booking::BookingEngine;
use crate::db::{BookingStore, Reserva};

/// Reserva tal como se envía al frontend
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ReservationResponse {
    pub id: String,
    pub id_cuenta: String,
    pub id_servicio: Option<String>,
    pub id_mesa: Option<i32>,
    pub numero_asiento: Option<i32>,
    pub fecha: String,
    pub hora: String,
    pub inicio: NaiveDateTime,
    pub fin: NaiveDateTime,
    pub canjeada: bool,
    pub calificacion: Option<i32>,
}

impl From<Reserva> for ReservationResponse {
    fn from(reserva: Reserva) -> Self {
        ReservationResponse {
            id: reserva.id,
            id_cuenta: reserva.id_cuenta,
            id_servicio: reserva.id_servicio,
            id_mesa: reserva.id_mesa,
            numero_asiento: reserva.numero_asiento,
            fecha: reserva.fecha,
            hora: reserva.hora,
            inicio: reserva.inicio,
            fin: reserva.fin,
            canjeada: reserva.canjeada,
            calificacion: reserva.calificacion,
        }
    }
}

#[derive(Deserialize)]
struct RateReservation {
    calificacion: i32,
}

/// Carga la reserva y verifica que la identidad pueda operar sobre su cuenta
async fn authorized_reservation<S: BookingStore>(
    engine: &BookingEngine<S>,
    req: &HttpRequest,
    id: &str,
) -> AppResult<Reserva> {
    let identity = extract_identity(req)?;
    let reserva = engine
        .store()
        .get_reservation(id)
        .await?
        .ok_or_else(|| AppError::not_found_id("Reserva", id))?;
    authorize_account(engine.store(), &identity, &reserva.id_cuenta).await?;
    Ok(reserva)
}

/// `GET /accounts/{id}/reservations` - reservas de la cuenta ordenadas por inicio
async fn list_account_reservations<S: BookingStore>(
    engine: web::Data<BookingEngine<S>>,
    path: web::Path<String>,
    req: HttpRequest,
) -> AppResult<HttpResponse> {
    let id_cuenta = path.into_inner();
    let identity = extract_identity(&req)?;
    authorize_account(engine.store(), &identity, &id_cuenta).await?;

    let reservas = engine.list_account_reservations(&id_cuenta).await?;
    let results: Vec<ReservationResponse> = reservas.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(results))
}

/// `POST /reservations/{id}/cancel`
///
/// # Errores
/// - `404 Not Found`: la reserva no existe
/// - `409 Conflict`: la reserva ya fue canjeada
async fn cancel_reservation<S: BookingStore>(
    engine: web::Data<BookingEngine<S>>,
    path: web::Path<String>,
    req: HttpRequest,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    authorized_reservation(&engine, &req, &id).await?;
    let reserva = engine.cancel_reservation(&id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Reserva cancelada correctamente",
        "id": reserva.id,
    })))
}

/// `POST /reservations/{id}/redeem`
///
/// # Errores
/// - `400 Bad Request`: fuera del horario de la reserva
/// - `409 Conflict`: ya canjeada
async fn redeem_reservation<S: BookingStore>(
    engine: web::Data<BookingEngine<S>>,
    path: web::Path<String>,
    req: HttpRequest,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    authorized_reservation(&engine, &req, &id).await?;
    let reserva = engine.redeem_reservation(&id).await?;
    Ok(HttpResponse::Ok().json(ReservationResponse::from(reserva)))
}

/// `POST /reservations/{id}/rate` con cuerpo `{"calificacion": 1..5}`
async fn rate_reservation<S: BookingStore>(
    engine: web::Data<BookingEngine<S>>,
    path: web::Path<String>,
    data: web::Json<RateReservation>,
    req: HttpRequest,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    authorized_reservation(&engine, &req, &id).await?;
    let reserva = engine.rate_reservation(&id, data.calificacion).await?;
    Ok(HttpResponse::Ok().json(ReservationResponse::from(reserva)))
}

pub fn routes<S: BookingStore>(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/accounts/{id}/reservations",
        web::get().to(list_account_reservations::<S>),
    );
    cfg.route("/reservations/{id}/cancel", web::post().to(cancel_reservation::<S>));
    cfg.route("/reservations/{id}/redeem", web::post().to(redeem_reservation::<S>));
    cfg.route("/reservations/{id}/rate", web::post().to(rate_reservation::<S>));
}
