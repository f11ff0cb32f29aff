//! # API del Banquete
//!
//! - `GET /banquet/slots?fecha=YYYY-MM-DD` - turnos con algún asiento libre
//! - `GET /banquet/seats?fecha=YYYY-MM-DD&hora=7:00 PM` - mesas con el estado de cada asiento
//! - `POST /banquet/reservations` - reservar un asiento

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;

use super::identity::{authorize_account, extract_identity};
use super::reservation::ReservationResponse;
use super::{parse_date, AppError, AppResult};
use crate::booking::{BanquetReservationRequest, BookingEngine, BookingTarget};
use crate::db::BookingStore;

#[derive(Deserialize)]
struct SlotsQuery {
    fecha: String,
}

#[derive(Deserialize)]
struct SeatsQuery {
    fecha: String,
    hora: String,
}

async fn banquet_slots<S: BookingStore>(
    engine: web::Data<BookingEngine<S>>,
    query: web::Query<SlotsQuery>,
) -> AppResult<HttpResponse> {
    let fecha = parse_date(&query.fecha)?;
    let slots = engine.resolve_time_slots(&BookingTarget::Banquet, fecha).await?;
    Ok(HttpResponse::Ok().json(slots))
}

async fn banquet_seats<S: BookingStore>(
    engine: web::Data<BookingEngine<S>>,
    query: web::Query<SeatsQuery>,
) -> AppResult<HttpResponse> {
    let fecha = parse_date(&query.fecha)?;
    // Un turno fuera de la rejilla mostraría todos los asientos libres
    if engine.settings().grid.find(&query.hora).is_none() {
        return Err(AppError::validation_field(
            "hora",
            "El horario no pertenece a la rejilla de turnos",
        ));
    }
    let mesas = engine.resolve_available_seats(fecha, &query.hora).await?;
    Ok(HttpResponse::Ok().json(mesas))
}

/// Reserva un asiento del banquete
///
/// # Errores
/// - `400 Bad Request`: datos inválidos, fecha pasada u horario fuera de la rejilla
/// - `401 Unauthorized` / `403 Forbidden`: identidad ausente o cuenta ajena
/// - `402 Payment Required`: saldo insuficiente
/// - `409 Conflict`: el asiento ya está reservado para ese turno
/// - `422 Unprocessable Entity`: faltan insumos (lista en `insufficient_items`)
async fn make_banquet_reservation<S: BookingStore>(
    engine: web::Data<BookingEngine<S>>,
    data: web::Json<BanquetReservationRequest>,
    req: HttpRequest,
) -> AppResult<HttpResponse> {
    let identity = extract_identity(&req)?;
    authorize_account(engine.store(), &identity, &data.id_cuenta).await?;

    let reserva = engine.commit_banquet_reservation(data.into_inner()).await?;
    Ok(HttpResponse::Created().json(ReservationResponse::from(reserva)))
}

pub fn routes<S: BookingStore>(cfg: &mut web::ServiceConfig) {
    cfg.route("/banquet/slots", web::get().to(banquet_slots::<S>));
    cfg.route("/banquet/seats", web::get().to(banquet_seats::<S>));
    cfg.route("/banquet/reservations", web::post().to(make_banquet_reservation::<S>));
}
