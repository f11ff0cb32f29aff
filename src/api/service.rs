//! # API de Servicios
//!
//! Reserva de turnos de servicios generales y consulta de insumos.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;

use super::identity::{authorize_account, extract_identity};
use super::reservation::ReservationResponse;
use super::{parse_date, AppResult};
use crate::booking::{BookingEngine, BookingTarget, ServiceReservationRequest};
use crate::db::BookingStore;

#[derive(Deserialize)]
struct SlotsQuery {
    fecha: String,
}

#[derive(Deserialize)]
struct MakeServiceReservation {
    id_cuenta: String,
    fecha: String,
    hora: String,
}

/// `GET /services/{id}/slots?fecha=YYYY-MM-DD`
async fn service_slots<S: BookingStore>(
    engine: web::Data<BookingEngine<S>>,
    path: web::Path<String>,
    query: web::Query<SlotsQuery>,
) -> AppResult<HttpResponse> {
    let fecha = parse_date(&query.fecha)?;
    let target = BookingTarget::Service(path.into_inner());
    let slots = engine.resolve_time_slots(&target, fecha).await?;
    Ok(HttpResponse::Ok().json(slots))
}

/// `POST /services/{id}/reservations`
async fn make_service_reservation<S: BookingStore>(
    engine: web::Data<BookingEngine<S>>,
    path: web::Path<String>,
    data: web::Json<MakeServiceReservation>,
    req: HttpRequest,
) -> AppResult<HttpResponse> {
    let identity = extract_identity(&req)?;
    authorize_account(engine.store(), &identity, &data.id_cuenta).await?;

    let data = data.into_inner();
    let request = ServiceReservationRequest {
        id_servicio: path.into_inner(),
        id_cuenta: data.id_cuenta,
        fecha: data.fecha,
        hora: data.hora,
    };
    let reserva = engine.commit_service_reservation(request).await?;
    Ok(HttpResponse::Created().json(ReservationResponse::from(reserva)))
}

/// `GET /stock/{service_key}` - disponibilidad de insumos para mostrar al huésped
async fn stock_availability<S: BookingStore>(
    engine: web::Data<BookingEngine<S>>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let report = engine.check_availability(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(report))
}

pub fn routes<S: BookingStore>(cfg: &mut web::ServiceConfig) {
    cfg.route("/services/{id}/slots", web::get().to(service_slots::<S>));
    cfg.route(
        "/services/{id}/reservations",
        web::post().to(make_service_reservation::<S>),
    );
    cfg.route("/stock/{service_key}", web::get().to(stock_availability::<S>));
}
