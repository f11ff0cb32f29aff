//! Confirmación de reservas.
//!
//! Orden de comprobaciones: validación estructural, stock, saldo y por último
//! la inserción condicional del almacén, que vuelve a comprobar la
//! disponibilidad en el mismo paso atómico que escribe.

use chrono::{Duration, NaiveDate};
use serde::Deserialize;

use super::slots::Slot;
use super::stock::check_availability;
use super::BookingSettings;
use crate::api::{parse_date, AppError, AppResult};
use crate::db::models::SEATS_PER_TABLE;
use crate::db::{BookingStore, Cuenta, Reserva};

#[derive(Debug, Clone, Deserialize)]
pub struct BanquetReservationRequest {
    pub id_mesa: i32,
    pub numero_asiento: i32,
    /// Formato YYYY-MM-DD
    pub fecha: String,
    /// Etiqueta de turno, por ejemplo "7:00 PM"
    pub hora: String,
    pub id_cuenta: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceReservationRequest {
    pub id_servicio: String,
    pub id_cuenta: String,
    pub fecha: String,
    pub hora: String,
}

/// Valida y parsea una fecha de reserva; no se admiten fechas pasadas
pub fn validate_date(fecha: &str, today: NaiveDate) -> AppResult<NaiveDate> {
    let parsed = parse_date(fecha)?;
    if parsed < today {
        return Err(AppError::validation_field("fecha", "No se puede reservar en una fecha pasada"));
    }
    Ok(parsed)
}

fn validate_slot<'a>(settings: &'a BookingSettings, hora: &str) -> AppResult<&'a Slot> {
    settings
        .grid
        .find(hora)
        .ok_or_else(|| AppError::validation_field("hora", "El horario no pertenece a la rejilla de turnos"))
}

fn require(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::validation_field(field, "Campo requerido"));
    }
    Ok(())
}

async fn load_account<S: BookingStore>(store: &S, id_cuenta: &str) -> AppResult<Cuenta> {
    store
        .get_account(id_cuenta)
        .await?
        .ok_or_else(|| AppError::validation_field("id_cuenta", "La cuenta no existe"))
}

async fn ensure_stock<S: BookingStore>(store: &S, service_key: &str) -> AppResult<()> {
    let report = check_availability(store, service_key).await?;
    if !report.is_available {
        return Err(AppError::InsufficientStock {
            items: report.insufficient_items,
        });
    }
    Ok(())
}

fn ensure_balance(cuenta: &Cuenta, costo: i64) -> AppResult<()> {
    if cuenta.saldo < costo {
        return Err(AppError::InsufficientBalance {
            balance: cuenta.saldo,
            cost: costo,
        });
    }
    Ok(())
}

pub async fn commit_banquet_reservation<S: BookingStore>(
    store: &S,
    settings: &BookingSettings,
    request: BanquetReservationRequest,
) -> AppResult<Reserva> {
    // 1. Validación estructural
    require("id_cuenta", &request.id_cuenta)?;
    let fecha = validate_date(&request.fecha, settings.clock.today())?;
    let slot = validate_slot(settings, &request.hora)?;
    if !(1..=SEATS_PER_TABLE).contains(&request.numero_asiento) {
        return Err(AppError::validation_field(
            "numero_asiento",
            "El número de asiento debe estar entre 1 y 6",
        ));
    }
    let mesa = store
        .get_table(request.id_mesa)
        .await?
        .ok_or_else(|| AppError::validation_field("id_mesa", "La mesa no existe"))?;
    if !mesa.has_seat(request.numero_asiento) {
        return Err(AppError::validation_field("numero_asiento", "La mesa no tiene ese asiento"));
    }
    let cuenta = load_account(store, &request.id_cuenta).await?;
    let banquete = store
        .get_service(&settings.banquet_key)
        .await?
        .ok_or_else(|| AppError::Internal("Servicio de banquete no configurado".to_string()))?;

    // 2. Stock
    ensure_stock(store, &settings.banquet_key).await?;

    // 3. Saldo (se verifica, no se descuenta)
    ensure_balance(&cuenta, banquete.costo)?;

    // 4. Una mesa inactiva no tiene asientos libres
    if !mesa.activa {
        return Err(AppError::SeatUnavailable("La mesa no está disponible".to_string()));
    }

    // 5. Reverificación e inserción atómica
    let duracion = Duration::minutes(banquete.duracion_minutos.unwrap_or(settings.slot_minutes));
    let reserva = Reserva::banquete(
        &cuenta.id,
        mesa.id,
        request.numero_asiento,
        fecha,
        &slot.label,
        fecha.and_time(slot.time),
        duracion,
    )?;

    match store.insert_banquet_reservation(reserva).await {
        Ok(reserva) => {
            tracing::info!(
                id_reserva = %reserva.id,
                table_id = mesa.id,
                seat = request.numero_asiento,
                fecha = %reserva.fecha,
                hora = %reserva.hora,
                account_id = %cuenta.id,
                "Reserva de banquete confirmada"
            );
            Ok(reserva)
        }
        Err(e) => {
            if matches!(e, AppError::SeatUnavailable(_)) {
                tracing::info!(
                    table_id = mesa.id,
                    seat = request.numero_asiento,
                    fecha = %fecha,
                    hora = %slot.label,
                    account_id = %cuenta.id,
                    "Asiento tomado por otra reserva"
                );
            }
            Err(e)
        }
    }
}

pub async fn commit_service_reservation<S: BookingStore>(
    store: &S,
    settings: &BookingSettings,
    request: ServiceReservationRequest,
) -> AppResult<Reserva> {
    // 1. Validación estructural
    require("id_servicio", &request.id_servicio)?;
    require("id_cuenta", &request.id_cuenta)?;
    if request.id_servicio.trim() == settings.banquet_key {
        return Err(AppError::validation_field(
            "id_servicio",
            "El banquete se reserva por mesa y asiento",
        ));
    }
    let fecha = validate_date(&request.fecha, settings.clock.today())?;
    let slot = validate_slot(settings, &request.hora)?;
    let servicio = store
        .get_service(&request.id_servicio)
        .await?
        .ok_or_else(|| AppError::validation_field("id_servicio", "El servicio no existe"))?;
    let cuenta = load_account(store, &request.id_cuenta).await?;

    // 2. Stock
    ensure_stock(store, &servicio.id).await?;

    // 3. Saldo
    ensure_balance(&cuenta, servicio.costo)?;

    // 4 y 5. Inserción condicionada a la capacidad del turno
    let duracion = Duration::minutes(servicio.duracion_minutos.unwrap_or(settings.slot_minutes));
    let reserva = Reserva::servicio(
        &cuenta.id,
        &servicio.id,
        fecha,
        &slot.label,
        fecha.and_time(slot.time),
        duracion,
    )?;

    let reserva = store
        .insert_service_reservation(reserva, servicio.capacidad_por_turno)
        .await?;

    tracing::info!(
        id_reserva = %reserva.id,
        service_id = %servicio.id,
        fecha = %reserva.fecha,
        hora = %reserva.hora,
        account_id = %cuenta.id,
        "Reserva de servicio confirmada"
    );
    Ok(reserva)
}
