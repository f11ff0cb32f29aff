//! Cancelación, canje y calificación de reservas existentes.

use chrono::NaiveDateTime;

use crate::api::{AppError, AppResult};
use crate::db::{BookingStore, Reserva};

async fn load<S: BookingStore>(store: &S, id: &str) -> AppResult<Reserva> {
    store
        .get_reservation(id)
        .await?
        .ok_or_else(|| AppError::not_found_id("Reserva", id))
}

/// Elimina una reserva antes de su canje, liberando el asiento o cupo
pub async fn cancel_reservation<S: BookingStore>(store: &S, id: &str) -> AppResult<Reserva> {
    let reserva = load(store, id).await?;
    if reserva.canjeada {
        return Err(AppError::Conflict(
            "No se puede cancelar una reserva ya canjeada".to_string(),
        ));
    }
    if !store.delete_reservation(&reserva).await? {
        // Canjeada o cancelada entre la lectura y el borrado
        return Err(AppError::Conflict("La reserva cambió de estado, intente nuevamente".to_string()));
    }
    tracing::info!(id_reserva = %reserva.id, account_id = %reserva.id_cuenta, "Reserva cancelada");
    Ok(reserva)
}

pub async fn redeem_reservation<S: BookingStore>(
    store: &S,
    id: &str,
    now: NaiveDateTime,
) -> AppResult<Reserva> {
    let mut reserva = load(store, id).await?;
    reserva.check_redeemable(now)?;
    if !store.mark_redeemed(id).await? {
        return Err(AppError::Conflict("La reserva ya fue canjeada".to_string()));
    }
    reserva.canjeada = true;
    tracing::info!(id_reserva = %reserva.id, account_id = %reserva.id_cuenta, "Reserva canjeada");
    Ok(reserva)
}

pub async fn rate_reservation<S: BookingStore>(
    store: &S,
    id: &str,
    calificacion: i32,
) -> AppResult<Reserva> {
    let mut reserva = load(store, id).await?;
    reserva.check_rateable(calificacion)?;
    if !store.set_rating(id, calificacion).await? {
        return Err(AppError::not_found_id("Reserva", id));
    }
    reserva.calificacion = Some(calificacion);
    Ok(reserva)
}
