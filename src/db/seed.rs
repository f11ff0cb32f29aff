//! Datos mínimos para que el banquete sea reservable en un almacén vacío.

use super::models::{Mesa, Servicio};
use super::store::BookingStore;
use crate::api::AppResult;

/// Crea `cantidad` mesas activas si el almacén no tiene ninguna
pub async fn ensure_banquet_tables<S: BookingStore>(store: &S, cantidad: i32) -> AppResult<usize> {
    if !store.list_tables().await?.is_empty() {
        return Ok(0);
    }
    for id in 1..=cantidad {
        store.save_table(Mesa::new(id, true)).await?;
    }
    tracing::info!(mesas = cantidad, "Mesas de banquete creadas");
    Ok(cantidad.max(0) as usize)
}

/// Registra el servicio de banquete con su costo si aún no existe
pub async fn ensure_banquet_service<S: BookingStore>(store: &S, clave: &str, costo: i64) -> AppResult<()> {
    if store.get_service(clave).await?.is_some() {
        return Ok(());
    }
    let mut servicio = Servicio::new(clave, "Banquete", costo)?;
    servicio.descripcion = "Asiento en las mesas del gran banquete".to_string();
    store.save_service(servicio).await?;
    tracing::info!(servicio = %clave, costo, "Servicio de banquete registrado");
    Ok(())
}
