//! Almacén en memoria.
//!
//! Todo el estado vive detrás de un único `Mutex`: la comprobación de
//! disponibilidad y la inserción ocurren dentro de la misma sección crítica.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tokio::sync::Mutex;

use super::models::{Cuenta, Insumo, Mesa, RequisitosServicio, Reserva, Servicio};
use super::store::BookingStore;
use crate::api::{AppError, AppResult};

#[derive(Debug, Default)]
struct MemoryState {
    servicios: HashMap<String, Servicio>,
    cuentas: HashMap<String, Cuenta>,
    mesas: BTreeMap<i32, Mesa>,
    reservas: Vec<Reserva>,
    insumos: HashMap<String, Insumo>,
    requisitos: HashMap<String, RequisitosServicio>,
}

impl MemoryState {
    fn seat_taken(&self, candidata: &Reserva) -> bool {
        self.reservas.iter().any(|reserva| {
            reserva.is_banquet()
                && reserva.id_mesa == candidata.id_mesa
                && reserva.numero_asiento == candidata.numero_asiento
                && reserva.fecha == candidata.fecha
                && reserva.hora == candidata.hora
        })
    }

    /// Primera unidad libre del turno de servicio, si queda alguna
    fn free_service_unit(&self, candidata: &Reserva, capacidad: i32) -> Option<i32> {
        let taken: Vec<i32> = self
            .reservas
            .iter()
            .filter(|reserva| {
                !reserva.is_banquet()
                    && reserva.id_servicio == candidata.id_servicio
                    && reserva.fecha == candidata.fecha
                    && reserva.hora == candidata.hora
            })
            .filter_map(|reserva| reserva.cupo)
            .collect();
        (0..capacidad).find(|cupo| !taken.contains(cupo))
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryRepo {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BookingStore for MemoryRepo {
    async fn get_service(&self, id: &str) -> AppResult<Option<Servicio>> {
        Ok(self.state.lock().await.servicios.get(id).cloned())
    }

    async fn get_account(&self, id: &str) -> AppResult<Option<Cuenta>> {
        Ok(self.state.lock().await.cuentas.get(id).cloned())
    }

    async fn get_table(&self, id: i32) -> AppResult<Option<Mesa>> {
        Ok(self.state.lock().await.mesas.get(&id).cloned())
    }

    async fn list_tables(&self) -> AppResult<Vec<Mesa>> {
        Ok(self.state.lock().await.mesas.values().cloned().collect())
    }

    async fn list_reservations_on(&self, fecha: &str) -> AppResult<Vec<Reserva>> {
        let state = self.state.lock().await;
        Ok(state
            .reservas
            .iter()
            .filter(|reserva| reserva.fecha == fecha)
            .cloned()
            .collect())
    }

    async fn list_banquet_reservations(&self, fecha: &str, hora: &str) -> AppResult<Vec<Reserva>> {
        let state = self.state.lock().await;
        Ok(state
            .reservas
            .iter()
            .filter(|reserva| reserva.is_banquet() && reserva.fecha == fecha && reserva.hora == hora)
            .cloned()
            .collect())
    }

    async fn list_account_reservations(&self, id_cuenta: &str) -> AppResult<Vec<Reserva>> {
        let state = self.state.lock().await;
        let mut reservas: Vec<Reserva> = state
            .reservas
            .iter()
            .filter(|reserva| reserva.id_cuenta == id_cuenta)
            .cloned()
            .collect();
        reservas.sort_by_key(|reserva| reserva.inicio);
        Ok(reservas)
    }

    async fn get_reservation(&self, id: &str) -> AppResult<Option<Reserva>> {
        let state = self.state.lock().await;
        Ok(state.reservas.iter().find(|reserva| reserva.id == id).cloned())
    }

    async fn get_requirements(&self, id_servicio: &str) -> AppResult<Option<RequisitosServicio>> {
        Ok(self.state.lock().await.requisitos.get(id_servicio).cloned())
    }

    async fn get_items(&self, ids: &[String]) -> AppResult<Vec<Insumo>> {
        let state = self.state.lock().await;
        Ok(ids
            .iter()
            .filter_map(|id| state.insumos.get(id).cloned())
            .collect())
    }

    async fn insert_banquet_reservation(&self, reserva: Reserva) -> AppResult<Reserva> {
        let mut state = self.state.lock().await;
        if state.seat_taken(&reserva) {
            return Err(AppError::seat_taken());
        }
        state.reservas.push(reserva.clone());
        Ok(reserva)
    }

    async fn insert_service_reservation(&self, mut reserva: Reserva, capacidad: i32) -> AppResult<Reserva> {
        let mut state = self.state.lock().await;
        let cupo = state
            .free_service_unit(&reserva, capacidad)
            .ok_or_else(AppError::seat_taken)?;
        reserva.cupo = Some(cupo);
        state.reservas.push(reserva.clone());
        Ok(reserva)
    }

    async fn delete_reservation(&self, reserva: &Reserva) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        let before = state.reservas.len();
        state
            .reservas
            .retain(|existing| existing.id != reserva.id || existing.canjeada);
        Ok(state.reservas.len() < before)
    }

    async fn mark_redeemed(&self, id: &str) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        match state
            .reservas
            .iter_mut()
            .find(|reserva| reserva.id == id && !reserva.canjeada)
        {
            Some(reserva) => {
                reserva.canjeada = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_rating(&self, id: &str, calificacion: i32) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        match state
            .reservas
            .iter_mut()
            .find(|reserva| reserva.id == id && reserva.canjeada)
        {
            Some(reserva) => {
                reserva.calificacion = Some(calificacion);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn save_table(&self, mesa: Mesa) -> AppResult<()> {
        self.state.lock().await.mesas.insert(mesa.id, mesa);
        Ok(())
    }

    async fn save_service(&self, servicio: Servicio) -> AppResult<()> {
        self.state
            .lock()
            .await
            .servicios
            .insert(servicio.id.clone(), servicio);
        Ok(())
    }

    async fn save_account(&self, cuenta: Cuenta) -> AppResult<()> {
        self.state.lock().await.cuentas.insert(cuenta.id.clone(), cuenta);
        Ok(())
    }

    async fn save_item(&self, insumo: Insumo) -> AppResult<()> {
        self.state.lock().await.insumos.insert(insumo.id.clone(), insumo);
        Ok(())
    }

    async fn save_requirements(&self, requisitos: RequisitosServicio) -> AppResult<()> {
        self.state
            .lock()
            .await
            .requisitos
            .insert(requisitos.id_servicio.clone(), requisitos);
        Ok(())
    }
}
