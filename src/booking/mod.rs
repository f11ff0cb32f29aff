//! # Motor de reservas
//!
//! Cuatro componentes sobre un [`BookingStore`]:
//!
//! - [`stock`] - insumos requeridos por un servicio
//! - [`seats`] - ocupación de mesas y asientos para un turno
//! - [`availability`] - turnos con al menos una unidad libre
//! - [`committer`] - confirmación atómica de una reserva
//!
//! [`BookingEngine`] los agrupa con la configuración (rejilla de turnos,
//! reloj, clave del banquete) para que la capa HTTP y las pruebas trabajen
//! con un solo valor.

pub mod availability;
pub mod clock;
pub mod committer;
pub mod lifecycle;
pub mod seats;
pub mod slots;
pub mod stock;

use chrono::NaiveDate;

pub use availability::BookingTarget;
pub use clock::Clock;
pub use committer::{BanquetReservationRequest, ServiceReservationRequest};
pub use seats::{SeatState, SeatView, TableView};
pub use slots::SlotGrid;
pub use stock::{InsufficientItem, StockReport};

use crate::api::AppResult;
use crate::config::AppConfig;
use crate::db::models::DATE_FORMAT;
use crate::db::{BookingStore, Reserva};

#[derive(Debug, Clone)]
pub struct BookingSettings {
    pub grid: SlotGrid,
    pub clock: Clock,
    pub banquet_key: String,
    pub slot_minutes: i64,
}

impl BookingSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        BookingSettings {
            grid: config.slot_grid.clone(),
            clock: Clock::System,
            banquet_key: config.banquet_service_key.clone(),
            slot_minutes: config.slot_minutes,
        }
    }
}

pub struct BookingEngine<S> {
    store: S,
    settings: BookingSettings,
}

impl<S: BookingStore> BookingEngine<S> {
    pub fn new(store: S, settings: BookingSettings) -> Self {
        BookingEngine { store, settings }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn settings(&self) -> &BookingSettings {
        &self.settings
    }

    /// Turnos libres. La clave del banquete como servicio se resuelve como
    /// banquete: su capacidad son los asientos, no un cupo por turno.
    pub async fn resolve_time_slots(
        &self,
        target: &BookingTarget,
        fecha: NaiveDate,
    ) -> AppResult<Vec<String>> {
        let banquet = BookingTarget::Banquet;
        let target = match target {
            BookingTarget::Service(key) if key.trim() == self.settings.banquet_key => &banquet,
            other => other,
        };
        availability::resolve_time_slots(
            &self.store,
            &self.settings.grid,
            self.settings.clock.today(),
            target,
            fecha,
        )
        .await
    }

    /// Mesas anotadas para (fecha, hora). La hora se normaliza contra la
    /// rejilla; una etiqueta fuera de la rejilla se consulta tal cual.
    pub async fn resolve_available_seats(&self, fecha: NaiveDate, hora: &str) -> AppResult<Vec<TableView>> {
        let hora = match self.settings.grid.find(hora) {
            Some(slot) => slot.label.clone(),
            None => hora.trim().to_string(),
        };
        let fecha = fecha.format(DATE_FORMAT).to_string();
        seats::resolve_available_seats(&self.store, &fecha, &hora).await
    }

    pub async fn check_availability(&self, service_key: &str) -> AppResult<StockReport> {
        stock::check_availability(&self.store, service_key).await
    }

    pub async fn commit_banquet_reservation(
        &self,
        request: BanquetReservationRequest,
    ) -> AppResult<Reserva> {
        committer::commit_banquet_reservation(&self.store, &self.settings, request).await
    }

    pub async fn commit_service_reservation(
        &self,
        request: ServiceReservationRequest,
    ) -> AppResult<Reserva> {
        committer::commit_service_reservation(&self.store, &self.settings, request).await
    }

    pub async fn list_account_reservations(&self, id_cuenta: &str) -> AppResult<Vec<Reserva>> {
        self.store.list_account_reservations(id_cuenta).await
    }

    pub async fn cancel_reservation(&self, id: &str) -> AppResult<Reserva> {
        lifecycle::cancel_reservation(&self.store, id).await
    }

    pub async fn redeem_reservation(&self, id: &str) -> AppResult<Reserva> {
        lifecycle::redeem_reservation(&self.store, id, self.settings.clock.now()).await
    }

    pub async fn rate_reservation(&self, id: &str, calificacion: i32) -> AppResult<Reserva> {
        lifecycle::rate_reservation(&self.store, id, calificacion).await
    }
}
