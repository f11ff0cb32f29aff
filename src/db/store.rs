//! Contrato del almacén de reservas.
//!
//! Las dos inserciones condicionales son la única escritura concurrente del
//! motor: cada implementación debe comprobar e insertar en un solo paso
//! atómico (índice único o sección crítica), nunca en dos llamadas separadas.

use std::future::Future;

use crate::api::AppResult;
use crate::db::models::{Cuenta, Insumo, Mesa, RequisitosServicio, Reserva, Servicio};

pub trait BookingStore: Send + Sync + 'static {
    fn get_service(&self, id: &str) -> impl Future<Output = AppResult<Option<Servicio>>> + Send;

    fn get_account(&self, id: &str) -> impl Future<Output = AppResult<Option<Cuenta>>> + Send;

    fn get_table(&self, id: i32) -> impl Future<Output = AppResult<Option<Mesa>>> + Send;

    /// Todas las mesas, ordenadas por id
    fn list_tables(&self) -> impl Future<Output = AppResult<Vec<Mesa>>> + Send;

    /// Reservas (de banquete y de servicios) de una fecha
    fn list_reservations_on(&self, fecha: &str)
        -> impl Future<Output = AppResult<Vec<Reserva>>> + Send;

    /// Reservas de banquete para un turno exacto
    fn list_banquet_reservations(
        &self,
        fecha: &str,
        hora: &str,
    ) -> impl Future<Output = AppResult<Vec<Reserva>>> + Send;

    /// Reservas de una cuenta ordenadas por inicio
    fn list_account_reservations(
        &self,
        id_cuenta: &str,
    ) -> impl Future<Output = AppResult<Vec<Reserva>>> + Send;

    fn get_reservation(&self, id: &str) -> impl Future<Output = AppResult<Option<Reserva>>> + Send;

    /// `None` cuando la clave de servicio no tiene requisitos registrados
    fn get_requirements(
        &self,
        id_servicio: &str,
    ) -> impl Future<Output = AppResult<Option<RequisitosServicio>>> + Send;

    fn get_items(&self, ids: &[String]) -> impl Future<Output = AppResult<Vec<Insumo>>> + Send;

    /// Inserta si (mesa, asiento, fecha, hora) está libre; si no, `SeatUnavailable`
    fn insert_banquet_reservation(
        &self,
        reserva: Reserva,
    ) -> impl Future<Output = AppResult<Reserva>> + Send;

    /// Inserta ocupando una unidad libre (`cupo` en `0..capacidad`) del turno
    /// del servicio; si no queda ninguna, `SeatUnavailable`
    fn insert_service_reservation(
        &self,
        reserva: Reserva,
        capacidad: i32,
    ) -> impl Future<Output = AppResult<Reserva>> + Send;

    /// Elimina una reserva no canjeada y libera su asiento o cupo
    fn delete_reservation(&self, reserva: &Reserva) -> impl Future<Output = AppResult<bool>> + Send;

    /// Marca como canjeada una reserva que aún no lo estaba
    fn mark_redeemed(&self, id: &str) -> impl Future<Output = AppResult<bool>> + Send;

    /// Guarda la calificación de una reserva canjeada
    fn set_rating(&self, id: &str, calificacion: i32)
        -> impl Future<Output = AppResult<bool>> + Send;

    fn save_table(&self, mesa: Mesa) -> impl Future<Output = AppResult<()>> + Send;

    fn save_service(&self, servicio: Servicio) -> impl Future<Output = AppResult<()>> + Send;

    fn save_account(&self, cuenta: Cuenta) -> impl Future<Output = AppResult<()>> + Send;

    fn save_item(&self, insumo: Insumo) -> impl Future<Output = AppResult<()>> + Send;

    fn save_requirements(
        &self,
        requisitos: RequisitosServicio,
    ) -> impl Future<Output = AppResult<()>> + Send;
}
