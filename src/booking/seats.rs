//! Ocupación de mesas y asientos para un turno.
//!
//! La ocupación no se almacena en la mesa: se deriva cruzando las mesas con
//! las reservas de banquete de (fecha, hora).

use serde::Serialize;
use std::collections::HashMap;

use crate::api::AppResult;
use crate::db::{BookingStore, Mesa, Reserva};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatState {
    Libre,
    Ocupado,
    /// La mesa está inactiva
    NoDisponible,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeatView {
    pub numero: i32,
    pub estado: SeatState,
    pub id_reserva: Option<String>,
    pub items_consumidos: i32,
}

impl SeatView {
    pub fn is_free(&self) -> bool {
        self.estado == SeatState::Libre
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableView {
    pub id_mesa: i32,
    pub capacidad: i32,
    pub activa: bool,
    pub asientos: Vec<SeatView>,
}

impl TableView {
    pub fn free_seats(&self) -> usize {
        self.asientos.iter().filter(|asiento| asiento.is_free()).count()
    }

    pub fn seat(&self, numero: i32) -> Option<&SeatView> {
        self.asientos.iter().find(|asiento| asiento.numero == numero)
    }
}

/// Anota cada asiento con su estado; las reservas deben ser del mismo turno
pub fn derive_occupancy(mut mesas: Vec<Mesa>, reservas: &[Reserva]) -> Vec<TableView> {
    let ocupados: HashMap<(i32, i32), &str> = reservas
        .iter()
        .filter_map(|reserva| {
            Some((
                (reserva.id_mesa?, reserva.numero_asiento?),
                reserva.id.as_str(),
            ))
        })
        .collect();

    mesas.sort_by_key(|mesa| mesa.id);
    mesas
        .into_iter()
        .map(|mesa| {
            let asientos = mesa
                .asientos
                .iter()
                .map(|asiento| {
                    let reserva = ocupados.get(&(mesa.id, asiento.numero));
                    let estado = match (mesa.activa, reserva) {
                        (false, _) => SeatState::NoDisponible,
                        (true, Some(_)) => SeatState::Ocupado,
                        (true, None) => SeatState::Libre,
                    };
                    SeatView {
                        numero: asiento.numero,
                        estado,
                        id_reserva: reserva.map(|id| id.to_string()),
                        items_consumidos: asiento.items_consumidos,
                    }
                })
                .collect();
            TableView {
                id_mesa: mesa.id,
                capacidad: mesa.capacidad,
                activa: mesa.activa,
                asientos,
            }
        })
        .collect()
}

pub async fn resolve_available_seats<S: BookingStore>(
    store: &S,
    fecha: &str,
    hora: &str,
) -> AppResult<Vec<TableView>> {
    let mesas = store.list_tables().await?;
    let reservas = store.list_banquet_reservations(fecha, hora).await?;
    Ok(derive_occupancy(mesas, &reservas))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn reserva(id_mesa: i32, asiento: i32) -> Reserva {
        let fecha = NaiveDate::from_ymd_opt(2025, 12, 10).unwrap();
        let inicio = fecha.and_hms_opt(19, 0, 0).unwrap();
        Reserva::banquete("c1", id_mesa, asiento, fecha, "7:00 PM", inicio, Duration::minutes(60))
            .unwrap()
    }

    #[test]
    fn reserved_seat_is_occupied_and_others_free() {
        let tablas = derive_occupancy(vec![Mesa::new(2, true), Mesa::new(1, true)], &[reserva(1, 3)]);
        assert_eq!(tablas.iter().map(|t| t.id_mesa).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(tablas[0].seat(3).unwrap().estado, SeatState::Ocupado);
        assert!(tablas[0].seat(3).unwrap().id_reserva.is_some());
        assert_eq!(tablas[0].free_seats(), 5);
        assert_eq!(tablas[1].free_seats(), 6);
    }

    #[test]
    fn inactive_table_has_no_free_seats() {
        let tablas = derive_occupancy(vec![Mesa::new(1, false)], &[]);
        assert_eq!(tablas[0].free_seats(), 0);
        assert!(tablas[0]
            .asientos
            .iter()
            .all(|asiento| asiento.estado == SeatState::NoDisponible));
    }

    #[test]
    fn service_reservations_are_ignored() {
        let fecha = NaiveDate::from_ymd_opt(2025, 12, 10).unwrap();
        let inicio = fecha.and_hms_opt(19, 0, 0).unwrap();
        let servicio =
            Reserva::servicio("c1", "onsen", fecha, "7:00 PM", inicio, Duration::minutes(60)).unwrap();
        let tablas = derive_occupancy(vec![Mesa::new(1, true)], &[servicio]);
        assert_eq!(tablas[0].free_seats(), 6);
    }
}
