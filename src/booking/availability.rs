//! Turnos reservables de una fecha.

use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};

use super::slots::SlotGrid;
use crate::api::{AppError, AppResult};
use crate::db::models::DATE_FORMAT;
use crate::db::{BookingStore, Reserva};

/// Objetivo de la consulta de turnos
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingTarget {
    /// Todas las mesas activas del banquete
    Banquet,
    Service(String),
}

/// Cuenta reservas por etiqueta de turno
fn count_by_slot<'a, I>(reservas: I) -> HashMap<&'a str, usize>
where
    I: IntoIterator<Item = &'a Reserva>,
{
    let mut counts = HashMap::new();
    for reserva in reservas {
        *counts.entry(reserva.hora.as_str()).or_insert(0) += 1;
    }
    counts
}

/// Filtra la rejilla dejando los turnos con al menos una unidad libre
fn open_slots(grid: &SlotGrid, capacidad: usize, booked: &HashMap<&str, usize>) -> Vec<String> {
    grid.slots()
        .iter()
        .filter(|slot| booked.get(slot.label.as_str()).copied().unwrap_or(0) < capacidad)
        .map(|slot| slot.label.clone())
        .collect()
}

pub async fn resolve_time_slots<S: BookingStore>(
    store: &S,
    grid: &SlotGrid,
    today: NaiveDate,
    target: &BookingTarget,
    fecha: NaiveDate,
) -> AppResult<Vec<String>> {
    if fecha < today {
        return Ok(Vec::new());
    }
    if grid.is_empty() {
        tracing::warn!("La rejilla de turnos está vacía, no hay horarios que ofrecer");
        return Ok(Vec::new());
    }

    let fecha_str = fecha.format(DATE_FORMAT).to_string();

    match target {
        BookingTarget::Banquet => {
            let mesas = store.list_tables().await?;
            let activas: HashSet<i32> = mesas.iter().filter(|m| m.activa).map(|m| m.id).collect();
            let capacidad: usize = mesas
                .iter()
                .filter(|mesa| mesa.activa)
                .map(|mesa| mesa.asientos.len())
                .sum();
            if capacidad == 0 {
                return Ok(Vec::new());
            }

            let reservas = store.list_reservations_on(&fecha_str).await?;
            let booked = count_by_slot(
                reservas
                    .iter()
                    .filter(|r| r.id_mesa.is_some_and(|id| activas.contains(&id))),
            );
            Ok(open_slots(grid, capacidad, &booked))
        }
        BookingTarget::Service(id_servicio) => {
            let servicio = store
                .get_service(id_servicio)
                .await?
                .ok_or_else(|| AppError::not_found_id("Servicio", id_servicio))?;

            let reservas = store.list_reservations_on(&fecha_str).await?;
            let booked = count_by_slot(
                reservas
                    .iter()
                    .filter(|r| !r.is_banquet() && r.id_servicio.as_deref() == Some(id_servicio.as_str())),
            );
            Ok(open_slots(grid, servicio.capacidad_por_turno.max(0) as usize, &booked))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_slots_are_removed_in_order() {
        let grid = SlotGrid::parse(&["6:00 PM", "7:00 PM", "8:00 PM"]).unwrap();
        let booked: HashMap<&str, usize> = [("7:00 PM", 2), ("8:00 PM", 1)].into_iter().collect();
        assert_eq!(open_slots(&grid, 2, &booked), vec!["6:00 PM", "8:00 PM"]);
    }

    #[test]
    fn zero_capacity_closes_everything() {
        let grid = SlotGrid::parse(&["6:00 PM"]).unwrap();
        assert!(open_slots(&grid, 0, &HashMap::new()).is_empty());
    }
}
