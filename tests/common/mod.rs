use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use dogo_onsen_reservas::booking::{
    BanquetReservationRequest, BookingEngine, BookingSettings, Clock, ServiceReservationRequest,
    SlotGrid,
};
use dogo_onsen_reservas::db::{
    seed, BookingStore, Cuenta, Insumo, MemoryRepo, Mesa, RequisitoInsumo, RequisitosServicio,
    Servicio,
};

pub const FECHA: &str = "2025-12-10";
pub const BANQUET: &str = "banquete";
pub const ONSEN: &str = "onsen";

pub fn at(fecha: &str, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::parse_from_str(fecha, "%Y-%m-%d")
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

pub fn fecha() -> NaiveDate {
    NaiveDate::parse_from_str(FECHA, "%Y-%m-%d").unwrap()
}

fn cuenta(id: &str, saldo: i64) -> Cuenta {
    Cuenta::new(
        id,
        &format!("espiritu-{}", id),
        "hab-1",
        saldo,
        at("2025-11-30", 12, 0),
        at("2025-12-31", 12, 0),
    )
    .unwrap()
}

/// Onsen con 2 mesas activas, una inactiva, banquete a 50 EILT y un baño
/// termal de 50 EILT con 2 cupos por turno.
#[allow(dead_code)]
pub async fn setup() -> Arc<BookingEngine<MemoryRepo>> {
    setup_at(at("2025-12-01", 12, 0)).await
}

#[allow(dead_code)]
pub async fn setup_at(now: NaiveDateTime) -> Arc<BookingEngine<MemoryRepo>> {
    let grid = SlotGrid::parse(&["6:00 PM", "7:00 PM", "8:00 PM"]).unwrap();
    setup_with(now, grid).await
}

pub async fn setup_with(now: NaiveDateTime, grid: SlotGrid) -> Arc<BookingEngine<MemoryRepo>> {
    let store = MemoryRepo::new();

    seed::ensure_banquet_tables(&store, 2).await.unwrap();
    store.save_table(Mesa::new(3, false)).await.unwrap();
    seed::ensure_banquet_service(&store, BANQUET, 50).await.unwrap();

    let onsen = Servicio::new(ONSEN, "Baño termal", 50)
        .unwrap()
        .with_capacity(2)
        .unwrap()
        .with_duration(45)
        .unwrap();
    store.save_service(onsen).await.unwrap();

    for (id, saldo) in [("A", 200), ("B", 200), ("pobre", 30)] {
        store.save_account(cuenta(id, saldo)).await.unwrap();
    }

    store
        .save_item(Insumo::new("toallas", "towels", "unidad", 100).unwrap())
        .await
        .unwrap();
    store
        .save_item(Insumo::new("sake", "sake", "botella", 50).unwrap())
        .await
        .unwrap();
    store
        .save_requirements(RequisitosServicio {
            id_servicio: BANQUET.to_string(),
            insumos: vec![RequisitoInsumo::new("sake", 1).unwrap()],
        })
        .await
        .unwrap();
    store
        .save_requirements(RequisitosServicio {
            id_servicio: ONSEN.to_string(),
            insumos: vec![RequisitoInsumo::new("toallas", 2).unwrap()],
        })
        .await
        .unwrap();

    let settings = BookingSettings {
        grid,
        clock: Clock::Fixed(now),
        banquet_key: BANQUET.to_string(),
        slot_minutes: 60,
    };
    Arc::new(BookingEngine::new(store, settings))
}

#[allow(dead_code)]
pub fn banquet_request(id_mesa: i32, asiento: i32, hora: &str, cuenta: &str) -> BanquetReservationRequest {
    BanquetReservationRequest {
        id_mesa,
        numero_asiento: asiento,
        fecha: FECHA.to_string(),
        hora: hora.to_string(),
        id_cuenta: cuenta.to_string(),
    }
}

#[allow(dead_code)]
pub fn service_request(servicio: &str, hora: &str, cuenta: &str) -> ServiceReservationRequest {
    ServiceReservationRequest {
        id_servicio: servicio.to_string(),
        id_cuenta: cuenta.to_string(),
        fecha: FECHA.to_string(),
        hora: hora.to_string(),
    }
}
