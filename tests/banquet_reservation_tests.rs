mod common;

use std::sync::Arc;

use common::{at, banquet_request, fecha, setup, setup_with, FECHA};
use dogo_onsen_reservas::api::AppError;
use dogo_onsen_reservas::booking::{BookingTarget, SeatState, SlotGrid};
use dogo_onsen_reservas::db::{BookingStore, Insumo};
use tokio_test::{assert_err, assert_ok};

#[tokio::test]
async fn end_to_end_seat_three_then_four() {
    let engine = setup().await;

    let seats = engine.resolve_available_seats(fecha(), "7:00 PM").await.unwrap();
    assert!(seats[0].asientos.iter().all(|a| a.estado == SeatState::Libre));

    let reserva = assert_ok!(engine.commit_banquet_reservation(banquet_request(1, 3, "7:00 PM", "A")).await);
    assert_eq!(reserva.id_mesa, Some(1));
    assert_eq!(reserva.numero_asiento, Some(3));
    assert_eq!(reserva.fecha, FECHA);
    assert_eq!(reserva.hora, "7:00 PM");
    assert!(!reserva.canjeada);
    assert!(reserva.calificacion.is_none());
    assert!(reserva.id_servicio.is_none());

    let second = engine
        .commit_banquet_reservation(banquet_request(1, 3, "7:00 PM", "B"))
        .await;
    assert!(matches!(second, Err(AppError::SeatUnavailable(_))));

    let fourth = assert_ok!(engine.commit_banquet_reservation(banquet_request(1, 4, "7:00 PM", "B")).await);
    assert_eq!(fourth.numero_asiento, Some(4));
    assert_ne!(fourth.id, reserva.id);
}

#[tokio::test]
async fn committed_seat_shows_as_occupied() {
    let engine = setup().await;
    let reserva = engine
        .commit_banquet_reservation(banquet_request(1, 3, "7:00 PM", "A"))
        .await
        .unwrap();

    let mesas = engine.resolve_available_seats(fecha(), "7:00 PM").await.unwrap();
    let seat = mesas[0].seat(3).unwrap();
    assert_eq!(mesas[0].id_mesa, 1);
    assert_eq!(seat.estado, SeatState::Ocupado);
    assert_eq!(seat.id_reserva.as_deref(), Some(reserva.id.as_str()));

    // Otro turno del mismo día no se ve afectado
    let otras = engine.resolve_available_seats(fecha(), "8:00 PM").await.unwrap();
    assert_eq!(otras[0].seat(3).unwrap().estado, SeatState::Libre);
}

#[tokio::test]
async fn inactive_table_is_listed_but_never_bookable() {
    let engine = setup().await;

    let mesas = engine.resolve_available_seats(fecha(), "7:00 PM").await.unwrap();
    assert_eq!(mesas.iter().map(|m| m.id_mesa).collect::<Vec<_>>(), vec![1, 2, 3]);
    assert_eq!(mesas[2].free_seats(), 0);

    let result = engine
        .commit_banquet_reservation(banquet_request(3, 1, "7:00 PM", "A"))
        .await;
    assert!(matches!(result, Err(AppError::SeatUnavailable(_))));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_commits_for_one_seat_have_a_single_winner() {
    let engine = setup().await;

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let engine = Arc::clone(&engine);
            let cuenta = if i % 2 == 0 { "A" } else { "B" };
            tokio::spawn(async move {
                engine
                    .commit_banquet_reservation(banquet_request(2, 5, "6:00 PM", cuenta))
                    .await
            })
        })
        .collect();

    let mut ok = 0;
    let mut taken = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => ok += 1,
            Err(AppError::SeatUnavailable(_)) => taken += 1,
            Err(other) => panic!("error inesperado: {other}"),
        }
    }
    assert_eq!(ok, 1);
    assert_eq!(taken, 15);

    let reservas = engine.store().list_banquet_reservations(FECHA, "6:00 PM").await.unwrap();
    assert_eq!(reservas.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn double_submit_persists_one_reservation() {
    let engine = setup().await;
    let request = banquet_request(1, 1, "8:00 PM", "A");

    let (first, second) = tokio::join!(
        engine.commit_banquet_reservation(request.clone()),
        engine.commit_banquet_reservation(request)
    );

    let outcomes = [first.is_ok(), second.is_ok()];
    assert_eq!(outcomes.iter().filter(|ok| **ok).count(), 1);
    let rejected = if first.is_err() { first } else { second };
    assert!(matches!(rejected, Err(AppError::SeatUnavailable(_))));

    let reservas = engine.store().list_account_reservations("A").await.unwrap();
    assert_eq!(reservas.len(), 1);
}

#[tokio::test]
async fn slot_disappears_once_every_active_seat_is_taken() {
    let engine = setup().await;

    let before = engine.resolve_time_slots(&BookingTarget::Banquet, fecha()).await.unwrap();
    assert_eq!(before, vec!["6:00 PM", "7:00 PM", "8:00 PM"]);

    for mesa in 1..=2 {
        for asiento in 1..=6 {
            engine
                .commit_banquet_reservation(banquet_request(mesa, asiento, "7:00 PM", "A"))
                .await
                .unwrap();
        }
    }

    let after = engine.resolve_time_slots(&BookingTarget::Banquet, fecha()).await.unwrap();
    assert_eq!(after, vec!["6:00 PM", "8:00 PM"]);
}

#[tokio::test]
async fn past_dates_have_no_slots_and_cannot_be_booked() {
    let engine = setup().await;
    let ayer = chrono::NaiveDate::from_ymd_opt(2025, 11, 30).unwrap();

    let slots = engine.resolve_time_slots(&BookingTarget::Banquet, ayer).await.unwrap();
    assert!(slots.is_empty());

    let mut request = banquet_request(1, 1, "7:00 PM", "A");
    request.fecha = "2025-11-30".to_string();
    let result = engine.commit_banquet_reservation(request).await;
    assert!(matches!(result, Err(AppError::ValidationWithField { ref field, .. }) if field == "fecha"));
}

#[tokio::test]
async fn structural_validation_runs_before_anything_else() {
    let engine = setup().await;

    let cases = [
        (banquet_request(1, 1, "7:30 PM", "A"), "hora"),
        (banquet_request(1, 7, "7:00 PM", "A"), "numero_asiento"),
        (banquet_request(9, 1, "7:00 PM", "A"), "id_mesa"),
        (banquet_request(1, 1, "7:00 PM", ""), "id_cuenta"),
        (banquet_request(1, 1, "7:00 PM", "nadie"), "id_cuenta"),
    ];
    for (request, expected) in cases {
        match engine.commit_banquet_reservation(request).await {
            Err(AppError::ValidationWithField { field, .. }) => assert_eq!(field, expected),
            other => panic!("se esperaba error de validación en {expected}, se obtuvo {other:?}"),
        }
    }
    assert!(engine.store().list_account_reservations("A").await.unwrap().is_empty());
}

#[tokio::test]
async fn banquet_rejects_low_balance_and_missing_stock() {
    let engine = setup().await;

    let poor = engine
        .commit_banquet_reservation(banquet_request(1, 1, "7:00 PM", "pobre"))
        .await;
    assert!(matches!(
        poor,
        Err(AppError::InsufficientBalance { balance: 30, cost: 50 })
    ));

    // La mesa inactiva se comprueba después del saldo
    let inactive = engine
        .commit_banquet_reservation(banquet_request(3, 1, "7:00 PM", "pobre"))
        .await;
    assert!(matches!(
        inactive,
        Err(AppError::InsufficientBalance { balance: 30, cost: 50 })
    ));

    engine
        .store()
        .save_item(Insumo::new("sake", "sake", "botella", 0).unwrap())
        .await
        .unwrap();

    // El stock se verifica antes que el saldo
    let result = engine
        .commit_banquet_reservation(banquet_request(1, 1, "7:00 PM", "pobre"))
        .await;
    match assert_err!(result) {
        AppError::InsufficientStock { items } => {
            assert_eq!(items.len(), 1);
            assert_eq!(items[0].item_name, "sake");
            assert_eq!(items[0].required_quantity, 1);
            assert_eq!(items[0].available_quantity, 0);
        }
        other => panic!("se esperaba stock insuficiente, se obtuvo {other:?}"),
    }

    // Y también después del stock
    let inactive = engine
        .commit_banquet_reservation(banquet_request(3, 1, "7:00 PM", "A"))
        .await;
    assert!(matches!(inactive, Err(AppError::InsufficientStock { .. })));
    assert!(engine.store().list_reservations_on(FECHA).await.unwrap().is_empty());
}

#[tokio::test]
async fn equivalent_slot_labels_claim_the_same_seat() {
    let engine = setup().await;
    engine
        .commit_banquet_reservation(banquet_request(1, 2, "7:00 PM", "A"))
        .await
        .unwrap();

    let result = engine
        .commit_banquet_reservation(banquet_request(1, 2, "07:00 pm", "B"))
        .await;
    assert!(matches!(result, Err(AppError::SeatUnavailable(_))));
}

#[tokio::test]
async fn empty_grid_offers_no_slots() {
    let engine = setup_with(at("2025-12-01", 12, 0), SlotGrid::default()).await;

    let banquete = engine.resolve_time_slots(&BookingTarget::Banquet, fecha()).await.unwrap();
    assert!(banquete.is_empty());

    let onsen = engine
        .resolve_time_slots(&BookingTarget::Service("onsen".to_string()), fecha())
        .await
        .unwrap();
    assert!(onsen.is_empty());

    let result = engine
        .commit_banquet_reservation(banquet_request(1, 1, "7:00 PM", "A"))
        .await;
    assert!(matches!(result, Err(AppError::ValidationWithField { ref field, .. }) if field == "hora"));
}
