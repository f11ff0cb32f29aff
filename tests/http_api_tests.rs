mod common;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use serde_json::{json, Value};

use common::{setup, FECHA};
use dogo_onsen_reservas::api;
use dogo_onsen_reservas::api::identity::{USER_ID_HEADER, USER_ROLE_HEADER};
use dogo_onsen_reservas::api::reservation::ReservationResponse;
use dogo_onsen_reservas::db::MemoryRepo;

fn employee(req: test::TestRequest) -> test::TestRequest {
    req.insert_header((USER_ID_HEADER, "yubaba"))
        .insert_header((USER_ROLE_HEADER, "employee"))
}

fn banquet_body(asiento: i32, cuenta: &str) -> Value {
    json!({
        "id_mesa": 1,
        "numero_asiento": asiento,
        "fecha": FECHA,
        "hora": "7:00 PM",
        "id_cuenta": cuenta,
    })
}

#[actix_web::test]
async fn banquet_flow_over_http() {
    let engine = setup().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::from(engine))
            .configure(api::init_routes::<MemoryRepo>),
    )
    .await;

    let req = test::TestRequest::get()
        .uri(&format!("/banquet/slots?fecha={}", FECHA))
        .to_request();
    let slots: Vec<String> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(slots, vec!["6:00 PM", "7:00 PM", "8:00 PM"]);

    let req = employee(test::TestRequest::post().uri("/banquet/reservations"))
        .set_json(banquet_body(3, "A"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let reserva: ReservationResponse = test::read_body_json(resp).await;
    assert_eq!(reserva.id_mesa, Some(1));
    assert_eq!(reserva.numero_asiento, Some(3));

    let req = employee(test::TestRequest::post().uri("/banquet/reservations"))
        .set_json(banquet_body(3, "B"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::get()
        .uri(&format!("/banquet/seats?fecha={}&hora=7:00%20PM", FECHA))
        .to_request();
    let mesas: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(mesas[0]["id_mesa"], 1);
    assert_eq!(mesas[0]["asientos"][2]["estado"], "ocupado");
    assert_eq!(mesas[0]["asientos"][3]["estado"], "libre");
    assert_eq!(mesas[2]["asientos"][0]["estado"], "no_disponible");

    let req = employee(test::TestRequest::get().uri("/accounts/A/reservations")).to_request();
    let reservas: Vec<ReservationResponse> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(reservas.len(), 1);
    assert_eq!(reservas[0].id, reserva.id);
}

#[actix_web::test]
async fn failures_map_to_specific_statuses() {
    let engine = setup().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::from(engine))
            .configure(api::init_routes::<MemoryRepo>),
    )
    .await;

    // Sin identidad
    let req = test::TestRequest::post()
        .uri("/banquet/reservations")
        .set_json(banquet_body(1, "A"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

    // Un huésped reservando para otra cuenta
    let req = test::TestRequest::post()
        .uri("/banquet/reservations")
        .insert_header((USER_ID_HEADER, "espiritu-B"))
        .insert_header((USER_ROLE_HEADER, "spirit"))
        .set_json(banquet_body(1, "A"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    // El mismo huésped sobre su propia cuenta
    let req = test::TestRequest::post()
        .uri("/banquet/reservations")
        .insert_header((USER_ID_HEADER, "espiritu-B"))
        .insert_header((USER_ROLE_HEADER, "spirit"))
        .set_json(banquet_body(1, "B"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let req = employee(test::TestRequest::post().uri("/banquet/reservations"))
        .set_json(banquet_body(2, "pobre"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::PAYMENT_REQUIRED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Saldo insuficiente");

    let req = employee(test::TestRequest::post().uri("/services/onsen/reservations"))
        .set_json(json!({ "id_cuenta": "A", "fecha": "2025-11-01", "hora": "6:00 PM" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = employee(test::TestRequest::post().uri("/services/banquete/reservations"))
        .set_json(json!({ "id_cuenta": "A", "fecha": FECHA, "hora": "6:00 PM" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri(&format!("/banquet/seats?fecha={}&hora=7:15%20PM", FECHA))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = employee(test::TestRequest::post().uri("/reservations/no-existe/cancel")).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn stock_endpoint_lists_shortfalls() {
    let engine = setup().await;
    use dogo_onsen_reservas::db::{BookingStore, Insumo};
    engine
        .store()
        .save_item(Insumo::new("toallas", "towels", "unidad", 1).unwrap())
        .await
        .unwrap();

    let app = test::init_service(
        App::new()
            .app_data(web::Data::from(engine))
            .configure(api::init_routes::<MemoryRepo>),
    )
    .await;

    let req = test::TestRequest::get().uri("/stock/onsen").to_request();
    let report: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(report["is_available"], false);
    assert_eq!(report["insufficient_items"][0]["item_name"], "towels");
    assert_eq!(report["insufficient_items"][0]["required_quantity"], 2);
    assert_eq!(report["insufficient_items"][0]["available_quantity"], 1);

    let req = employee(test::TestRequest::post().uri("/services/onsen/reservations"))
        .set_json(json!({ "id_cuenta": "A", "fecha": FECHA, "hora": "6:00 PM" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["insufficient_items"][0]["item_name"], "towels");

    let req = test::TestRequest::get().uri("/health").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}
