//! # Dogo Onsen Reservas Server
//!
//! Servidor web del motor de reservas del onsen, construido con Rust,
//! Actix Web y MongoDB.
//!
//! ## Configuración
//!
//! Variables de entorno (archivo `.env`), ver [`dogo_onsen_reservas::config`]:
//!
//! ```env
//! STORE_BACKEND=mongodb
//! MONGODB_URI=mongodb://localhost:27017
//! MONGODB_DATABASE=dogo_onsen
//! BIND_ADDRESS=0.0.0.0:8080
//! RUST_LOG=dogo_onsen_reservas=debug,mongodb=info
//! ```
//!
//! ## Ejecución
//!
//! ```bash
//! # MongoDB local: docker run -d --name mongo -p 27017:27017 mongo:latest
//! cargo run
//!
//! # Sin base de datos
//! STORE_BACKEND=memory cargo run
//! ```

use actix_web::{middleware::Logger, web, App, HttpServer};
use tracing_subscriber::EnvFilter;

use dogo_onsen_reservas::api;
use dogo_onsen_reservas::booking::{BookingEngine, BookingSettings};
use dogo_onsen_reservas::config::{AppConfig, StoreBackend};
use dogo_onsen_reservas::db::{seed, BookingStore, MemoryRepo, MongoRepo};

fn io_error(message: String) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, message)
}

/// Siembra mesas y servicio de banquete, y sirve la API sobre el almacén dado
async fn serve<S: BookingStore>(store: S, config: AppConfig) -> std::io::Result<()> {
    seed::ensure_banquet_tables(&store, config.banquet_tables)
        .await
        .map_err(|e| io_error(format!("Error creando mesas: {}", e)))?;
    seed::ensure_banquet_service(&store, &config.banquet_service_key, config.banquet_cost)
        .await
        .map_err(|e| io_error(format!("Error registrando banquete: {}", e)))?;

    if config.slot_grid.is_empty() {
        tracing::warn!("SLOT_GRID está vacío: no se ofrecerán turnos");
    }

    let engine = web::Data::new(BookingEngine::new(store, BookingSettings::from_config(&config)));

    tracing::info!(bind_address = %config.bind_address, "Servidor iniciando");

    HttpServer::new(move || {
        App::new()
            .app_data(engine.clone())
            .wrap(Logger::default())
            .configure(api::init_routes::<S>)
    })
    .bind(&config.bind_address)?
    .run()
    .await
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("dogo_onsen_reservas=debug,mongodb=info,actix_web=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!(error = %e, "Configuración inválida");
        io_error(e.to_string())
    })?;

    tracing::info!(store = ?config.store, "Iniciando Dogo Onsen Reservas");

    match config.store {
        StoreBackend::Mongo => {
            let repo = MongoRepo::init(&config.mongodb_uri, &config.mongodb_database)
                .await
                .map_err(|e| {
                    tracing::error!("Error conectando a MongoDB: {}", e);
                    io_error(format!("Error de MongoDB: {}", e))
                })?;

            // Sin el índice único la unicidad de asientos no está garantizada
            repo.create_indexes()
                .await
                .map_err(|e| io_error(format!("Error creando índices: {}", e)))?;

            serve(repo, config).await
        }
        StoreBackend::Memory => {
            tracing::warn!("Usando almacén en memoria: los datos se pierden al reiniciar");
            serve(MemoryRepo::new(), config).await
        }
    }
}
