//! # Configuración
//!
//! Variables de entorno leídas una sola vez al arrancar (archivo `.env`
//! cargado con dotenvy en `main`):
//!
//! ```env
//! STORE_BACKEND=mongodb
//! MONGODB_URI=mongodb://localhost:27017
//! MONGODB_DATABASE=dogo_onsen
//! BIND_ADDRESS=0.0.0.0:8080
//! SLOT_GRID=5:00 PM,6:00 PM,7:00 PM,8:00 PM
//! SLOT_MINUTES=60
//! BANQUET_SERVICE_KEY=banquete
//! BANQUET_COST=50
//! BANQUET_TABLES=4
//! ```

use std::env;
use thiserror::Error;

use crate::booking::slots::SlotGrid;

pub const DEFAULT_SLOT_GRID: &str =
    "10:00 AM,11:00 AM,12:00 PM,1:00 PM,2:00 PM,3:00 PM,4:00 PM,5:00 PM,6:00 PM,7:00 PM,8:00 PM,9:00 PM";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Valor inválido para {var}: '{value}'")]
    InvalidValue { var: &'static str, value: String },

    #[error("Etiqueta de turno inválida en SLOT_GRID: '{0}'")]
    InvalidSlot(String),
}

/// Almacén de datos seleccionado con `STORE_BACKEND`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Mongo,
    Memory,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store: StoreBackend,
    pub mongodb_uri: String,
    pub mongodb_database: String,
    pub bind_address: String,
    pub slot_grid: SlotGrid,
    pub slot_minutes: i64,
    pub banquet_service_key: String,
    pub banquet_cost: i64,
    pub banquet_tables: i32,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Construye la configuración desde una función de búsqueda arbitraria
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str, default: &str| lookup(var).unwrap_or_else(|| default.to_string());

        let store = match get("STORE_BACKEND", "mongodb").to_lowercase().as_str() {
            "mongodb" | "mongo" => StoreBackend::Mongo,
            "memory" => StoreBackend::Memory,
            other => {
                return Err(ConfigError::InvalidValue {
                    var: "STORE_BACKEND",
                    value: other.to_string(),
                })
            }
        };

        let raw_grid = get("SLOT_GRID", DEFAULT_SLOT_GRID);
        let labels: Vec<&str> = raw_grid
            .split(',')
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .collect();
        let slot_grid = SlotGrid::parse(labels.as_slice()).map_err(ConfigError::InvalidSlot)?;

        Ok(AppConfig {
            store,
            mongodb_uri: get("MONGODB_URI", "mongodb://localhost:27017"),
            mongodb_database: get("MONGODB_DATABASE", "dogo_onsen"),
            bind_address: get("BIND_ADDRESS", "0.0.0.0:8080"),
            slot_grid,
            slot_minutes: parse_positive("SLOT_MINUTES", &get("SLOT_MINUTES", "60"))?,
            banquet_service_key: get("BANQUET_SERVICE_KEY", "banquete"),
            banquet_cost: parse_non_negative("BANQUET_COST", &get("BANQUET_COST", "50"))?,
            banquet_tables: parse_table_count(&get("BANQUET_TABLES", "4"))?,
        })
    }
}

fn parse_non_negative(var: &'static str, value: &str) -> Result<i64, ConfigError> {
    match value.trim().parse::<i64>() {
        Ok(parsed) if parsed >= 0 => Ok(parsed),
        _ => Err(ConfigError::InvalidValue {
            var,
            value: value.to_string(),
        }),
    }
}

fn parse_table_count(value: &str) -> Result<i32, ConfigError> {
    let parsed = parse_non_negative("BANQUET_TABLES", value)?;
    i32::try_from(parsed).map_err(|_| ConfigError::InvalidValue {
        var: "BANQUET_TABLES",
        value: value.to_string(),
    })
}

fn parse_positive(var: &'static str, value: &str) -> Result<i64, ConfigError> {
    match parse_non_negative(var, value)? {
        0 => Err(ConfigError::InvalidValue {
            var,
            value: value.to_string(),
        }),
        parsed => Ok(parsed),
    }
}
