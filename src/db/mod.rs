// src/db/mod.rs
pub mod memory;
pub mod models;
pub mod mongodb;
pub mod seed;
pub mod store;

pub use memory::MemoryRepo;
pub use models::{Asiento, Cuenta, Insumo, Mesa, RequisitoInsumo, RequisitosServicio, Reserva, Servicio};
pub use self::mongodb::MongoRepo;
pub use store::BookingStore;
