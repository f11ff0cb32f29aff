//! # Dogo Onsen Reservas
//!
//! Motor de reservas del onsen: turnos disponibles, ocupación de las mesas
//! del banquete, verificación de insumos y saldo, y confirmación atómica de
//! reservas frente a peticiones concurrentes.
//!
//! ## Arquitectura
//!
//! ```text
//! Pasarela / frontend
//!     ↓ HTTP/JSON (X-User-Id, X-User-Role)
//! API REST (Actix Web)
//!     ↓
//! BookingEngine (turnos, asientos, insumos, confirmación)
//!     ↓ BookingStore
//! MongoDB | memoria
//! ```

pub mod api;
pub mod booking;
pub mod config;
pub mod db;
