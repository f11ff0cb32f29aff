//! # Manejo de errores
//!
//! Un único enum `AppError` (thiserror) agrupa los fallos de infraestructura
//! y los resultados de negocio esperados del motor de reservas. Cada variante
//! se traduce a un código HTTP y un mensaje específico, para que el huésped
//! pueda corregir el problema real (otro asiento, esperar reposición, recargar saldo).

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use mongodb::error::ErrorKind;
use serde::Serialize;
use std::error::Error;
use thiserror::Error;

use crate::booking::stock::InsufficientItem;

/// Tipos de error de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    /// Error de base de datos con contexto de operación
    #[error("Error de base de datos en operación '{operation}': {source}")]
    Database {
        operation: String,
        #[source]
        source: mongodb::error::Error,
    },

    /// El almacén de datos no responde
    #[error("Servicio de datos no disponible: {0}")]
    BackendUnavailable(String),

    /// Error de validación con campo específico
    #[error("Error de validación en campo '{field}': {message}")]
    ValidationWithField {
        field: String,
        message: String,
    },

    /// Falta identidad o no es válida
    #[error("No autorizado: {0}")]
    Unauthorized(String),

    /// Identidad válida sin permiso sobre el recurso
    #[error("Prohibido: {0}")]
    Forbidden(String),

    /// Error de recurso no encontrado
    #[error("No encontrado: {resource_type} con ID '{id}'")]
    NotFoundWithId {
        resource_type: String,
        id: String,
    },

    /// Error de conflicto de estado
    #[error("Conflicto: {0}")]
    Conflict(String),

    /// El asiento o turno ya fue tomado por otra reserva
    #[error("Asiento no disponible: {0}")]
    SeatUnavailable(String),

    /// Faltan insumos para prestar el servicio
    #[error("Stock insuficiente para {} insumo(s)", .items.len())]
    InsufficientStock { items: Vec<InsufficientItem> },

    /// El saldo de la cuenta no cubre el costo
    #[error("Saldo insuficiente: saldo {balance} EILT, costo {cost} EILT")]
    InsufficientBalance { balance: i64, cost: i64 },

    /// Error interno simple
    #[error("Error interno: {0}")]
    Internal(String),
}

impl AppError {
    /// Crea un error de base de datos con contexto de operación
    pub fn database(operation: &str, source: mongodb::error::Error) -> Self {
        if is_transport_failure(&source) {
            return Self::BackendUnavailable(format!("{}: {}", operation, source));
        }
        Self::Database {
            operation: operation.to_string(),
            source,
        }
    }

    /// Crea un error de validación con campo específico
    pub fn validation_field(field: &str, message: &str) -> Self {
        Self::ValidationWithField {
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    /// Crea un error de no encontrado con ID
    pub fn not_found_id(resource_type: &str, id: &str) -> Self {
        Self::NotFoundWithId {
            resource_type: resource_type.to_string(),
            id: id.to_string(),
        }
    }

    /// Mensaje por defecto cuando un asiento/turno ya está tomado
    pub fn seat_taken() -> Self {
        Self::SeatUnavailable("Por favor elija otro asiento u horario".to_string())
    }
}

fn is_transport_failure(error: &mongodb::error::Error) -> bool {
    matches!(
        error.kind.as_ref(),
        ErrorKind::ServerSelection { .. } | ErrorKind::Io(_) | ErrorKind::ConnectionPoolCleared { .. }
    )
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insufficient_items: Option<Vec<InsufficientItem>>,
}

impl ErrorResponse {
    fn new(error: &str, message: String) -> Self {
        Self {
            error: error.to_string(),
            message,
            insufficient_items: None,
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::ValidationWithField { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFoundWithId { .. } => StatusCode::NOT_FOUND,
            Self::Conflict(_) | Self::SeatUnavailable(_) => StatusCode::CONFLICT,
            Self::InsufficientStock { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::InsufficientBalance { .. } => StatusCode::PAYMENT_REQUIRED,
            Self::BackendUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Database { .. } | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            Self::Database { operation, source } => {
                tracing::error!(
                    operation = %operation,
                    error = %source,
                    error_chain = ?source.source(),
                    "Database error occurred"
                );
                ErrorResponse::new("Error de base de datos", "Error interno del servidor".to_string())
            }
            Self::BackendUnavailable(detail) => {
                tracing::error!(detail = %detail, "Backend unavailable");
                ErrorResponse::new(
                    "Servicio no disponible",
                    "El servicio de datos no responde, intente nuevamente".to_string(),
                )
            }
            Self::ValidationWithField { field, message } => {
                tracing::warn!(field = %field, message = %message, "Validation error");
                ErrorResponse::new("Error de validación", format!("Campo '{}': {}", field, message))
            }
            Self::NotFoundWithId { resource_type, id } => {
                tracing::info!(resource_type = %resource_type, id = %id, "Resource not found");
                ErrorResponse::new(
                    "No encontrado",
                    format!("{} con ID '{}' no encontrado", resource_type, id),
                )
            }
            Self::SeatUnavailable(message) => {
                tracing::info!(message = %message, "Seat unavailable");
                ErrorResponse::new("Asiento no disponible", message.clone())
            }
            Self::InsufficientStock { items } => {
                tracing::info!(items = ?items, "Insufficient stock");
                ErrorResponse {
                    error: "Stock insuficiente".to_string(),
                    message: "No hay insumos suficientes para este servicio, espere reposición"
                        .to_string(),
                    insufficient_items: Some(items.clone()),
                }
            }
            Self::InsufficientBalance { balance, cost } => {
                tracing::info!(balance, cost, "Insufficient balance");
                ErrorResponse::new(
                    "Saldo insuficiente",
                    format!("El servicio cuesta {} EILT y el saldo es {} EILT", cost, balance),
                )
            }
            Self::Unauthorized(message) => ErrorResponse::new("No autorizado", message.clone()),
            Self::Forbidden(message) => ErrorResponse::new("Prohibido", message.clone()),
            Self::Conflict(message) => ErrorResponse::new("Conflicto", message.clone()),
            Self::Internal(_) => {
                tracing::error!(error = %self, error_chain = ?self.source(), "General error");
                ErrorResponse::new("Error", self.to_string())
            }
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}

pub type AppResult<T> = Result<T, AppError>;

impl From<mongodb::error::Error> for AppError {
    fn from(error: mongodb::error::Error) -> Self {
        Self::database("database_operation", error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_failures_map_to_distinct_statuses() {
        let statuses = [
            AppError::seat_taken().status_code(),
            AppError::InsufficientBalance { balance: 30, cost: 50 }.status_code(),
            AppError::InsufficientStock { items: vec![] }.status_code(),
            AppError::validation_field("fecha", "en el pasado").status_code(),
        ];
        assert_eq!(
            statuses,
            [
                StatusCode::CONFLICT,
                StatusCode::PAYMENT_REQUIRED,
                StatusCode::UNPROCESSABLE_ENTITY,
                StatusCode::BAD_REQUEST,
            ]
        );
    }

    #[test]
    fn insufficient_balance_message_names_both_amounts() {
        let error = AppError::InsufficientBalance { balance: 30, cost: 50 };
        let message = error.to_string();
        assert!(message.contains("30"));
        assert!(message.contains("50"));
    }
}
