//! Identidad entregada por el proveedor de identidad.
//!
//! La pasarela autentica al usuario y reenvía `X-User-Id` y `X-User-Role`.
//! Aquí solo se lee esa identidad y se decide si puede actuar sobre una cuenta.

use actix_web::HttpRequest;

use super::{AppError, AppResult};
use crate::db::{BookingStore, Cuenta};

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Personal del onsen: opera sobre cualquier cuenta
    Employee,
    /// Huésped: solo sobre sus propias cuentas
    Spirit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub role: Role,
}

fn header<'a>(req: &'a HttpRequest, name: &str) -> AppResult<&'a str> {
    let value = req
        .headers()
        .get(name)
        .ok_or_else(|| AppError::Unauthorized(format!("Falta header {}", name)))?;
    value
        .to_str()
        .map(str::trim)
        .map_err(|_| AppError::Unauthorized(format!("Header {} inválido", name)))
}

/// Extrae la identidad de los headers de la pasarela
pub fn extract_identity(req: &HttpRequest) -> AppResult<Identity> {
    let user_id = header(req, USER_ID_HEADER)?;
    if user_id.is_empty() {
        return Err(AppError::Unauthorized("Identidad vacía".to_string()));
    }

    let role = match header(req, USER_ROLE_HEADER)?.to_lowercase().as_str() {
        "employee" => Role::Employee,
        "spirit" => Role::Spirit,
        other => return Err(AppError::Unauthorized(format!("Rol desconocido '{}'", other))),
    };

    Ok(Identity {
        user_id: user_id.to_string(),
        role,
    })
}

impl Identity {
    pub fn can_act_for(&self, cuenta: &Cuenta) -> bool {
        match self.role {
            Role::Employee => true,
            Role::Spirit => cuenta.id_espiritu == self.user_id,
        }
    }
}

/// Verifica que la identidad pueda operar sobre la cuenta indicada.
///
/// Una cuenta inexistente se deja pasar para que el motor la rechace con su
/// propio error de validación.
pub async fn authorize_account<S: BookingStore>(
    store: &S,
    identity: &Identity,
    id_cuenta: &str,
) -> AppResult<()> {
    match store.get_account(id_cuenta).await? {
        Some(cuenta) if !identity.can_act_for(&cuenta) => {
            tracing::warn!(
                user_id = %identity.user_id,
                account_id = %id_cuenta,
                "Intento de operar sobre una cuenta ajena"
            );
            Err(AppError::Forbidden(
                "No tienes permiso para operar sobre esta cuenta".to_string(),
            ))
        }
        _ => Ok(()),
    }
}
