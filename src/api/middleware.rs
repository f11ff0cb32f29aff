//! # Registro de cadenas de error
//!
//! Los errores del driver de MongoDB suelen envolver la causa real (timeout,
//! conexión rechazada). Antes de convertirlos en `AppError` se registra la
//! cadena completa de `source()`.

use std::error::Error as StdError;

/// Recorre `source()` y devuelve los mensajes desde el error externo al más interno
pub fn error_chain<E>(error: &E) -> Vec<String>
where
    E: StdError + 'static,
{
    let mut chain = Vec::new();
    let mut current: Option<&dyn StdError> = Some(error);
    while let Some(err) = current {
        chain.push(err.to_string());
        current = err.source();
    }
    chain
}

/// Registra la cadena completa de errores con un contexto
pub fn log_error_chain<E>(error: &E, context: &str)
where
    E: StdError + 'static,
{
    let chain = error_chain(error);
    tracing::error!(
        context = %context,
        depth = chain.len(),
        error_chain = ?chain,
        "Error with full chain"
    );
}

/// Extension trait para Results que registra la cadena de errores sin consumirla
///
/// ```ignore
/// collection
///     .find(doc! {})
///     .await
///     .log_error_context("listing banquet tables")
///     .map_err(|e| AppError::database("list_tables", e))?;
/// ```
pub trait ErrorLogExt<T, E> {
    fn log_error_context(self, context: &str) -> Result<T, E>;
}

impl<T, E> ErrorLogExt<T, E> for Result<T, E>
where
    E: StdError + 'static,
{
    fn log_error_context(self, context: &str) -> Result<T, E> {
        if let Err(ref error) = self {
            log_error_chain(error, context);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thiserror::Error;

    #[derive(Error, Debug)]
    #[error("conexión rechazada")]
    struct Inner;

    #[derive(Error, Debug)]
    #[error("no se pudo listar mesas")]
    struct Outer(#[source] Inner);

    #[test]
    fn chain_goes_from_outer_to_inner() {
        assert_eq!(
            error_chain(&Outer(Inner)),
            vec!["no se pudo listar mesas", "conexión rechazada"]
        );
    }

    #[test]
    fn ok_results_pass_through() {
        let result: Result<i32, Outer> = Ok(7);
        assert_eq!(result.log_error_context("test").unwrap(), 7);
    }
}
