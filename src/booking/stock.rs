//! Verificación de insumos requeridos por un servicio.

use serde::Serialize;
use std::collections::HashMap;

use crate::api::AppResult;
use crate::db::{BookingStore, Insumo, RequisitoInsumo};

/// Insumo cuyo stock no alcanza, listo para mostrar al huésped
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InsufficientItem {
    pub item_name: String,
    pub required_quantity: i64,
    pub available_quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockReport {
    pub is_available: bool,
    pub insufficient_items: Vec<InsufficientItem>,
}

impl StockReport {
    fn from_items(insufficient_items: Vec<InsufficientItem>) -> Self {
        StockReport {
            is_available: insufficient_items.is_empty(),
            insufficient_items,
        }
    }
}

/// Compara cada requisito con el stock actual.
///
/// Un insumo requerido que no existe en el inventario cuenta como stock 0 y
/// se muestra por su identificador.
pub fn evaluate(requisitos: &[RequisitoInsumo], insumos: &[Insumo]) -> StockReport {
    let by_id: HashMap<&str, &Insumo> = insumos.iter().map(|i| (i.id.as_str(), i)).collect();

    let insufficient = requisitos
        .iter()
        .filter_map(|requisito| {
            let (nombre, disponible) = match by_id.get(requisito.id_insumo.as_str()) {
                Some(insumo) => (insumo.nombre.clone(), insumo.cantidad),
                None => (requisito.id_insumo.clone(), 0),
            };
            (disponible < requisito.cantidad).then(|| InsufficientItem {
                item_name: nombre,
                required_quantity: requisito.cantidad,
                available_quantity: disponible,
            })
        })
        .collect();

    StockReport::from_items(insufficient)
}

pub async fn check_availability<S: BookingStore>(store: &S, service_key: &str) -> AppResult<StockReport> {
    let Some(requisitos) = store.get_requirements(service_key).await? else {
        tracing::warn!(
            service_key = %service_key,
            "Servicio sin requisitos de insumos registrados, se considera disponible"
        );
        return Ok(StockReport::from_items(Vec::new()));
    };

    if requisitos.insumos.is_empty() {
        return Ok(StockReport::from_items(Vec::new()));
    }

    let ids: Vec<String> = requisitos
        .insumos
        .iter()
        .map(|requisito| requisito.id_insumo.clone())
        .collect();
    let insumos = store.get_items(&ids).await?;
    let report = evaluate(&requisitos.insumos, &insumos);

    if !report.is_available {
        tracing::debug!(
            service_key = %service_key,
            faltantes = report.insufficient_items.len(),
            "Stock insuficiente"
        );
    }
    Ok(report)
}
