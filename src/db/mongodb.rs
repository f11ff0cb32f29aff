use mongodb::bson::doc;
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, Cursor, Database, IndexModel};
use serde::de::DeserializeOwned;

use super::models::{Cuenta, Insumo, Mesa, RequisitosServicio, Reserva, Servicio};
use super::store::BookingStore;
use crate::api::middleware::ErrorLogExt;
use crate::api::{AppError, AppResult};

/// Código de MongoDB para violación de índice único
const DUPLICATE_KEY: i32 = 11000;

#[derive(Debug, Clone)]
pub struct MongoRepo {
    pub client: Client,
    pub database: Database,
}

impl MongoRepo {
    pub async fn init(uri: &str, database_name: &str) -> AppResult<MongoRepo> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| AppError::database("connect", e))?;

        let database = client.database(database_name);

        // Test connection
        database
            .run_command(doc! {"ping": 1})
            .await
            .map_err(|e| AppError::database("ping", e))?;

        tracing::info!(database = %database_name, "Conexión a MongoDB establecida exitosamente");

        Ok(MongoRepo { client, database })
    }

    pub fn servicios(&self) -> Collection<Servicio> {
        self.database.collection("servicios")
    }

    pub fn cuentas(&self) -> Collection<Cuenta> {
        self.database.collection("cuentas")
    }

    pub fn mesas(&self) -> Collection<Mesa> {
        self.database.collection("mesas")
    }

    pub fn reservas(&self) -> Collection<Reserva> {
        self.database.collection("reservas")
    }

    pub fn insumos(&self) -> Collection<Insumo> {
        self.database.collection("insumos")
    }

    pub fn requisitos(&self) -> Collection<RequisitosServicio> {
        self.database.collection("requisitos")
    }

    pub async fn create_indexes(&self) -> AppResult<()> {
        let reservation_indexes = vec![
            IndexModel::builder()
                .keys(doc! { "id_cuenta": 1 })
                .build(),
            IndexModel::builder()
                .keys(doc! { "fecha": 1, "hora": 1 })
                .build(),
            // Un asiento por turno: garantiza la unicidad aunque dos commits compitan
            IndexModel::builder()
                .keys(doc! { "id_mesa": 1, "numero_asiento": 1, "fecha": 1, "hora": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .partial_filter_expression(doc! { "id_mesa": { "$exists": true } })
                        .build(),
                )
                .build(),
            // Cada unidad de capacidad de un turno de servicio, una sola vez
            IndexModel::builder()
                .keys(doc! { "id_servicio": 1, "fecha": 1, "hora": 1, "cupo": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .partial_filter_expression(doc! { "cupo": { "$exists": true } })
                        .build(),
                )
                .build(),
        ];

        self.reservas()
            .create_indexes(reservation_indexes)
            .await
            .map_err(|e| AppError::database("create_indexes_reservas", e))?;

        tracing::info!("Índices MongoDB creados exitosamente");
        Ok(())
    }

    /// Unidades ya ocupadas del turno de servicio de la reserva
    async fn taken_units(&self, reserva: &Reserva) -> AppResult<Vec<i32>> {
        let cursor = self
            .reservas()
            .find(doc! {
                "id_servicio": reserva.id_servicio.clone().unwrap_or_default(),
                "fecha": &reserva.fecha,
                "hora": &reserva.hora,
                "cupo": { "$exists": true },
            })
            .await
            .log_error_context("listing taken service units")
            .map_err(|e| AppError::database("taken_units", e))?;
        let reservas = collect(cursor, "taken_units").await?;
        Ok(reservas.into_iter().filter_map(|r| r.cupo).collect())
    }
}

fn is_duplicate_key(error: &mongodb::error::Error) -> bool {
    matches!(
        error.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY
    )
}

async fn collect<T>(mut cursor: Cursor<T>, operation: &str) -> AppResult<Vec<T>>
where
    T: DeserializeOwned + Send + Sync,
{
    let mut results = Vec::new();
    while cursor
        .advance()
        .await
        .map_err(|e| AppError::database(operation, e))?
    {
        let item = cursor
            .deserialize_current()
            .map_err(|e| AppError::database(operation, e))?;
        results.push(item);
    }
    Ok(results)
}

impl BookingStore for MongoRepo {
    async fn get_service(&self, id: &str) -> AppResult<Option<Servicio>> {
        self.servicios()
            .find_one(doc! { "_id": id })
            .await
            .map_err(|e| AppError::database("get_service", e))
    }

    async fn get_account(&self, id: &str) -> AppResult<Option<Cuenta>> {
        self.cuentas()
            .find_one(doc! { "_id": id })
            .await
            .map_err(|e| AppError::database("get_account", e))
    }

    async fn get_table(&self, id: i32) -> AppResult<Option<Mesa>> {
        self.mesas()
            .find_one(doc! { "_id": id })
            .await
            .map_err(|e| AppError::database("get_table", e))
    }

    async fn list_tables(&self) -> AppResult<Vec<Mesa>> {
        let cursor = self
            .mesas()
            .find(doc! {})
            .sort(doc! { "_id": 1 })
            .await
            .log_error_context("listing banquet tables")
            .map_err(|e| AppError::database("list_tables", e))?;
        collect(cursor, "list_tables").await
    }

    async fn list_reservations_on(&self, fecha: &str) -> AppResult<Vec<Reserva>> {
        let cursor = self
            .reservas()
            .find(doc! { "fecha": fecha })
            .await
            .map_err(|e| AppError::database("list_reservations_on", e))?;
        collect(cursor, "list_reservations_on").await
    }

    async fn list_banquet_reservations(&self, fecha: &str, hora: &str) -> AppResult<Vec<Reserva>> {
        let cursor = self
            .reservas()
            .find(doc! { "fecha": fecha, "hora": hora, "id_mesa": { "$exists": true } })
            .await
            .map_err(|e| AppError::database("list_banquet_reservations", e))?;
        collect(cursor, "list_banquet_reservations").await
    }

    async fn list_account_reservations(&self, id_cuenta: &str) -> AppResult<Vec<Reserva>> {
        let cursor = self
            .reservas()
            .find(doc! { "id_cuenta": id_cuenta })
            .sort(doc! { "inicio": 1 })
            .await
            .map_err(|e| AppError::database("list_account_reservations", e))?;
        collect(cursor, "list_account_reservations").await
    }

    async fn get_reservation(&self, id: &str) -> AppResult<Option<Reserva>> {
        self.reservas()
            .find_one(doc! { "_id": id })
            .await
            .map_err(|e| AppError::database("get_reservation", e))
    }

    async fn get_requirements(&self, id_servicio: &str) -> AppResult<Option<RequisitosServicio>> {
        self.requisitos()
            .find_one(doc! { "_id": id_servicio })
            .await
            .map_err(|e| AppError::database("get_requirements", e))
    }

    async fn get_items(&self, ids: &[String]) -> AppResult<Vec<Insumo>> {
        let cursor = self
            .insumos()
            .find(doc! { "_id": { "$in": ids.to_vec() } })
            .await
            .map_err(|e| AppError::database("get_items", e))?;
        collect(cursor, "get_items").await
    }

    async fn insert_banquet_reservation(&self, reserva: Reserva) -> AppResult<Reserva> {
        match self.reservas().insert_one(&reserva).await {
            Ok(_) => Ok(reserva),
            Err(e) if is_duplicate_key(&e) => {
                tracing::debug!(
                    id_mesa = ?reserva.id_mesa,
                    asiento = ?reserva.numero_asiento,
                    "Índice único rechazó la reserva de asiento"
                );
                Err(AppError::seat_taken())
            }
            Err(e) => Err(AppError::database("insert_banquet_reservation", e)),
        }
    }

    async fn insert_service_reservation(&self, reserva: Reserva, capacidad: i32) -> AppResult<Reserva> {
        let taken = self.taken_units(&reserva).await?;
        let mut reserva = reserva;

        // El índice único sobre (servicio, fecha, hora, cupo) decide entre commits concurrentes
        for cupo in (0..capacidad).filter(|n| !taken.contains(n)) {
            reserva.cupo = Some(cupo);
            match self.reservas().insert_one(&reserva).await {
                Ok(_) => return Ok(reserva),
                Err(e) if is_duplicate_key(&e) => {
                    tracing::debug!(
                        service_id = ?reserva.id_servicio,
                        cupo,
                        "Unidad del turno tomada por otra reserva"
                    );
                }
                Err(e) => return Err(AppError::database("insert_service_reservation", e)),
            }
        }
        Err(AppError::seat_taken())
    }

    async fn delete_reservation(&self, reserva: &Reserva) -> AppResult<bool> {
        let result = self
            .reservas()
            .delete_one(doc! { "_id": &reserva.id, "canjeada": false })
            .await
            .map_err(|e| AppError::database("delete_reservation", e))?;
        Ok(result.deleted_count == 1)
    }

    async fn mark_redeemed(&self, id: &str) -> AppResult<bool> {
        let result = self
            .reservas()
            .update_one(
                doc! { "_id": id, "canjeada": false },
                doc! { "$set": { "canjeada": true } },
            )
            .await
            .map_err(|e| AppError::database("mark_redeemed", e))?;
        Ok(result.modified_count == 1)
    }

    async fn set_rating(&self, id: &str, calificacion: i32) -> AppResult<bool> {
        let result = self
            .reservas()
            .update_one(
                doc! { "_id": id, "canjeada": true },
                doc! { "$set": { "calificacion": calificacion } },
            )
            .await
            .map_err(|e| AppError::database("set_rating", e))?;
        Ok(result.matched_count == 1)
    }

    async fn save_table(&self, mesa: Mesa) -> AppResult<()> {
        self.mesas()
            .replace_one(doc! { "_id": mesa.id }, &mesa)
            .upsert(true)
            .await
            .map_err(|e| AppError::database("save_table", e))?;
        Ok(())
    }

    async fn save_service(&self, servicio: Servicio) -> AppResult<()> {
        self.servicios()
            .replace_one(doc! { "_id": &servicio.id }, &servicio)
            .upsert(true)
            .await
            .map_err(|e| AppError::database("save_service", e))?;
        Ok(())
    }

    async fn save_account(&self, cuenta: Cuenta) -> AppResult<()> {
        self.cuentas()
            .replace_one(doc! { "_id": &cuenta.id }, &cuenta)
            .upsert(true)
            .await
            .map_err(|e| AppError::database("save_account", e))?;
        Ok(())
    }

    async fn save_item(&self, insumo: Insumo) -> AppResult<()> {
        self.insumos()
            .replace_one(doc! { "_id": &insumo.id }, &insumo)
            .upsert(true)
            .await
            .map_err(|e| AppError::database("save_item", e))?;
        Ok(())
    }

    async fn save_requirements(&self, requisitos: RequisitosServicio) -> AppResult<()> {
        self.requisitos()
            .replace_one(doc! { "_id": &requisitos.id_servicio }, &requisitos)
            .upsert(true)
            .await
            .map_err(|e| AppError::database("save_requirements", e))?;
        Ok(())
    }
}
