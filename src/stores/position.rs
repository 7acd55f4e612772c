// src/stores/position.rs

use std::sync::{Arc, RwLock};

use validator::Validate;

use crate::common::error::ClientError;
use crate::models::position::{NewPosition, Position, PositionUpdate};
use crate::remote::{Method, RemoteClient};

// Cache CRUD simples sobre o catálogo de cargos. Sem invariantes entre
// registros; cada operação devolve o payload da resposta ao chamador e só
// `get_all` substitui a lista em cache.
pub struct PositionStore {
    remote: Arc<dyn RemoteClient>,
    positions: RwLock<Vec<Position>>,
}

impl PositionStore {
    pub fn new(remote: Arc<dyn RemoteClient>) -> Self {
        Self {
            remote,
            positions: RwLock::new(Vec::new()),
        }
    }

    pub fn positions(&self) -> Vec<Position> {
        self.positions
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub async fn get_all(&self) -> Result<Vec<Position>, ClientError> {
        let value = self.remote.request(Method::Get, "/position", None).await?;
        let positions: Vec<Position> = serde_json::from_value(value)?;
        *self
            .positions
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = positions.clone();
        Ok(positions)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Position, ClientError> {
        let value = self
            .remote
            .request(Method::Get, &format!("/position/{id}"), None)
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn create(&self, position: &NewPosition) -> Result<Position, ClientError> {
        position.validate()?;
        let value = self
            .remote
            .request(Method::Post, "/position", Some(serde_json::to_value(position)?))
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn update(&self, id: i64, update: &PositionUpdate) -> Result<Position, ClientError> {
        let value = self
            .remote
            .request(
                Method::Put,
                &format!("/position/{id}"),
                Some(serde_json::to_value(update)?),
            )
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ClientError> {
        self.remote
            .request(Method::Delete, &format!("/position/{id}"), None)
            .await?;
        Ok(())
    }
}
