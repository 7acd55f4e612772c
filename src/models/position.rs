// src/models/position.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

// Entrada do catálogo de cargos. Sem relações próprias; registros de pessoal
// apontam para cá via `positionId`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub is_active: bool,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

// Dados para criação de um cargo
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewPosition {
    #[validate(length(min = 1, message = "O nome do cargo é obrigatório."))]
    pub name: String,
    pub description: String,
    pub is_active: bool,
}

// Atualização parcial de um cargo
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
