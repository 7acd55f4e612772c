// src/models/user.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// Um registro do diretório de pessoal, como o backend o devolve.
// `leader_id` é uma referência fraca para outro registro, nunca uma aresta de
// posse; o grafo restrito às arestas não-nulas tem de ser acíclico.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonnelRecord {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub id_number: Option<String>,
    pub role: String,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub leader_id: Option<i64>,
    #[serde(default)]
    pub position_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

// Atualização parcial de um usuário: só os campos que o backend aceita no
// PATCH, nada de payload dinâmico. Campos ausentes não entram no corpo.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl UserUpdate {
    // Aplica os campos presentes sobre um objeto JSON (o perfil embutido no
    // snapshot persistido), preservando o que não foi tocado.
    pub fn merge_into(&self, target: &mut Value) {
        let Value::Object(fields) = serde_json::to_value(self).unwrap_or(Value::Null) else {
            return;
        };
        if let Value::Object(existing) = target {
            for (key, value) in fields {
                existing.insert(key, value);
            }
        }
    }
}
