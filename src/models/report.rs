// src/models/report.rs

use chrono::{DateTime, Utc};
use serde::Deserialize;

// Agregado de presença de um usuário. O backend serializa a contagem de
// logins como string; o DTO mantém o fio como ele é.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserReport {
    pub user_id: i64,
    pub first_login: DateTime<Utc>,
    pub last_login: DateTime<Utc>,
    pub login_count: String,
}

// Uma linha crua de sessão do dia corrente. Transitório: nunca persistido,
// recarregado a cada visualização.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayReport {
    pub log_id: i64,
    pub user_id: i64,
    pub login_time: DateTime<Utc>,
    #[serde(default)]
    pub logout_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
