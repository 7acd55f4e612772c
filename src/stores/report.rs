// src/stores/report.rs

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::common::error::ClientError;
use crate::models::report::{TodayReport, UserReport};
use crate::remote::{Method, RemoteClient};

#[derive(Default)]
struct ReportState {
    user_report: Option<UserReport>,
    today_report: Vec<TodayReport>,
    loading: bool,
    error: Option<String>,
}

// Recuperação assíncrona dos agregados de presença. Independente dos outros
// stores exceto pelo id de usuário recebido. Não há de-duplicação nem
// cancelamento: duas chamadas sobrepostas correm até o fim e vence a resposta
// que resolver por último.
pub struct ReportStore {
    remote: Arc<dyn RemoteClient>,
    state: RwLock<ReportState>,
}

impl ReportStore {
    pub fn new(remote: Arc<dyn RemoteClient>) -> Self {
        Self {
            remote,
            state: RwLock::new(ReportState::default()),
        }
    }

    pub fn user_report(&self) -> Option<UserReport> {
        self.read().user_report.clone()
    }

    pub fn today_report(&self) -> Vec<TodayReport> {
        self.read().today_report.clone()
    }

    pub fn loading(&self) -> bool {
        self.read().loading
    }

    pub fn error(&self) -> Option<String> {
        self.read().error.clone()
    }

    // Na falha, a mensagem é fixa e o valor anterior fica onde está
    // (stale-on-error); quem exibe decide o que fazer com o par valor+erro.
    pub async fn fetch_user_report(&self, user_id: i64) {
        self.begin();
        let result = self
            .remote
            .request(Method::Get, &format!("/userlogs/report?id={user_id}"), None)
            .await
            .and_then(|value| serde_json::from_value::<UserReport>(value).map_err(ClientError::from));
        match result {
            Ok(report) => self.write().user_report = Some(report),
            Err(err) => {
                tracing::error!("Falha ao buscar o relatório do usuário {}: {}", user_id, err);
                self.write().error = Some("Erro ao buscar o relatório do usuário".to_owned());
            }
        }
        self.finish();
    }

    pub async fn fetch_today_report(&self, user_id: i64) {
        self.begin();
        let result = self
            .remote
            .request(Method::Get, &format!("/userlogs/today?id={user_id}"), None)
            .await
            .and_then(|value| {
                serde_json::from_value::<Vec<TodayReport>>(value).map_err(ClientError::from)
            });
        match result {
            Ok(rows) => self.write().today_report = rows,
            Err(err) => {
                tracing::error!("Falha ao buscar o relatório de hoje de {}: {}", user_id, err);
                self.write().error = Some("Erro ao buscar o relatório de hoje".to_owned());
            }
        }
        self.finish();
    }

    fn begin(&self) {
        let mut state = self.write();
        state.loading = true;
        state.error = None;
    }

    fn finish(&self) {
        self.write().loading = false;
    }

    fn read(&self) -> RwLockReadGuard<'_, ReportState> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, ReportState> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
