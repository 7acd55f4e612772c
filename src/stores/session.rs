// src/stores/session.rs

use std::sync::{Arc, RwLock, RwLockWriteGuard};

use serde_json::json;
use validator::Validate;

use crate::common::error::ClientError;
use crate::models::auth::{LoginPayload, LoginResponse, RegisterPayload, SessionIdentity};
use crate::nav::{Navigator, Route};
use crate::persist::{KeyValueStore, KEY_TOKEN, KEY_USER};
use crate::remote::{Method, RemoteClient};

#[derive(Default)]
struct SessionState {
    identity: Option<SessionIdentity>,
    is_authenticated: bool,
}

// Dono da identidade corrente e dos fluxos de login, logout e registro.
// Ao contrário dos outros stores, os erros daqui sobem para o chamador: a
// camada visual precisa bloquear a navegação quando o login falha.
pub struct SessionStore {
    remote: Arc<dyn RemoteClient>,
    storage: Arc<dyn KeyValueStore>,
    navigator: Arc<dyn Navigator>,
    state: RwLock<SessionState>,
}

impl SessionStore {
    pub fn new(
        remote: Arc<dyn RemoteClient>,
        storage: Arc<dyn KeyValueStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            remote,
            storage,
            navigator,
            state: RwLock::new(SessionState::default()),
        }
    }

    pub fn identity(&self) -> Option<SessionIdentity> {
        self.state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .identity
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .is_authenticated
    }

    // No sucesso, grava o snapshot e o token em chaves independentes e
    // sinaliza a rota autenticada. Na falha, nada de estado é tocado.
    pub async fn login(&self, email: &str, password: &str) -> Result<SessionIdentity, ClientError> {
        let payload = LoginPayload {
            email: email.to_owned(),
            password: password.to_owned(),
        };
        payload.validate()?;

        let value = self
            .remote
            .request(Method::Post, "/auth/login", Some(serde_json::to_value(&payload)?))
            .await?;
        let response: LoginResponse = serde_json::from_value(value)?;
        let identity = SessionIdentity::from_response(&response);

        self.storage.set(KEY_USER, &serde_json::to_string(&response)?);
        self.storage.set(KEY_TOKEN, &response.access_token);

        {
            let mut state = self.write();
            state.identity = Some(identity.clone());
            state.is_authenticated = true;
        }

        tracing::info!("✅ Sessão iniciada para {}", identity.email);
        self.navigator.push(Route::Home);
        Ok(identity)
    }

    // Logout é localmente autoritativo: a notificação remota é best-effort e
    // as duas chaves persistidas caem mesmo quando ela falha.
    pub async fn logout(&self, email: &str) {
        if let Err(err) = self
            .remote
            .request(Method::Post, "/auth/logout", Some(json!({ "email": email })))
            .await
        {
            tracing::warn!("Logout remoto falhou, limpando a sessão local mesmo assim: {}", err);
        }

        self.storage.remove(KEY_USER);
        self.storage.remove(KEY_TOKEN);

        let mut state = self.write();
        state.identity = None;
        state.is_authenticated = false;
    }

    pub async fn register(&self, form: RegisterPayload) -> Result<(), ClientError> {
        self.submit_registration("/auth/register", form).await
    }

    pub async fn register_admin(&self, form: RegisterPayload) -> Result<(), ClientError> {
        self.submit_registration("/auth/register-HiAdmin", form).await
    }

    async fn submit_registration(&self, path: &str, form: RegisterPayload) -> Result<(), ClientError> {
        form.validate()?;
        self.remote
            .request(Method::Post, path, Some(serde_json::to_value(&form)?))
            .await?;

        // A conta nova não entra autenticada; quem registrou volta ao login.
        self.navigator.push(Route::Login);
        Ok(())
    }

    // Único caminho de recuperação após um reinício do processo. Snapshot
    // ausente ou ilegível deixa a sessão deslogada, sem erro para o chamador.
    pub fn restore_from_persistence(&self) {
        let Some(raw) = self.storage.get(KEY_USER) else {
            tracing::info!("Nenhum snapshot de sessão persistido");
            self.write().is_authenticated = false;
            return;
        };

        match serde_json::from_str::<LoginResponse>(&raw) {
            Ok(response) => {
                let mut state = self.write();
                state.identity = Some(SessionIdentity::from_response(&response));
                state.is_authenticated = true;
            }
            Err(err) => {
                tracing::error!("Não foi possível reconstruir a sessão persistida: {}", err);
                self.write().is_authenticated = false;
            }
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
