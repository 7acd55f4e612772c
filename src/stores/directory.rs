// src/stores/directory.rs

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::Value;

use crate::common::error::ClientError;
use crate::models::auth::SessionProfile;
use crate::models::user::{PersonnelRecord, UserUpdate};
use crate::persist::{KeyValueStore, KEY_USER};
use crate::remote::{Method, RemoteClient};

#[derive(Default)]
struct DirectoryState {
    all: Vec<PersonnelRecord>,
    current: Option<SessionProfile>,
    personnel: Vec<PersonnelRecord>,
    loading: bool,
    error: Option<String>,
}

// Cache de leitura do diretório de pessoal. O backend é a fonte de verdade:
// cada fetch bem-sucedido substitui a lista inteira, nunca há merge por id.
pub struct DirectoryStore {
    remote: Arc<dyn RemoteClient>,
    storage: Arc<dyn KeyValueStore>,
    state: RwLock<DirectoryState>,
}

impl DirectoryStore {
    pub fn new(remote: Arc<dyn RemoteClient>, storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            remote,
            storage,
            state: RwLock::new(DirectoryState::default()),
        }
    }

    pub fn all(&self) -> Vec<PersonnelRecord> {
        self.read().all.clone()
    }

    pub fn current(&self) -> Option<SessionProfile> {
        self.read().current.clone()
    }

    pub fn personnel(&self) -> Vec<PersonnelRecord> {
        self.read().personnel.clone()
    }

    pub fn loading(&self) -> bool {
        self.read().loading
    }

    pub fn error(&self) -> Option<String> {
        self.read().error.clone()
    }

    // Substituição integral da lista.
    pub async fn fetch_all(&self) {
        self.begin();
        match self.try_fetch_all().await {
            Ok(records) => self.write().all = records,
            Err(err) => self.fail("Não foi possível carregar os usuários", err),
        }
        self.finish();
    }

    async fn try_fetch_all(&self) -> Result<Vec<PersonnelRecord>, ClientError> {
        let value = self.remote.request(Method::Get, "/users", None).await?;
        Ok(serde_json::from_value(value)?)
    }

    // O recorte de pessoal de serviço. Falha aqui só vai para o log, sem
    // tocar em `error` — comportamento herdado da tela que o consome.
    pub async fn fetch_personnel(&self) {
        let result = self.remote.request(Method::Get, "/users/personnel", None).await;
        match result.and_then(|value| serde_json::from_value(value).map_err(ClientError::from)) {
            Ok(records) => self.write().personnel = records,
            Err(err) => tracing::error!("Falha ao carregar o pessoal de serviço: {}", err),
        }
    }

    // Atualização parcial. No sucesso, se o id atualizado é o da identidade
    // persistida, o perfil embutido no snapshot também é corrigido — é a única
    // reconciliação entre stores, e acontece via armazenamento, não por
    // chamada direta de um store ao outro.
    pub async fn update(&self, id: i64, update: &UserUpdate) {
        self.begin();
        match self.try_update(id, update).await {
            Ok(()) => {}
            Err(err) => self.fail("Não foi possível atualizar o usuário", err),
        }
        self.finish();
    }

    async fn try_update(&self, id: i64, update: &UserUpdate) -> Result<(), ClientError> {
        self.remote
            .request(
                Method::Patch,
                &format!("/users/{id}"),
                Some(serde_json::to_value(update)?),
            )
            .await?;
        self.reconcile_session_snapshot(id, update);
        Ok(())
    }

    fn reconcile_session_snapshot(&self, id: i64, update: &UserUpdate) {
        let Some(raw) = self.storage.get(KEY_USER) else {
            return;
        };
        let mut snapshot: Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                tracing::error!("Snapshot de sessão ilegível, não reconciliado: {}", err);
                return;
            }
        };

        let session_id = snapshot
            .get("user")
            .and_then(|user| user.get("id"))
            .and_then(Value::as_i64);
        if session_id != Some(id) {
            return;
        }

        if let Some(user) = snapshot.get_mut("user") {
            update.merge_into(user);
            if let Ok(profile) = serde_json::from_value::<SessionProfile>(user.clone()) {
                self.write().current = Some(profile);
            }
        }
        match serde_json::to_string(&snapshot) {
            Ok(serialized) => self.storage.set(KEY_USER, &serialized),
            Err(err) => tracing::error!("Falha ao regravar o snapshot de sessão: {}", err),
        }
    }

    // Exclusão remota apenas; o cache local fica como está e quem chamou
    // decide quando recarregar.
    pub async fn delete(&self, id: i64) {
        self.begin();
        if let Err(err) = self
            .remote
            .request(Method::Delete, &format!("/users/{id}"), None)
            .await
        {
            self.fail("Não foi possível excluir o usuário", err);
        }
        self.finish();
    }

    // Leitura best-effort do perfil em cache, para popular a tela antes do
    // primeiro fetch.
    pub fn init_from_persistence(&self) {
        let Some(raw) = self.storage.get(KEY_USER) else {
            return;
        };
        let profile = serde_json::from_str::<Value>(&raw)
            .ok()
            .and_then(|snapshot| snapshot.get("user").cloned())
            .and_then(|user| serde_json::from_value::<SessionProfile>(user).ok());
        if let Some(profile) = profile {
            self.write().current = Some(profile);
        }
    }

    fn begin(&self) {
        let mut state = self.write();
        state.loading = true;
        state.error = None;
    }

    fn fail(&self, message: &str, cause: ClientError) {
        tracing::error!("{}: {}", message, cause);
        self.write().error = Some(message.to_owned());
    }

    fn finish(&self) {
        self.write().loading = false;
    }

    fn read(&self) -> RwLockReadGuard<'_, DirectoryState> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, DirectoryState> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockRemote;
    use crate::persist::MemoryStore;
    use serde_json::json;

    fn record_json(id: i64, leader_id: Option<i64>) -> Value {
        json!({
            "id": id,
            "firstName": format!("Nome{id}"),
            "lastName": format!("Sobrenome{id}"),
            "email": format!("pessoa{id}@empresa.com"),
            "idNumber": "12345",
            "role": "user",
            "isActive": true,
            "leaderId": leader_id,
            "positionId": null,
            "createdAt": "2026-01-10T08:00:00Z",
            "updatedAt": "2026-01-10T08:00:00Z",
            "deletedAt": null
        })
    }

    fn snapshot_json() -> String {
        json!({
            "user": {
                "id": 1,
                "firstName": "Ana",
                "lastName": "Souza",
                "email": "ana@empresa.com",
                "role": "admin"
            },
            "access_token": "tok-1"
        })
        .to_string()
    }

    fn store(remote: Arc<MockRemote>, storage: Arc<MemoryStore>) -> DirectoryStore {
        DirectoryStore::new(remote, storage)
    }

    #[tokio::test]
    async fn fetch_all_replaces_the_cache_wholesale() {
        let remote = Arc::new(MockRemote::new());
        let directory = store(remote.clone(), Arc::new(MemoryStore::new()));

        remote.push_ok(json!([record_json(1, None), record_json(2, Some(1))]));
        directory.fetch_all().await;
        assert_eq!(directory.all().len(), 2);

        remote.push_ok(json!([record_json(3, None)]));
        directory.fetch_all().await;

        let ids: Vec<i64> = directory.all().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3], "a lista antiga não pode sobrar");
        assert!(!directory.loading());
        assert_eq!(directory.error(), None);
    }

    #[tokio::test]
    async fn fetch_all_failure_records_error_and_clears_loading() {
        let remote = Arc::new(MockRemote::new());
        let directory = store(remote.clone(), Arc::new(MemoryStore::new()));
        remote.push_err(ClientError::network(anyhow::anyhow!("conexão recusada")));

        directory.fetch_all().await;

        assert!(directory.error().is_some());
        assert!(!directory.loading());
        assert!(directory.all().is_empty());
    }

    #[tokio::test]
    async fn update_patches_persisted_snapshot_when_id_matches() {
        let remote = Arc::new(MockRemote::new());
        let storage = Arc::new(MemoryStore::new());
        storage.set(KEY_USER, &snapshot_json());
        remote.push_ok(Value::Null);

        let directory = store(remote, storage.clone());
        let update = UserUpdate {
            email: Some("x@y.com".to_owned()),
            ..UserUpdate::default()
        };
        directory.update(1, &update).await;

        let snapshot: Value =
            serde_json::from_str(&storage.get(KEY_USER).expect("snapshot presente")).expect("JSON");
        assert_eq!(snapshot["user"]["email"], "x@y.com");
        // O resto do envelope fica intacto.
        assert_eq!(snapshot["access_token"], "tok-1");
        assert_eq!(snapshot["user"]["firstName"], "Ana");
        assert_eq!(
            directory.current().map(|p| p.email),
            Some("x@y.com".to_owned())
        );
    }

    #[tokio::test]
    async fn update_leaves_snapshot_alone_when_id_differs() {
        let remote = Arc::new(MockRemote::new());
        let storage = Arc::new(MemoryStore::new());
        storage.set(KEY_USER, &snapshot_json());
        remote.push_ok(Value::Null);

        let directory = store(remote, storage.clone());
        let update = UserUpdate {
            email: Some("x@y.com".to_owned()),
            ..UserUpdate::default()
        };
        directory.update(2, &update).await;

        assert_eq!(storage.get(KEY_USER).as_deref(), Some(snapshot_json().as_str()));
    }

    #[tokio::test]
    async fn delete_does_not_touch_the_cache() {
        let remote = Arc::new(MockRemote::new());
        let directory = store(remote.clone(), Arc::new(MemoryStore::new()));

        remote.push_ok(json!([record_json(1, None), record_json(2, Some(1))]));
        directory.fetch_all().await;

        remote.push_ok(Value::Null);
        directory.delete(1).await;

        assert_eq!(directory.all().len(), 2, "quem chamou decide quando recarregar");
    }

    #[tokio::test]
    async fn init_from_persistence_populates_current() {
        let storage = Arc::new(MemoryStore::new());
        storage.set(KEY_USER, &snapshot_json());

        let directory = store(Arc::new(MockRemote::new()), storage);
        directory.init_from_persistence();

        let current = directory.current().expect("perfil em cache");
        assert_eq!(current.id, 1);
        assert_eq!(current.email, "ana@empresa.com");
    }

    #[tokio::test]
    async fn fetch_personnel_swallows_failures_silently() {
        let remote = Arc::new(MockRemote::new());
        let directory = store(remote.clone(), Arc::new(MemoryStore::new()));
        remote.push_err(ClientError::network(anyhow::anyhow!("conexão recusada")));

        directory.fetch_personnel().await;

        assert_eq!(directory.error(), None);
        assert!(directory.personnel().is_empty());
    }
}
