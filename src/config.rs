// src/config.rs

use std::env;
use std::sync::Arc;

use anyhow::Context;

use crate::nav::Navigator;
use crate::persist::{JsonFileStore, KeyValueStore};
use crate::remote::{RemoteClient, ReqwestRemote};
use crate::stores::{DirectoryStore, HierarchyStore, PositionStore, ReportStore, SessionStore};

// O contexto do processo: transporte, armazenamento e os cinco stores,
// montados uma vez na subida e repassados a quem precisar. Nada de singleton
// global mutável; o ciclo de vida da sessão fica nas fronteiras de
// login/logout do SessionStore.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn KeyValueStore>,
    pub session: Arc<SessionStore>,
    pub directory: Arc<DirectoryStore>,
    pub hierarchy: Arc<HierarchyStore>,
    pub positions: Arc<PositionStore>,
    pub reports: Arc<ReportStore>,
}

impl AppState {
    // A assinatura retorna um Result: se a configuração falhar, a aplicação
    // não deve subir.
    pub fn new(navigator: Arc<dyn Navigator>) -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let base_url = env::var("ADMIN_API_URL").context("ADMIN_API_URL deve ser definida")?;
        let state_file =
            env::var("ADMIN_STATE_FILE").unwrap_or_else(|_| "admin-state.json".to_owned());

        let storage: Arc<dyn KeyValueStore> = Arc::new(
            JsonFileStore::open(&state_file).context("Falha ao abrir o arquivo de estado")?,
        );
        let remote: Arc<dyn RemoteClient> = Arc::new(ReqwestRemote::new(base_url, storage.clone()));

        let state = Self::with_parts(remote, storage, navigator);
        tracing::info!("✅ Contexto do cliente montado");
        Ok(state)
    }

    // Monta o grafo de dependências a partir de colaboradores já prontos —
    // útil em testes e em embutimentos sem disco.
    pub fn with_parts(
        remote: Arc<dyn RemoteClient>,
        storage: Arc<dyn KeyValueStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let session = Arc::new(SessionStore::new(remote.clone(), storage.clone(), navigator));
        // A sessão persistida é o único caminho de recuperação pós-reinício.
        session.restore_from_persistence();

        let directory = Arc::new(DirectoryStore::new(remote.clone(), storage.clone()));
        directory.init_from_persistence();

        Self {
            storage,
            session,
            directory,
            hierarchy: Arc::new(HierarchyStore::new(remote.clone())),
            positions: Arc::new(PositionStore::new(remote.clone())),
            reports: Arc::new(ReportStore::new(remote)),
        }
    }
}
