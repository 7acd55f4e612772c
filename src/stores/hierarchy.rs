// src/stores/hierarchy.rs

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::common::error::ClientError;
use crate::models::organize::{self, Forest, Organize, OrganizeAll, StructureSource};
use crate::models::user::PersonnelRecord;
use crate::remote::{Method, RemoteClient};

#[derive(Default)]
struct HierarchyState {
    subordinates_of: HashMap<i64, Vec<PersonnelRecord>>,
    full_structure: Option<Forest>,
    structure_for: HashMap<i64, Forest>,
    loading: bool,
    error: Option<String>,
}

// Dono da visão hierárquica: subordinados diretos, a floresta completa e os
// recortes por raiz. Depende do diretório apenas por identificadores — nunca
// por estado mutável compartilhado. Conforme a política da camada, os erros
// daqui são registrados em `error` e engolidos; quem chama observa o campo.
pub struct HierarchyStore {
    remote: Arc<dyn RemoteClient>,
    state: RwLock<HierarchyState>,
}

impl HierarchyStore {
    pub fn new(remote: Arc<dyn RemoteClient>) -> Self {
        Self {
            remote,
            state: RwLock::new(HierarchyState::default()),
        }
    }

    pub fn subordinates_of(&self, leader_id: i64) -> Option<Vec<PersonnelRecord>> {
        self.read().subordinates_of.get(&leader_id).cloned()
    }

    pub fn full_structure(&self) -> Option<Forest> {
        self.read().full_structure.clone()
    }

    pub fn structure_for(&self, id: i64) -> Option<Forest> {
        self.read().structure_for.get(&id).cloned()
    }

    pub fn loading(&self) -> bool {
        self.read().loading
    }

    pub fn error(&self) -> Option<String> {
        self.read().error.clone()
    }

    // Um nível apenas; o backend não recursa. Além de registrar o erro, a
    // falha devolve `None` para o chamador poder desviar sem inspecionar o
    // campo `error`.
    pub async fn get_subordinates(&self, leader_id: i64) -> Option<Vec<PersonnelRecord>> {
        self.begin();
        let result = self.try_get_subordinates(leader_id).await;
        let out = match result {
            Ok(records) => Some(records),
            Err(err) => {
                self.fail("Não foi possível carregar os subordinados", err);
                None
            }
        };
        self.finish();
        out
    }

    async fn try_get_subordinates(&self, leader_id: i64) -> Result<Vec<PersonnelRecord>, ClientError> {
        let value = self
            .remote
            .request(Method::Get, &format!("/users/{leader_id}/subordinates"), None)
            .await?;
        let envelope: Organize = serde_json::from_value(value)?;
        self.write()
            .subordinates_of
            .insert(leader_id, envelope.data.clone());
        Ok(envelope.data)
    }

    // Busca o mapa pré-aninhado e normaliza para a floresta interna.
    pub async fn get_full_structure(&self) {
        self.begin();
        match self.try_structure("/users/organization/structure").await {
            Ok(forest) => self.write().full_structure = Some(forest),
            Err(err) => self.fail("Não foi possível carregar a estrutura da organização", err),
        }
        self.finish();
    }

    // Mesma normalização, recortada na subárvore de `id`.
    pub async fn get_structure_for(&self, id: i64) {
        self.begin();
        match self
            .try_structure(&format!("/users/organization/structure/{id}"))
            .await
        {
            Ok(forest) => {
                self.write().structure_for.insert(id, forest);
            }
            Err(err) => self.fail("Não foi possível carregar a estrutura da organização", err),
        }
        self.finish();
    }

    async fn try_structure(&self, path: &str) -> Result<Forest, ClientError> {
        let value = self.remote.request(Method::Get, path, None).await?;
        let envelope: OrganizeAll = serde_json::from_value(value)?;
        Ok(StructureSource::Nested(envelope.data).into_forest())
    }

    // Precondição local antes de chamar o backend: nada de auto-atribuição e
    // o líder não pode ser descendente do subordinado na estrutura em cache.
    // Com cache velho a checagem é best-effort; a rejeição autoritativa de
    // ciclos pertence ao serviço remoto.
    pub async fn assign_subordinate(&self, leader_id: i64, subordinate_id: i64) {
        if leader_id == subordinate_id {
            self.fail(
                "Um usuário não pode ser subordinado de si mesmo",
                ClientError::SelfAssignment,
            );
            return;
        }

        let would_cycle = {
            let state = self.read();
            state
                .full_structure
                .as_ref()
                .is_some_and(|forest| organize::is_descendant(forest, subordinate_id, leader_id))
        };
        if would_cycle {
            self.fail(
                "A atribuição criaria um ciclo na hierarquia",
                ClientError::CycleDetected,
            );
            return;
        }

        if let Err(err) = self
            .remote
            .request(
                Method::Post,
                &format!("/users/{leader_id}/subordinates/{subordinate_id}"),
                None,
            )
            .await
        {
            self.fail("Não foi possível atribuir o subordinado", err);
        }
    }

    // Reatribui o cargo sem tocar em arestas da hierarquia. Falha aqui só vai
    // para o log, sem sinal visível para o chamador — comportamento herdado,
    // a confirmar com produto antes de propagar.
    pub async fn update_user_position(&self, id: i64, position_id: i64) {
        if let Err(err) = self
            .remote
            .request(
                Method::Patch,
                &format!("/users/{id}/position/{position_id}"),
                None,
            )
            .await
        {
            tracing::error!("Falha ao atualizar o cargo do usuário {}: {}", id, err);
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

    fn read(&self) -> RwLockReadGuard<'_, HierarchyState> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HierarchyState> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockRemote;
    use serde_json::{json, Value};

    fn node_json(id: i64, leader_id: Option<i64>, subordinates: Vec<Value>) -> Value {
        json!({
            "id": id,
            "firstName": format!("Nome{id}"),
            "lastName": format!("Sobrenome{id}"),
            "email": format!("pessoa{id}@empresa.com"),
            "role": "user",
            "position": "Analista",
            "leaderId": leader_id,
            "subordinates": subordinates,
        })
    }

    // A cadeia 1 → 2 → 3 no formato do endpoint de estrutura.
    fn chain_structure() -> Value {
        json!({
            "status": "success",
            "message": "ok",
            "data": {
                "1": node_json(
                    1,
                    None,
                    vec![node_json(2, Some(1), vec![node_json(3, Some(2), vec![])])],
                ),
            }
        })
    }

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
            "createdAt": "2026-01-10T08:00:00Z",
            "updatedAt": "2026-01-10T08:00:00Z"
        })
    }

    #[tokio::test]
    async fn full_structure_normalizes_the_nested_map() {
        let remote = Arc::new(MockRemote::new());
        let hierarchy = HierarchyStore::new(remote.clone());
        remote.push_ok(chain_structure());

        hierarchy.get_full_structure().await;

        let forest = hierarchy.full_structure().expect("floresta em cache");
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].id, 1);
        assert!(organize::is_descendant(&forest, 1, 3));
        assert!(!hierarchy.loading());
    }

    #[tokio::test]
    async fn assign_rejects_self_assignment_without_calling_remote() {
        let remote = Arc::new(MockRemote::new());
        let hierarchy = HierarchyStore::new(remote.clone());

        hierarchy.assign_subordinate(2, 2).await;

        assert!(hierarchy.error().is_some());
        assert!(remote.calls().is_empty());
    }

    #[tokio::test]
    async fn assign_rejects_cycle_against_cached_structure() {
        let remote = Arc::new(MockRemote::new());
        let hierarchy = HierarchyStore::new(remote.clone());
        remote.push_ok(chain_structure());
        hierarchy.get_full_structure().await;

        // 1 é ancestral de 3; fazer de 3 o líder de 1 fecharia um ciclo.
        hierarchy.assign_subordinate(3, 1).await;

        assert_eq!(
            hierarchy.error().as_deref(),
            Some("A atribuição criaria um ciclo na hierarquia")
        );
        // Só a chamada de estrutura chegou ao transporte.
        assert_eq!(remote.calls().len(), 1);
    }

    #[tokio::test]
    async fn assign_then_refetch_places_subordinate_under_leader() {
        let remote = Arc::new(MockRemote::new());
        let hierarchy = HierarchyStore::new(remote.clone());
        remote.push_ok(chain_structure());
        hierarchy.get_full_structure().await;

        remote.push_ok(Value::Null);
        hierarchy.assign_subordinate(1, 9).await;
        assert_eq!(hierarchy.error(), None);

        // O backend devolve a estrutura com 9 sob 1.
        remote.push_ok(json!({
            "status": "success",
            "message": "ok",
            "data": {
                "1": node_json(
                    1,
                    None,
                    vec![
                        node_json(2, Some(1), vec![node_json(3, Some(2), vec![])]),
                        node_json(9, Some(1), vec![]),
                    ],
                ),
            }
        }));
        hierarchy.get_full_structure().await;

        let forest = hierarchy.full_structure().expect("floresta em cache");
        let direct: Vec<i64> = forest[0].subordinates.iter().map(|n| n.id).collect();
        assert!(direct.contains(&9), "9 deve ser filho direto de 1");
    }

    #[tokio::test]
    async fn get_subordinates_returns_list_and_caches_it() {
        let remote = Arc::new(MockRemote::new());
        let hierarchy = HierarchyStore::new(remote.clone());
        remote.push_ok(json!({
            "status": "success",
            "data": [record_json(2, Some(1)), record_json(3, Some(1))]
        }));

        let direct = hierarchy.get_subordinates(1).await.expect("lista de subordinados");

        assert_eq!(direct.len(), 2);
        assert_eq!(hierarchy.subordinates_of(1).map(|l| l.len()), Some(2));
    }

    #[tokio::test]
    async fn get_subordinates_failure_returns_sentinel_and_records_error() {
        let remote = Arc::new(MockRemote::new());
        let hierarchy = HierarchyStore::new(remote.clone());
        remote.push_err(ClientError::network(anyhow::anyhow!("conexão recusada")));

        let result = hierarchy.get_subordinates(1).await;

        assert!(result.is_none());
        assert!(hierarchy.error().is_some());
        assert!(!hierarchy.loading());
    }

    #[tokio::test]
    async fn structure_for_scopes_to_the_requested_subtree() {
        let remote = Arc::new(MockRemote::new());
        let hierarchy = HierarchyStore::new(remote.clone());
        // Recorte na subárvore de 2: o líder de 2 ficou fora do payload.
        remote.push_ok(json!({
            "status": "success",
            "message": "ok",
            "data": {
                "2": node_json(2, Some(1), vec![node_json(3, Some(2), vec![])]),
            }
        }));

        hierarchy.get_structure_for(2).await;

        let forest = hierarchy.structure_for(2).expect("recorte em cache");
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].id, 2);
        assert!(organize::is_descendant(&forest, 2, 3));
    }

    #[tokio::test]
    async fn update_user_position_swallows_failures_without_error_signal() {
        let remote = Arc::new(MockRemote::new());
        let hierarchy = HierarchyStore::new(remote.clone());
        remote.push_err(ClientError::RemoteRejected {
            status: 404,
            message: "cargo inexistente".to_owned(),
        });

        hierarchy.update_user_position(5, 99).await;

        // Sem sinal visível: nem erro, nem pânico. Só o log.
        assert_eq!(hierarchy.error(), None);
        assert_eq!(remote.calls().len(), 1);
    }
}
