// src/models/organize.rs
//
// O backend entrega a mesma floresta organizacional de duas formas: uma lista
// plana de registros (subordinados diretos) e um mapa de nós já aninhados
// (os endpoints de estrutura). Aqui as duas formas convergem para um único
// tipo interno antes de chegar a qualquer renderizador.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::user::PersonnelRecord;

// Envelope da lista plana: status + subordinados diretos de um líder.
#[derive(Debug, Clone, Deserialize)]
pub struct Organize {
    pub status: String,
    pub data: Vec<PersonnelRecord>,
}

// Um nó da hierarquia. Serve tanto como forma de fio dos endpoints de
// estrutura quanto como forma interna: raízes têm `leader_id = None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyNode {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub leader_id: Option<i64>,
    #[serde(default)]
    pub subordinates: Vec<HierarchyNode>,
}

impl HierarchyNode {
    fn from_record(record: &PersonnelRecord) -> Self {
        Self {
            id: record.id,
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            email: record.email.clone(),
            role: record.role.clone(),
            position: None,
            leader_id: record.leader_id,
            subordinates: Vec::new(),
        }
    }
}

pub type Forest = Vec<HierarchyNode>;

// Envelope dos endpoints de estrutura: mapa de id -> nó pré-aninhado.
#[derive(Debug, Clone, Deserialize)]
pub struct OrganizeAll {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    pub data: HashMap<String, HierarchyNode>,
}

// Entrada com variante etiquetada, saída com variante única: qualquer uma das
// duas formas de fio vira uma floresta.
#[derive(Debug)]
pub enum StructureSource {
    Flat(Vec<PersonnelRecord>),
    Nested(HashMap<String, HierarchyNode>),
}

impl StructureSource {
    pub fn into_forest(self) -> Forest {
        match self {
            StructureSource::Flat(records) => fold_from_flat(records),
            StructureSource::Nested(map) => adopt_from_nested(map),
        }
    }
}

// Dobra a lista plana por `leader_id`. Registros sem líder, ou cujo líder não
// está no conjunto recebido, viram raízes.
fn fold_from_flat(records: Vec<PersonnelRecord>) -> Forest {
    let ids: HashSet<i64> = records.iter().map(|r| r.id).collect();

    let mut children: HashMap<i64, Vec<PersonnelRecord>> = HashMap::new();
    let mut roots: Vec<PersonnelRecord> = Vec::new();
    for record in records {
        match record.leader_id {
            Some(leader) if leader != record.id && ids.contains(&leader) => {
                children.entry(leader).or_default().push(record);
            }
            _ => roots.push(record),
        }
    }

    let mut forest: Forest = roots
        .into_iter()
        .map(|root| attach(root, &mut children))
        .collect();

    // Entrada cíclica (inválida pelo invariante) deixa registros sem caminho
    // até uma raiz; descartar com aviso em vez de entrar em laço.
    if !children.is_empty() {
        let leftover: usize = children.values().map(Vec::len).sum();
        tracing::warn!(
            "{} registros inalcançáveis a partir de uma raiz foram descartados (ciclo em leaderId?)",
            leftover
        );
    }

    forest.sort_by_key(|node| node.id);
    forest
}

fn attach(record: PersonnelRecord, children: &mut HashMap<i64, Vec<PersonnelRecord>>) -> HierarchyNode {
    let mut node = HierarchyNode::from_record(&record);
    if let Some(direct) = children.remove(&record.id) {
        node.subordinates = direct
            .into_iter()
            .map(|child| attach(child, children))
            .collect();
        node.subordinates.sort_by_key(|n| n.id);
    }
    node
}

// Adota o mapa pré-aninhado: é raiz toda entrada que não aparece como
// subordinada de nenhuma outra (cobre o caso da estrutura parcial, em que o
// líder da raiz ficou fora do recorte).
fn adopt_from_nested(map: HashMap<String, HierarchyNode>) -> Forest {
    let mut below: HashSet<i64> = HashSet::new();
    for node in map.values() {
        for child in &node.subordinates {
            collect_ids(child, &mut below);
        }
    }

    let mut forest: Forest = map
        .into_values()
        .filter(|node| !below.contains(&node.id))
        .collect();
    forest.sort_by_key(|node| node.id);
    forest
}

fn collect_ids(node: &HierarchyNode, out: &mut HashSet<i64>) {
    out.insert(node.id);
    for child in &node.subordinates {
        collect_ids(child, out);
    }
}

fn subtree_contains(node: &HierarchyNode, id: i64) -> bool {
    node.id == id || node.subordinates.iter().any(|child| subtree_contains(child, id))
}

pub fn find_node(forest: &[HierarchyNode], id: i64) -> Option<&HierarchyNode> {
    forest.iter().find_map(|node| {
        if node.id == id {
            Some(node)
        } else {
            find_node(&node.subordinates, id)
        }
    })
}

// `target` está estritamente abaixo de `ancestor`?
pub fn is_descendant(forest: &[HierarchyNode], ancestor: i64, target: i64) -> bool {
    match find_node(forest, ancestor) {
        Some(node) => node
            .subordinates
            .iter()
            .any(|child| subtree_contains(child, target)),
        None => false,
    }
}

pub fn node_count(forest: &[HierarchyNode]) -> usize {
    forest
        .iter()
        .map(|node| 1 + node_count(&node.subordinates))
        .sum()
}
