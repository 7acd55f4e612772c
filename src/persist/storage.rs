// src/persist/storage.rs

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::common::error::ClientError;

// Chaves sob as quais a sessão sobrevive a um reinício do processo.
// As duas são gravadas no login e removidas juntas no logout.
pub const KEY_USER: &str = "user";
pub const KEY_TOKEN: &str = "token";

// Superfície síncrona de armazenamento chave-valor. Os stores tratam a
// persistência como best-effort: uma escrita que falha é registrada no log,
// nunca propagada para quem chamou.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

// Implementação em arquivo: um único JSON com o mapa inteiro, reescrito a
// cada mutação. O volume aqui é de duas ou três chaves, então a reescrita
// integral é barata.
pub struct JsonFileStore {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

impl JsonFileStore {
    // Abre (ou cria) o arquivo de estado. Conteúdo ilegível conta como
    // armazenamento vazio, não como erro fatal.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref().to_path_buf();

        let entries = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(map) => map,
                Err(err) => {
                    tracing::error!("Arquivo de estado corrompido, descartando: {}", err);
                    HashMap::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => return Err(ClientError::Storage(err)),
        };

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    fn flush(&self, entries: &HashMap<String, String>) {
        let serialized = match serde_json::to_string_pretty(entries) {
            Ok(s) => s,
            Err(err) => {
                tracing::error!("Falha ao serializar o estado persistido: {}", err);
                return;
            }
        };
        if let Err(err) = fs::write(&self.path, serialized) {
            tracing::error!("Falha ao gravar o estado persistido: {}", err);
        }
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.insert(key.to_owned(), value.to_owned());
        self.flush(&entries);
    }

    fn remove(&self, key: &str) {
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.remove(key);
        self.flush(&entries);
    }
}

// Implementação em memória, para testes e para uso embutido sem disco.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_owned(), value.to_owned());
    }

    fn remove(&self, key: &str) {
        self.entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(key);
    }
}
