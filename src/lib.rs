// src/lib.rs
//
// Camada de estado do cliente administrativo: sessão, diretório de pessoal,
// hierarquia organizacional, catálogo de cargos e relatórios de presença.
// A interface gráfica e as rotas ficam em outro lugar; aqui vive apenas o
// estado e a sincronização com o backend.

// Declaração dos nossos módulos
pub mod common;
pub mod config;
pub mod models;
pub mod nav;
pub mod persist;
pub mod remote;
pub mod stores;

#[cfg(test)]
pub mod testing;

// Re-exportações principais
pub use common::error::ClientError;
pub use config::AppState;
