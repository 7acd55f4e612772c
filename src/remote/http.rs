// src/remote/http.rs

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::common::error::ClientError;
use crate::persist::{KeyValueStore, KEY_TOKEN};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

// A capacidade mínima que a camada de estado exige do transporte: uma
// requisição autenticada que devolve JSON. Os stores só conhecem este trait;
// o reqwest fica confinado à implementação concreta abaixo.
#[async_trait]
pub trait RemoteClient: Send + Sync {
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, ClientError>;
}

// Implementação concreta sobre reqwest. O bearer token é lido do
// armazenamento persistido a cada chamada, nunca guardado em campo: uma
// rotação de token vale já na próxima requisição.
#[derive(Clone)]
pub struct ReqwestRemote {
    http: reqwest::Client,
    base_url: String,
    storage: Arc<dyn KeyValueStore>,
}

impl ReqwestRemote {
    pub fn new(base_url: impl Into<String>, storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            storage,
        }
    }
}

#[async_trait]
impl RemoteClient for ReqwestRemote {
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, ClientError> {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), path);

        let method = match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut request = self.http.request(method, &url);

        if let Some(token) = self.storage.get(KEY_TOKEN) {
            request = request.header("Authorization", format!("Bearer {}", token));
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            // O backend responde erros como {"error": "..."} ou {"message": "..."};
            // na falta de ambos, fica o corpo cru.
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|v| {
                    v.get("error")
                        .or_else(|| v.get("message"))
                        .and_then(Value::as_str)
                        .map(str::to_owned)
                })
                .unwrap_or(text);
            return Err(ClientError::RemoteRejected {
                status: status.as_u16(),
                message,
            });
        }

        if text.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}
