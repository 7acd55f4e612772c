// src/testing.rs
//
// Dublês de teste compartilhados pelos testes dos stores: um transporte
// roteirizado e um navegador que só grava as rotas recebidas.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::common::error::ClientError;
use crate::nav::{Navigator, Route};
use crate::remote::{Method, RemoteClient};

struct Scripted {
    delay: Option<Duration>,
    result: Result<Value, ClientError>,
}

// Transporte roteirizado: devolve as respostas na ordem em que foram
// enfileiradas e grava cada chamada recebida. O atraso opcional serve para
// provocar corridas entre operações concorrentes com o relógio pausado.
#[derive(Default)]
pub struct MockRemote {
    responses: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<(Method, String)>>,
}

impl MockRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_ok(&self, value: Value) {
        self.push(Scripted {
            delay: None,
            result: Ok(value),
        });
    }

    pub fn push_ok_delayed(&self, value: Value, delay: Duration) {
        self.push(Scripted {
            delay: Some(delay),
            result: Ok(value),
        });
    }

    pub fn push_err(&self, err: ClientError) {
        self.push(Scripted {
            delay: None,
            result: Err(err),
        });
    }

    fn push(&self, scripted: Scripted) {
        self.responses
            .lock()
            .expect("lock do roteiro")
            .push_back(scripted);
    }

    pub fn calls(&self) -> Vec<(Method, String)> {
        self.calls.lock().expect("lock das chamadas").clone()
    }
}

#[async_trait]
impl RemoteClient for MockRemote {
    async fn request(
        &self,
        method: Method,
        path: &str,
        _body: Option<Value>,
    ) -> Result<Value, ClientError> {
        self.calls
            .lock()
            .expect("lock das chamadas")
            .push((method, path.to_owned()));

        let scripted = self
            .responses
            .lock()
            .expect("lock do roteiro")
            .pop_front()
            .unwrap_or_else(|| panic!("resposta não roteirizada para {method:?} {path}"));

        if let Some(delay) = scripted.delay {
            tokio::time::sleep(delay).await;
        }
        scripted.result
    }
}

// Navegador que grava as rotas empurradas, para asserção.
#[derive(Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pushed(&self) -> Vec<Route> {
        self.routes.lock().expect("lock das rotas").clone()
    }
}

impl Navigator for RecordingNavigator {
    fn push(&self, route: Route) {
        self.routes.lock().expect("lock das rotas").push(route);
    }
}

pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_target(false)
        .compact()
        .try_init();
}
