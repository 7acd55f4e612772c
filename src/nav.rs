// src/nav.rs
//
// Contrato de navegação. A fiação das rotas mora na camada visual; aqui fica
// só o que os stores precisam: um destino tipado, o guarda de presença de
// token e um trait para sinalizar a troca de rota.

use crate::persist::{KeyValueStore, KEY_TOKEN};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Home,
    Register,
    RegisterAdmin,
}

impl Route {
    pub fn requires_auth(&self) -> bool {
        matches!(self, Route::Home)
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Home => "/home",
            Route::Register => "/register",
            Route::RegisterAdmin => "/registerForAdminCDG-Beaver",
        }
    }
}

// Quem recebe o sinal de "vá para tal rota". O Session Store empurra rotas
// por aqui no login, no logout e após o registro.
pub trait Navigator: Send + Sync {
    fn push(&self, route: Route);
}

// Navegador nulo, para uso embutido sem camada visual.
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn push(&self, _route: Route) {}
}

// O guarda de rota: presença de token, nada além disso. Um token presente não
// é validado aqui; expirar é problema da próxima chamada remota.
pub fn resolve(target: Route, storage: &dyn KeyValueStore) -> Route {
    let has_token = storage.get(KEY_TOKEN).is_some();
    match target {
        route if route.requires_auth() && !has_token => Route::Login,
        Route::Login if has_token => Route::Home,
        route => route,
    }
}
