// src/models/auth.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

// O perfil que o backend devolve dentro da resposta de login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionProfile {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
}

// O envelope completo da resposta de login. É este envelope, inteiro, que vai
// para a chave `user` do armazenamento persistido, para que o perfil embutido
// possa ser atualizado depois sem nova ida à rede.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: SessionProfile,
    pub access_token: String,
}

// A identidade corrente da sessão. Existe no máximo uma por vez; é criada no
// login e destruída no logout.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionIdentity {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
    pub access_token: String,
}

impl SessionIdentity {
    pub fn from_response(response: &LoginResponse) -> Self {
        Self {
            id: response.user.id,
            first_name: response.user.first_name.clone(),
            last_name: response.user.last_name.clone(),
            email: response.user.email.clone(),
            role: response.user.role.clone(),
            access_token: response.access_token.clone(),
        }
    }
}

// Dados para login
#[derive(Debug, Serialize, Validate)]
pub struct LoginPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
}

// Dados para registro de uma nova conta (comum ou administradora)
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub first_name: String,
    #[validate(length(min = 1, message = "O sobrenome é obrigatório."))]
    pub last_name: String,
    #[validate(length(min = 1, message = "O número de identificação é obrigatório."))]
    pub id_number: String,
}
