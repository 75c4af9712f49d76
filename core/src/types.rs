//! Domain DTOs for the clientes API.
//!
//! # Design
//! Field names on the wire are the API's own camelCase Portuguese names
//! (`dataNascimento`, `cpfOuEmail`, ...). Everything the server may omit is an
//! `Option` and is left out of serialized JSON when `None`, so a freshly built
//! `Cliente` serializes to exactly the fields the caller set.
//!
//! Dates and timestamps are kept as opaque ISO-8601 strings; this layer never
//! parses them. These types are defined independently from the mock-server
//! crate; the integration tests catch schema drift.

use serde::{Deserialize, Serialize};

/// A registered account holder.
///
/// `id` is assigned by the server. Its absence marks a record that has not
/// been persisted yet, which is what `ClienteClient::build_save` dispatches on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cliente {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub nome: String,
    pub cpf: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telefone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_nascimento: Option<String>,
    /// Write-only: sent on create/update, never returned by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub senha: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ultimo_login: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tentativas_login: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conta_bloqueada: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ativo: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_cadastro: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categoria: Option<CategoriaRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enderecos: Option<Vec<Endereco>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contratos: Option<Vec<Contrato>>,
}

impl Cliente {
    /// An unsaved customer with only the required fields set.
    pub fn new(nome: impl Into<String>, cpf: impl Into<String>) -> Self {
        Self {
            nome: nome.into(),
            cpf: cpf.into(),
            ..Self::default()
        }
    }

    /// The server-assigned id, if this record has been persisted.
    ///
    /// An id of `0` counts as absent.
    pub fn persisted_id(&self) -> Option<i64> {
        self.id.filter(|id| *id != 0)
    }

    pub fn is_locked(&self) -> bool {
        self.conta_bloqueada.unwrap_or(false)
    }
}

/// Category reference embedded in a `Cliente`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoriaRef {
    pub id: i64,
    pub nome: String,
}

/// Postal address owned by a `Cliente`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Endereco {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub logradouro: String,
    pub numero: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complemento: Option<String>,
    pub bairro: String,
    pub cidade: String,
    pub estado: String,
    pub cep: String,
    /// Informational back-reference; ownership runs the other way.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cliente: Option<Box<Cliente>>,
}

/// Service contract owned by a `Cliente`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contrato {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub numero: String,
    pub data_inicio: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_fim: Option<String>,
    pub valor: f64,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cliente: Option<Box<Cliente>>,
}

/// Credentials for `POST /clientes/login`. `cpf_ou_email` accepts either key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub cpf_ou_email: String,
    pub senha: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub sucesso: bool,
    pub mensagem: String,
    pub cliente: Cliente,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlterarSenhaRequest {
    pub senha_atual: String,
    pub nova_senha: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificacaoCpfEmailRequest {
    pub cpf_ou_email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificacaoCpfEmailResponse {
    pub existe: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cliente_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nome: Option<String>,
}
