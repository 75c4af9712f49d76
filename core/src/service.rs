//! Async customer service: one method per remote operation.
//!
//! # Design
//! `ClienteService` pairs the sans-IO `ClienteClient` with an injected
//! `Transport`. Every public method goes through `run`: build the request,
//! execute it, parse the response. Any failure along the way is logged in full
//! and replaced by its normalized `ClienteError`, so no operation has an error
//! policy of its own. Each call issues exactly one request and holds no state
//! afterwards.

use serde_json::Value;
use tracing::{debug, error};

use crate::client::ClienteClient;
use crate::config::ClientConfig;
use crate::error::{ApiError, ClienteError, ConfigError};
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{
    AlterarSenhaRequest, Cliente, LoginRequest, LoginResponse, VerificacaoCpfEmailRequest,
    VerificacaoCpfEmailResponse,
};

#[derive(Debug, Clone)]
pub struct ClienteService<T> {
    client: ClienteClient,
    transport: T,
}

impl ClienteService<ReqwestTransport> {
    pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
        let transport = ReqwestTransport::with_timeout(config.timeout)?;
        Ok(Self::new(&config.base_url, transport))
    }
}

impl<T: Transport> ClienteService<T> {
    pub fn new(base_url: &str, transport: T) -> Self {
        Self {
            client: ClienteClient::new(base_url),
            transport,
        }
    }

    pub async fn find_all(&self) -> Result<Vec<Cliente>, ClienteError> {
        self.run(Ok(self.client.build_find_all()), ClienteClient::parse_clientes)
            .await
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Cliente, ClienteError> {
        self.run(Ok(self.client.build_find_by_id(id)), ClienteClient::parse_cliente)
            .await
    }

    /// Create when `cliente` has no id, update otherwise.
    pub async fn save(&self, cliente: &Cliente) -> Result<Cliente, ClienteError> {
        self.run(self.client.build_save(cliente), ClienteClient::parse_cliente)
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ClienteError> {
        self.run(Ok(self.client.build_delete(id)), ClienteClient::parse_delete)
            .await
    }

    pub async fn buscar_por_nome(&self, nome: &str) -> Result<Vec<Cliente>, ClienteError> {
        self.run(
            Ok(self.client.build_buscar_por_nome(nome)),
            ClienteClient::parse_clientes,
        )
        .await
    }

    pub async fn buscar_por_categoria(&self, categoria_id: i64) -> Result<Vec<Cliente>, ClienteError> {
        self.run(
            Ok(self.client.build_buscar_por_categoria(categoria_id)),
            ClienteClient::parse_clientes,
        )
        .await
    }

    pub async fn buscar_por_cpf(&self, cpf: &str) -> Result<Cliente, ClienteError> {
        self.run(Ok(self.client.build_buscar_por_cpf(cpf)), ClienteClient::parse_cliente)
            .await
    }

    pub async fn buscar_por_email(&self, email: &str) -> Result<Cliente, ClienteError> {
        self.run(
            Ok(self.client.build_buscar_por_email(email)),
            ClienteClient::parse_cliente,
        )
        .await
    }

    pub async fn login(&self, input: &LoginRequest) -> Result<LoginResponse, ClienteError> {
        self.run(self.client.build_login(input), ClienteClient::parse_login)
            .await
    }

    pub async fn alterar_senha(
        &self,
        id: i64,
        input: &AlterarSenhaRequest,
    ) -> Result<Value, ClienteError> {
        self.run(self.client.build_alterar_senha(id, input), ClienteClient::parse_ack)
            .await
    }

    pub async fn desbloquear_conta(&self, id: i64) -> Result<Value, ClienteError> {
        self.run(self.client.build_desbloquear_conta(id), ClienteClient::parse_ack)
            .await
    }

    pub async fn listar_contas_bloqueadas(&self) -> Result<Vec<Cliente>, ClienteError> {
        self.run(
            Ok(self.client.build_listar_contas_bloqueadas()),
            ClienteClient::parse_clientes,
        )
        .await
    }

    pub async fn verificar_cpf_email(
        &self,
        input: &VerificacaoCpfEmailRequest,
    ) -> Result<VerificacaoCpfEmailResponse, ClienteError> {
        self.run(
            self.client.build_verificar_cpf_email(input),
            ClienteClient::parse_verificacao,
        )
        .await
    }

    async fn run<R>(
        &self,
        request: Result<HttpRequest, ApiError>,
        parse: fn(&ClienteClient, HttpResponse) -> Result<R, ApiError>,
    ) -> Result<R, ClienteError> {
        let request = request.map_err(|err| fail(None, err))?;
        let target = format!("{} {}", request.method, request.url);
        debug!(request = %target, "sending request");

        let response = self
            .transport
            .execute(request)
            .await
            .map_err(|err| fail(Some(&target), err))?;
        parse(&self.client, response).map_err(|err| fail(Some(&target), err))
    }
}

/// Log the raw failure and replace it with its normalized form.
fn fail(target: Option<&str>, err: ApiError) -> ClienteError {
    error!(
        request = target.unwrap_or("<not built>"),
        status = err.status(),
        error = %err,
        "Erro no ClienteService"
    );
    err.normalize()
}
