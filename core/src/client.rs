//! Stateless HTTP request builder and response parser for the clientes API.
//!
//! # Design
//! `ClienteClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation has a `build_*` method that produces an `HttpRequest`;
//! responses are consumed by a `parse_*` method per result shape. The caller
//! executes the actual HTTP round-trip in between, keeping this module
//! deterministic and free of I/O.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{
    AlterarSenhaRequest, Cliente, LoginRequest, LoginResponse, VerificacaoCpfEmailRequest,
    VerificacaoCpfEmailResponse,
};

const RESOURCE: &str = "clientes";

/// Synchronous, stateless request builder for the `/clientes` resource.
#[derive(Debug, Clone)]
pub struct ClienteClient {
    base_url: String,
}

impl ClienteClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, suffix: &str) -> String {
        format!("{}/{RESOURCE}{suffix}", self.base_url)
    }

    fn request(&self, method: HttpMethod, suffix: &str) -> HttpRequest {
        HttpRequest {
            method,
            url: self.url(suffix),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    fn json_request<B: Serialize>(
        &self,
        method: HttpMethod,
        suffix: &str,
        body: &B,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
            ..self.request(method, suffix)
        })
    }

    fn query_request(&self, suffix: &str, key: &str, value: &str) -> HttpRequest {
        HttpRequest {
            query: vec![(key.to_string(), value.to_string())],
            ..self.request(HttpMethod::Get, suffix)
        }
    }

    pub fn build_find_all(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "")
    }

    pub fn build_find_by_id(&self, id: i64) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("/{id}"))
    }

    /// POST to the collection when `cliente` has no id, PUT to `/{id}` when it does.
    pub fn build_save(&self, cliente: &Cliente) -> Result<HttpRequest, ApiError> {
        match cliente.persisted_id() {
            Some(id) => self.json_request(HttpMethod::Put, &format!("/{id}"), cliente),
            None => self.json_request(HttpMethod::Post, "", cliente),
        }
    }

    pub fn build_delete(&self, id: i64) -> HttpRequest {
        self.request(HttpMethod::Delete, &format!("/{id}"))
    }

    pub fn build_buscar_por_nome(&self, nome: &str) -> HttpRequest {
        self.query_request("/buscar", "nome", nome)
    }

    pub fn build_buscar_por_categoria(&self, categoria_id: i64) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("/categoria/{categoria_id}"))
    }

    pub fn build_buscar_por_cpf(&self, cpf: &str) -> HttpRequest {
        self.query_request("/cpf", "cpf", cpf)
    }

    pub fn build_buscar_por_email(&self, email: &str) -> HttpRequest {
        self.query_request("/email", "email", email)
    }

    pub fn build_login(&self, input: &LoginRequest) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/login", input)
    }

    pub fn build_alterar_senha(
        &self,
        id: i64,
        input: &AlterarSenhaRequest,
    ) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Put, &format!("/{id}/alterar-senha"), input)
    }

    /// The unlock endpoint takes an empty JSON object as its body.
    pub fn build_desbloquear_conta(&self, id: i64) -> Result<HttpRequest, ApiError> {
        self.json_request(
            HttpMethod::Put,
            &format!("/{id}/desbloquear"),
            &serde_json::Map::new(),
        )
    }

    pub fn build_listar_contas_bloqueadas(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/bloqueados")
    }

    pub fn build_verificar_cpf_email(
        &self,
        input: &VerificacaoCpfEmailRequest,
    ) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/verificar-cpf-email", input)
    }

    pub fn parse_clientes(&self, response: HttpResponse) -> Result<Vec<Cliente>, ApiError> {
        parse_json(response)
    }

    pub fn parse_cliente(&self, response: HttpResponse) -> Result<Cliente, ApiError> {
        parse_json(response)
    }

    /// Any 2xx counts; the body is ignored.
    pub fn parse_delete(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    pub fn parse_login(&self, response: HttpResponse) -> Result<LoginResponse, ApiError> {
        parse_json(response)
    }

    /// Opaque acknowledgement. An empty body yields `Value::Null`.
    pub fn parse_ack(&self, response: HttpResponse) -> Result<Value, ApiError> {
        check_status(&response)?;
        if response.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    pub fn parse_verificacao(
        &self,
        response: HttpResponse,
    ) -> Result<VerificacaoCpfEmailResponse, ApiError> {
        parse_json(response)
    }
}

fn parse_json<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Turn any non-2xx status into `ApiError::Http`.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::Http {
        status: response.status,
        status_text: response.status_text.clone(),
        body: response.body.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ClienteClient {
        ClienteClient::new("http://localhost:8080")
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            status_text: String::new(),
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    fn body_json(req: &HttpRequest) -> Value {
        serde_json::from_str(req.body.as_deref().unwrap()).unwrap()
    }

    #[test]
    fn build_find_all_produces_correct_request() {
        let req = client().build_find_all();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:8080/clientes");
        assert!(req.query.is_empty());
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_find_by_id_produces_correct_request() {
        let req = client().build_find_by_id(42);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:8080/clientes/42");
    }

    #[test]
    fn build_save_without_id_posts_to_collection() {
        let req = client().build_save(&Cliente::new("Cliente Novo", "333.333.333-33")).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:8080/clientes");
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        assert_eq!(
            body_json(&req),
            serde_json::json!({ "nome": "Cliente Novo", "cpf": "333.333.333-33" })
        );
    }

    #[test]
    fn build_save_with_id_puts_to_member() {
        let cliente = Cliente {
            id: Some(1),
            ..Cliente::new("Cliente A Atualizado", "111.111.111-11")
        };
        let req = client().build_save(&cliente).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.url, "http://localhost:8080/clientes/1");
        assert_eq!(body_json(&req)["id"], 1);
    }

    #[test]
    fn build_save_with_zero_id_posts() {
        let cliente = Cliente {
            id: Some(0),
            ..Cliente::new("X", "1")
        };
        let req = client().build_save(&cliente).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:8080/clientes");
    }

    #[test]
    fn build_delete_produces_correct_request() {
        let req = client().build_delete(1);
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.url, "http://localhost:8080/clientes/1");
        assert!(req.body.is_none());
    }

    #[test]
    fn search_builders_carry_query_pairs() {
        let c = client();

        let req = c.build_buscar_por_nome("Cliente A");
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:8080/clientes/buscar");
        assert_eq!(req.query, vec![("nome".to_string(), "Cliente A".to_string())]);

        let req = c.build_buscar_por_cpf("111.111.111-11");
        assert_eq!(req.url, "http://localhost:8080/clientes/cpf");
        assert_eq!(req.query, vec![("cpf".to_string(), "111.111.111-11".to_string())]);

        let req = c.build_buscar_por_email("a@b.com");
        assert_eq!(req.url, "http://localhost:8080/clientes/email");
        assert_eq!(req.query, vec![("email".to_string(), "a@b.com".to_string())]);
    }

    #[test]
    fn build_buscar_por_categoria_uses_path_segment() {
        let req = client().build_buscar_por_categoria(2);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:8080/clientes/categoria/2");
        assert!(req.query.is_empty());
    }

    #[test]
    fn build_login_sends_credentials() {
        let input = LoginRequest {
            cpf_ou_email: "111.111.111-11".to_string(),
            senha: "senha123".to_string(),
        };
        let req = client().build_login(&input).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:8080/clientes/login");
        assert_eq!(
            body_json(&req),
            serde_json::json!({ "cpfOuEmail": "111.111.111-11", "senha": "senha123" })
        );
    }

    #[test]
    fn build_alterar_senha_produces_correct_request() {
        let input = AlterarSenhaRequest {
            senha_atual: "senha123".to_string(),
            nova_senha: "novaSenha456".to_string(),
        };
        let req = client().build_alterar_senha(1, &input).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.url, "http://localhost:8080/clientes/1/alterar-senha");
        assert_eq!(
            body_json(&req),
            serde_json::json!({ "senhaAtual": "senha123", "novaSenha": "novaSenha456" })
        );
    }

    #[test]
    fn build_desbloquear_conta_sends_empty_object() {
        let req = client().build_desbloquear_conta(1).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.url, "http://localhost:8080/clientes/1/desbloquear");
        assert_eq!(req.body.as_deref(), Some("{}"));
    }

    #[test]
    fn build_listar_and_verificar() {
        let c = client();
        let req = c.build_listar_contas_bloqueadas();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:8080/clientes/bloqueados");

        let input = VerificacaoCpfEmailRequest {
            cpf_ou_email: "a@b.com".to_string(),
        };
        let req = c.build_verificar_cpf_email(&input).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:8080/clientes/verificar-cpf-email");
        assert_eq!(body_json(&req), serde_json::json!({ "cpfOuEmail": "a@b.com" }));
    }

    #[test]
    fn parse_clientes_preserves_order() {
        let body = r#"[{"id":1,"nome":"Cliente A","cpf":"111.111.111-11"},{"id":2,"nome":"Cliente B","cpf":"222.222.222-22"}]"#;
        let clientes = client().parse_clientes(response(200, body)).unwrap();
        assert_eq!(clientes.len(), 2);
        assert_eq!(clientes[0].id, Some(1));
        assert_eq!(clientes[1].nome, "Cliente B");
    }

    #[test]
    fn parse_cliente_accepts_created() {
        let body = r#"{"id":3,"nome":"Cliente Novo","cpf":"333.333.333-33"}"#;
        let cliente = client().parse_cliente(response(201, body)).unwrap();
        assert_eq!(cliente.id, Some(3));
    }

    #[test]
    fn parse_cliente_not_found() {
        let err = client().parse_cliente(response(404, "")).unwrap_err();
        assert!(matches!(err, ApiError::Http { status: 404, .. }));
    }

    #[test]
    fn parse_delete_ignores_body() {
        let c = client();
        assert!(c.parse_delete(response(204, "")).is_ok());
        assert!(c.parse_delete(response(200, r#"{"unexpected":true}"#)).is_ok());
        assert!(c.parse_delete(response(200, "not json")).is_ok());
    }

    #[test]
    fn parse_ack_handles_empty_and_json_bodies() {
        let c = client();
        assert_eq!(c.parse_ack(response(200, "")).unwrap(), Value::Null);
        let ack = c
            .parse_ack(response(200, r#"{"sucesso":true,"mensagem":"Senha alterada com sucesso"}"#))
            .unwrap();
        assert_eq!(ack["sucesso"], true);
    }

    #[test]
    fn parse_wrong_status_keeps_raw_details() {
        let resp = HttpResponse {
            status: 500,
            status_text: "Internal Server Error".to_string(),
            headers: Vec::new(),
            body: "boom".to_string(),
        };
        let err = client().parse_clientes(resp).unwrap_err();
        match err {
            ApiError::Http { status, status_text, body } => {
                assert_eq!(status, 500);
                assert_eq!(status_text, "Internal Server Error");
                assert_eq!(body, "boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn parse_bad_json() {
        let err = client().parse_clientes(response(200, "not json")).unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = ClienteClient::new("http://localhost:8080/");
        assert_eq!(client.build_find_all().url, "http://localhost:8080/clientes");
    }
}
