//! In-memory stand-in for the `/clientes` backend.
//!
//! Mirrors the real API closely enough for the client's integration tests:
//! sequential ids, CPF/email uniqueness, write-only passwords, login attempt
//! counting with account lockout, and `{ "erro", "status" }` error bodies.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

/// Failed logins tolerated before the account is locked.
pub const MAX_TENTATIVAS_LOGIN: u32 = 3;

const SENHA_MIN_LEN: usize = 6;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Categoria {
    pub id: i64,
    pub nome: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cliente {
    #[serde(default)]
    pub id: Option<i64>,
    pub nome: String,
    pub cpf: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub telefone: Option<String>,
    #[serde(default)]
    pub data_nascimento: Option<String>,
    #[serde(default, skip_serializing)]
    pub senha: Option<String>,
    #[serde(default)]
    pub ultimo_login: Option<String>,
    #[serde(default)]
    pub tentativas_login: Option<u32>,
    #[serde(default)]
    pub conta_bloqueada: Option<bool>,
    #[serde(default)]
    pub ativo: Option<bool>,
    #[serde(default)]
    pub status_cadastro: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub categoria: Option<Categoria>,
    #[serde(default)]
    pub enderecos: Option<Vec<Value>>,
    #[serde(default)]
    pub contratos: Option<Vec<Value>>,
}

impl Cliente {
    fn bloqueada(&self) -> bool {
        self.conta_bloqueada.unwrap_or(false)
    }

    fn matches_cpf_ou_email(&self, key: &str) -> bool {
        self.cpf == key || self.email.as_deref() == Some(key)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub cpf_ou_email: String,
    pub senha: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlterarSenhaRequest {
    pub senha_atual: String,
    pub nova_senha: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificacaoRequest {
    pub cpf_ou_email: String,
}

#[derive(Deserialize)]
pub struct NomeQuery {
    pub nome: String,
}

#[derive(Deserialize)]
pub struct CpfQuery {
    pub cpf: String,
}

#[derive(Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

#[derive(Debug, Default)]
pub struct Store {
    next_id: i64,
    clientes: BTreeMap<i64, Cliente>,
}

impl Store {
    fn conflict(&self, cliente: &Cliente, except: Option<i64>) -> Option<&'static str> {
        let email = non_blank(&cliente.email);
        for (id, existing) in &self.clientes {
            if Some(*id) == except {
                continue;
            }
            if existing.cpf == cliente.cpf {
                return Some("Não é possível cadastrar cliente com CPF já existente");
            }
            if email.is_some() && existing.email.as_deref() == email {
                return Some("Já existe um cliente cadastrado com este email");
            }
        }
        None
    }

    fn find_by(&self, pred: impl Fn(&Cliente) -> bool) -> Option<&Cliente> {
        self.clientes.values().find(|c| pred(*c))
    }

    fn filter(&self, pred: impl Fn(&Cliente) -> bool) -> Vec<Cliente> {
        self.clientes.values().filter(|c| pred(*c)).cloned().collect()
    }
}

pub type Db = Arc<RwLock<Store>>;

/// Error response carrying the backend's `{ "erro", "status" }` body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    erro: String,
}

impl ApiError {
    fn new(status: StatusCode, erro: impl Into<String>) -> Self {
        Self {
            status,
            erro: erro.into(),
        }
    }

    fn not_found(erro: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, erro)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({ "erro": self.erro, "status": self.status.as_u16() });
        (self.status, Json(body)).into_response()
    }
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/clientes", get(list_clientes).post(create_cliente))
        .route("/clientes/buscar", get(buscar_por_nome))
        .route("/clientes/categoria/{categoria_id}", get(buscar_por_categoria))
        .route("/clientes/cpf", get(buscar_por_cpf))
        .route("/clientes/email", get(buscar_por_email))
        .route("/clientes/login", post(login))
        .route("/clientes/bloqueados", get(listar_bloqueados))
        .route("/clientes/verificar-cpf-email", post(verificar_cpf_email))
        .route(
            "/clientes/{id}",
            get(get_cliente).put(update_cliente).delete(delete_cliente),
        )
        .route("/clientes/{id}/alterar-senha", put(alterar_senha))
        .route("/clientes/{id}/desbloquear", put(desbloquear_conta))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn status_cadastro(cliente: &Cliente) -> String {
    match non_blank(&cliente.telefone) {
        Some(_) => "COMPLETO".to_string(),
        None => "INCOMPLETO".to_string(),
    }
}

fn validate_senha(senha: &str) -> Result<(), ApiError> {
    if senha.chars().count() < SENHA_MIN_LEN {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "A senha deve ter no mínimo 6 caracteres",
        ));
    }
    Ok(())
}

fn ack(mensagem: &str) -> Json<Value> {
    Json(json!({ "sucesso": true, "mensagem": mensagem }))
}

async fn list_clientes(State(db): State<Db>) -> Json<Vec<Cliente>> {
    Json(db.read().await.clientes.values().cloned().collect())
}

async fn create_cliente(
    State(db): State<Db>,
    Json(mut input): Json<Cliente>,
) -> Result<(StatusCode, Json<Cliente>), ApiError> {
    let mut store = db.write().await;

    if let Some(erro) = store.conflict(&input, None) {
        return Err(ApiError::new(StatusCode::CONFLICT, erro));
    }
    let senha = non_blank(&input.senha).ok_or_else(|| {
        ApiError::new(
            StatusCode::BAD_REQUEST,
            "A senha é obrigatória para cadastro do cliente",
        )
    })?;
    validate_senha(senha)?;

    store.next_id += 1;
    let id = store.next_id;
    let stamp = now();
    input.id = Some(id);
    input.status_cadastro = Some(status_cadastro(&input));
    input.ativo = Some(input.ativo.unwrap_or(true));
    input.conta_bloqueada = Some(false);
    input.tentativas_login = Some(0);
    input.ultimo_login = None;
    input.created_at = Some(stamp.clone());
    input.updated_at = Some(stamp);

    tracing::info!(id, cpf = %input.cpf, "cliente criado");
    store.clientes.insert(id, input.clone());
    Ok((StatusCode::CREATED, Json(input)))
}

async fn get_cliente(State(db): State<Db>, Path(id): Path<i64>) -> Result<Json<Cliente>, ApiError> {
    let store = db.read().await;
    store
        .clientes
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Cliente não encontrado"))
}

async fn update_cliente(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(mut input): Json<Cliente>,
) -> Result<Json<Cliente>, ApiError> {
    let mut store = db.write().await;
    let existing = store
        .clientes
        .get(&id)
        .cloned()
        .ok_or_else(|| ApiError::not_found("Cliente não encontrado"))?;

    if let Some(erro) = store.conflict(&input, Some(id)) {
        return Err(ApiError::new(StatusCode::CONFLICT, erro));
    }
    match non_blank(&input.senha) {
        Some(senha) => validate_senha(senha)?,
        None => input.senha = existing.senha.clone(),
    }

    input.id = Some(id);
    input.status_cadastro = Some(status_cadastro(&input));
    input.ativo = input.ativo.or(existing.ativo);
    input.conta_bloqueada = existing.conta_bloqueada;
    input.tentativas_login = existing.tentativas_login;
    input.ultimo_login = existing.ultimo_login;
    input.created_at = existing.created_at;
    input.updated_at = Some(now());

    store.clientes.insert(id, input.clone());
    Ok(Json(input))
}

async fn delete_cliente(State(db): State<Db>, Path(id): Path<i64>) -> Result<StatusCode, ApiError> {
    let mut store = db.write().await;
    store
        .clientes
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| ApiError::not_found("Cliente não encontrado"))
}

async fn buscar_por_nome(State(db): State<Db>, Query(q): Query<NomeQuery>) -> Json<Vec<Cliente>> {
    let needle = q.nome.to_lowercase();
    Json(db.read().await.filter(|c| c.nome.to_lowercase().contains(&needle)))
}

async fn buscar_por_categoria(
    State(db): State<Db>,
    Path(categoria_id): Path<i64>,
) -> Json<Vec<Cliente>> {
    Json(
        db.read()
            .await
            .filter(|c| c.categoria.as_ref().is_some_and(|cat| cat.id == categoria_id)),
    )
}

async fn buscar_por_cpf(
    State(db): State<Db>,
    Query(q): Query<CpfQuery>,
) -> Result<Json<Cliente>, ApiError> {
    let store = db.read().await;
    store
        .find_by(|c| c.cpf == q.cpf)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("Cliente não encontrado com CPF: {}", q.cpf)))
}

async fn buscar_por_email(
    State(db): State<Db>,
    Query(q): Query<EmailQuery>,
) -> Result<Json<Cliente>, ApiError> {
    let store = db.read().await;
    store
        .find_by(|c| c.email.as_deref() == Some(q.email.as_str()))
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("Cliente não encontrado com email: {}", q.email)))
}

async fn login(State(db): State<Db>, Json(input): Json<LoginRequest>) -> Result<Json<Value>, ApiError> {
    let mut store = db.write().await;
    // CPF takes precedence over email when both could match.
    let id = store
        .find_by(|c| c.cpf == input.cpf_ou_email)
        .or_else(|| store.find_by(|c| c.email.as_deref() == Some(input.cpf_ou_email.as_str())))
        .and_then(|c| c.id)
        .ok_or_else(|| {
            ApiError::not_found(format!(
                "Cliente não encontrado com CPF/Email: {}",
                input.cpf_ou_email
            ))
        })?;
    let cliente = store
        .clientes
        .get_mut(&id)
        .ok_or_else(|| ApiError::not_found("Cliente não encontrado"))?;

    if cliente.bloqueada() {
        return Err(ApiError::new(
            StatusCode::FORBIDDEN,
            "Conta bloqueada devido a muitas tentativas de login incorretas",
        ));
    }
    if !cliente.ativo.unwrap_or(true) {
        return Err(ApiError::new(StatusCode::FORBIDDEN, "Cliente inativo"));
    }

    if cliente.senha.as_deref() != Some(input.senha.as_str()) {
        let tentativas = cliente.tentativas_login.unwrap_or(0) + 1;
        cliente.tentativas_login = Some(tentativas);
        if tentativas >= MAX_TENTATIVAS_LOGIN {
            cliente.conta_bloqueada = Some(true);
            tracing::warn!(id, tentativas, "conta bloqueada");
        }
        return Err(ApiError::new(StatusCode::UNAUTHORIZED, "Senha incorreta"));
    }

    cliente.tentativas_login = Some(0);
    cliente.ultimo_login = Some(now());
    Ok(Json(json!({
        "sucesso": true,
        "mensagem": "Login realizado com sucesso",
        "cliente": cliente,
    })))
}

async fn alterar_senha(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<AlterarSenhaRequest>,
) -> Result<Json<Value>, ApiError> {
    let mut store = db.write().await;
    let cliente = store
        .clientes
        .get_mut(&id)
        .ok_or_else(|| ApiError::not_found("Cliente não encontrado"))?;

    if cliente.senha.as_deref() != Some(input.senha_atual.as_str()) {
        return Err(ApiError::new(StatusCode::UNAUTHORIZED, "Senha atual incorreta"));
    }
    validate_senha(input.nova_senha.trim())?;

    cliente.senha = Some(input.nova_senha);
    cliente.updated_at = Some(now());
    Ok(ack("Senha alterada com sucesso"))
}

async fn desbloquear_conta(State(db): State<Db>, Path(id): Path<i64>) -> Result<Json<Value>, ApiError> {
    let mut store = db.write().await;
    let cliente = store
        .clientes
        .get_mut(&id)
        .ok_or_else(|| ApiError::not_found("Cliente não encontrado"))?;

    cliente.conta_bloqueada = Some(false);
    cliente.tentativas_login = Some(0);
    cliente.updated_at = Some(now());
    tracing::info!(id, "conta desbloqueada");
    Ok(ack("Conta desbloqueada com sucesso"))
}

async fn listar_bloqueados(State(db): State<Db>) -> Json<Vec<Cliente>> {
    Json(db.read().await.filter(Cliente::bloqueada))
}

async fn verificar_cpf_email(
    State(db): State<Db>,
    Json(input): Json<VerificacaoRequest>,
) -> Json<Value> {
    let store = db.read().await;
    match store.find_by(|c| c.matches_cpf_ou_email(&input.cpf_ou_email)) {
        Some(c) => Json(json!({ "existe": true, "clienteId": c.id, "nome": c.nome })),
        None => Json(json!({ "existe": false })),
    }
}
