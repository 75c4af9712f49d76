//! Command-line front end for the clientes API.
//!
//! Each subcommand maps to one `ClienteService` operation and prints the
//! result as pretty JSON. Failures print the normalized message and exit
//! non-zero.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clientes_core::config::{BASE_URL_VAR, TIMEOUT_VAR};
use clientes_core::{
    AlterarSenhaRequest, Cliente, ClientConfig, ClienteService, LoginRequest,
    VerificacaoCpfEmailRequest,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "clientes", about = "Manage customers through the clientes REST API")]
struct Cli {
    /// Server root [default: http://localhost:8080].
    #[arg(long, env = "CLIENTES_API_URL", global = true)]
    base_url: Option<String>,

    /// Per-request timeout in seconds. No timeout when unset.
    #[arg(long, env = "CLIENTES_TIMEOUT_SECS", global = true)]
    timeout_secs: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List every customer.
    List,
    /// Fetch one customer by id.
    Get { id: i64 },
    /// Create or update a customer from a JSON document.
    ///
    /// Without an "id" field the customer is created; with one it is updated.
    Save { json: String },
    Delete { id: i64 },
    /// Case-insensitive search by name.
    BuscarNome { nome: String },
    BuscarCategoria { categoria_id: i64 },
    BuscarCpf { cpf: String },
    BuscarEmail { email: String },
    Login {
        #[arg(long)]
        cpf_ou_email: String,
        #[arg(long)]
        senha: String,
    },
    AlterarSenha {
        id: i64,
        #[arg(long)]
        senha_atual: String,
        #[arg(long)]
        nova_senha: String,
    },
    Desbloquear { id: i64 },
    /// List customers whose account is locked.
    Bloqueados,
    /// Check whether a CPF or email is already registered.
    Verificar { cpf_ou_email: String },
}

/// Build the client config from the parsed flags. Clap has already resolved
/// each flag against its environment variable.
fn load_config(cli: &Cli) -> Result<ClientConfig> {
    let config = ClientConfig::from_lookup(|var| match var {
        BASE_URL_VAR => cli.base_url.clone(),
        TIMEOUT_VAR => cli.timeout_secs.clone(),
        _ => None,
    })?;
    Ok(config)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    tracing::debug!(base_url = %config.base_url, timeout = ?config.timeout, "configuration loaded");
    let service = ClienteService::from_config(&config)?;

    match cli.command {
        Command::List => print_json(&service.find_all().await?),
        Command::Get { id } => print_json(&service.find_by_id(id).await?),
        Command::Save { json } => {
            let cliente: Cliente =
                serde_json::from_str(&json).context("invalid cliente JSON")?;
            print_json(&service.save(&cliente).await?)
        }
        Command::Delete { id } => {
            service.delete(id).await?;
            tracing::info!(id, "cliente removido");
            Ok(())
        }
        Command::BuscarNome { nome } => print_json(&service.buscar_por_nome(&nome).await?),
        Command::BuscarCategoria { categoria_id } => {
            print_json(&service.buscar_por_categoria(categoria_id).await?)
        }
        Command::BuscarCpf { cpf } => print_json(&service.buscar_por_cpf(&cpf).await?),
        Command::BuscarEmail { email } => print_json(&service.buscar_por_email(&email).await?),
        Command::Login { cpf_ou_email, senha } => {
            let input = LoginRequest { cpf_ou_email, senha };
            print_json(&service.login(&input).await?)
        }
        Command::AlterarSenha {
            id,
            senha_atual,
            nova_senha,
        } => {
            let input = AlterarSenhaRequest {
                senha_atual,
                nova_senha,
            };
            print_json(&service.alterar_senha(id, &input).await?)
        }
        Command::Desbloquear { id } => print_json(&service.desbloquear_conta(id).await?),
        Command::Bloqueados => print_json(&service.listar_contas_bloqueadas().await?),
        Command::Verificar { cpf_ou_email } => {
            let input = VerificacaoCpfEmailRequest { cpf_ou_email };
            print_json(&service.verificar_cpf_email(&input).await?)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    dotenvy::dotenv().ok();
    run(Cli::parse()).await
}
