//! Typed client for the `/clientes` REST resource.
//!
//! # Overview
//! `ClienteClient` builds `HttpRequest` values and parses `HttpResponse`
//! values without touching the network (host-does-IO pattern).
//! `ClienteService` drives it over an injected `Transport` and exposes one
//! async method per remote operation, each resolving once with either the
//! typed result or a normalized `ClienteError`.
//!
//! # Design
//! - `ClienteClient` is stateless: it holds only `base_url`.
//! - Every failure (transport, non-2xx status, bad payload) funnels through
//!   `ApiError::normalize`, which yields the single user-facing message.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod service;
pub mod transport;
pub mod types;

pub use client::ClienteClient;
pub use config::ClientConfig;
pub use error::{ApiError, ClienteError, ConfigError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use service::ClienteService;
pub use transport::{ReqwestTransport, Transport};
pub use types::{
    AlterarSenhaRequest, CategoriaRef, Cliente, Contrato, Endereco, LoginRequest, LoginResponse,
    VerificacaoCpfEmailRequest, VerificacaoCpfEmailResponse,
};
