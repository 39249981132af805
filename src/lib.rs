//! # Bazaar (marketplace client)
//!
//! `bazaar` talks to a marketplace backend that exposes its business
//! endpoints as JSON-RPC 2.0 over HTTPS. It authenticates users, lists and
//! searches products, manages purchases and sales, and carries buyer/seller
//! chat.
//!
//! ## Request pipeline
//!
//! Every request flows through a fixed chain of [`net::Transport`] layers:
//!
//! ```text
//! repository -> ApiClient -> RetryInterceptor -> AuthInterceptor -> ReqwestTransport
//! ```
//!
//! - **Retry:** server errors (`5xx`) and `408` are retried up to three times with
//!   exponential backoff (500ms, 1s, 2s). Timeouts and refused connections are
//!   retried too; DNS failures are not.
//! - **Auth:** the bearer token stored in the [`session::CredentialStore`] is
//!   attached to each attempt, so a retry always carries the current token.
//!
//! ## Resource envelope
//!
//! Repository operations return a [`resource::ResourceFlow`]: one `Loading`
//! state followed by exactly one `Success` or `Error`. Every transport, RPC or
//! decoding failure is folded into `Error(message)` at the repository boundary.
//!
//! ## Session
//!
//! The session (token plus minimal identity) lives in a file sealed with
//! ChaCha20-Poly1305. Login and registration persist it before emitting
//! `Success`; logout removes it.

pub mod api;
pub mod cli;
pub mod config;
pub mod models;
pub mod net;
pub mod repository;
pub mod resource;
pub mod session;

pub use repository::Marketplace;

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
