//! Signing and sending AWS API requests without effort.
//!
//! This crate ties the awscall workspace together: the signing-agnostic core,
//! the SigV4 signing implementation, and the tokio/reqwest context
//! implementations, plus a thin [`Client`] that signs requests, dispatches
//! them, and classifies responses.
//!
//! ## Example
//!
//! ```no_run
//! use awscall::{default_signer, Client};
//! use bytes::Bytes;
//!
//! # #[tokio::main]
//! # async fn main() -> awscall_core::Result<()> {
//! // Region and service are inferred from the host name.
//! let client = Client::new(default_signer());
//!
//! let req = http::Request::builder()
//!     .method("GET")
//!     .uri("https://dynamodb.us-west-2.amazonaws.com/")
//!     .body(Bytes::new())
//!     .unwrap();
//!
//! let resp = client.execute(req).await?;
//! println!("{}", resp.status());
//! # Ok(())
//! # }
//! ```

pub use awscall_core::{
    Context, Env, Error, ErrorKind, OsEnv, ProvideCredential, Result, SignRequest, Signer,
    SigningCredential, StaticEnv,
};
pub use awscall_file_read_tokio::TokioFileRead;
pub use awscall_http_send_reqwest::ReqwestHttpSend;
pub use awscall_sigv4::{
    Credential, CredentialScope, DefaultCredentialProvider, EnvCredentialProvider,
    ProfileCredentialProvider, ProvideCredentialChain, RequestSigner, StaticCredentialProvider,
};

mod client;
pub use client::Client;

/// Create a context wired with the standard implementations: Tokio file
/// reading, reqwest HTTP sending, and OS environment access.
pub fn default_context() -> Context {
    Context::new()
        .with_file_read(TokioFileRead)
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv)
}

/// Default signer type with commonly used components.
pub type DefaultSigner = Signer<Credential>;

/// Create a default SigV4 signer with standard configuration.
///
/// This function creates a signer with:
/// - Default context (Tokio file reader, reqwest HTTP client, OS environment)
/// - Default credential provider (env vars, then shared config files)
/// - A request signer that infers region and service from the request host
pub fn default_signer() -> DefaultSigner {
    let ctx = default_context();
    let provider = DefaultCredentialProvider::new();
    let signer = RequestSigner::new();
    Signer::new(ctx, provider, signer)
}
