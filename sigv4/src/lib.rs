//! AWS Signature Version 4 signing.
//!
//! This crate implements the SigV4 header-based signing process: request
//! canonicalization, credential scope resolution, signing key derivation,
//! and `Authorization` header assembly. Credential acquisition lives behind
//! the provider types in [`provide_credential`].

mod constants;

mod credential;
pub use credential::Credential;

mod scope;
pub use scope::CredentialScope;

mod sign_request;
pub use sign_request::RequestSigner;

mod provide_credential;
pub use provide_credential::DefaultCredentialProvider;
pub use provide_credential::EnvCredentialProvider;
pub use provide_credential::ProfileCredentialProvider;
pub use provide_credential::ProvideCredentialChain;
pub use provide_credential::StaticCredentialProvider;
