use crate::{Context, Result};
use std::fmt::Debug;

/// SigningCredential is the trait used by the signer as its signing key.
pub trait SigningCredential: Clone + Debug + Send + Sync + Unpin + 'static {
    /// Check if the credential is still valid for signing.
    fn is_valid(&self) -> bool;
}

impl<T: SigningCredential> SigningCredential for Option<T> {
    fn is_valid(&self) -> bool {
        let Some(cred) = self else {
            return false;
        };

        cred.is_valid()
    }
}

/// ProvideCredential is the trait used by the signer to obtain a credential
/// from the environment.
///
/// This is the boundary behind which credential acquisition lives: env
/// variables, shared credential files, or anything else the caller wires in.
#[async_trait::async_trait]
pub trait ProvideCredential: Debug + Send + Sync + Unpin + 'static {
    /// Credential returned by this provider.
    type Credential: Send + Sync + Unpin + 'static;

    /// Provide a credential, or `None` if this source has nothing to offer.
    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>>;
}

/// SignRequest is the trait used by the signer to attach a signature to a
/// request.
#[async_trait::async_trait]
pub trait SignRequest: Debug + Send + Sync + Unpin + 'static {
    /// Credential used by this signer.
    type Credential: Send + Sync + Unpin + 'static;

    /// Sign the request in place.
    ///
    /// ## Body
    ///
    /// `body` is the raw payload the request will be sent with; its hash is
    /// bound into the signature, so the caller must pass exactly the bytes
    /// that go on the wire. An empty slice is a valid (empty) body.
    ///
    /// ## Headers
    ///
    /// Every header name must carry exactly one value. A request with
    /// repeated header names cannot be signed consistently and is rejected.
    ///
    /// ## Failure policy
    ///
    /// Signing is all-or-nothing: any failure leaves the request unusable for
    /// sending and the caller must not fall back to an unsigned request.
    async fn sign_request(
        &self,
        ctx: &Context,
        req: &mut http::request::Parts,
        body: &[u8],
        credential: &Self::Credential,
    ) -> Result<()>;
}
