use awscall_core::{Error, Result, Signer};
use awscall_sigv4::Credential;
use bytes::Bytes;
use log::debug;

/// Client dispatches signed requests.
///
/// The sequence is thin by design: sign the request, hand it to the
/// configured transport, await the full response, and classify the result
/// by status code. A response with a status outside `[200, 300)` is a
/// request-level failure carrying the full response for diagnostic display,
/// not a transport error.
#[derive(Clone, Debug)]
pub struct Client {
    signer: Signer<Credential>,
}

impl Client {
    /// Create a new client around a signer.
    pub fn new(signer: Signer<Credential>) -> Self {
        Self { signer }
    }

    /// Sign a request without sending it.
    ///
    /// The returned request carries the `Authorization`, `x-amz-date`, and
    /// (when a session token is in play) `x-amz-security-token` headers and
    /// can be displayed for debugging or handed to another transport. It
    /// must not be modified afterwards; any change invalidates the
    /// signature.
    pub async fn signed(&self, req: http::Request<Bytes>) -> Result<http::Request<Bytes>> {
        let (mut parts, body) = req.into_parts();
        self.signer.sign(&mut parts, &body).await?;
        Ok(http::Request::from_parts(parts, body))
    }

    /// Sign the request, send it, and await the full response.
    ///
    /// Timestamps are regenerated on every call, so retrying a failed
    /// request means calling this again with a fresh request; the signing
    /// work is cheap enough to redo entirely.
    pub async fn execute(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let req = self.signed(req).await?;
        debug!("dispatching {} {}", req.method(), req.uri());

        let resp = self.signer.context().http_send(req).await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::http_status(
                format!("request failed with status {status}"),
                resp,
            ));
        }
        Ok(resp)
    }
}
