//! Reqwest-based transport implementation for awscall.
//!
//! This crate provides `ReqwestHttpSend`, which implements the `HttpSend`
//! trait from `awscall_core` on top of a `reqwest::Client`.
//!
//! Connection-level failures (refused connections, DNS errors, timeouts) are
//! reported as `Transport` errors. A response with a non-2xx status is NOT an
//! error at this layer; status classification belongs to the dispatcher.

use async_trait::async_trait;
use awscall_core::{Error, HttpSend, Result};
use bytes::Bytes;
use http_body_util::BodyExt;
use reqwest::{Client, Request};

/// Reqwest-based implementation of the `HttpSend` trait.
#[derive(Debug, Default)]
pub struct ReqwestHttpSend {
    client: Client,
}

impl ReqwestHttpSend {
    /// Create a new ReqwestHttpSend with a reqwest::Client.
    ///
    /// Use this to bring your own client with connection timeouts, proxies,
    /// or TLS settings; retry policy also belongs to the client, not to the
    /// signing core.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpSend for ReqwestHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let req = Request::try_from(req)
            .map_err(|e| Error::transport("failed to convert request").with_source(e))?;
        let resp: http::Response<_> = self
            .client
            .execute(req)
            .await
            .map_err(|e| Error::transport(format!("failed to send request: {e}")).with_source(e))?
            .into();

        let (parts, body) = resp.into_parts();
        let bs = BodyExt::collect(body)
            .await
            .map(|buf| buf.to_bytes())
            .map_err(|e| Error::transport("failed to read response body").with_source(e))?;
        Ok(http::Response::from_parts(parts, bs))
    }
}
