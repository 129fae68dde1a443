use crate::constants::{AWS_QUERY_ENCODE_SET, AWS_URI_ENCODE_SET, X_AMZ_DATE, X_AMZ_SECURITY_TOKEN};
use crate::scope::AWS4_REQUEST;
use crate::{Credential, CredentialScope};
use async_trait::async_trait;
use awscall_core::hash::{hex_hmac_sha256, hex_sha256, hmac_sha256};
use awscall_core::time::{format_iso8601, now, DateTime};
use awscall_core::{Context, Error, Result, SignRequest, SigningRequest};
use http::request::Parts;
use http::{header, HeaderValue};
use log::debug;
use percent_encoding::{percent_decode_str, utf8_percent_encode};
use std::fmt::Write;

/// RequestSigner that implements AWS SigV4 header-based authorization.
///
/// - [Signature Version 4 signing process](https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html)
///
/// Region and service may be set explicitly; without overrides they are
/// inferred from the request's host name at signing time.
#[derive(Debug, Default)]
pub struct RequestSigner {
    service: Option<String>,
    region: Option<String>,

    time: Option<DateTime>,
}

impl RequestSigner {
    /// Create a new SigV4 signer that infers region and service from the
    /// request host.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the signing service.
    pub fn with_service(mut self, service: &str) -> Self {
        self.service = Some(service.to_string());
        self
    }

    /// Override the signing region.
    pub fn with_region(mut self, region: &str) -> Self {
        self.region = Some(region.to_string());
        self
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    #[cfg(test)]
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }
}

#[async_trait]
impl SignRequest for RequestSigner {
    type Credential = Credential;

    async fn sign_request(
        &self,
        _: &Context,
        req: &mut Parts,
        body: &[u8],
        credential: &Self::Credential,
    ) -> Result<()> {
        // One instant per signing operation: the scope date, the x-amz-date
        // header, and the string to sign must all agree exactly.
        let now = self.time.unwrap_or_else(now);
        let mut signed_req = SigningRequest::build(req)?;

        let scope = CredentialScope::resolve(
            signed_req.authority.host(),
            self.region.as_deref(),
            self.service.as_deref(),
            now,
        )?;
        debug!("calculated scope: {scope}");

        // canonicalize context
        canonicalize_header(&mut signed_req, credential, now)?;
        canonicalize_query(&mut signed_req);

        // build canonical request and string to sign.
        let body_hash = hex_sha256(body);
        let creq = canonical_request_string(&signed_req, &body_hash)?;
        debug!("calculated canonical request: {creq}");
        let encoded_req = hex_sha256(creq.as_bytes());

        // StringToSign:
        //
        // AWS4-HMAC-SHA256
        // 20150830T123600Z
        // 20150830/<region>/<service>/aws4_request
        // <hashed_canonical_request>
        let string_to_sign = {
            let mut f = String::new();
            writeln!(f, "AWS4-HMAC-SHA256")
                .map_err(|e| Error::unexpected(format!("failed to write algorithm: {e}")))?;
            writeln!(f, "{}", format_iso8601(now))
                .map_err(|e| Error::unexpected(format!("failed to write timestamp: {e}")))?;
            writeln!(f, "{scope}")
                .map_err(|e| Error::unexpected(format!("failed to write scope: {e}")))?;
            write!(f, "{encoded_req}")
                .map_err(|e| Error::unexpected(format!("failed to write encoded request: {e}")))?;
            f
        };
        debug!("calculated string to sign: {string_to_sign}");

        // The signing key is derived fresh for every operation and dropped
        // as soon as the signature is produced; the scope changes daily so
        // it is never safe to cache.
        let signing_key = generate_signing_key(&credential.secret_access_key, &scope);
        let signature = hex_hmac_sha256(&signing_key, string_to_sign.as_bytes());

        let mut authorization = HeaderValue::from_str(&format!(
            "AWS4-HMAC-SHA256 Credential={}/{}, SignedHeaders={}, Signature={}",
            credential.access_key_id,
            scope,
            signed_req.signed_header_names().join(";"),
            signature
        ))
        .map_err(|e| Error::unexpected(format!("failed to create authorization header: {e}")))?;
        authorization.set_sensitive(true);

        signed_req
            .headers
            .insert(header::AUTHORIZATION, authorization);

        // Apply to the request.
        signed_req.apply(req)
    }
}

fn canonical_request_string(ctx: &SigningRequest, body_hash: &str) -> Result<String> {
    // 256 is specially chosen to avoid reallocation for most requests.
    let mut f = String::with_capacity(256);

    // Insert method
    writeln!(f, "{}", ctx.method)
        .map_err(|e| Error::unexpected(format!("failed to write method: {e}")))?;
    // Insert encoded path
    let path = percent_decode_str(&ctx.path).decode_utf8().map_err(|e| {
        Error::encoding("request path is not valid utf-8 after percent-decoding").with_source(e)
    })?;
    writeln!(f, "{}", utf8_percent_encode(&path, &AWS_URI_ENCODE_SET))
        .map_err(|e| Error::unexpected(format!("failed to write encoded path: {e}")))?;
    // Insert query
    writeln!(
        f,
        "{}",
        ctx.query
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&")
    )
    .map_err(|e| Error::unexpected(format!("failed to write query: {e}")))?;
    // Insert canonical headers, followed by a blank separator line and the
    // signed header list.
    let signed_headers = ctx.signed_header_names();
    for name in signed_headers.iter() {
        // Each signed header must carry exactly one value: the canonical
        // request covers one value per name, so signing a request that sends
        // several would produce a signature the service rejects.
        let mut values = ctx.headers.get_all(*name).iter();
        let value = values
            .next()
            .ok_or_else(|| Error::unexpected(format!("header {name} disappeared")))?;
        if values.next().is_some() {
            return Err(Error::encoding(format!(
                "header {name} has multiple values and cannot be canonicalized"
            )));
        }

        let value = value.to_str().map_err(|e| {
            Error::encoding(format!("header {name} value is not valid utf-8")).with_source(e)
        })?;
        writeln!(f, "{name}:{value}")
            .map_err(|e| Error::unexpected(format!("failed to write header: {e}")))?;
    }
    writeln!(f).map_err(|e| Error::unexpected(format!("failed to write newline: {e}")))?;
    writeln!(f, "{}", signed_headers.join(";"))
        .map_err(|e| Error::unexpected(format!("failed to write signed headers: {e}")))?;

    write!(f, "{body_hash}")
        .map_err(|e| Error::unexpected(format!("failed to write body hash: {e}")))?;

    Ok(f)
}

fn canonicalize_header(ctx: &mut SigningRequest, cred: &Credential, now: DateTime) -> Result<()> {
    for (_, value) in ctx.headers.iter_mut() {
        SigningRequest::header_value_normalize(value)
    }

    // Insert HOST header if not present: caller-supplied host wins, the URL
    // authority is the fallback.
    if ctx.headers.get(header::HOST).is_none() {
        ctx.headers.insert(
            header::HOST,
            ctx.authority.as_str().parse().map_err(|e| {
                Error::unexpected(format!("failed to parse authority as header value: {e}"))
            })?,
        );
    }

    // The signer owns x-amz-date: it is always rewritten from the sampled
    // instant so header and string to sign cannot disagree.
    let date_header = HeaderValue::try_from(format_iso8601(now))
        .map_err(|e| Error::unexpected(format!("failed to create date header: {e}")))?;
    ctx.headers.insert(X_AMZ_DATE, date_header);

    // Insert X_AMZ_SECURITY_TOKEN header if security token exists, so that
    // it is covered by the signature.
    if let Some(token) = &cred.session_token {
        let mut value = HeaderValue::from_str(token)
            .map_err(|e| Error::unexpected(format!("failed to create security token header: {e}")))?;
        // Set token value sensitive to avoid leaking.
        value.set_sensitive(true);

        ctx.headers.insert(X_AMZ_SECURITY_TOKEN, value);
    }

    Ok(())
}

fn canonicalize_query(ctx: &mut SigningRequest) {
    if ctx.query.is_empty() {
        return;
    }

    // Encode first, then sort by encoded name with ties broken by encoded
    // value.
    let mut query = ctx
        .query
        .iter()
        .map(|(k, v)| {
            (
                utf8_percent_encode(k, &AWS_QUERY_ENCODE_SET).to_string(),
                utf8_percent_encode(v, &AWS_QUERY_ENCODE_SET).to_string(),
            )
        })
        .collect::<Vec<_>>();
    query.sort();

    ctx.query = query;
}

fn generate_signing_key(secret: &str, scope: &CredentialScope) -> Vec<u8> {
    // Sign secret
    let secret = format!("AWS4{secret}");
    // Sign date
    let sign_date = hmac_sha256(secret.as_bytes(), scope.date().as_bytes());
    // Sign region
    let sign_region = hmac_sha256(sign_date.as_slice(), scope.region().as_bytes());
    // Sign service
    let sign_service = hmac_sha256(sign_region.as_slice(), scope.service().as_bytes());
    // Sign request
    hmac_sha256(sign_service.as_slice(), AWS4_REQUEST.as_bytes())
}
