use std::mem;

use http::header::AUTHORIZATION;
use http::uri::Authority;
use http::uri::PathAndQuery;
use http::uri::Scheme;
use http::HeaderMap;
use http::HeaderValue;
use http::Method;
use http::Uri;
use std::str::FromStr;

use crate::{Error, Result};

/// Signing context for a request.
///
/// This is the decomposed, owned form of an `http::request::Parts` that the
/// signing layers canonicalize and mutate. Once the Authorization header is
/// computed the context is applied back onto the request and must not change
/// afterwards; headers added after signing are not covered by the signature.
#[derive(Debug)]
pub struct SigningRequest {
    /// HTTP method.
    pub method: Method,
    /// HTTP scheme.
    pub scheme: Scheme,
    /// HTTP authority.
    pub authority: Authority,
    /// HTTP path.
    pub path: String,
    /// HTTP query parameters.
    pub query: Vec<(String, String)>,
    /// HTTP headers.
    pub headers: HeaderMap,
}

impl SigningRequest {
    /// Build a signing context from http::request::Parts.
    pub fn build(parts: &mut http::request::Parts) -> Result<Self> {
        let uri = mem::take(&mut parts.uri).into_parts();
        let paq = uri
            .path_and_query
            .unwrap_or_else(|| PathAndQuery::from_static("/"));

        Ok(SigningRequest {
            method: parts.method.clone(),
            scheme: uri.scheme.unwrap_or(Scheme::HTTPS),
            authority: uri.authority.ok_or_else(|| {
                Error::malformed_url("request without authority is invalid for signing")
            })?,
            path: paq.path().to_string(),
            query: paq
                .query()
                .map(|v| {
                    form_urlencoded::parse(v.as_bytes())
                        .map(|(k, v)| (k.into_owned(), v.into_owned()))
                        .collect()
                })
                .unwrap_or_default(),

            // Take the headers out of the request to avoid copy.
            // We will return it back when apply the context.
            headers: mem::take(&mut parts.headers),
        })
    }

    /// Apply the signing context back to http::request::Parts.
    pub fn apply(mut self, parts: &mut http::request::Parts) -> Result<()> {
        let query_size = self.query_size();

        // Return headers back.
        mem::swap(&mut parts.headers, &mut self.headers);
        parts.method = self.method;
        parts.uri = {
            let mut uri_parts = mem::take(&mut parts.uri).into_parts();
            uri_parts.scheme = Some(self.scheme);
            uri_parts.authority = Some(self.authority);
            // Build path and query.
            uri_parts.path_and_query = {
                let paq = if query_size == 0 {
                    self.path
                } else {
                    let mut s = self.path;
                    s.reserve(query_size + 1);

                    s.push('?');
                    for (i, (k, v)) in self.query.iter().enumerate() {
                        if i > 0 {
                            s.push('&');
                        }

                        s.push_str(k);
                        if !v.is_empty() {
                            s.push('=');
                            s.push_str(v);
                        }
                    }

                    s
                };

                Some(PathAndQuery::from_str(&paq).map_err(|e| {
                    Error::malformed_url(format!("signed path and query is invalid: {paq}"))
                        .with_source(e)
                })?)
            };
            Uri::from_parts(uri_parts)
                .map_err(|e| Error::malformed_url("signed uri is invalid").with_source(e))?
        };

        Ok(())
    }

    /// Get query size.
    #[inline]
    pub fn query_size(&self) -> usize {
        self.query
            .iter()
            .map(|(k, v)| k.len() + v.len())
            .sum::<usize>()
    }

    /// Normalize a header value the way canonicalization requires: trim
    /// leading and trailing whitespace and collapse internal runs of
    /// whitespace into a single space.
    pub fn header_value_normalize(v: &mut HeaderValue) {
        let bs = v.as_bytes();

        let mut out = Vec::with_capacity(bs.len());
        let mut in_run = false;
        for &b in bs {
            if b == b' ' || b == b'\t' {
                in_run = true;
                continue;
            }
            if in_run && !out.is_empty() {
                out.push(b' ');
            }
            in_run = false;
            out.push(b);
        }

        // This can't fail because we started with a valid HeaderValue and
        // only removed or collapsed whitespace.
        *v = HeaderValue::from_bytes(&out).expect("invalid header value")
    }

    /// Get the names of all headers covered by the signature, lowercase and
    /// sorted.
    ///
    /// The `authorization` header is never part of the signed set.
    pub fn signed_header_names(&self) -> Vec<&str> {
        let mut h = self
            .headers
            .keys()
            .map(|k| k.as_str())
            .filter(|k| *k != AUTHORIZATION.as_str())
            .collect::<Vec<&str>>();
        h.sort_unstable();

        h
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parts_of(uri: &str) -> http::request::Parts {
        http::Request::builder()
            .method("GET")
            .uri(uri)
            .body(())
            .expect("request must build")
            .into_parts()
            .0
    }

    #[test]
    fn test_build_splits_path_and_query() {
        let mut parts = parts_of("https://iam.amazonaws.com/?Action=ListUsers&Version=2010-05-08");
        let req = SigningRequest::build(&mut parts).expect("build must succeed");

        assert_eq!(req.path, "/");
        assert_eq!(
            req.query,
            vec![
                ("Action".to_string(), "ListUsers".to_string()),
                ("Version".to_string(), "2010-05-08".to_string()),
            ]
        );
        assert_eq!(req.authority.as_str(), "iam.amazonaws.com");
    }

    #[test]
    fn test_build_without_authority_is_malformed() {
        let mut parts = parts_of("/relative/only");
        let err = SigningRequest::build(&mut parts).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::MalformedUrl);
    }

    #[test]
    fn test_apply_round_trips_uri() {
        let mut parts = parts_of("https://dynamodb.us-west-2.amazonaws.com/table?a=1&b=2");
        let req = SigningRequest::build(&mut parts).expect("build must succeed");
        req.apply(&mut parts).expect("apply must succeed");

        assert_eq!(
            parts.uri.to_string(),
            "https://dynamodb.us-west-2.amazonaws.com/table?a=1&b=2"
        );
    }

    #[test]
    fn test_header_value_normalize() {
        let cases = vec![
            ("  a  b  ", "a b"),
            ("a\t\tb", "a b"),
            ("nothing-to-do", "nothing-to-do"),
            ("   ", ""),
        ];

        for (input, expected) in cases {
            let mut v = HeaderValue::from_str(input).expect("must be valid");
            SigningRequest::header_value_normalize(&mut v);
            assert_eq!(v.to_str().unwrap(), expected, "failed on input: {input:?}");
        }
    }

    #[test]
    fn test_signed_header_names_excludes_authorization() {
        let mut parts = parts_of("https://iam.amazonaws.com/");
        parts
            .headers
            .insert("x-amz-date", HeaderValue::from_static("20150830T123600Z"));
        parts
            .headers
            .insert("host", HeaderValue::from_static("iam.amazonaws.com"));
        parts
            .headers
            .insert("authorization", HeaderValue::from_static("stale"));

        let req = SigningRequest::build(&mut parts).expect("build must succeed");
        assert_eq!(req.signed_header_names(), vec!["host", "x-amz-date"]);
    }
}
