use crate::{Context, Error, ProvideCredential, Result, SignRequest, SigningCredential};
use std::sync::{Arc, Mutex};

/// Signer is the orchestrator that pairs a credential provider with a
/// request signer.
#[derive(Clone, Debug)]
pub struct Signer<K: SigningCredential> {
    ctx: Context,
    provider: Arc<dyn ProvideCredential<Credential = K>>,
    builder: Arc<dyn SignRequest<Credential = K>>,
    credential: Arc<Mutex<Option<K>>>,
}

impl<K: SigningCredential> Signer<K> {
    /// Create a new signer.
    pub fn new(
        ctx: Context,
        provider: impl ProvideCredential<Credential = K>,
        builder: impl SignRequest<Credential = K>,
    ) -> Self {
        Self {
            ctx,

            provider: Arc::new(provider),
            builder: Arc::new(builder),
            credential: Arc::new(Mutex::new(None)),
        }
    }

    /// Get the context this signer operates in.
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Sign the request in place with the given body.
    ///
    /// The cached credential is reused while it stays valid and reloaded
    /// through the provider once it goes stale. If no credential can be
    /// obtained the request is not signed at all.
    pub async fn sign(&self, req: &mut http::request::Parts, body: &[u8]) -> Result<()> {
        let cred = self.credential.lock().expect("lock poisoned").clone();
        let cred = if cred.is_valid() {
            cred
        } else {
            let cred = self.provider.provide_credential(&self.ctx).await?;
            *self.credential.lock().expect("lock poisoned") = cred.clone();
            cred
        };

        let Some(cred) = cred else {
            return Err(Error::credentials_unavailable(
                "no credential provider yielded a usable credential",
            ));
        };

        self.builder.sign_request(&self.ctx, req, body, &cred).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, Debug)]
    struct TestCredential {
        token: String,
    }

    impl SigningCredential for TestCredential {
        fn is_valid(&self) -> bool {
            !self.token.is_empty()
        }
    }

    #[derive(Debug)]
    struct CountingProvider {
        calls: Arc<AtomicUsize>,
        credential: Option<TestCredential>,
    }

    #[async_trait::async_trait]
    impl ProvideCredential for CountingProvider {
        type Credential = TestCredential;

        async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.credential.clone())
        }
    }

    #[derive(Debug)]
    struct HeaderStampSigner;

    #[async_trait::async_trait]
    impl SignRequest for HeaderStampSigner {
        type Credential = TestCredential;

        async fn sign_request(
            &self,
            _: &Context,
            req: &mut http::request::Parts,
            _: &[u8],
            cred: &Self::Credential,
        ) -> Result<()> {
            req.headers.insert(
                "x-test-token",
                HeaderValue::from_str(&cred.token)
                    .map_err(|e| Error::unexpected("invalid token").with_source(e))?,
            );
            Ok(())
        }
    }

    fn test_parts() -> http::request::Parts {
        http::Request::builder()
            .method("GET")
            .uri("https://iam.amazonaws.com/")
            .body(())
            .unwrap()
            .into_parts()
            .0
    }

    #[tokio::test]
    async fn test_sign_reuses_valid_credential() {
        let calls = Arc::new(AtomicUsize::new(0));
        let signer = Signer::new(
            Context::new(),
            CountingProvider {
                calls: calls.clone(),
                credential: Some(TestCredential {
                    token: "t".to_string(),
                }),
            },
            HeaderStampSigner,
        );

        let mut parts = test_parts();
        signer.sign(&mut parts, b"").await.unwrap();
        let mut parts = test_parts();
        signer.sign(&mut parts, b"").await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(parts.headers.get("x-test-token").unwrap(), "t");
    }

    #[tokio::test]
    async fn test_sign_fails_without_credential() {
        let signer = Signer::new(
            Context::new(),
            CountingProvider {
                calls: Arc::new(AtomicUsize::new(0)),
                credential: None,
            },
            HeaderStampSigner,
        );

        let mut parts = test_parts();
        let err = signer.sign(&mut parts, b"").await.unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::CredentialsUnavailable);
        // All-or-nothing: nothing was attached.
        assert!(parts.headers.get("x-test-token").is_none());
    }
}
