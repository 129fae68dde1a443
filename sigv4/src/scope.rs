use awscall_core::time::{format_date, DateTime};
use awscall_core::{Error, Result};
use std::fmt;

/// The fixed terminator of every credential scope.
pub(crate) const AWS4_REQUEST: &str = "aws4_request";

/// Credential scope: the date/region/service tuple that narrows a
/// signature's validity.
///
/// Derived once per signing operation and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialScope {
    date: String,
    region: String,
    service: String,
}

impl CredentialScope {
    /// Resolve the scope for a request.
    ///
    /// Explicit overrides win. Without an override, region and service are
    /// inferred from hosts of the shape `<service>.amazonaws.com` or
    /// `<service>.<region>.amazonaws.com` (case-insensitive). A host that
    /// matches neither pattern is an error naming the host, so that
    /// misconfiguration is immediately diagnosable.
    pub fn resolve(
        host: &str,
        region: Option<&str>,
        service: Option<&str>,
        now: DateTime,
    ) -> Result<Self> {
        let endpoint = EndpointHost::parse(host);

        let region = match region {
            Some(v) => v.to_string(),
            None => endpoint
                .as_ref()
                .and_then(|e| e.region.clone())
                .ok_or_else(|| {
                    Error::region_resolution(format!(
                        "no region override given and host {host} does not match <service>.<region>.amazonaws.com"
                    ))
                })?,
        };
        let service = match service {
            Some(v) => v.to_string(),
            None => endpoint.map(|e| e.service).ok_or_else(|| {
                Error::service_resolution(format!(
                    "no service override given and host {host} does not match <service>.amazonaws.com"
                ))
            })?,
        };

        Ok(CredentialScope {
            date: format_date(now),
            region: region.to_ascii_lowercase(),
            service: service.to_ascii_lowercase(),
        })
    }

    /// The 8-digit `YYYYMMDD` scope date.
    pub fn date(&self) -> &str {
        &self.date
    }

    /// The signing region.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// The signing service.
    pub fn service(&self) -> &str {
        &self.service
    }
}

impl fmt::Display for CredentialScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{AWS4_REQUEST}",
            self.date, self.region, self.service
        )
    }
}

/// Parsed form of an `amazonaws.com` endpoint host.
#[derive(Debug, PartialEq, Eq)]
struct EndpointHost {
    service: String,
    region: Option<String>,
}

impl EndpointHost {
    /// Parse a host name into service and region labels.
    ///
    /// Returns `None` for hosts outside `amazonaws.com`.
    fn parse(host: &str) -> Option<Self> {
        let host = host.to_ascii_lowercase();
        let host = host.split(':').next().unwrap_or(&host);

        let labels: Vec<&str> = host.split('.').collect();
        if labels.len() < 3 || labels.iter().any(|l| l.is_empty()) {
            return None;
        }
        if labels[labels.len() - 2..] != ["amazonaws", "com"] {
            return None;
        }

        // <service>.amazonaws.com or <service>.<region>.amazonaws.com
        Some(EndpointHost {
            service: labels[0].to_string(),
            region: if labels.len() >= 4 {
                Some(labels[1].to_string())
            } else {
                None
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use awscall_core::time::parse_iso8601;
    use awscall_core::ErrorKind;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn test_time() -> DateTime {
        parse_iso8601("20150830T123600Z").expect("timestamp must parse")
    }

    #[test_case("dynamodb.us-west-2.amazonaws.com", "dynamodb", Some("us-west-2"); "regional endpoint")]
    #[test_case("DynamoDB.US-West-2.AmazonAWS.com", "dynamodb", Some("us-west-2"); "case insensitive")]
    #[test_case("iam.amazonaws.com", "iam", None; "global endpoint")]
    #[test_case("s3.eu-central-1.amazonaws.com:443", "s3", Some("eu-central-1"); "port is ignored")]
    fn test_endpoint_host_parse(host: &str, service: &str, region: Option<&str>) {
        let parsed = EndpointHost::parse(host).expect("host must parse");
        assert_eq!(parsed.service, service);
        assert_eq!(parsed.region.as_deref(), region);
    }

    #[test_case("localhost"; "bare host")]
    #[test_case("127.0.0.1:9000"; "ip endpoint")]
    #[test_case("example.com"; "non aws domain")]
    #[test_case("amazonaws.com"; "missing service label")]
    fn test_endpoint_host_parse_no_match(host: &str) {
        assert_eq!(EndpointHost::parse(host), None);
    }

    #[test]
    fn test_resolve_from_host() {
        let scope =
            CredentialScope::resolve("dynamodb.us-west-2.amazonaws.com", None, None, test_time())
                .expect("resolve must succeed");
        assert_eq!(scope.region(), "us-west-2");
        assert_eq!(scope.service(), "dynamodb");
        assert_eq!(scope.date(), "20150830");
        assert_eq!(
            scope.to_string(),
            "20150830/us-west-2/dynamodb/aws4_request"
        );
    }

    #[test]
    fn test_resolve_overrides_win() {
        let scope = CredentialScope::resolve(
            "localhost:9000",
            Some("US-East-1"),
            Some("S3"),
            test_time(),
        )
        .expect("resolve must succeed");
        assert_eq!(scope.region(), "us-east-1");
        assert_eq!(scope.service(), "s3");
    }

    #[test]
    fn test_resolve_without_region_fails() {
        let err = CredentialScope::resolve("example.com", None, None, test_time()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RegionResolution);
        assert!(err.to_string().contains("example.com"));
    }

    #[test]
    fn test_resolve_without_service_fails() {
        let err = CredentialScope::resolve("example.com", Some("us-east-1"), None, test_time())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ServiceResolution);
        assert!(err.to_string().contains("example.com"));
    }

    #[test]
    fn test_resolve_global_endpoint_needs_region() {
        // iam.amazonaws.com names a service but no region.
        let err = CredentialScope::resolve("iam.amazonaws.com", None, None, test_time())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RegionResolution);

        let scope = CredentialScope::resolve("iam.amazonaws.com", Some("us-east-1"), None, test_time())
            .expect("resolve must succeed");
        assert_eq!(scope.service(), "iam");
    }
}
