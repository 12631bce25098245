//! Presigned URL generation for S3-compatible object storage.
//!
//! Clients upload directly to the bucket using short-lived presigned PUT
//! URLs; file bytes never pass through the console. URLs are signed with
//! AWS Signature Version 4 in query-parameter form, path-style against the
//! configured endpoint (the form Cloudflare R2 expects).

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use secrecy::ExposeSecret;
use sha2::{Digest, Sha256};

use crate::config::StorageConfig;

type HmacSha256 = Hmac<Sha256>;

/// How long presigned URLs stay valid, in seconds.
pub const PRESIGN_EXPIRY_SECS: u32 = 60;

/// MIME type prefixes accepted for upload.
const ALLOWED_TYPE_PREFIXES: &[&str] = &[
    "image/",
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "text/markdown",
    "application/json",
];

/// Generates presigned URLs for the configured bucket.
pub struct Presigner {
    config: StorageConfig,
}

impl Presigner {
    #[must_use]
    pub const fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    /// Returns true if the MIME type is accepted for upload.
    #[must_use]
    pub fn is_allowed_type(file_type: &str) -> bool {
        ALLOWED_TYPE_PREFIXES
            .iter()
            .any(|prefix| file_type.starts_with(prefix))
    }

    /// Build the object key for an upload: a millisecond timestamp prefix
    /// keeps keys unique across same-named files.
    #[must_use]
    pub fn object_key(file_name: &str) -> String {
        format!("{}-{}", Utc::now().timestamp_millis(), file_name)
    }

    /// Public URL an object is served from after upload.
    #[must_use]
    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.config.public_url.trim_end_matches('/'), key)
    }

    /// Presign a PUT for uploading the given key.
    #[must_use]
    pub fn presign_put(&self, key: &str) -> String {
        self.presign("PUT", key, PRESIGN_EXPIRY_SECS, Utc::now())
    }

    /// Presign a DELETE for removing the given key.
    #[must_use]
    pub fn presign_delete(&self, key: &str) -> String {
        self.presign("DELETE", key, PRESIGN_EXPIRY_SECS, Utc::now())
    }

    fn presign(&self, method: &str, key: &str, expires: u32, now: DateTime<Utc>) -> String {
        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
        let date = now.format("%Y%m%d").to_string();
        let scope = format!("{date}/{}/s3/aws4_request", self.config.region);

        let host = host_of(&self.config.endpoint);
        let canonical_uri = format!(
            "/{}/{}",
            uri_encode(&self.config.bucket, false),
            uri_encode(key, false)
        );

        let credential = format!("{}/{scope}", self.config.access_key_id);
        let mut query: Vec<(String, String)> = vec![
            ("X-Amz-Algorithm".to_string(), "AWS4-HMAC-SHA256".to_string()),
            ("X-Amz-Credential".to_string(), uri_encode(&credential, true)),
            ("X-Amz-Date".to_string(), amz_date.clone()),
            ("X-Amz-Expires".to_string(), expires.to_string()),
            ("X-Amz-SignedHeaders".to_string(), "host".to_string()),
        ];
        query.sort();

        let canonical_query = query
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");

        let canonical_request = format!(
            "{method}\n{canonical_uri}\n{canonical_query}\nhost:{host}\n\nhost\nUNSIGNED-PAYLOAD"
        );

        let string_to_sign = format!(
            "AWS4-HMAC-SHA256\n{amz_date}\n{scope}\n{}",
            hex::encode(Sha256::digest(canonical_request.as_bytes()))
        );

        let signing_key = self.signing_key(&date);
        let signature = hex::encode(hmac(&signing_key, string_to_sign.as_bytes()));

        format!(
            "{}{canonical_uri}?{canonical_query}&X-Amz-Signature={signature}",
            self.config.endpoint.trim_end_matches('/')
        )
    }

    /// Derive the SigV4 signing key for the given date.
    fn signing_key(&self, date: &str) -> Vec<u8> {
        let secret = format!("AWS4{}", self.config.secret_access_key.expose_secret());
        let k_date = hmac(secret.as_bytes(), date.as_bytes());
        let k_region = hmac(&k_date, self.config.region.as_bytes());
        let k_service = hmac(&k_region, b"s3");
        hmac(&k_service, b"aws4_request")
    }
}

fn hmac(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

/// Extract the host (with port, if any) from an endpoint URL.
fn host_of(endpoint: &str) -> &str {
    let without_scheme = endpoint
        .strip_prefix("https://")
        .or_else(|| endpoint.strip_prefix("http://"))
        .unwrap_or(endpoint);
    without_scheme
        .split('/')
        .next()
        .unwrap_or(without_scheme)
}

/// AWS-style URI encoding. Path mode keeps `/` separators intact.
fn uri_encode(input: &str, encode_slash: bool) -> String {
    if encode_slash {
        urlencoding::encode(input).into_owned()
    } else {
        input
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn presigner() -> Presigner {
        Presigner::new(StorageConfig {
            bucket: "construct-files".to_string(),
            region: "auto".to_string(),
            endpoint: "https://account.r2.cloudflarestorage.com".to_string(),
            public_url: "https://files.construct.dev".to_string(),
            access_key_id: "AKIAEXAMPLE".to_string(),
            secret_access_key: SecretString::from("wJalrXUtnFEMI/K7MDENG/bPxRfiCYEXAMPLEKEY"),
        })
    }

    #[test]
    fn allows_expected_mime_types() {
        assert!(Presigner::is_allowed_type("image/png"));
        assert!(Presigner::is_allowed_type("application/pdf"));
        assert!(Presigner::is_allowed_type("application/msword"));
        assert!(Presigner::is_allowed_type("text/markdown"));
        assert!(Presigner::is_allowed_type("application/json"));
    }

    #[test]
    fn rejects_other_mime_types() {
        assert!(!Presigner::is_allowed_type("video/mp4"));
        assert!(!Presigner::is_allowed_type("application/zip"));
        assert!(!Presigner::is_allowed_type("text/html"));
    }

    #[test]
    fn object_key_has_timestamp_prefix() {
        let key = Presigner::object_key("report.pdf");
        let (prefix, name) = key.split_once('-').unwrap();
        assert!(prefix.parse::<i64>().is_ok());
        assert_eq!(name, "report.pdf");
    }

    #[test]
    fn public_url_joins_key() {
        let presigner = presigner();
        assert_eq!(
            presigner.public_url("123-report.pdf"),
            "https://files.construct.dev/123-report.pdf"
        );
    }

    #[test]
    fn presigned_url_structure() {
        let presigner = presigner();
        let now = DateTime::parse_from_rfc3339("2026-01-15T10:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let url = presigner.presign("PUT", "123-report.pdf", 60, now);

        assert!(url.starts_with(
            "https://account.r2.cloudflarestorage.com/construct-files/123-report.pdf?"
        ));
        assert!(url.contains("X-Amz-Algorithm=AWS4-HMAC-SHA256"));
        assert!(url.contains("X-Amz-Date=20260115T103000Z"));
        assert!(url.contains("X-Amz-Expires=60"));
        assert!(url.contains("X-Amz-SignedHeaders=host"));
        assert!(url.contains("20260115%2Fauto%2Fs3%2Faws4_request"));

        let signature = url.split("X-Amz-Signature=").nth(1).unwrap();
        assert_eq!(signature.len(), 64);
        assert!(signature.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn presign_is_deterministic_for_fixed_time() {
        let presigner = presigner();
        let now = DateTime::parse_from_rfc3339("2026-01-15T10:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let a = presigner.presign("DELETE", "123-report.pdf", 60, now);
        let b = presigner.presign("DELETE", "123-report.pdf", 60, now);
        assert_eq!(a, b);

        let other = presigner.presign("PUT", "123-report.pdf", 60, now);
        assert_ne!(a, other);
    }

    #[test]
    fn uri_encoding_keeps_path_slashes() {
        assert_eq!(uri_encode("a/b c", false), "a/b%20c");
        assert_eq!(uri_encode("a/b c", true), "a%2Fb%20c");
    }

    #[test]
    fn host_extraction() {
        assert_eq!(
            host_of("https://account.r2.cloudflarestorage.com"),
            "account.r2.cloudflarestorage.com"
        );
        assert_eq!(host_of("http://localhost:9000/extra"), "localhost:9000");
    }
}
