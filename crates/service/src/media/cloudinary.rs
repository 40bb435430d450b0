//! Cloudinary signed uploads over the REST API.
//!
//! The file travels as a base64 data URI in a form-encoded POST to
//! `{upload_url}/{cloud_name}/image/upload`.
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use configs::{MediaConfig, SignatureAlgorithm};
use serde::Deserialize;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use tracing::{debug, instrument};

use super::{MediaFile, MediaStore};
use crate::errors::ServiceError;

pub struct CloudinaryStore {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    api_secret: String,
    algorithm: SignatureAlgorithm,
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Hex digest over `k=v` pairs sorted by key and joined with `&`, followed
/// by the API secret.
pub fn sign(params: &[(&str, &str)], api_secret: &str, algorithm: SignatureAlgorithm) -> String {
    let mut sorted: Vec<_> = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let joined = sorted.iter().map(|(k, v)| format!("{k}={v}")).collect::<Vec<_>>().join("&");
    match algorithm {
        SignatureAlgorithm::Sha1 => digest::<Sha1>(&joined, api_secret),
        SignatureAlgorithm::Sha256 => digest::<Sha256>(&joined, api_secret),
    }
}

fn digest<D: Digest>(joined: &str, api_secret: &str) -> String {
    let mut hasher = D::new();
    hasher.update(joined.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

impl CloudinaryStore {
    pub fn new(upload_url: &str, cloud_name: &str, api_key: &str, api_secret: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}/{}/image/upload", upload_url.trim_end_matches('/'), cloud_name),
            api_key: api_key.to_string(),
            api_secret: api_secret.to_string(),
            algorithm: SignatureAlgorithm::default(),
        }
    }

    pub fn with_algorithm(mut self, algorithm: SignatureAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn from_config(cfg: &MediaConfig) -> Result<Self, ServiceError> {
        if cfg.cloud_name.is_empty() || cfg.api_key.is_empty() || cfg.api_secret.is_empty() {
            return Err(ServiceError::validation("cloudinary credentials are not configured"));
        }
        Ok(Self::new(&cfg.upload_url, &cfg.cloud_name, &cfg.api_key, &cfg.api_secret)
            .with_algorithm(cfg.signature_algorithm))
    }
}

#[async_trait]
impl MediaStore for CloudinaryStore {
    #[instrument(skip(self, file), fields(bytes = file.bytes.len()))]
    async fn upload(&self, folder: &str, file: MediaFile) -> Result<String, ServiceError> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = sign(&[("folder", folder), ("timestamp", &timestamp)], &self.api_secret, self.algorithm);
        let data_uri = format!("data:{};base64,{}", file.content_type, STANDARD.encode(&file.bytes));

        let mut form = vec![
            ("file", data_uri.as_str()),
            ("folder", folder),
            ("timestamp", timestamp.as_str()),
            ("api_key", self.api_key.as_str()),
            ("signature", signature.as_str()),
        ];
        // sha1 is the account default and needs no marker
        if self.algorithm == SignatureAlgorithm::Sha256 {
            form.push(("signature_algorithm", "sha256"));
        }
        let resp = self
            .client
            .post(&self.endpoint)
            .form(&form)
            .send()
            .await
            .map_err(|e| ServiceError::Upstream(format!("media host unreachable: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp
                .json::<ErrorResponse>()
                .await
                .map(|b| b.error.message)
                .unwrap_or_else(|_| status.to_string());
            return Err(ServiceError::Upstream(format!("Error uploading images: {detail}")));
        }
        let body: UploadResponse = resp
            .json()
            .await
            .map_err(|e| ServiceError::Upstream(format!("unexpected media host response: {e}")))?;
        debug!(url = %body.secure_url, "cloudinary upload done");
        Ok(body.secure_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn png() -> MediaFile {
        MediaFile::new(Some("a.png".into()), Some("image/png".into()), vec![0x89, 0x50])
    }

    #[test]
    fn signature_is_order_independent() {
        let a = sign(&[("timestamp", "1700000000"), ("folder", "gyms_images")], "s3cr3t", SignatureAlgorithm::Sha256);
        let b = sign(&[("folder", "gyms_images"), ("timestamp", "1700000000")], "s3cr3t", SignatureAlgorithm::Sha256);
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_ne!(
            a,
            sign(&[("folder", "gyms_images"), ("timestamp", "1700000000")], "other", SignatureAlgorithm::Sha256)
        );
    }

    #[test]
    fn signatures_match_known_digests() {
        let params = [
            ("timestamp", "1315060510"),
            ("public_id", "sample_image"),
            ("eager", "w_400,h_300,c_pad|w_260,h_200,c_crop"),
        ];
        assert_eq!(sign(&params, "abcd", SignatureAlgorithm::Sha1), "bfd09f95f331f558cbd1320e67aa8d488770583e");
        assert_eq!(
            sign(&params, "abcd", SignatureAlgorithm::Sha256),
            "cc927e1290f9e3ae4c1a741eda21a4630b4ce80f9ce0bc0296337d25cf40f91e"
        );
    }

    #[tokio::test]
    async fn upload_returns_secure_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/demo/image/upload"))
            .and(body_string_contains("folder=restaurants_images"))
            .and(body_string_contains("api_key=key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "secure_url": "https://res.cloudinary.com/demo/image/upload/v1/restaurants_images/x.png"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let store = CloudinaryStore::new(&server.uri(), "demo", "key", "secret");
        let url = store.upload("restaurants_images", png()).await.unwrap();
        assert!(url.ends_with("restaurants_images/x.png"));
    }

    #[tokio::test]
    async fn sha256_uploads_announce_the_algorithm() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "secure_url": "https://res.cloudinary.com/demo/image/upload/v1/hotels_images/x.png"
            })))
            .mount(&server)
            .await;

        let default_store = CloudinaryStore::new(&server.uri(), "demo", "key", "secret");
        default_store.upload("hotels_images", png()).await.unwrap();
        let sha256_store =
            CloudinaryStore::new(&server.uri(), "demo", "key", "secret").with_algorithm(SignatureAlgorithm::Sha256);
        sha256_store.upload("hotels_images", png()).await.unwrap();

        let bodies: Vec<String> = server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .map(|r| String::from_utf8_lossy(&r.body).into_owned())
            .collect();
        assert_eq!(bodies.len(), 2);
        assert!(!bodies[0].contains("signature_algorithm"));
        assert!(bodies[1].contains("signature_algorithm=sha256"));
    }

    #[tokio::test]
    async fn rejected_upload_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": { "message": "Invalid Signature" }
            })))
            .mount(&server)
            .await;

        let store = CloudinaryStore::new(&server.uri(), "demo", "key", "secret");
        let err = store.upload("taxis_images", png()).await.unwrap_err();
        match err {
            ServiceError::Upstream(msg) => assert!(msg.contains("Invalid Signature")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
