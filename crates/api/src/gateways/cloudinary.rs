//! Cloudinary media storage client.
//!
//! Uploads are signed server-side: the request parameters (minus `file`,
//! `api_key` and `resource_type`) are sorted, joined as `k=v&k=v`, suffixed
//! with the API secret and hashed with SHA-256.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sweetbox_core::error::CoreError;

use super::{parse_response, GatewayError};

const SERVICE: &str = "cloudinary";
const DEFAULT_API_BASE: &str = "https://api.cloudinary.com/v1_1";

pub const RESOURCE_IMAGE: &str = "image";
pub const RESOURCE_VIDEO: &str = "video";

/// Resource types the admin media endpoints accept.
pub const VALID_RESOURCE_TYPES: &[&str] = &[RESOURCE_IMAGE, RESOURCE_VIDEO];

/// Cloudinary credentials.
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    /// Folder used when the upload request does not name one.
    pub default_folder: String,
    pub api_base: String,
}

impl CloudinaryConfig {
    /// Load from `CLOUDINARY_CLOUD_NAME`, `CLOUDINARY_API_KEY`,
    /// `CLOUDINARY_API_SECRET` and `CLOUDINARY_FOLDER`.
    ///
    /// Returns `None` when any credential is missing.
    pub fn from_env() -> Option<Self> {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
        Some(Self {
            cloud_name: var("CLOUDINARY_CLOUD_NAME")?,
            api_key: var("CLOUDINARY_API_KEY")?,
            api_secret: var("CLOUDINARY_API_SECRET")?,
            default_folder: var("CLOUDINARY_FOLDER").unwrap_or_else(|| "sweetbox".into()),
            api_base: var("CLOUDINARY_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.into()),
        })
    }
}

/// A file to upload.
#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
    pub folder: Option<String>,
}

impl MediaUpload {
    /// `image` or `video`, derived from the MIME type.
    pub fn resource_type(&self) -> Result<&'static str, CoreError> {
        resource_type_for(&self.content_type)
    }
}

/// Stored asset details returned to the admin UI.
#[derive(Debug, Clone, Serialize)]
pub struct UploadedMedia {
    pub url: String,
    pub public_id: String,
    pub resource_type: String,
    pub bytes: i64,
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
    resource_type: String,
    bytes: i64,
}

impl From<UploadResponse> for UploadedMedia {
    fn from(r: UploadResponse) -> Self {
        Self {
            url: r.secure_url,
            public_id: r.public_id,
            resource_type: r.resource_type,
            bytes: r.bytes,
        }
    }
}

/// Media storage used by the admin upload endpoints.
#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn upload(&self, upload: MediaUpload) -> Result<UploadedMedia, MediaError>;

    /// Delete a stored asset. Returns `false` when it did not exist.
    async fn destroy(&self, public_id: &str, resource_type: &str)
        -> Result<bool, MediaError>;
}

/// Media failures are either bad input or an upstream error.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error(transparent)]
    Invalid(#[from] CoreError),
    #[error(transparent)]
    Upstream(#[from] GatewayError),
}

/// Map a MIME type to a Cloudinary resource type. Only images and videos
/// are accepted.
pub fn resource_type_for(content_type: &str) -> Result<&'static str, CoreError> {
    let major = content_type.split('/').next().unwrap_or_default();
    match major {
        "image" => Ok(RESOURCE_IMAGE),
        "video" => Ok(RESOURCE_VIDEO),
        _ => Err(CoreError::Validation(format!(
            "Unsupported media type '{content_type}'; only images and videos are accepted"
        ))),
    }
}

/// Compute the request signature for `params` under `api_secret`.
pub fn sign_params(params: &[(&str, String)], api_secret: &str) -> String {
    let mut sorted: Vec<&(&str, String)> = params.iter().filter(|(_, v)| !v.is_empty()).collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[derive(Deserialize)]
struct DestroyResponse {
    result: String,
}

pub struct CloudinaryClient {
    client: reqwest::Client,
    config: CloudinaryConfig,
}

impl CloudinaryClient {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: CloudinaryConfig) -> Self {
        Self { client, config }
    }

    fn endpoint(&self, resource_type: &str, action: &str) -> String {
        format!(
            "{}/{}/{resource_type}/{action}",
            self.config.api_base, self.config.cloud_name
        )
    }

    /// Build the signed form fields for a request.
    fn signed_fields(&self, params: Vec<(&'static str, String)>) -> Vec<(&'static str, String)> {
        let signature = sign_params(&params, &self.config.api_secret);
        let mut fields = params;
        fields.push(("api_key", self.config.api_key.clone()));
        fields.push(("signature", signature));
        fields
    }
}

#[async_trait]
impl MediaStore for CloudinaryClient {
    async fn upload(&self, upload: MediaUpload) -> Result<UploadedMedia, MediaError> {
        let resource_type = upload.resource_type()?;
        let folder = upload
            .folder
            .clone()
            .filter(|f| !f.trim().is_empty())
            .unwrap_or_else(|| self.config.default_folder.clone());
        let timestamp = chrono::Utc::now().timestamp().to_string();

        let fields = self.signed_fields(vec![("folder", folder), ("timestamp", timestamp)]);

        let part = reqwest::multipart::Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(&upload.content_type)
            .map_err(|e| CoreError::Validation(format!("Invalid content type: {e}")))?;
        let mut form = reqwest::multipart::Form::new().part("file", part);
        for (key, value) in fields {
            form = form.text(key, value);
        }

        let response = self
            .client
            .post(self.endpoint(resource_type, "upload"))
            .multipart(form)
            .send()
            .await
            .map_err(|source| GatewayError::Request {
                service: SERVICE,
                source,
            })?;
        let uploaded = parse_response::<UploadResponse>(SERVICE, response).await?;
        Ok(uploaded.into())
    }

    async fn destroy(
        &self,
        public_id: &str,
        resource_type: &str,
    ) -> Result<bool, MediaError> {
        sweetbox_core::validation::validate_one_of(
            "resource_type",
            resource_type,
            VALID_RESOURCE_TYPES,
        )?;
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let fields = self.signed_fields(vec![
            ("public_id", public_id.to_string()),
            ("timestamp", timestamp),
        ]);

        let response = self
            .client
            .post(self.endpoint(resource_type, "destroy"))
            .form(&fields)
            .send()
            .await
            .map_err(|source| GatewayError::Request {
                service: SERVICE,
                source,
            })?;
        let body = parse_response::<DestroyResponse>(SERVICE, response).await?;
        Ok(body.result == "ok")
    }
}
