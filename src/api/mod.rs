//! REST client for the dashboard vault API.
//!
//! Endpoints are bearer-token authenticated through query parameters. List
//! responses are JSON arrays of [`RemoteFile`]; downloads are raw binary
//! streams consumed chunk by chunk.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::{Stream, TryStreamExt};
use reqwest::Client;
use tracing::{info, instrument, warn};
use url::Url;

use crate::errors::{AuthError, ImportError};

pub mod types;

pub use types::{FileScope, RemoteFile};

/// Chunked body of a single download.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, ImportError>>>>;

/// A download in progress: the declared size (when the server sent one) plus
/// the chunk stream.
pub struct FileStream {
    pub declared_size: Option<u64>,
    pub bytes: ByteStream,
}

/// Source of remotely stored files.
///
/// The importer only talks to this trait, which keeps the retry and
/// cancellation logic independent of the HTTP stack.
#[async_trait(?Send)]
pub trait VaultSource {
    /// List the files visible in `scope`.
    async fn list(&self, token: &str, scope: FileScope) -> Result<Vec<RemoteFile>, ImportError>;

    /// Open a streaming download for one file.
    async fn fetch(
        &self,
        file: &RemoteFile,
        token: &str,
        scope: FileScope,
    ) -> Result<FileStream, ImportError>;
}

/// HTTP client for the vault API.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
}

impl ApiClient {
    pub fn new(api_base: &str) -> Result<Self, AuthError> {
        let base = Url::parse(api_base).map_err(|e| AuthError::Configuration {
            message: format!("Invalid API base URL '{}': {}", api_base, e),
        })?;
        Ok(Self {
            http: Client::builder()
                .user_agent("genobank-connect/0.1")
                .build()
                .expect("Failed to create HTTP client"),
            base,
        })
    }

    /// Build an endpoint URL with query parameters, percent-encoding values.
    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> Url {
        let mut url = self.base.clone();
        url.set_path(path);
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }
        url
    }

    /// Ask the service whether `address` is flagged as a permittee.
    ///
    /// Callers treat this as best-effort and degrade to `false` on failure.
    #[instrument(skip(self), err)]
    pub async fn validate_permittee(&self, address: &str) -> Result<bool, AuthError> {
        let url = self.endpoint("/validate_permittee", &[("permittee", address)]);

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| AuthError::Network {
                message: format!("Failed to call validate_permittee: {}", e),
            })?;

        if !response.status().is_success() {
            return Err(AuthError::Http {
                status: response.status().as_u16(),
                message: status_text(response.status()),
            });
        }

        let value: serde_json::Value =
            response.json().await.map_err(|e| AuthError::Network {
                message: format!("Failed to parse validate_permittee response: {}", e),
            })?;
        Ok(parse_permittee(&value))
    }
}

/// The endpoint historically answered a bare boolean; newer deployments wrap
/// it in an object. Accept both.
fn parse_permittee(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Bool(flag) => *flag,
        serde_json::Value::Object(map) => map
            .get("isPermittee")
            .and_then(|v| v.as_bool())
            .unwrap_or(false),
        _ => false,
    }
}

fn status_text(status: reqwest::StatusCode) -> String {
    status.canonical_reason().unwrap_or("request failed").to_string()
}

#[async_trait(?Send)]
impl VaultSource for ApiClient {
    async fn list(&self, token: &str, scope: FileScope) -> Result<Vec<RemoteFile>, ImportError> {
        let url = match scope {
            FileScope::Personal => self.endpoint(
                "/get_my_uploaded_files_urls",
                &[("user_signature", token)],
            ),
            FileScope::Shared => self.endpoint(
                "/get_uploaded_files_shared_with_me_urls",
                &[("permitte_signature", token)],
            ),
        };

        info!("Listing {} dashboard files", scope.as_str());

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ImportError::Network {
                message: format!("Failed to reach file listing endpoint: {}", e),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImportError::Listing {
                status: status.as_u16(),
                message: status_text(status),
            });
        }

        response
            .json::<Vec<RemoteFile>>()
            .await
            .map_err(|e| ImportError::Listing {
                status: status.as_u16(),
                message: format!("invalid response: {}", e),
            })
    }

    async fn fetch(
        &self,
        file: &RemoteFile,
        token: &str,
        scope: FileScope,
    ) -> Result<FileStream, ImportError> {
        let url = match scope {
            FileScope::Personal => self.endpoint(
                "/get_content_from_my_uploaded_file",
                &[
                    ("signature", token),
                    ("filename", &file.path),
                    ("file_type", &file.file_type),
                ],
            ),
            FileScope::Shared => self.endpoint(
                "/get_content_file_shared_with_lab",
                &[
                    ("permitte_signature", token),
                    ("filename", &file.path),
                    ("file_type", &file.file_type),
                ],
            ),
        };

        let name = file.display_name().to_string();
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ImportError::Network {
                message: format!("Failed to open download connection: {}", e),
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Download of {} failed with status {}", name, status);
            return Err(ImportError::Download {
                file: name,
                message: format!("{} {}", status.as_u16(), status_text(status)),
            });
        }

        let declared_size = response.content_length();
        let bytes: ByteStream = Box::pin(response.bytes_stream().map_err(move |e| {
            ImportError::Download {
                file: name.clone(),
                message: format!("stream read failed: {}", e),
            }
        }));

        Ok(FileStream {
            declared_size,
            bytes,
        })
    }
}
