//! Wire types for the dashboard vault API.

use serde::{Deserialize, Serialize};

/// Which dashboard a file list or download comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileScope {
    /// Files the user uploaded themselves.
    Personal,
    /// Files shared with the user's lab.
    Shared,
}

impl FileScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileScope::Personal => "personal",
            FileScope::Shared => "shared",
        }
    }
}

/// Descriptor of a remotely stored file as returned by the listing endpoints.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RemoteFile {
    /// Opaque storage path used as the download identifier.
    pub path: String,
    pub original_name: String,
    #[serde(rename = "type", default)]
    pub file_type: String,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub biosample_serial: Option<String>,
}

impl RemoteFile {
    /// Name shown to users and used for classification. Listings
    /// occasionally omit `original_name`, in which case the path stands in.
    pub fn display_name(&self) -> &str {
        if self.original_name.is_empty() {
            &self.path
        } else {
            &self.original_name
        }
    }
}
