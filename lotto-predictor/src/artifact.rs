use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PredictError, Result};

/// Emplacement d'un artefact : fichier local ou URL http(s).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ArtifactLocation {
    Path(PathBuf),
    Url(String),
}

impl ArtifactLocation {
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.starts_with("http://") || s.starts_with("https://") {
            ArtifactLocation::Url(s.to_string())
        } else {
            ArtifactLocation::Path(PathBuf::from(s))
        }
    }
}

impl From<String> for ArtifactLocation {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<&str> for ArtifactLocation {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<ArtifactLocation> for String {
    fn from(location: ArtifactLocation) -> Self {
        location.to_string()
    }
}

impl std::fmt::Display for ArtifactLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArtifactLocation::Path(p) => write!(f, "{}", p.display()),
            ArtifactLocation::Url(u) => write!(f, "{}", u),
        }
    }
}

/// Récupère les octets bruts d'un artefact.
#[async_trait]
pub trait ArtifactSource: Send + Sync {
    async fn fetch(&self, location: &ArtifactLocation) -> Result<Vec<u8>>;
}

/// Source par défaut : système de fichiers pour les chemins, HTTP pour les URLs.
pub struct FileOrHttpSource {
    client: Client,
}

impl FileOrHttpSource {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client }
    }
}

impl Default for FileOrHttpSource {
    fn default() -> Self {
        Self::new()
    }
}

fn unavailable(location: &ArtifactLocation, reason: impl ToString) -> PredictError {
    PredictError::ArtifactUnavailable {
        location: location.to_string(),
        reason: reason.to_string(),
    }
}

#[async_trait]
impl ArtifactSource for FileOrHttpSource {
    async fn fetch(&self, location: &ArtifactLocation) -> Result<Vec<u8>> {
        debug!(%location, "chargement de l'artefact");
        match location {
            ArtifactLocation::Path(path) => tokio::fs::read(path)
                .await
                .map_err(|e| unavailable(location, e)),
            ArtifactLocation::Url(url) => {
                let response = self
                    .client
                    .get(url)
                    .send()
                    .await
                    .and_then(|r| r.error_for_status())
                    .map_err(|e| unavailable(location, e))?;
                let bytes = response.bytes().await.map_err(|e| unavailable(location, e))?;
                Ok(bytes.to_vec())
            }
        }
    }
}
