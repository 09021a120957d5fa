//! Configuration du prédicteur : fichier TOML optionnel, puis variables d'environnement.

use std::env;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::artifact::ArtifactLocation;
use crate::ensemble::EnsembleWeights;
use crate::error::{PredictError, Result};
use crate::features::DEFAULT_FLAG_THRESHOLD;

pub const DEFAULT_CONFIG_FILE: &str = "lotto.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    pub rf_model: ArtifactLocation,
    pub xgb_model: ArtifactLocation,
    pub features: ArtifactLocation,
    pub weights: EnsembleWeights,
    /// Seuil des colonnes chaud/froid de la table de features.
    pub hot_threshold: f64,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            rf_model: ArtifactLocation::parse("models/rf_model.onnx"),
            xgb_model: ArtifactLocation::parse("models/xgb_model.onnx"),
            features: ArtifactLocation::parse("models/next_draw_features.json"),
            weights: EnsembleWeights::default(),
            hot_threshold: DEFAULT_FLAG_THRESHOLD,
        }
    }
}

fn parse_env_f64(key: &str) -> Result<Option<f64>> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|e| PredictError::Config(format!("{key}='{raw}' : {e}"))),
        Err(_) => Ok(None),
    }
}

impl PredictorConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| PredictError::Config(e.to_string()))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| PredictError::Config(format!("{} : {e}", path.display())))?;
        Self::from_toml_str(&raw)
    }

    /// Fichier si présent (sinon valeurs par défaut), puis surcharge par l'environnement (`.env` compris).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok();
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?,
            None => Self::default(),
        };
        config.apply_env()?;
        Ok(config)
    }

    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(v) = env::var("LOTTO_RF_MODEL") {
            self.rf_model = ArtifactLocation::parse(&v);
        }
        if let Ok(v) = env::var("LOTTO_XGB_MODEL") {
            self.xgb_model = ArtifactLocation::parse(&v);
        }
        if let Ok(v) = env::var("LOTTO_FEATURES") {
            self.features = ArtifactLocation::parse(&v);
        }
        if let Some(w) = parse_env_f64("LOTTO_WEIGHT_RF")? {
            self.weights.rf = w;
        }
        if let Some(w) = parse_env_f64("LOTTO_WEIGHT_XGB")? {
            self.weights.xgb = w;
        }
        if let Some(t) = parse_env_f64("LOTTO_HOT_THRESHOLD")? {
            self.hot_threshold = t;
        }
        Ok(())
    }
}
