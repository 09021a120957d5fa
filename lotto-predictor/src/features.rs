use serde::Deserialize;

use lotto_core::models::MAX_NUMBER;
use crate::error::{PredictError, Result};

/// Colonne du drapeau « chaud » (numéro fréquent récemment).
pub const HOT_COLUMN: usize = 5;
/// Colonne du drapeau « froid » (numéro absent depuis longtemps).
pub const COLD_COLUMN: usize = 6;
/// Seuil canonique des drapeaux chaud/froid.
pub const DEFAULT_FLAG_THRESHOLD: f64 = 0.9;

#[derive(Debug, Clone, Deserialize)]
pub struct ModelInput {
    pub input_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelMetadata {
    pub rf: ModelInput,
    pub xgb: ModelInput,
}

#[derive(Debug, Clone, Deserialize)]
struct FeatureFile {
    features: Vec<Vec<f64>>,
    model_metadata: ModelMetadata,
    next_draw_no: u32,
}

/// Table de features du prochain tirage : ligne i ↔ numéro i+1.
#[derive(Debug, Clone)]
pub struct FeatureTable {
    rows: Vec<Vec<f64>>,
    width: usize,
    pub model_metadata: ModelMetadata,
    pub next_draw_no: u32,
}

impl FeatureTable {
    pub fn new(rows: Vec<Vec<f64>>, model_metadata: ModelMetadata, next_draw_no: u32) -> Result<Self> {
        if rows.len() != MAX_NUMBER as usize {
            return Err(PredictError::MalformedFeatures(format!(
                "{} lignes, {} attendues",
                rows.len(),
                MAX_NUMBER
            )));
        }
        let width = rows[0].len();
        if width <= COLD_COLUMN {
            return Err(PredictError::MalformedFeatures(format!(
                "largeur {} insuffisante (colonnes chaud/froid {} et {})",
                width, HOT_COLUMN, COLD_COLUMN
            )));
        }
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(PredictError::MalformedFeatures(format!(
                "ligne {} de largeur {} au lieu de {}",
                i, row.len(), width
            )));
        }
        Ok(Self { rows, width, model_metadata, next_draw_no })
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let file: FeatureFile = serde_json::from_slice(bytes)
            .map_err(|e| PredictError::MalformedFeatures(e.to_string()))?;
        Self::new(file.features, file.model_metadata, file.next_draw_no)
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Aplatissement ligne par ligne, forme `[len, width]`.
    pub fn flatten(&self) -> Vec<f32> {
        self.rows.iter().flatten().map(|&v| v as f32).collect()
    }

    pub fn hot_numbers(&self, threshold: f64) -> Vec<u8> {
        self.flagged(HOT_COLUMN, threshold)
    }

    pub fn cold_numbers(&self, threshold: f64) -> Vec<u8> {
        self.flagged(COLD_COLUMN, threshold)
    }

    fn flagged(&self, column: usize, threshold: f64) -> Vec<u8> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row[column] >= threshold)
            .map(|(i, _)| (i + 1) as u8)
            .collect()
    }
}

#[cfg(test)]
pub(crate) fn test_metadata() -> ModelMetadata {
    ModelMetadata {
        rf: ModelInput { input_name: "float_input".to_string() },
        xgb: ModelInput { input_name: "input".to_string() },
    }
}
