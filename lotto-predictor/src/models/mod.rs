pub mod mock;
#[cfg(feature = "onnx")]
pub mod onnx;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{PredictError, Result};
use crate::features::FeatureTable;

/// Les deux familles de modèles de l'ensemble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    Rf,
    Xgb,
}

impl ModelKind {
    pub fn name(&self) -> &'static str {
        match self {
            ModelKind::Rf => "rf",
            ModelKind::Xgb => "xgb",
        }
    }
}

/// Sorties d'un appel d'inférence, par nom de sortie.
pub type SessionOutputs = HashMap<String, Vec<f32>>;

/// Session d'inférence chargée (modèle opaque : tenseur en entrée, tenseurs en sortie).
#[async_trait]
pub trait InferenceSession: Send + Sync {
    /// Noms des sorties, dans l'ordre déclaré par le modèle.
    fn output_names(&self) -> &[String];

    async fn run(&self, input_name: &str, data: Vec<f32>, shape: [usize; 2]) -> Result<SessionOutputs>;
}

/// Construit une session à partir des octets d'un artefact.
pub trait SessionFactory: Send + Sync {
    fn create(&self, kind: ModelKind, bytes: Vec<u8>) -> Result<Arc<dyn InferenceSession>>;
}

/// Choix de la sortie de probabilités : un nom contenant « prob », sinon la deuxième, sinon la première.
pub fn select_probability_output(output_names: &[String]) -> Option<&str> {
    output_names
        .iter()
        .find(|name| name.to_lowercase().contains("prob"))
        .or_else(|| output_names.get(1))
        .or_else(|| output_names.first())
        .map(String::as_str)
}

/// Sortie binaire `[P(non), P(oui)]` par ligne → P(oui) aux positions impaires ; sinon une proba par ligne.
pub fn normalize_probabilities(data: &[f32], rows: usize) -> Option<Vec<f64>> {
    if data.len() == rows * 2 {
        Some((0..rows).map(|i| data[i * 2 + 1] as f64).collect())
    } else if data.len() >= rows {
        Some(data[..rows].iter().map(|&p| p as f64).collect())
    } else {
        None
    }
}

/// Exécute un modèle sur la table complète et renvoie une probabilité par numéro.
pub async fn run_model(
    kind: ModelKind,
    session: &dyn InferenceSession,
    table: &FeatureTable,
    input_name: &str,
) -> Result<Vec<f64>> {
    let rows = table.len();
    let shape = [rows, table.width()];
    debug!(model = kind.name(), input = input_name, ?shape, "inférence");

    let mut outputs = session.run(input_name, table.flatten(), shape).await?;

    let available = || session.output_names().join(", ");
    let key = select_probability_output(session.output_names())
        .ok_or_else(|| PredictError::MissingProbabilityOutput { available: available() })?;
    let data = outputs
        .remove(key)
        .ok_or_else(|| PredictError::MissingProbabilityOutput { available: available() })?;

    let probabilities = normalize_probabilities(&data, rows).ok_or_else(|| PredictError::MalformedOutput {
        model: kind.name().to_string(),
        reason: format!("{} valeurs pour {} lignes", data.len(), rows),
    })?;
    if let Some(i) = probabilities.iter().position(|p| !p.is_finite()) {
        return Err(PredictError::MalformedOutput {
            model: kind.name().to_string(),
            reason: format!("valeur non finie pour le numéro {}", i + 1),
        });
    }
    Ok(probabilities)
}
