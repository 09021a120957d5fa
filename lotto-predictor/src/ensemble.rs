use serde::{Deserialize, Serialize};
use tracing::warn;

/// Poids fixes de l'ensemble (attendus de somme 1, non imposé).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnsembleWeights {
    pub rf: f64,
    pub xgb: f64,
}

impl Default for EnsembleWeights {
    fn default() -> Self {
        Self { rf: 0.5, xgb: 0.5 }
    }
}

impl EnsembleWeights {
    /// Vrai si les poids somment à 1 ; sinon un avertissement est journalisé.
    pub fn check(&self) -> bool {
        let sum = self.rf + self.xgb;
        if (sum - 1.0).abs() > 1e-9 {
            warn!(rf = self.rf, xgb = self.xgb, sum, "les poids de l'ensemble ne somment pas à 1");
            return false;
        }
        true
    }
}

/// `w_rf * P_rf[n] + w_xgb * P_xgb[n]`, sans renormalisation.
pub fn combine(rf: &[f64], xgb: &[f64], weights: EnsembleWeights) -> Vec<f64> {
    rf.iter()
        .zip(xgb.iter())
        .map(|(&p_rf, &p_xgb)| weights.rf * p_rf + weights.xgb * p_xgb)
        .collect()
}

/// Numéros triés par probabilité décroissante ; tri stable, donc égalités en ordre croissant.
pub fn rank(probabilities: &[f64]) -> Vec<u8> {
    let mut indices: Vec<usize> = (0..probabilities.len()).collect();
    indices.sort_by(|&a, &b| probabilities[b].total_cmp(&probabilities[a]));
    indices.into_iter().map(|i| (i + 1) as u8).collect()
}
