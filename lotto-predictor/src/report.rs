use lotto_core::models::{PICK_COUNT, PredictionResult, Strategy};
use crate::dream::matched_keywords;

/// Confiance affichée quand les probabilités manquent.
pub const DEFAULT_CONFIDENCE: u8 = 85;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DominantModel {
    Rf,
    Xgb,
    Harmonious,
}

impl std::fmt::Display for DominantModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DominantModel::Rf => write!(f, "Random Forest dominant"),
            DominantModel::Xgb => write!(f, "XGBoost dominant"),
            DominantModel::Harmonious => write!(f, "Ensemble équilibré (RF & XGB)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Remark {
    DreamKeywords(Vec<String>),
    StableStrategy,
    ChallengeStrategy,
    ConsecutivePairs(usize),
    WideSpread,
    ExtremeParity,
    PerfectParity,
    StandardMix,
    ManyHot,
    ManyCold,
}

impl std::fmt::Display for Remark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Remark::DreamKeywords(k) => write!(f, "Mots du rêve pris en compte : {}", k.join(", ")),
            Remark::StableStrategy => write!(f, "Concentré sur les numéros les plus probables."),
            Remark::ChallengeStrategy => write!(f, "Mélange de numéros froids et de prédictions : grille audacieuse."),
            Remark::ConsecutivePairs(n) => write!(f, "{} paire(s) de numéros consécutifs.", n),
            Remark::WideSpread => write!(f, "Numéros bien répartis, aucune suite."),
            Remark::ExtremeParity => write!(f, "Parité extrême (tout pair ou tout impair)."),
            Remark::PerfectParity => write!(f, "Équilibre pair/impair parfait (3:3)."),
            Remark::StandardMix => write!(f, "Répartition pair/impair classique."),
            Remark::ManyHot => write!(f, "Beaucoup de numéros chauds."),
            Remark::ManyCold => write!(f, "Beaucoup de numéros froids (longue absence)."),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionReport {
    pub odd: usize,
    pub even: usize,
    pub consecutive_pairs: usize,
    pub hot: usize,
    pub cold: usize,
    pub neutral: usize,
    pub confidence: u8,
    pub dominant_model: DominantModel,
    pub keywords: Vec<String>,
    pub remarks: Vec<Remark>,
}

fn mean_at(probs: &[f64], numbers: &[u8]) -> Option<f64> {
    let values: Option<Vec<f64>> = numbers
        .iter()
        .map(|&n| n.checked_sub(1).and_then(|i| probs.get(i as usize).copied()))
        .collect();
    values.map(|v| v.iter().sum::<f64>() / v.len() as f64)
}

/// Analyse d'une grille générée (parité, suites, chaud/froid, confiance, modèle dominant).
pub fn analyze_prediction(result: &PredictionResult, dream_text: &str) -> PredictionReport {
    let mut sorted = result.numbers;
    sorted.sort();

    let even = sorted.iter().filter(|&&n| n % 2 == 0).count();
    let odd = PICK_COUNT - even;
    let consecutive_pairs = sorted.windows(2).filter(|w| w[1] == w[0] + 1).count();

    let hot = sorted.iter().filter(|&&n| result.hot_numbers.contains(&n)).count();
    let cold = sorted.iter().filter(|&&n| result.cold_numbers.contains(&n)).count();
    let neutral = PICK_COUNT.saturating_sub(hot + cold);

    let confidence = match mean_at(&result.probabilities, &sorted) {
        Some(avg) => ((avg * 200.0 + 60.0).round()).min(99.0) as u8,
        None => DEFAULT_CONFIDENCE,
    };

    let dominant_model = match (
        mean_at(&result.rf_probabilities, &sorted),
        mean_at(&result.xgb_probabilities, &sorted),
    ) {
        (Some(rf), Some(xgb)) if rf > xgb * 1.1 => DominantModel::Rf,
        (Some(rf), Some(xgb)) if xgb > rf * 1.1 => DominantModel::Xgb,
        _ => DominantModel::Harmonious,
    };

    let keywords: Vec<String> = matched_keywords(dream_text).into_iter().map(String::from).collect();

    let mut remarks = Vec::new();
    if !keywords.is_empty() {
        remarks.push(Remark::DreamKeywords(keywords.clone()));
    }
    match result.strategy {
        Strategy::Stable => remarks.push(Remark::StableStrategy),
        Strategy::Challenge => remarks.push(Remark::ChallengeStrategy),
        Strategy::Balanced => {}
    }
    remarks.push(if consecutive_pairs > 0 {
        Remark::ConsecutivePairs(consecutive_pairs)
    } else {
        Remark::WideSpread
    });
    remarks.push(match (odd, even) {
        (6, _) | (_, 6) => Remark::ExtremeParity,
        (3, 3) => Remark::PerfectParity,
        _ => Remark::StandardMix,
    });
    if hot >= 4 {
        remarks.push(Remark::ManyHot);
    } else if cold >= 3 {
        remarks.push(Remark::ManyCold);
    }

    PredictionReport {
        odd,
        even,
        consecutive_pairs,
        hot,
        cold,
        neutral,
        confidence,
        dominant_model,
        keywords,
        remarks,
    }
}
