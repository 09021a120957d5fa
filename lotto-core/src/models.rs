use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Plus grand numéro tirable (loto 6/45).
pub const MAX_NUMBER: u8 = 45;
/// Nombre de numéros par grille.
pub const PICK_COUNT: usize = 6;

/// Politique de sélection des six numéros.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    #[default]
    Balanced,
    Stable,
    Challenge,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Balanced => write!(f, "balanced"),
            Strategy::Stable => write!(f, "stable"),
            Strategy::Challenge => write!(f, "challenge"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberTag {
    Hot,
    Cold,
    Normal,
}

impl std::fmt::Display for NumberTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NumberTag::Hot => write!(f, "HOT"),
            NumberTag::Cold => write!(f, "COLD"),
            NumberTag::Normal => write!(f, "-"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NumberProbability {
    pub number: u8,
    pub probability: f64,
    pub tag: NumberTag,
}

/// Résultat d'une génération. Les vecteurs de probabilités sont indexés par `numéro - 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub numbers: [u8; PICK_COUNT],
    pub probabilities: Vec<f64>,
    pub rf_probabilities: Vec<f64>,
    pub xgb_probabilities: Vec<f64>,
    pub hot_numbers: Vec<u8>,
    pub cold_numbers: Vec<u8>,
    pub strategy: Strategy,
    pub draw_no: u32,
}

impl PredictionResult {
    pub fn tag_of(&self, number: u8) -> NumberTag {
        if self.hot_numbers.contains(&number) {
            NumberTag::Hot
        } else if self.cold_numbers.contains(&number) {
            NumberTag::Cold
        } else {
            NumberTag::Normal
        }
    }

    /// Numéros triés par probabilité ensemble décroissante (à égalité, ordre croissant).
    pub fn ranked(&self) -> Vec<NumberProbability> {
        let mut ranked: Vec<NumberProbability> = self
            .probabilities
            .iter()
            .enumerate()
            .map(|(i, &p)| {
                let number = (i + 1) as u8;
                NumberProbability { number, probability: p, tag: self.tag_of(number) }
            })
            .collect();
        ranked.sort_by(|a, b| b.probability.total_cmp(&a.probability));
        ranked
    }
}

pub fn validate_numbers(numbers: &[u8; PICK_COUNT]) -> Result<()> {
    for &n in numbers {
        if n < 1 || n > MAX_NUMBER {
            bail!("Numéro {} hors limites (1-{})", n, MAX_NUMBER);
        }
    }
    for i in 0..numbers.len() {
        for j in (i + 1)..numbers.len() {
            if numbers[i] == numbers[j] {
                bail!("Numéro en double : {}", numbers[i]);
            }
        }
    }
    Ok(())
}
