use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use lotto_core::models::{PredictionResult, Strategy};
use crate::context::PredictorContext;
use crate::dream::analyze_dream;
use crate::ensemble::{combine, rank};
use crate::error::Result;
use crate::models::{ModelKind, run_model};
use crate::sampler::{SelectionInput, select_numbers};

/// Point d'entrée : ensemble RF + XGB puis sélection selon la stratégie.
pub struct Predictor {
    context: Arc<PredictorContext>,
}

impl Predictor {
    pub fn new(context: Arc<PredictorContext>) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &PredictorContext {
        &self.context
    }

    pub async fn predict_numbers(&self, strategy: Strategy, dream_text: &str) -> Result<PredictionResult> {
        let mut rng = StdRng::from_rng(&mut rand::rng());
        self.predict_numbers_with_rng(strategy, dream_text, &mut rng).await
    }

    pub async fn predict_numbers_seeded(&self, strategy: Strategy, dream_text: &str, seed: u64) -> Result<PredictionResult> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.predict_numbers_with_rng(strategy, dream_text, &mut rng).await
    }

    pub async fn predict_numbers_with_rng<R: Rng + Send + ?Sized>(
        &self,
        strategy: Strategy,
        dream_text: &str,
        rng: &mut R,
    ) -> Result<PredictionResult> {
        let sessions = self.context.ensure_sessions().await?;
        let table = self.context.load_features().await?;
        let config = self.context.config();

        let metadata = &table.model_metadata;
        let (rf_probabilities, xgb_probabilities) = tokio::try_join!(
            run_model(ModelKind::Rf, sessions.rf.as_ref(), &table, &metadata.rf.input_name),
            run_model(ModelKind::Xgb, sessions.xgb.as_ref(), &table, &metadata.xgb.input_name),
        )?;

        let probabilities = combine(&rf_probabilities, &xgb_probabilities, config.weights);
        let ranking = rank(&probabilities);

        let hot_numbers = table.hot_numbers(config.hot_threshold);
        let cold_numbers = table.cold_numbers(config.hot_threshold);
        let dream_pool = analyze_dream(dream_text);
        debug!(?hot_numbers, ?cold_numbers, ?dream_pool, top = ?&ranking[..ranking.len().min(10)], "pools");

        let input = SelectionInput {
            ranking: &ranking,
            cold_numbers: &cold_numbers,
            dream_pool: &dream_pool,
        };
        let numbers = select_numbers(&input, strategy, rng);
        info!(%strategy, draw_no = table.next_draw_no, ?numbers, "numéros générés");

        Ok(PredictionResult {
            numbers,
            probabilities,
            rf_probabilities,
            xgb_probabilities,
            hot_numbers,
            cold_numbers,
            strategy,
            draw_no: table.next_draw_no,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PredictorConfig;
    use crate::ensemble::EnsembleWeights;
    use crate::error::PredictError;
    use crate::models::mock::{InMemoryArtifacts, MockSession, MockSessionFactory};

    fn features_json(hot: &[u8], cold: &[u8]) -> String {
        let rows: Vec<Vec<f64>> = (1..=45u8)
            .map(|n| {
                let mut row = vec![0.3; 9];
                row[5] = if hot.contains(&n) { 1.0 } else { 0.0 };
                row[6] = if cold.contains(&n) { 1.0 } else { 0.0 };
                row
            })
            .collect();
        serde_json::json!({
            "features": rows,
            "model_metadata": {
                "rf": { "input_name": "float_input" },
                "xgb": { "input_name": "input" }
            },
            "next_draw_no": 1161
        })
        .to_string()
    }

    fn predictor(rf: MockSession, xgb: MockSession, weights: EnsembleWeights, hot: &[u8], cold: &[u8]) -> Predictor {
        let config = PredictorConfig { weights, ..PredictorConfig::default() };
        let source = InMemoryArtifacts::new()
            .with(&config.rf_model.to_string(), b"rf".to_vec())
            .with(&config.xgb_model.to_string(), b"xgb".to_vec())
            .with(&config.features.to_string(), features_json(hot, cold));
        let factory = MockSessionFactory::new(rf, xgb);
        Predictor::new(Arc::new(PredictorContext::new(config, Arc::new(source), Arc::new(factory))))
    }

    fn linear_probs(reverse: bool) -> Vec<f32> {
        (0..45).map(|i| if reverse { (45 - i) as f32 / 50.0 } else { i as f32 / 50.0 }).collect()
    }

    #[tokio::test]
    async fn test_ensemble_weighted_sum() {
        let rf = linear_probs(false);
        let xgb = linear_probs(true);
        let p = predictor(
            MockSession::binary(&rf),
            MockSession::binary(&xgb),
            EnsembleWeights { rf: 0.7, xgb: 0.3 },
            &[],
            &[],
        );
        let result = p.predict_numbers_seeded(Strategy::Balanced, "", 1).await.unwrap();
        for n in 0..45 {
            let expected = 0.7 * rf[n] as f64 + 0.3 * xgb[n] as f64;
            assert!((result.probabilities[n] - expected).abs() < 1e-6);
            assert!((result.rf_probabilities[n] - rf[n] as f64).abs() < 1e-6);
        }
        assert_eq!(result.draw_no, 1161);
        assert_eq!(result.strategy, Strategy::Balanced);
    }

    #[tokio::test]
    async fn test_unbalanced_weights_used_as_given() {
        let rf = linear_probs(false);
        let xgb = linear_probs(true);
        let weights = EnsembleWeights { rf: 0.7, xgb: 0.7 };
        assert!(!weights.check());
        let p = predictor(MockSession::binary(&rf), MockSession::binary(&xgb), weights, &[], &[]);
        for seed in 0..3 {
            let result = p.predict_numbers_seeded(Strategy::Balanced, "", seed).await.unwrap();
            for n in 0..45 {
                let expected = 0.7 * rf[n] as f64 + 0.7 * xgb[n] as f64;
                assert!((result.probabilities[n] - expected).abs() < 1e-6);
            }
        }
    }

    #[tokio::test]
    async fn test_uniform_models_stable_top_ten() {
        let uniform = vec![1.0f32 / 45.0; 45];
        let p = predictor(
            MockSession::new(&["probabilities"]).with_output("probabilities", uniform.clone()),
            MockSession::new(&["probabilities"]).with_output("probabilities", uniform),
            EnsembleWeights::default(),
            &[],
            &[],
        );
        for seed in 0..20 {
            let result = p.predict_numbers_seeded(Strategy::Stable, "", seed).await.unwrap();
            assert!(result.probabilities.iter().all(|q| (q - 1.0 / 45.0).abs() < 1e-6));
            // tri stable : le top 10 est 1..=10
            assert!(result.numbers.iter().all(|&n| (1..=10).contains(&n)), "{:?}", result.numbers);
        }
    }

    #[tokio::test]
    async fn test_hot_cold_sets_and_challenge() {
        let p = predictor(
            MockSession::binary(&linear_probs(true)),
            MockSession::binary(&linear_probs(true)),
            EnsembleWeights::default(),
            &[1, 2],
            &[44, 45],
        );
        let result = p.predict_numbers_seeded(Strategy::Challenge, "", 5).await.unwrap();
        assert_eq!(result.hot_numbers, vec![1, 2]);
        assert_eq!(result.cold_numbers, vec![44, 45]);
        assert!(result.numbers.contains(&44) && result.numbers.contains(&45));
    }

    #[tokio::test]
    async fn test_balanced_with_dream() {
        let p = predictor(
            MockSession::binary(&linear_probs(false)),
            MockSession::binary(&linear_probs(false)),
            EnsembleWeights::default(),
            &[],
            &[],
        );
        let dream = analyze_dream("돼지");
        for seed in 0..20 {
            let result = p.predict_numbers_seeded(Strategy::Balanced, "돼지", seed).await.unwrap();
            let from_dream = result.numbers.iter().filter(|&&n| dream.contains(&n)).count();
            assert!(from_dream >= 2, "{:?}", result.numbers);
        }
    }

    #[tokio::test]
    async fn test_inference_error_propagates() {
        let p = predictor(
            MockSession::binary(&[0.5; 45]),
            MockSession::new(&["probabilities"]).failing("runtime"),
            EnsembleWeights::default(),
            &[],
            &[],
        );
        let err = p.predict_numbers(Strategy::Stable, "").await.unwrap_err();
        assert!(matches!(err, PredictError::Inference { .. }));
    }
}
