use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::info;

use crate::artifact::{ArtifactSource, FileOrHttpSource};
use crate::config::PredictorConfig;
use crate::error::Result;
use crate::features::FeatureTable;
use crate::models::{InferenceSession, ModelKind, SessionFactory};

/// Les deux sessions chargées de l'ensemble.
#[derive(Clone)]
pub struct ModelSessions {
    pub rf: Arc<dyn InferenceSession>,
    pub xgb: Arc<dyn InferenceSession>,
}

/// Contexte longue durée : sessions et table de features chargées une seule fois.
///
/// Un chargement en cours est partagé entre appelants concurrents ; un échec laisse
/// le cache vide et remonte à l'appelant.
pub struct PredictorContext {
    config: PredictorConfig,
    source: Arc<dyn ArtifactSource>,
    factory: Arc<dyn SessionFactory>,
    sessions: OnceCell<ModelSessions>,
    features: OnceCell<Arc<FeatureTable>>,
}

impl PredictorContext {
    pub fn new(config: PredictorConfig, source: Arc<dyn ArtifactSource>, factory: Arc<dyn SessionFactory>) -> Self {
        config.weights.check();
        Self {
            config,
            source,
            factory,
            sessions: OnceCell::new(),
            features: OnceCell::new(),
        }
    }

    /// Artefacts lus sur disque ou en HTTP.
    pub fn with_default_source(config: PredictorConfig, factory: Arc<dyn SessionFactory>) -> Self {
        Self::new(config, Arc::new(FileOrHttpSource::new()), factory)
    }

    pub fn config(&self) -> &PredictorConfig {
        &self.config
    }

    pub async fn ensure_sessions(&self) -> Result<ModelSessions> {
        let sessions = self
            .sessions
            .get_or_try_init(|| async {
                let (rf_bytes, xgb_bytes) = tokio::try_join!(
                    self.source.fetch(&self.config.rf_model),
                    self.source.fetch(&self.config.xgb_model),
                )?;
                let rf = self.factory.create(ModelKind::Rf, rf_bytes)?;
                let xgb = self.factory.create(ModelKind::Xgb, xgb_bytes)?;
                info!(rf = %self.config.rf_model, xgb = %self.config.xgb_model, "sessions chargées");
                Ok::<_, crate::error::PredictError>(ModelSessions { rf, xgb })
            })
            .await?;
        Ok(sessions.clone())
    }

    pub async fn load_features(&self) -> Result<Arc<FeatureTable>> {
        let table = self
            .features
            .get_or_try_init(|| async {
                let bytes = self.source.fetch(&self.config.features).await?;
                let table = FeatureTable::from_json(&bytes)?;
                info!(
                    location = %self.config.features,
                    draw_no = table.next_draw_no,
                    width = table.width(),
                    "table de features chargée"
                );
                Ok::<_, crate::error::PredictError>(Arc::new(table))
            })
            .await?;
        Ok(Arc::clone(table))
    }
}
