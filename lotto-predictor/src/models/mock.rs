//! Sessions et artefacts en mémoire, pour les tests et les démonstrations sans runtime ONNX.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{InferenceSession, ModelKind, SessionFactory, SessionOutputs};
use crate::artifact::{ArtifactLocation, ArtifactSource};
use crate::error::{PredictError, Result};

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub input_name: String,
    pub data: Vec<f32>,
    pub shape: [usize; 2],
}

/// Session renvoyant des sorties fixes.
#[derive(Debug, Default)]
pub struct MockSession {
    output_names: Vec<String>,
    outputs: SessionOutputs,
    failure: Option<String>,
    last_call: Mutex<Option<RecordedCall>>,
}

impl MockSession {
    pub fn new(output_names: &[&str]) -> Self {
        Self {
            output_names: output_names.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    /// Session binaire `[P(non), P(oui)]` dont P(oui) vaut `probs[i]` pour la ligne i.
    pub fn binary(probs: &[f32]) -> Self {
        let data = probs.iter().flat_map(|&p| [1.0 - p, p]).collect();
        Self::new(&["label", "probabilities"]).with_output("probabilities", data)
    }

    pub fn with_output(mut self, name: &str, data: Vec<f32>) -> Self {
        self.outputs.insert(name.to_string(), data);
        self
    }

    pub fn failing(mut self, reason: &str) -> Self {
        self.failure = Some(reason.to_string());
        self
    }

    pub fn last_call(&self) -> Option<RecordedCall> {
        self.last_call.lock().ok().and_then(|c| c.clone())
    }
}

#[async_trait]
impl InferenceSession for MockSession {
    fn output_names(&self) -> &[String] {
        &self.output_names
    }

    async fn run(&self, input_name: &str, data: Vec<f32>, shape: [usize; 2]) -> Result<SessionOutputs> {
        if let Ok(mut last) = self.last_call.lock() {
            *last = Some(RecordedCall { input_name: input_name.to_string(), data, shape });
        }
        if let Some(reason) = &self.failure {
            return Err(PredictError::Inference { model: "mock".to_string(), reason: reason.clone() });
        }
        Ok(self.outputs.clone())
    }
}

/// Fabrique renvoyant des sessions préparées d'avance, quel que soit le contenu de l'artefact.
pub struct MockSessionFactory {
    rf: Arc<dyn InferenceSession>,
    xgb: Arc<dyn InferenceSession>,
    created: AtomicUsize,
}

impl MockSessionFactory {
    pub fn new(rf: MockSession, xgb: MockSession) -> Self {
        Self { rf: Arc::new(rf), xgb: Arc::new(xgb), created: AtomicUsize::new(0) }
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

impl SessionFactory for MockSessionFactory {
    fn create(&self, kind: ModelKind, bytes: Vec<u8>) -> Result<Arc<dyn InferenceSession>> {
        if bytes.is_empty() {
            return Err(PredictError::Session(format!("artefact {} vide", kind.name())));
        }
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(match kind {
            ModelKind::Rf => Arc::clone(&self.rf),
            ModelKind::Xgb => Arc::clone(&self.xgb),
        })
    }
}

/// Artefacts en mémoire, indexés par emplacement.
#[derive(Default)]
pub struct InMemoryArtifacts {
    files: HashMap<String, Vec<u8>>,
    fetches: AtomicUsize,
}

impl InMemoryArtifacts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, location: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.files.insert(ArtifactLocation::parse(location).to_string(), bytes.into());
        self
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ArtifactSource for InMemoryArtifacts {
    async fn fetch(&self, location: &ArtifactLocation) -> Result<Vec<u8>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        // laisse les autres tâches avancer, comme une vraie lecture
        tokio::task::yield_now().await;
        self.files
            .get(&location.to_string())
            .cloned()
            .ok_or_else(|| PredictError::ArtifactUnavailable {
                location: location.to_string(),
                reason: "introuvable".to_string(),
            })
    }
}
