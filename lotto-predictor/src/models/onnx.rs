use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ort::session::Session;
use tracing::{debug, info, warn};

use super::{InferenceSession, ModelKind, SessionFactory, SessionOutputs};
use crate::error::{PredictError, Result};

/// Session ONNX Runtime (CPU).
pub struct OnnxSession {
    kind: ModelKind,
    session: Arc<Mutex<Session>>,
    output_names: Vec<String>,
}

impl OnnxSession {
    pub fn from_bytes(kind: ModelKind, bytes: &[u8]) -> Result<Self> {
        let session = Session::builder()
            .and_then(|builder| builder.commit_from_memory(bytes))
            .map_err(|e| PredictError::Session(format!("{} : {}", kind.name(), e)))?;
        let output_names: Vec<String> = session.outputs.iter().map(|o| o.name.clone()).collect();
        info!(model = kind.name(), outputs = ?output_names, "session ONNX créée");
        Ok(Self {
            kind,
            session: Arc::new(Mutex::new(session)),
            output_names,
        })
    }
}

#[async_trait]
impl InferenceSession for OnnxSession {
    fn output_names(&self) -> &[String] {
        &self.output_names
    }

    async fn run(&self, input_name: &str, data: Vec<f32>, shape: [usize; 2]) -> Result<SessionOutputs> {
        let model = self.kind.name().to_string();
        let session = Arc::clone(&self.session);
        let input_name = input_name.to_string();
        let output_names = self.output_names.clone();

        let failed = |reason: String| PredictError::Inference { model: model.clone(), reason };

        let outputs = tokio::task::spawn_blocking(move || -> std::result::Result<SessionOutputs, String> {
            let mut session = session.lock().map_err(|e| format!("verrou de session : {}", e))?;
            let input = ort::value::Value::from_array((&shape[..], data)).map_err(|e| e.to_string())?;
            let results = session
                .run(ort::inputs![input_name.as_str() => input])
                .map_err(|e| e.to_string())?;

            let mut outputs = SessionOutputs::new();
            for name in &output_names {
                let Some(value) = results.get(name.as_str()) else { continue };
                // les sorties non tensorielles (ex. ZipMap) sont ignorées
                match value.try_extract_tensor::<f32>() {
                    Ok((_, values)) => {
                        outputs.insert(name.clone(), values.to_vec());
                    }
                    Err(e) => debug!(output = name.as_str(), error = %e, "sortie non extraite"),
                }
            }
            Ok(outputs)
        })
        .await
        .map_err(|e| failed(e.to_string()))?
        .map_err(failed)?;

        if outputs.is_empty() {
            warn!(model = self.kind.name(), "aucune sortie tensorielle f32");
        }
        Ok(outputs)
    }
}

/// Fabrique des sessions ONNX à partir des octets des artefacts.
#[derive(Debug, Default, Clone, Copy)]
pub struct OnnxSessionFactory;

impl SessionFactory for OnnxSessionFactory {
    fn create(&self, kind: ModelKind, bytes: Vec<u8>) -> Result<Arc<dyn InferenceSession>> {
        Ok(Arc::new(OnnxSession::from_bytes(kind, &bytes)?))
    }
}
