use thiserror::Error;

/// Erreurs du prédicteur. Aucune n'est retentée : elles remontent telles quelles à l'appelant.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("Artefact indisponible ({location}) : {reason}")]
    ArtifactUnavailable { location: String, reason: String },

    #[error("Table de features invalide : {0}")]
    MalformedFeatures(String),

    #[error("Sortie de probabilités introuvable dans le modèle. Disponibles : {available}")]
    MissingProbabilityOutput { available: String },

    #[error("Sortie du modèle {model} invalide : {reason}")]
    MalformedOutput { model: String, reason: String },

    #[error("Création de session impossible : {0}")]
    Session(String),

    #[error("Échec de l'inférence {model} : {reason}")]
    Inference { model: String, reason: String },

    #[error("Configuration invalide : {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, PredictError>;
