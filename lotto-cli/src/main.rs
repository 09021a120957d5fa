mod display;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::warn;

use lotto_core::models::{PICK_COUNT, PredictionResult, Strategy, validate_numbers};
use lotto_predictor::artifact::ArtifactLocation;
use lotto_predictor::config::PredictorConfig;
use lotto_predictor::dream::{analyze_dream, matched_keywords};
use lotto_predictor::models::SessionFactory;
use lotto_predictor::report::analyze_prediction;
use lotto_predictor::sampler::random_numbers;
use lotto_predictor::{Predictor, PredictorContext};

#[derive(Parser)]
#[command(name = "lotto", about = "Recommandation de numéros Lotto 6/45 (ensemble RF + XGBoost)")]
struct Cli {
    /// Fichier de configuration TOML (défaut : lotto.toml s'il existe)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Générer des grilles
    Predict {
        /// Stratégie de sélection
        #[arg(short, long, value_enum, default_value_t = Strategy::Balanced)]
        strategy: Strategy,

        /// Texte du rêve (mots-clés du lexique)
        #[arg(short, long, default_value = "")]
        dream: String,

        /// Nombre de grilles
        #[arg(short, long, default_value = "1")]
        count: usize,

        /// Seed pour la reproductibilité
        #[arg(long)]
        seed: Option<u64>,

        /// Modèle Random Forest (chemin ou URL)
        #[arg(long)]
        rf_model: Option<String>,

        /// Modèle XGBoost (chemin ou URL)
        #[arg(long)]
        xgb_model: Option<String>,

        /// Table de features JSON (chemin ou URL)
        #[arg(long)]
        features: Option<String>,

        /// Nombre de numéros affichés dans le classement
        #[arg(long, default_value = "10")]
        top: usize,

        /// Sortie JSON
        #[arg(long)]
        json: bool,
    },

    /// Analyser un rêve
    Dream {
        /// Texte libre
        text: String,
    },

    /// Afficher le lexique des rêves
    Lexicon,

    /// Afficher la table de features du prochain tirage
    Features {
        /// Table de features JSON (chemin ou URL)
        #[arg(long)]
        features: Option<String>,
    },
}

/// Grille produite par le modèle, ou tirage uniforme de repli.
pub enum Generated {
    Predicted(PredictionResult),
    Fallback([u8; PICK_COUNT]),
}

impl Generated {
    pub fn numbers(&self) -> &[u8; PICK_COUNT] {
        match self {
            Generated::Predicted(r) => &r.numbers,
            Generated::Fallback(n) => n,
        }
    }
}

fn init_tracing() {
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

#[cfg(feature = "onnx")]
fn session_factory() -> Arc<dyn SessionFactory> {
    Arc::new(lotto_predictor::models::onnx::OnnxSessionFactory)
}

#[cfg(not(feature = "onnx"))]
fn session_factory() -> Arc<dyn SessionFactory> {
    struct NoRuntime;

    impl SessionFactory for NoRuntime {
        fn create(
            &self,
            kind: lotto_predictor::models::ModelKind,
            _bytes: Vec<u8>,
        ) -> lotto_predictor::Result<Arc<dyn lotto_predictor::models::InferenceSession>> {
            Err(lotto_predictor::PredictError::Session(format!(
                "{} : binaire compilé sans la feature `onnx`",
                kind.name()
            )))
        }
    }

    Arc::new(NoRuntime)
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let mut config = PredictorConfig::load(cli.config.as_deref()).context("Chargement de la configuration")?;

    match cli.command {
        Command::Predict { strategy, dream, count, seed, rf_model, xgb_model, features, top, json } => {
            if let Some(loc) = rf_model {
                config.rf_model = ArtifactLocation::parse(&loc);
            }
            if let Some(loc) = xgb_model {
                config.xgb_model = ArtifactLocation::parse(&loc);
            }
            if let Some(loc) = features {
                config.features = ArtifactLocation::parse(&loc);
            }
            cmd_predict(config, strategy, &dream, count, seed, top, json).await
        }
        Command::Dream { text } => cmd_dream(&text),
        Command::Lexicon => {
            display::display_lexicon();
            Ok(())
        }
        Command::Features { features } => {
            if let Some(loc) = features {
                config.features = ArtifactLocation::parse(&loc);
            }
            cmd_features(config).await
        }
    }
}

async fn cmd_predict(
    config: PredictorConfig,
    strategy: Strategy,
    dream: &str,
    count: usize,
    seed: Option<u64>,
    top: usize,
    json: bool,
) -> Result<()> {
    let context = Arc::new(PredictorContext::with_default_source(config, session_factory()));
    let predictor = Predictor::new(context);

    let mut rng: StdRng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_rng(&mut rand::rng()),
    };

    let mut generated = Vec::with_capacity(count);
    for _ in 0..count {
        match predictor.predict_numbers_with_rng(strategy, dream, &mut rng).await {
            Ok(result) => {
                validate_numbers(&result.numbers)?;
                generated.push(Generated::Predicted(result));
            }
            Err(e) => {
                warn!(error = %e, "échec de la prédiction, repli sur un tirage aléatoire");
                generated.push(Generated::Fallback(random_numbers(&mut rng)));
            }
        }
    }

    if json {
        let out: Vec<serde_json::Value> = generated
            .iter()
            .map(|g| match g {
                Generated::Predicted(r) => serde_json::json!({ "source": "model", "result": r }),
                Generated::Fallback(n) => serde_json::json!({ "source": "random", "numbers": n }),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    display::display_grids(&generated, strategy);
    for g in &generated {
        if let Generated::Predicted(result) = g {
            display::display_ranking(result, top);
            display::display_report(&analyze_prediction(result, dream));
            break;
        }
    }
    Ok(())
}

fn cmd_dream(text: &str) -> Result<()> {
    let keywords = matched_keywords(text);
    let numbers = analyze_dream(text);
    display::display_dream(&keywords, &numbers);
    Ok(())
}

async fn cmd_features(config: PredictorConfig) -> Result<()> {
    let threshold = config.hot_threshold;
    let context = PredictorContext::with_default_source(config, session_factory());
    let table = context.load_features().await.context("Chargement de la table de features")?;
    display::display_features(&table, threshold);
    Ok(())
}
