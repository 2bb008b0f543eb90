use anyhow::{Context, Result};
use pv_forecast_features::{config, domain, ml, telemetry, ForecastEngine};
use config::Config;
use domain::ForecastRequest;
use ml::LinearRegressionModel;
use std::sync::Arc;
use telemetry::init_tracing;
use tracing::info;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cfg = Config::load()?;

    let request = match std::env::args().nth(1) {
        Some(path) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("reading request file {path}"))?;
            serde_json::from_str::<ForecastRequest>(&raw)
                .with_context(|| format!("parsing request file {path}"))?
        }
        None => {
            info!("no request file given, using the reference sample");
            ForecastRequest::reference_sample()
        }
    };

    let model = LinearRegressionModel::from_config(&cfg.model)?;
    info!(model_id = %cfg.model.model_id, version = %cfg.model.version, "model ready");

    let engine = ForecastEngine::from_config(&cfg, Arc::new(model));
    let outcome = engine
        .predict(&request.data, request.id)
        .with_context(|| format!("forecast for site {}", request.id))?;

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}
