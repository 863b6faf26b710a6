//! Comment sentiment service: binary entrypoint.
//! Loads the lexical resource and scoring config, then serves the axum router.

use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use comment_sentiment::api::{create_router, AppState};

/// Enable compact tracing logs in development only.
/// Activation requires BOTH:
///   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
///   - SENTIMENT_DEV_LOG=1
fn enable_dev_tracing() {
    let dev_flag = std::env::var("SENTIMENT_DEV_LOG")
        .ok()
        .is_some_and(|v| v == "1");

    let is_dev_env = cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        );

    if !(dev_flag && is_dev_env) {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("api=info,lexicon=info,sentiment=debug,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // .env is optional; SCORING_*, LEXICON_DIR and DEBUG_ROUTES may come from it.
    let _ = dotenvy::dotenv();

    enable_dev_tracing();

    // No lexical resource or bad config means no service.
    let state = AppState::from_env()?;
    let router = create_router(state);

    Ok(router.into())
}
