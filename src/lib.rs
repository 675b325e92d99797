use std::sync::Arc;

use crate::api::{CourseApi, HttpApi};
use crate::error::AppResult;
use crate::store::CourseEditor;

pub mod config;
pub use config::{Config, ConfigError, ConfigResult};

pub mod api;
pub mod error;
pub mod model;
pub mod store;
pub mod utils;

static APPLICATION_NAME: &str = "cursus";

/// Build a [`CourseEditor`] against the API named in the config file.
pub async fn build_editor() -> AppResult<CourseEditor> {
    let use_local = cfg!(debug_assertions);
    let config = config::Config::get_or_init(use_local).await;

    let api = HttpApi::new(config.api().base_url());
    Ok(build_editor_with_api(Arc::new(api)))
}

/// Wire an editor to any [`CourseApi`] implementation. Tests use this
/// with an in-process stub.
pub fn build_editor_with_api(api: Arc<dyn CourseApi>) -> CourseEditor {
    CourseEditor::new(api)
}

pub fn setup_trace() {
    use tracing_error::ErrorLayer;
    use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

    // load .env file for RUST_LOG etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .with(ErrorLayer::default())
        .init();

    tracing::debug!("tracing initialized.");
}
