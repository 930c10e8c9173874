//! MentorApp backend server.

use std::sync::Arc;

use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mentor_backend::adapters::ai::{FailoverAIProvider, OpenAIConfig, OpenAIProvider};
use mentor_backend::adapters::http::{apply_middleware, diagnostic_router, DiagnosticAppState};
use mentor_backend::application::handlers::diagnostic::{
    AnalyzeDeepDiagnosticHandler, NarrativeSettings,
};
use mentor_backend::config::{AiConfig, AiProvider, AppConfig, ServerConfig};
use mentor_backend::domain::diagnostic::DiagnosticCatalog;
use mentor_backend::ports::{AIError, AIProvider as AIProviderPort};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    let catalog = match &config.diagnostic.catalog_path {
        Some(path) => {
            let catalog = DiagnosticCatalog::from_yaml_file(path)?;
            info!(path = %path.display(), domains = catalog.len(), "catalog loaded");
            catalog
        }
        None => DiagnosticCatalog::reference(),
    };

    let provider = build_provider(&config.ai)?;
    match &provider {
        Some(p) => info!(provider = %p.provider_info().name, model = %p.provider_info().model, "narrative provider configured"),
        None => info!("no AI provider configured, narratives come from templates"),
    }

    let settings = NarrativeSettings {
        timeout: config.ai.timeout(),
        temperature: config.ai.temperature,
        annotate_fallback: config.diagnostic.annotate_fallback,
    };
    let handler = AnalyzeDeepDiagnosticHandler::new(Arc::new(catalog), provider, settings);

    let router = apply_middleware(
        diagnostic_router(DiagnosticAppState::new(Arc::new(handler))),
        &config.server,
    );

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, environment = ?config.server.environment, "MentorApp backend listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    if server.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer().compact()).init();
    }
}

fn build_provider(ai: &AiConfig) -> Result<Option<Arc<dyn AIProviderPort>>, AIError> {
    if !ai.is_configured() {
        return Ok(None);
    }

    let primary = openai_compatible(ai, ai.primary_provider)?;
    let Some(fallback_kind) = ai.fallback_provider else {
        return Ok(Some(primary));
    };

    let fallback = openai_compatible(ai, fallback_kind)?;
    Ok(Some(Arc::new(
        FailoverAIProvider::new(primary).with_fallback(fallback),
    )))
}

fn openai_compatible(ai: &AiConfig, kind: AiProvider) -> Result<Arc<dyn AIProviderPort>, AIError> {
    let key = ai
        .api_key(kind)
        .ok_or_else(|| AIError::InvalidRequest(format!("missing API key for {}", kind.name())))?;
    let base = match kind {
        AiProvider::OpenAI => OpenAIConfig::new(key),
        AiProvider::Xai => OpenAIConfig::xai(key),
    };
    let config = base
        .with_model(ai.model(kind))
        .with_base_url(ai.base_url(kind))
        .with_timeout(ai.timeout())
        .with_max_retries(ai.max_retries);

    Ok(Arc::new(OpenAIProvider::new(config)?))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}
