use anyhow::Result;
use parley::backend::{BackendWorker, HttpTransport};
use parley::config::AppConfig;
use parley::speech::{NullRecognizer, NullSynthesizer, RecognizerConfig, SynthesisPipeline, Voice};
use parley::ui::{AppState, ParleyApp};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "parley=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();
    config.validate().map_err(|e| anyhow::anyhow!(e))?;
    info!("Starting Parley (backend: {})", config.backend_url);

    // Backend worker
    let transport = HttpTransport::new(config.backend_url.clone(), config.request_timeout)
        .map_err(|e| anyhow::anyhow!(e))?;
    let (backend, backend_worker) = BackendWorker::new(Box::new(transport));
    backend_worker.start_worker();

    // Synthesis pipeline; the platform engine plugs in here
    let voice = Voice {
        locale: config.locale.clone(),
        rate: config.speech_rate,
        pitch: config.speech_pitch,
    };
    let (synthesis, synthesis_pipeline) = SynthesisPipeline::new(Box::new(NullSynthesizer), voice);
    synthesis_pipeline.start_worker();

    // Recognition capability; the platform engine plugs in here
    let recognizer_config = RecognizerConfig::default().with_locale(config.locale.clone());
    let (recognizer, recognizer_events) = NullRecognizer::new(recognizer_config);

    let state = AppState::new(
        config,
        Box::new(recognizer),
        recognizer_events,
        synthesis,
        backend,
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 720.0])
            .with_min_inner_size([600.0, 400.0])
            .with_title("Parley"),
        ..Default::default()
    };

    eframe::run_native(
        "Parley",
        options,
        Box::new(|cc| Ok(Box::new(ParleyApp::new(cc, state)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {}", e))?;

    Ok(())
}
