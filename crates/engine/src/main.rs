//! Condition Reminders Engine - Main entry point.
//!
//! Speaks the host bridge protocol: host events arrive on stdin, engine
//! commands leave on stdout, one JSON object per line. Logs go to stderr.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use condition_reminders_engine::{
    api::{stdio, HostEventHandler},
    infrastructure::{
        app_settings::EngineSettings,
        bridge::HostBridge,
        clock::{SystemClock, SystemRandom},
        flag_store,
        ports::{ClockPort, RandomPort},
    },
    App,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "condition_reminders_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Condition Reminders Engine");

    // Load configuration
    let settings = EngineSettings::from_env()?;
    tracing::info!(
        namespace = %settings.namespace,
        flag_key = %settings.flag_key,
        announce_turns = settings.announce_turns,
        "Settings loaded"
    );

    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock::new());
    let random: Arc<dyn RandomPort> = Arc::new(SystemRandom::new());

    let flags = flag_store::open(&settings, clock.clone()).await?;
    let (bridge, commands) = HostBridge::channel(random.clone());

    let app = Arc::new(App::new(settings, flags, Arc::new(bridge), clock, random));
    let handler = HostEventHandler::new(app);

    stdio::serve(&handler, tokio::io::stdin(), tokio::io::stdout(), commands).await?;

    tracing::info!("Host closed the bridge, shutting down");
    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
    let _ = dotenvy::dotenv();
}
