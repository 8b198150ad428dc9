use std::sync::Arc;

use clap::Parser;
use leakwatch::{
    actors::{detector::DetectorHandle, notifier::NotifierHandle},
    config::{self, Config, DirectoryConfig, NotifyConfig, read_config_file},
    notify::{EmailConfig, EmailSender, NotificationSender, WebhookSender},
    publisher::CommandPublisher,
    reading::ReadingStore,
    subscribers::{JsonFileDirectory, MemoryDirectory, SubscriberDirectory},
    transport::{MqttConnector, TopicRoute},
};
use tokio::sync::{broadcast, mpsc};
use tracing::{info, level_filters::LevelFilter, trace, warn};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Parser)]
struct Args {
    /// Config file (optional; environment defaults apply without one)
    #[arg(short)]
    file: Option<String>,
}

fn init() {
    let filter = filter::Targets::new().with_targets(vec![
        ("leakwatch", LevelFilter::TRACE),
        ("hub", LevelFilter::TRACE),
    ]);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .compact()
                .with_ansi(false),
        )
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init();
    let args = Args::parse();
    trace!("started with args: {args:?}");

    let config = match &args.file {
        Some(path) => read_config_file(path)?,
        None => Config::default(),
    };

    let store = ReadingStore::new();
    let (transition_tx, _) = broadcast::channel(64);
    let (telemetry_tx, telemetry_rx) = mpsc::channel(256);

    // Both telemetry topics feed the same queue: one worker, strict arrival
    // order, no chance of double-fired transitions.
    let routes = vec![
        TopicRoute {
            filter: config::topics::GAS_VALUE.to_string(),
            sender: telemetry_tx.clone(),
        },
        TopicRoute {
            filter: config::topics::GAS_STATUS.to_string(),
            sender: telemetry_tx,
        },
    ];

    info!(
        "connecting to MQTT broker {}:{}",
        config.mqtt.host, config.mqtt.port
    );
    let transport = MqttConnector::spawn(&config.mqtt, routes);

    let detector = DetectorHandle::spawn(
        config.telemetry.threshold,
        store.clone(),
        telemetry_rx,
        transition_tx.clone(),
    );

    let directory: Arc<dyn SubscriberDirectory> =
        match config.subscribers.clone().unwrap_or_default() {
            DirectoryConfig::Memory => Arc::new(MemoryDirectory::new()),
            DirectoryConfig::File { path } => Arc::new(JsonFileDirectory::open(path).await?),
        };

    let sender = build_sender(&config)?;

    let notifier = match &sender {
        Some(sender) => Some(NotifierHandle::spawn(
            config.telemetry.threshold,
            directory.clone(),
            sender.clone(),
            transition_tx.subscribe(),
        )),
        None => {
            warn!("no notification sender configured, transitions will only be logged");
            None
        }
    };

    let publisher = CommandPublisher::new(Arc::new(transport.clone()));

    #[cfg(feature = "api")]
    {
        let state = leakwatch::api::ApiState::new(
            store.clone(),
            publisher.clone(),
            directory.clone(),
            transport.state_receiver(),
            sender.clone(),
        );
        leakwatch::api::spawn_api_server(leakwatch::api::ApiConfig::default(), state).await?;
    }

    tokio::signal::ctrl_c().await?;
    info!("shutting down");

    detector.shutdown().await;
    if let Some(notifier) = notifier {
        notifier.shutdown().await;
    }

    Ok(())
}

fn build_sender(config: &Config) -> anyhow::Result<Option<Arc<dyn NotificationSender>>> {
    match &config.notifications {
        Some(NotifyConfig::Email(email)) => Ok(Some(Arc::new(EmailSender::new(email.clone())?))),
        Some(NotifyConfig::Webhook(webhook)) => {
            Ok(Some(Arc::new(WebhookSender::new(webhook.clone()))))
        }
        // no explicit channel configured - fall back to the SMTP env vars
        None => match EmailConfig::from_env() {
            Some(email) => Ok(Some(Arc::new(EmailSender::new(email)?))),
            None => Ok(None),
        },
    }
}
