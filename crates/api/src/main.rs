use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sweetbox_api::auth::identity::{FirebaseConfig, FirebaseVerifier, IdentityVerifier};
use sweetbox_api::background::cache_sweeper;
use sweetbox_api::config::ServerConfig;
use sweetbox_api::gateways::cloudinary::{CloudinaryClient, CloudinaryConfig, MediaStore};
use sweetbox_api::gateways::razorpay::{PaymentGateway, RazorpayClient, RazorpayConfig};
use sweetbox_api::router::build_app_router;
use sweetbox_api::state::{AppState, PublicCaches};
use sweetbox_core::queue::TaskQueue;
use sweetbox_events::{
    EmailConfig, EmailNotifier, EmailTemplates, EventBus, MailTransport, NotifierSettings,
    SmtpMailer,
};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "sweetbox_api=debug,sweetbox_events=debug,tower_http=debug".into());
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = sweetbox_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    sweetbox_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    sweetbox_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Event bus + e-mail notifier ---
    let event_bus = Arc::new(EventBus::default());

    let transport: Option<Arc<dyn MailTransport>> = match EmailConfig::from_env() {
        Some(email_config) => {
            let mailer = SmtpMailer::new(&email_config).expect("Invalid SMTP configuration");
            tracing::info!(host = %email_config.smtp_host, "SMTP delivery enabled");
            Some(Arc::new(mailer) as Arc<dyn MailTransport>)
        }
        None => {
            tracing::warn!("SMTP_HOST not set; e-mails will be logged, not sent");
            None
        }
    };
    let templates =
        EmailTemplates::new(config.site_url.clone()).expect("Failed to compile e-mail templates");
    let notifier = EmailNotifier::new(
        transport,
        templates,
        NotifierSettings {
            admin_inbox: config.admin_inbox.clone(),
        },
    );
    let notifier_handle = tokio::spawn(notifier.run(event_bus.subscribe()));
    tracing::info!("E-mail notifier started");

    // --- Background work ---
    let task_queue = Arc::new(TaskQueue::start());

    let caches = Arc::new(PublicCaches::new(Duration::from_secs(
        config.catalog_cache_ttl_secs,
    )));
    let sweeper_cancel = CancellationToken::new();
    let sweeper_handle = tokio::spawn(cache_sweeper::run(
        Arc::clone(&caches),
        sweeper_cancel.clone(),
    ));

    // --- Optional integrations ---
    let identity: Option<Arc<dyn IdentityVerifier>> = FirebaseConfig::from_env().map(|c| {
        tracing::info!(project_id = %c.project_id, "Identity verification enabled");
        Arc::new(FirebaseVerifier::new(c)) as Arc<dyn IdentityVerifier>
    });
    let payments: Option<Arc<dyn PaymentGateway>> = RazorpayConfig::from_env().map(|c| {
        tracing::info!(key_id = %c.key_id, "Payment gateway enabled");
        Arc::new(RazorpayClient::new(c)) as Arc<dyn PaymentGateway>
    });
    let media: Option<Arc<dyn MediaStore>> = CloudinaryConfig::from_env().map(|c| {
        tracing::info!(cloud = %c.cloud_name, "Media uploads enabled");
        Arc::new(CloudinaryClient::new(c)) as Arc<dyn MediaStore>
    });
    if identity.is_none() {
        tracing::warn!("FIREBASE_PROJECT_ID not set; sign-in is disabled");
    }
    if payments.is_none() {
        tracing::warn!("RAZORPAY_KEY_ID not set; checkout is disabled");
    }

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        event_bus: Arc::clone(&event_bus),
        caches,
        task_queue: Arc::clone(&task_queue),
        identity,
        payments,
        media,
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");
    let drain_timeout = Duration::from_secs(config.shutdown_timeout_secs);

    // Let queued account cleanups finish.
    if tokio::time::timeout(drain_timeout, task_queue.shutdown())
        .await
        .is_err()
    {
        tracing::warn!("Task queue did not drain before the shutdown timeout");
    }

    sweeper_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), sweeper_handle).await;
    tracing::info!("Cache sweeper stopped");

    // Dropping the last bus handle closes the channel and ends the notifier.
    drop(event_bus);
    if tokio::time::timeout(drain_timeout, notifier_handle)
        .await
        .is_err()
    {
        tracing::warn!("E-mail notifier did not finish before the shutdown timeout");
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
