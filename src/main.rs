//! Tandem - Bilingual content management backend

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tandem::{
    api::{self, AppState, RequestStats},
    cache::create_cache,
    config::Config,
    db::{
        self,
        repositories::{
            SqlxArticleRepository, SqlxAssetRepository, SqlxCategoryRepository,
            SqlxDirectorMessageRepository, SqlxEbookRepository, SqlxFactRepository,
            SqlxMinisterMessageRepository, SqlxNewsletterRepository, SqlxPartnerRepository,
            SqlxProjectRepository, SqlxStaffRepository, SqlxSubscriberRepository,
            SqlxUserRepository,
        },
    },
    services::{
        ArticleService, CategoryService, Mailer, MessageService, RateLimiter, SubscriberService,
        UserService,
    },
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tandem=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Tandem backend...");

    // Load configuration (config.yml + TANDEM_* environment overrides)
    let config = Config::load_with_env(Path::new("config.yml"))?;
    config.validate()?;
    let config = Arc::new(config);
    tracing::info!("Configuration loaded");

    // Initialize database
    let pool = db::create_pool(&config.database).await?;
    tracing::info!("Database connected: {:?}", config.database.driver);

    // Run migrations
    db::migrations::run_migrations(&pool).await?;
    tracing::info!("Database migrations completed");

    // Initialize cache
    let cache = create_cache(&config.cache);
    tracing::info!("Cache initialized");

    // Create repositories
    let user_repo = SqlxUserRepository::boxed(pool.clone());
    let article_repo = SqlxArticleRepository::boxed(pool.clone());
    let category_repo = SqlxCategoryRepository::boxed(pool.clone());
    let director_repo = SqlxDirectorMessageRepository::boxed(pool.clone());
    let minister_repo = SqlxMinisterMessageRepository::boxed(pool.clone());
    let subscriber_repo = SqlxSubscriberRepository::boxed(pool.clone());

    // Outbound mail (contact form + subscription confirmations)
    let mailer = Arc::new(Mailer::new(config.smtp.clone()));
    if mailer.is_configured() {
        tracing::info!("SMTP mailer configured: {}", config.smtp.host);
    } else {
        tracing::warn!("SMTP not configured; contact form and confirmations are disabled");
    }

    // Initialize services
    let user_service = Arc::new(UserService::new(user_repo, config.auth.clone()));
    let article_service = Arc::new(ArticleService::new(
        article_repo.clone(),
        category_repo.clone(),
    ));
    let category_service = Arc::new(CategoryService::new(
        category_repo,
        article_repo,
        cache.clone(),
    ));
    let message_service = Arc::new(MessageService::new(director_repo, minister_repo, cache));
    let subscriber_service = Arc::new(SubscriberService::with_mailer(
        subscriber_repo,
        mailer.clone(),
    ));

    // Rate limiter with periodic cleanup
    let rate_limiter = Arc::new(RateLimiter::new(config.rate_limit.clone()));
    if rate_limiter.is_enabled() {
        tracing::info!("Rate limiting enabled");
    }
    {
        let limiter = rate_limiter.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tokio::time::Duration::from_secs(300));
            loop {
                interval.tick().await;
                limiter.cleanup().await;
            }
        });
    }

    // Build application state
    let state = AppState {
        pool: pool.clone(),
        config: config.clone(),
        user_service,
        article_service,
        category_service,
        message_service,
        subscriber_service,
        project_repo: SqlxProjectRepository::boxed(pool.clone()),
        staff_repo: SqlxStaffRepository::boxed(pool.clone()),
        partner_repo: SqlxPartnerRepository::boxed(pool.clone()),
        newsletter_repo: SqlxNewsletterRepository::boxed(pool.clone()),
        ebook_repo: SqlxEbookRepository::boxed(pool.clone()),
        fact_repo: SqlxFactRepository::boxed(pool.clone()),
        asset_repo: SqlxAssetRepository::boxed(pool.clone()),
        mailer,
        rate_limiter,
        request_stats: Arc::new(RequestStats::new()),
    };

    // Build router
    let app = api::build_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");

    Ok(())
}

/// Resolve when SIGINT or SIGTERM is received
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
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
        _ = ctrl_c => tracing::info!("SIGINT received. Shutting down gracefully..."),
        _ = terminate => tracing::info!("SIGTERM received. Shutting down gracefully..."),
    }
}
