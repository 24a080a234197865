use std::sync::Arc;

use account_service::config::Config;
use account_service::config::StoreBackend;
use account_service::domain::principal::management::ManagementService;
use account_service::domain::principal::models::Identifier;
use account_service::domain::principal::models::Password;
use account_service::domain::principal::models::PrincipalKind;
use account_service::domain::principal::ports::CredentialStore;
use account_service::domain::principal::service::AccountService;
use account_service::domain::token::models::TokenTtl;
use account_service::inbound::http::router::create_router;
use account_service::outbound::repositories::InMemoryCredentialStore;
use account_service::outbound::repositories::PostgresCredentialStore;
use auth::Authenticator;
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "account_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "account-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;
    let backend = StoreBackend::from_env();

    tracing::info!(
        http_port = config.server.http_port,
        token_ttl_minutes = config.token.ttl_minutes,
        store = ?backend,
        "Configuration loaded"
    );

    let authenticator = Arc::new(Authenticator::with_cost(config.password)?);
    let ttl = TokenTtl::from_minutes(config.token.ttl_minutes)?;

    let http_application = match backend {
        StoreBackend::Postgres => {
            let pg_pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .acquire_timeout(config.database.acquire_timeout())
                .connect(&config.database.url)
                .await?;
            tracing::info!(
                max_connections = config.database.max_connections,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(&pg_pool).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            let query_timeout = config.database.query_timeout();
            build_application(
                &config,
                authenticator,
                ttl,
                Arc::new(PostgresCredentialStore::new(
                    pg_pool.clone(),
                    PrincipalKind::Customer,
                    query_timeout,
                )),
                Arc::new(PostgresCredentialStore::new(
                    pg_pool,
                    PrincipalKind::Manager,
                    query_timeout,
                )),
            )
            .await?
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory credential store; data is lost on restart");
            build_application(
                &config,
                authenticator,
                ttl,
                Arc::new(InMemoryCredentialStore::new()),
                Arc::new(InMemoryCredentialStore::new()),
            )
            .await?
        }
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    axum::serve(http_listener, http_application).await?;

    tracing::info!("Server exited successfully");

    Ok(())
}

async fn build_application<S>(
    config: &Config,
    authenticator: Arc<Authenticator>,
    ttl: TokenTtl,
    customer_store: Arc<S>,
    manager_store: Arc<S>,
) -> Result<Router, anyhow::Error>
where
    S: CredentialStore,
{
    let management = Arc::new(ManagementService::new(
        Arc::clone(&customer_store),
        Arc::clone(&manager_store),
        Arc::clone(&authenticator),
    ));

    if let Some(bootstrap) = &config.bootstrap {
        let identifier = Identifier::new(bootstrap.admin_identifier.clone())?;
        let password = Password::new(bootstrap.admin_password.clone());
        if management
            .bootstrap_admin(identifier, password)
            .await?
            .is_none()
        {
            tracing::info!("Bootstrap admin already present");
        }
    }

    let customers = Arc::new(AccountService::new(
        PrincipalKind::Customer,
        customer_store,
        Arc::clone(&authenticator),
        ttl,
    ));
    let managers = Arc::new(AccountService::new(
        PrincipalKind::Manager,
        manager_store,
        authenticator,
        ttl,
    ));

    Ok(create_router(customers, managers, management))
}
