//! API Server Entry Point
//!
//! Wires configuration, the database pool, mail and upload stores into
//! the auth and vendor routers. Startup failures are `anyhow` errors.

mod config;

use std::net::SocketAddr;
use std::path::Path;

use auth::application::{BootstrapAdminInput, BootstrapAdminUseCase};
use auth::presentation::AuthAppState;
use auth::{PgAuthRepository, admin_router, auth_router, user_router};
use axum::{
    Router, http,
    http::{Method, header},
};
use platform::mail::MailTransport;
use platform::upload::{DiskFileStore, UploadRules};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vendor::presentation::VendorAppState;
use vendor::{PgVendorRepository, vendor_router};

use crate::config::ApiConfig;

/// Public prefix the upload store hands out
const UPLOADS_PREFIX: &str = "/uploads";

/// Static file routes for the upload folders marked public
///
/// Identity documents live under the same root but are only reachable
/// through the admin document route.
fn public_uploads(root: &Path) -> Router {
    UploadRules::ALL
        .iter()
        .filter(|rules| rules.public)
        .fold(Router::new(), |router, rules| {
            router.nest_service(
                &format!("{UPLOADS_PREFIX}/{}", rules.folder),
                ServeDir::new(root.join(rules.folder)),
            )
        })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "api=info,auth=info,vendor=info,platform=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::from_env()?;

    // Database connection
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    let mailer = MailTransport::from_config(config.smtp.as_ref())?;
    if matches!(mailer, MailTransport::Log(_)) {
        tracing::warn!("SMTP_HOST not set; outgoing email will only be logged");
    }

    tokio::fs::create_dir_all(&config.upload_dir).await?;
    let files = DiskFileStore::new(&config.upload_dir, UPLOADS_PREFIX);

    let auth_state = AuthAppState::new(PgAuthRepository::new(pool.clone()), mailer.clone(), config.auth);
    let vendor_state = VendorAppState::new(
        PgVendorRepository::new(pool.clone()),
        mailer,
        files,
        config.vendor,
        auth_state.signer.clone(),
    );

    // Operator admin account
    if let Some(admin) = config.admin {
        let outcome = BootstrapAdminUseCase::new(auth_state.repo.clone(), auth_state.config.clone())
            .execute(BootstrapAdminInput {
                name: admin.name,
                email: admin.email,
                password: admin.password,
            })
            .await?;
        tracing::info!(outcome = ?outcome, "Admin bootstrap completed");
    }

    // CORS configuration
    let allowed_origins: Vec<http::HeaderValue> = config
        .frontend_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router
    let app = Router::new()
        .nest("/api/auth", auth_router(auth_state.clone()))
        .nest("/api/user", user_router(auth_state.clone()))
        .nest("/api/admin", admin_router(auth_state))
        .nest("/api/vendor", vendor_router(vendor_state))
        .merge(public_uploads(&config.upload_dir))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    tracing::info!("Listening on {}", config.bind_addr);

    let listener = TcpListener::bind(config.bind_addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn status_of(router: Router, uri: &str) -> StatusCode {
        router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_only_public_folders_are_served() {
        let root = std::env::temp_dir().join(format!("api-uploads-{}", std::process::id()));
        for (folder, name) in [("products", "product-1.png"), ("vendor-documents", "doc-1.pdf")] {
            std::fs::create_dir_all(root.join(folder)).unwrap();
            std::fs::write(root.join(folder).join(name), b"bytes").unwrap();
        }

        let router = public_uploads(&root);
        assert_eq!(
            status_of(router.clone(), "/uploads/products/product-1.png").await,
            StatusCode::OK
        );
        assert_eq!(
            status_of(router.clone(), "/uploads/vendor-documents/doc-1.pdf").await,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(router, "/uploads/products/../vendor-documents/doc-1.pdf").await,
            StatusCode::NOT_FOUND
        );

        let _ = std::fs::remove_dir_all(root);
    }
}
