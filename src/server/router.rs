use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::http::{HeaderName, HeaderValue};
use axum::middleware::{self, Next};
use axum::response::Response;
use log::info;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;

use super::books::book_routes;
use super::config::ServerConfig;
use super::docs::docs_routes;
use crate::{BookStore, Result};

/// Response headers added to every reply unless a handler already set them.
const SECURITY_HEADERS: &[(&str, &str)] = &[
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "SAMEORIGIN"),
    ("x-dns-prefetch-control", "off"),
    ("x-download-options", "noopen"),
    ("x-permitted-cross-domain-policies", "none"),
    ("referrer-policy", "no-referrer"),
    ("strict-transport-security", "max-age=15552000; includeSubDomains"),
];

/// HTTP front end for a [`BookStore`].
pub struct Router {
    store: Arc<dyn BookStore>,
    config: ServerConfig,
}

impl Router {
    pub fn new(store: Arc<dyn BookStore>, config: ServerConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Assembles the routes and middleware into a servable application.
    pub fn app(&self) -> axum::Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        let app = axum::Router::new()
            .merge(book_routes())
            .merge(docs_routes(&self.config.public_url()))
            .with_state(self.store.clone())
            .layer(middleware::from_fn(log_requests));

        SECURITY_HEADERS
            .iter()
            .fold(app, |app, &(name, value)| {
                app.layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static(name),
                    HeaderValue::from_static(value),
                ))
            })
            .layer(cors)
    }

    pub async fn listen(&self) -> Result<()> {
        let addr = self.config.socket_addr();
        let listener = TcpListener::bind(&addr).await?;
        info!("Bookshelf listening on {}", addr);

        axum::serve(listener, self.app()).await?;
        Ok(())
    }
}

async fn log_requests(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(req).await;

    info!(
        "{} {} {} - {} ms",
        method,
        path,
        response.status().as_u16(),
        started.elapsed().as_millis()
    );
    response
}
