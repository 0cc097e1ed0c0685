use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use log::{error, info};
use warp::filters::body::BodyDeserializeError;
use warp::http::header::{HeaderMap, HeaderValue, CACHE_CONTROL, EXPIRES, PRAGMA};
use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Filter, Rejection, Reply};

use super::routes::{self, error_reply};
use crate::catalog::Catalog;
use crate::error_handling::types::WebError;
use crate::storage::RecordStore;

/// HTTP API over the record store
pub struct WebServer {
    catalog: Catalog,
    cors_enabled: bool,
}

impl WebServer {
    pub fn new(store: Arc<RecordStore>, cors_enabled: bool) -> Self {
        Self {
            catalog: Catalog::new(store),
            cors_enabled,
        }
    }

    /// All routes with rejection recovery, no-cache headers and request logging.
    pub fn routes(&self) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
        routes::api(self.catalog.clone())
            .recover(handle_rejection)
            .with(warp::reply::with::headers(no_cache_headers()))
            .with(warp::log("shipyard::http"))
    }

    /// Serves on `addr` until Ctrl-C.
    pub async fn start(&self, addr: SocketAddr) -> Result<(), WebError> {
        // warp panics on a bind failure, so surface it as an error first
        std::net::TcpListener::bind(addr).map_err(|e| {
            error!("Unable to bind {}: {}", addr, e);
            WebError::BindFailed(format!("{}: {}", addr, e))
        })?;

        let routes = self.routes();
        let cors_enabled = self.cors_enabled;
        let server = async move {
            if cors_enabled {
                warp::serve(routes.with(cors())).run(addr).await
            } else {
                warp::serve(routes).run(addr).await
            }
        };

        info!("Web server listening on http://{}", addr);
        tokio::select! {
            _ = server => {
                info!("Web server stopped");
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received, stopping web server");
            }
        }
        Ok(())
    }
}

/// Any origin may call the API, with credentials and the usual browser headers.
pub fn cors() -> warp::filters::cors::Builder {
    warp::cors()
        .allow_any_origin()
        .allow_credentials(true)
        .allow_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allow_headers(vec![
            "accept",
            "authorization",
            "content-type",
            "origin",
            "x-requested-with",
        ])
}

fn no_cache_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        CACHE_CONTROL,
        HeaderValue::from_static("no-store, no-cache, must-revalidate, max-age=0"),
    );
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(EXPIRES, HeaderValue::from_static("0"));
    headers
}

/// Turns filter rejections into the `{"detail": ...}` error shape.
async fn handle_rejection(err: Rejection) -> Result<Response, Infallible> {
    let response = if err.is_not_found() {
        error_reply(StatusCode::NOT_FOUND, "Not Found")
    } else if let Some(e) = err.find::<BodyDeserializeError>() {
        error_reply(StatusCode::UNPROCESSABLE_ENTITY, format!("Invalid request body: {}", e))
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        error_reply(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
    } else if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        error_reply(StatusCode::UNSUPPORTED_MEDIA_TYPE, "Unsupported Media Type")
    } else {
        error!("Unhandled rejection: {:?}", err);
        error_reply(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
    };
    Ok(response)
}
