/**
 * Frontend Routes
 * Serves the prebuilt client bundle in production, with index.html as the
 * fallback for client-side routes
 */
use axum::{
    extract::{Request, State},
    http::{Method, StatusCode},
    response::{Html, IntoResponse, Response},
    Router,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower::ServiceExt;
use tower_http::services::ServeDir;

use crate::error::AppError;
use crate::routes::API_PREFIX;

#[derive(Clone)]
pub struct Frontend {
    assets: ServeDir,
    index: Arc<PathBuf>,
}

impl Frontend {
    pub fn new(dist: impl AsRef<Path>) -> Self {
        let dist = dist.as_ref();
        Self {
            assets: ServeDir::new(dist),
            index: Arc::new(dist.join("index.html")),
        }
    }

    async fn index(&self) -> Result<Html<String>, AppError> {
        tokio::fs::read_to_string(&*self.index)
            .await
            .map(Html)
            .map_err(|e| {
                let path = self.index.display();
                AppError::Internal(format!("cannot read {path}: {e}"))
            })
    }
}

/// `/api` itself and anything under `/api/`.
pub fn is_api_path(path: &str) -> bool {
    path.strip_prefix(API_PREFIX)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// Router whose fallback serves `dist`. Merge it after the API routes.
pub fn router(dist: impl AsRef<Path>) -> Router {
    Router::new()
        .fallback(serve_frontend)
        .with_state(Frontend::new(dist))
}

/// Only GET and HEAD reach the bundle; every other method is a 404.
async fn serve_frontend(State(frontend): State<Frontend>, request: Request) -> Response {
    let readable = matches!(*request.method(), Method::GET | Method::HEAD);
    if !readable || is_api_path(request.uri().path()) {
        return AppError::NotFound.into_response();
    }

    let response = match frontend.assets.clone().oneshot(request).await {
        Ok(response) => response,
        Err(never) => match never {},
    };

    if response.status() != StatusCode::NOT_FOUND {
        return response.into_response();
    }

    frontend.index().await.into_response()
}
