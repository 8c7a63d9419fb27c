use axum::Router;
use axum::extract::{ConnectInfo, State};
use axum::http::{Method, StatusCode, Uri};
use axum::response::Html;
use axum::routing::get;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

/// Serve the rendered chart page at `/`. Every request, matched or not,
/// is logged with remote address, method, and path.
pub async fn serve(listener: TcpListener, page_path: String) -> std::io::Result<()> {
    let router = Router::new()
        .route("/", get(serve_page))
        .fallback(not_found)
        .with_state(Arc::new(page_path));

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
}

async fn serve_page(
    State(page_path): State<Arc<String>>,
    ConnectInfo(remote): ConnectInfo<SocketAddr>,
    method: Method,
    uri: Uri,
) -> Result<Html<String>, StatusCode> {
    info!(%remote, %method, path = %uri.path(), "request");

    match tokio::fs::read_to_string(page_path.as_str()).await {
        Ok(body) => Ok(Html(body)),
        Err(e) => {
            error!("Failed to read chart page: {e}");
            Err(StatusCode::NOT_FOUND)
        }
    }
}

async fn not_found(
    ConnectInfo(remote): ConnectInfo<SocketAddr>,
    method: Method,
    uri: Uri,
) -> StatusCode {
    info!(%remote, %method, path = %uri.path(), "request for unknown path");
    StatusCode::NOT_FOUND
}
