use crate::{auth::Authenticator, error::AuthError};

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{header::USER_AGENT, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::net::{TcpListener, ToSocketAddrs};
use tracing::{debug, error, info};

use std::{net::SocketAddr, sync::Arc};

pub const AUTH_PATH: &str = "/auth/:delay/:user/:tag";

pub fn router(authenticator: Arc<Authenticator>) -> Router {
    Router::new()
        .route(AUTH_PATH, get(handle_auth))
        .with_state(authenticator)
}

pub async fn serve(
    listener: TcpListener,
    authenticator: Arc<Authenticator>,
) -> std::io::Result<()> {
    let app = router(authenticator);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
}

/// Bind `address` and serve in the background. Returns the base url of the
/// server, useful when binding to port 0.
pub async fn spawn_server(
    address: impl ToSocketAddrs,
    authenticator: &Authenticator,
) -> std::io::Result<String> {
    let listener = TcpListener::bind(address).await?;
    let addr = listener.local_addr()?;
    let authenticator = Arc::new(authenticator.clone());
    tokio::spawn(async move {
        if let Err(e) = serve(listener, authenticator).await {
            error!("server on {} stopped: {}", addr, e);
        }
    });
    Ok(format!("http://{}", addr))
}

async fn handle_auth(
    State(authenticator): State<Arc<Authenticator>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    Path((delay, user, tag)): Path<(String, String, String)>,
    headers: HeaderMap,
) -> Response {
    match authenticator.check(&delay, &user, &tag).await {
        Ok(params) => {
            info!(
                delay = params.delay,
                user = %String::from_utf8_lossy(&params.user),
                client = %client_ip(&headers, peer),
                agent = %agent(&headers),
                "[Success]"
            );
            (StatusCode::OK, "Access granted!\n").into_response()
        }
        Err(e) => {
            debug!(%delay, %user, %tag, client = %client_ip(&headers, peer), "denied: {}", e);
            e.into_response()
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match self {
            AuthError::Malformed(_) => StatusCode::BAD_REQUEST,
            AuthError::TagMismatch => StatusCode::UNAUTHORIZED,
        };
        (status, format!("{}\n", self)).into_response()
    }
}

fn client_ip(headers: &HeaderMap, peer: SocketAddr) -> String {
    let forwarded_for = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());
    if let Some(ip) = forwarded_for {
        return ip.to_string();
    }
    let real_ip = headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty());
    match real_ip {
        Some(ip) => ip.to_string(),
        None => peer.ip().to_string(),
    }
}

fn agent(headers: &HeaderMap) -> String {
    let agents: Vec<_> = headers
        .get_all(USER_AGENT)
        .iter()
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .collect();
    if agents.is_empty() {
        return "unknown".to_string();
    }
    agents.join(" ")
}
