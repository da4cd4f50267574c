#![allow(dead_code)]

use visit_portal::config::{AuthServiceConfig, ServerConfig};
use visit_portal::handlers::{AuthServiceState, router};

pub fn test_server_config() -> ServerConfig {
    ServerConfig {
        bind_addr: "127.0.0.1:0".to_string(),
        jwt_secret: "integration-secret".to_string(),
        token_expiration_secs: 3600,
        max_failed_attempts: 3,
        block_duration_secs: 300,
        bcrypt_cost: 4,
    }
}

/// Start the auth service on an ephemeral port and return its base URL
pub async fn spawn_auth_service(config: ServerConfig) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(AuthServiceState::in_memory(&config));

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}/auth", addr)
}

pub fn client_config(base_url: &str) -> AuthServiceConfig {
    AuthServiceConfig {
        base_url: base_url.to_string(),
        request_timeout_secs: 5,
    }
}

/// Base URL of a port nothing listens on
pub async fn dead_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/auth", addr)
}
