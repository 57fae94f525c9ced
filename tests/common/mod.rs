//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::time::Duration;

use admin_routes::config::AppConfig;
use admin_routes::lifecycle::{startup, Shutdown};
use admin_routes::routing::RouteTable;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

pub const API_KEY: &str = "test-admin-key";

/// A running server and the handles that drive it.
#[allow(dead_code)]
pub struct TestServer {
    pub addr: SocketAddr,
    pub updates: mpsc::UnboundedSender<RouteTable>,
    pub shutdown: Shutdown,
}

#[allow(dead_code)]
impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.admin.api_key = API_KEY.to_string();
    config
}

/// Start the server with the built-in routes on an ephemeral port.
pub async fn start_server() -> TestServer {
    start_server_with(test_config()).await
}

pub async fn start_server_with(config: AppConfig) -> TestServer {
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = startup::assemble(config).unwrap();
    let (updates, rx) = mpsc::unbounded_channel();
    let shutdown = Shutdown::new();
    let shutdown_rx = shutdown.subscribe();

    tokio::spawn(async move {
        server.run(listener, rx, shutdown_rx).await.unwrap();
    });

    // Give the server a moment to start accepting
    tokio::time::sleep(Duration::from_millis(50)).await;

    TestServer {
        addr,
        updates,
        shutdown,
    }
}

/// An authorized client request builder.
#[allow(dead_code)]
pub fn admin(client: &reqwest::Client, method: reqwest::Method, url: String) -> reqwest::RequestBuilder {
    client.request(method, url).bearer_auth(API_KEY)
}
