use std::sync::Arc;

use auth::PasswordHasher;
use auth::TokenProvider;
use identity_service::inbound::http::router::create_router;
use identity_service::inbound::http::router::AppState;
use identity_service::outbound::repositories::InMemoryUserDirectory;
use serde_json::json;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Argon2id with minimal cost so suites stay fast.
pub fn test_hasher() -> PasswordHasher {
    PasswordHasher::with_params(1024, 1, 1).expect("Failed to build password hasher")
}

pub fn test_token_provider() -> Arc<TokenProvider> {
    Arc::new(TokenProvider::new(JWT_SECRET, chrono::Duration::hours(24)))
}

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
    pub token_provider: Arc<TokenProvider>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let token_provider = test_token_provider();
        let state = AppState::from_directory(
            Arc::new(InMemoryUserDirectory::new()),
            test_hasher(),
            Arc::clone(&token_provider),
        );
        let router = create_router(state);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            api_client: reqwest::Client::new(),
            token_provider,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Register an account and return the parsed response body
    pub async fn register(&self, email: &str, password: &str) -> (reqwest::StatusCode, serde_json::Value) {
        let response = self
            .post("/api/auth/register")
            .json(&json!({
                "email": email,
                "password": password,
                "name": "Alice",
                "role": "user",
                "avatar": "avatars/alice.png"
            }))
            .send()
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let body = response.json().await.expect("Failed to parse response");
        (status, body)
    }

    /// Log in and return the parsed response body
    pub async fn login(&self, email: &str, password: &str) -> (reqwest::StatusCode, serde_json::Value) {
        let response = self
            .post("/api/auth/login")
            .json(&json!({
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let body = response.json().await.expect("Failed to parse response");
        (status, body)
    }
}
