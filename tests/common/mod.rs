#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, HeaderMap, Request, StatusCode},
    Router,
};
use hunter_proxy::{router, AppState, Config};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::MockServer;

pub const TEST_API_KEY: &str = "test-key";

pub struct TestApp {
    pub upstream: MockServer,
    pub state: Arc<AppState>,
    pub router: Router,
}

pub fn test_config(base_url: &str) -> Config {
    test_config_with(base_url, &[])
}

/// Test config with extra environment variables layered on top of the defaults.
pub fn test_config_with(base_url: &str, vars: &[(&str, &str)]) -> Config {
    let base_url = base_url.to_string();
    let vars: Vec<(String, String)> = vars
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();

    Config::from_lookup(move |name| {
        if let Some((_, value)) = vars.iter().find(|(var, _)| var == name) {
            return Some(value.clone());
        }
        match name {
            "API_KEY" => Some(TEST_API_KEY.to_string()),
            "HUNTER_BASE_URL" => Some(base_url.clone()),
            "REQUEST_TIMEOUT_SECS" => Some("2".to_string()),
            _ => None,
        }
    })
    .expect("test config")
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(&[]).await
}

pub async fn spawn_app_with(vars: &[(&str, &str)]) -> TestApp {
    let upstream = MockServer::start().await;
    let config = test_config_with(&upstream.uri(), vars);
    let state = Arc::new(AppState::new(config).expect("app state"));
    let router = router(state.clone());

    TestApp {
        upstream,
        state,
        router,
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body is JSON")
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.expect("request");
        let status = response.status();
        let headers = response.headers().clone();
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body")
            .to_vec();

        TestResponse {
            status,
            headers,
            content_type,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.send(Request::delete(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post_form(&self, uri: &str, body: &str) -> TestResponse {
        self.send(
            Request::post(uri)
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> TestResponse {
        self.send(
            Request::post(uri)
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn put_raw(&self, uri: &str, content_type: &str, body: &str) -> TestResponse {
        self.send(
            Request::put(uri)
                .header(CONTENT_TYPE, content_type)
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn post_raw(&self, uri: &str, content_type: Option<&str>, body: &str) -> TestResponse {
        let mut request = Request::post(uri);
        if let Some(content_type) = content_type {
            request = request.header(CONTENT_TYPE, content_type);
        }
        self.send(request.body(Body::from(body.to_string())).unwrap())
            .await
    }

    pub async fn get_with_origin(&self, uri: &str, origin: &str) -> TestResponse {
        self.send(
            Request::get(uri)
                .header("origin", origin)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn put_json(&self, uri: &str, body: Value) -> TestResponse {
        self.send(
            Request::put(uri)
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn upstream_calls(&self) -> usize {
        self.upstream
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or(0)
    }
}
