use salvo::cors::*;
use salvo::prelude::*;

use crate::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .hoop(affix_state::inject(state))
        .hoop(
            Cors::new()
                .allow_origin(AllowOrigin::any())
                .allow_methods(AllowMethods::any())
                .allow_headers(AllowHeaders::any())
                .into_handler(),
        )
        .get(handlers::health::root)
        .push(Router::with_path("health").get(handlers::health::health))
        .push(Router::with_path("generate").post(handlers::generate::generate))
        .push(Router::with_path("run").post(handlers::serverless::run))
}

#[cfg(test)]
mod tests {
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD as BASE64;
    use salvo::prelude::*;
    use salvo::test::{ResponseExt, TestClient};
    use tokio::sync::{mpsc, watch};

    use crate::config::Config;
    use crate::inference;
    use crate::state::AppState;

    use super::build_router;

    /// Wire up the full app against the mock provider. The inference
    /// thread is spawned separately so tests can observe the window
    /// before the provider finishes loading.
    fn make_app() -> (Service, AppState, impl FnOnce()) {
        let config = Config::mock();
        let (inference_tx, inference_rx) = mpsc::channel(32);
        let (loaded_tx, loaded_rx) = watch::channel(false);

        let state = AppState {
            inference_tx,
            model_loaded: loaded_rx,
            synthesis_timeout: config.synthesis_timeout,
        };
        let service = Service::new(build_router(state.clone()));

        let spawn = move || {
            std::thread::spawn(move || {
                inference::inference_thread(config, inference_rx, loaded_tx);
            });
        };
        (service, state, spawn)
    }

    async fn post_json(service: &Service, path: &str, body: serde_json::Value) -> salvo::http::Response {
        TestClient::post(format!("http://127.0.0.1{path}"))
            .json(&body)
            .send(service)
            .await
    }

    #[tokio::test]
    async fn health_tracks_model_loading() {
        let (service, state, spawn) = make_app();

        // Before the inference thread has loaded anything
        let mut res = TestClient::get("http://127.0.0.1/health").send(&service).await;
        let body = res.take_json::<serde_json::Value>().await.unwrap();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["model_loaded"], false);

        spawn();
        let mut loaded = state.model_loaded.clone();
        loaded.wait_for(|loaded| *loaded).await.unwrap();

        let mut res = TestClient::get("http://127.0.0.1/health").send(&service).await;
        let body = res.take_json::<serde_json::Value>().await.unwrap();
        assert_eq!(body["model_loaded"], true);
    }

    #[tokio::test]
    async fn generate_returns_wav_within_requested_bound() {
        let (service, _state, spawn) = make_app();
        spawn();

        let mut res = post_json(
            &service,
            "/generate",
            serde_json::json!({"text": "Hello world", "speaker": 0, "max_audio_length_ms": 5000}),
        )
        .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        let body = res.take_json::<serde_json::Value>().await.unwrap();
        assert_eq!(body["sample_rate"], 24_000);
        let duration_ms = body["duration_ms"].as_u64().unwrap();
        assert!(duration_ms <= 5000);

        let wav = BASE64.decode(body["audio_base64"].as_str().unwrap()).unwrap();
        let reader = hound::WavReader::new(std::io::Cursor::new(wav)).unwrap();
        assert_eq!(reader.spec().sample_rate, 24_000);
    }

    #[tokio::test]
    async fn requests_queued_during_cold_start_are_served() {
        let (service, _state, spawn) = make_app();
        spawn();

        // Fire immediately without waiting for the loaded flag; the
        // bounded channel holds the request until init completes.
        let mut res = post_json(
            &service,
            "/generate",
            serde_json::json!({"text": "cold start", "max_audio_length_ms": 200}),
        )
        .await;
        assert_eq!(res.status_code, Some(StatusCode::OK));
        let body = res.take_json::<serde_json::Value>().await.unwrap();
        assert!(body["duration_ms"].as_u64().unwrap() <= 200);
    }

    #[tokio::test]
    async fn empty_text_is_rejected() {
        let (service, _state, spawn) = make_app();
        spawn();

        let mut res = post_json(
            &service,
            "/generate",
            serde_json::json!({"text": "   ", "speaker": 0}),
        )
        .await;
        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        let body = res.take_json::<serde_json::Value>().await.unwrap();
        assert_eq!(body["error"]["type"], "invalid_request_error");
    }

    #[tokio::test]
    async fn unsupported_speaker_is_rejected() {
        let (service, _state, spawn) = make_app();
        spawn();

        let mut res = post_json(
            &service,
            "/generate",
            serde_json::json!({"text": "hi", "speaker": 99}),
        )
        .await;
        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        let body = res.take_json::<serde_json::Value>().await.unwrap();
        assert!(body["error"]["message"].as_str().unwrap().contains("99"));
    }

    #[tokio::test]
    async fn malformed_body_is_rejected() {
        let (service, _state, spawn) = make_app();
        spawn();

        let mut res = TestClient::post("http://127.0.0.1/generate")
            .raw_json("{not json")
            .send(&service)
            .await;
        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        let body = res.take_json::<serde_json::Value>().await.unwrap();
        assert_eq!(body["error"]["type"], "invalid_request_error");
    }

    #[tokio::test]
    async fn serverless_envelope_round_trip() {
        let (service, _state, spawn) = make_app();
        spawn();

        let mut res = post_json(
            &service,
            "/run",
            serde_json::json!({"input": {"text": "Hello from serverless", "max_audio_length_ms": 1000}}),
        )
        .await;
        assert_eq!(res.status_code, Some(StatusCode::OK));
        let body = res.take_json::<serde_json::Value>().await.unwrap();
        assert_eq!(body["statusCode"], 200);
        assert_eq!(body["sample_rate"], 24_000);
        assert!(body["duration_ms"].as_u64().unwrap() <= 1000);
    }

    #[tokio::test]
    async fn serverless_errors_stay_in_the_body() {
        let (service, _state, spawn) = make_app();
        spawn();

        let mut res = post_json(
            &service,
            "/run",
            serde_json::json!({"input": {"text": ""}}),
        )
        .await;
        // Platform convention: HTTP 200, statusCode in the body
        assert_eq!(res.status_code, Some(StatusCode::OK));
        let body = res.take_json::<serde_json::Value>().await.unwrap();
        assert_eq!(body["statusCode"], 400);
        assert!(body["error"].as_str().unwrap().contains("text"));
    }

    #[tokio::test]
    async fn root_lists_endpoints() {
        let (service, _state, _spawn) = make_app();

        let mut res = TestClient::get("http://127.0.0.1/").send(&service).await;
        let body = res.take_json::<serde_json::Value>().await.unwrap();
        assert_eq!(body["endpoints"]["generate"], "/generate");
        assert_eq!(body["endpoints"]["health"], "/health");
    }
}
