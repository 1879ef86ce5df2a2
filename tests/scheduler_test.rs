mod common;

use std::{
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use labelscout::{CatalogError, spotify::scheduler::ApiRequest};
use serde_json::json;
use wiremock::{
    Mock, MockServer, Request, Respond, ResponseTemplate,
    matchers::{method, path, path_regex},
};

use common::{build_client_with, mount_token, test_config};

/// Records when and in which order item requests reach the provider.
#[derive(Clone, Default)]
struct Recorder {
    seen: Arc<Mutex<Vec<(Instant, String)>>>,
}

impl Respond for Recorder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let id = request
            .url
            .path_segments()
            .and_then(|mut s| s.next_back())
            .unwrap_or_default()
            .to_string();
        self.seen.lock().unwrap().push((Instant::now(), id.clone()));
        ResponseTemplate::new(200).set_body_json(json!({ "id": id }))
    }
}

#[tokio::test]
async fn test_requests_are_issued_in_fifo_order_with_min_spacing() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    let recorder = Recorder::default();
    Mock::given(method("GET"))
        .and(path_regex(r"^/v1/items/.+$"))
        .respond_with(recorder.clone())
        .mount(&server)
        .await;

    let mut config = test_config(&server);
    config.min_request_interval = Duration::from_millis(60);
    let (client, _) = build_client_with(config);

    let ids = ["a", "b", "c", "d", "e"];
    let receivers: Vec<_> = ids
        .iter()
        .map(|id| {
            client
                .scheduler()
                .submit(ApiRequest::new(client.endpoint(&format!("/items/{id}"))))
        })
        .collect();

    for (receiver, id) in receivers.into_iter().zip(ids) {
        let value = receiver.await.unwrap().unwrap();
        assert_eq!(value["id"], id);
    }

    let seen = recorder.seen.lock().unwrap().clone();
    let order: Vec<&str> = seen.iter().map(|(_, id)| id.as_str()).collect();
    assert_eq!(order, ids);

    for pair in seen.windows(2) {
        let gap = pair[1].0.duration_since(pair[0].0);
        // small allowance for the mock server's own receive jitter
        assert!(gap >= Duration::from_millis(50), "gap too small: {gap:?}");
    }
}

#[tokio::test]
async fn test_throttle_is_surfaced_and_recorded() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/v1/albums/throttled"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "5"))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = build_client_with(test_config(&server));
    let err = client
        .scheduler()
        .enqueue(ApiRequest::new(client.endpoint("/albums/throttled")))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CatalogError::ThrottledByProvider {
            retry_after_seconds: Some(5)
        }
    ));

    let record = client.telemetry().snapshot().await;
    assert_eq!(record.throttle_retry_after_seconds, Some(5));
    assert!(record.last_throttle_at.is_some());
    assert_eq!(record.calls_today, 0);

    let pressure = client.pressure().await;
    assert!(pressure.is_currently_throttled);
}

#[tokio::test]
async fn test_failed_request_does_not_stop_the_queue() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/v1/albums/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/albums/fine"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .mount(&server)
        .await;

    let (client, _) = build_client_with(test_config(&server));
    let broken = client
        .scheduler()
        .submit(ApiRequest::new(client.endpoint("/albums/broken")));
    let fine = client
        .scheduler()
        .submit(ApiRequest::new(client.endpoint("/albums/fine")));

    let broken = broken.await.unwrap();
    assert!(matches!(
        broken,
        Err(CatalogError::ProviderRequestFailed { status: 500 })
    ));
    assert_eq!(fine.await.unwrap().unwrap()["ok"], true);

    let record = client.telemetry().snapshot().await;
    assert_eq!(record.calls_today, 1);
    assert_eq!(record.recent_call_timestamps.len(), 1);
}

#[tokio::test]
async fn test_bearer_token_is_attached() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/v1/albums/authed"))
        .and(wiremock::matchers::header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = build_client_with(test_config(&server));
    let value = client
        .scheduler()
        .enqueue(ApiRequest::new(client.endpoint("/albums/authed")))
        .await
        .unwrap();
    assert_eq!(value["ok"], true);
}

#[tokio::test]
async fn test_hung_request_times_out_and_queue_advances() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/v1/albums/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/albums/quick"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .mount(&server)
        .await;

    let mut config = test_config(&server);
    config.request_timeout = Duration::from_millis(300);
    let (client, _) = build_client_with(config);

    let slow = client
        .scheduler()
        .submit(ApiRequest::new(client.endpoint("/albums/slow")));
    let quick = client
        .scheduler()
        .submit(ApiRequest::new(client.endpoint("/albums/quick")));

    assert!(matches!(slow.await.unwrap(), Err(CatalogError::Timeout)));
    assert_eq!(quick.await.unwrap().unwrap()["ok"], true);
}

#[tokio::test]
async fn test_reinitialize_discards_queued_requests() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/v1/albums/first"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "n": 1 }))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/albums/second"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "n": 2 })))
        .expect(0)
        .mount(&server)
        .await;

    let (client, _) = build_client_with(test_config(&server));
    let first = client
        .scheduler()
        .submit(ApiRequest::new(client.endpoint("/albums/first")));
    let second = client
        .scheduler()
        .submit(ApiRequest::new(client.endpoint("/albums/second")));

    // let the worker pick up the first request before resetting
    tokio::time::sleep(Duration::from_millis(50)).await;
    client.reinitialize(Some(common::credential())).await;

    assert_eq!(first.await.unwrap().unwrap()["n"], 1);
    assert!(matches!(
        second.await.unwrap(),
        Err(CatalogError::Reinitialized)
    ));
}

#[tokio::test]
async fn test_unauthorized_response_forces_new_token_exchange() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(common::TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::token_body("t", 3600)))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/albums/revoked"))
        .respond_with(ResponseTemplate::new(401))
        .up_to_n_times(1)
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/albums/revoked"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = build_client_with(test_config(&server));
    let first = client
        .scheduler()
        .enqueue(ApiRequest::new(client.endpoint("/albums/revoked")))
        .await;
    assert!(matches!(
        first,
        Err(CatalogError::ProviderRequestFailed { status: 401 })
    ));

    let second = client
        .scheduler()
        .enqueue(ApiRequest::new(client.endpoint("/albums/revoked")))
        .await
        .unwrap();
    assert_eq!(second["ok"], true);
}

#[tokio::test]
async fn test_undecodable_body_is_still_counted() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/v1/albums/garbled"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = build_client_with(test_config(&server));
    let result = client
        .scheduler()
        .enqueue(ApiRequest::new(client.endpoint("/albums/garbled")))
        .await;
    assert!(matches!(result, Err(CatalogError::Transport(_))));

    let record = client.telemetry().snapshot().await;
    assert_eq!(record.calls_today, 1);
}
