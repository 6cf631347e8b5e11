//! HTTP routes: control endpoints plus the catch-all fetch interceptor.

use axum::Json;
use axum::body::{Body, to_bytes};
use axum::extract::{Request as HttpRequest, State};
use axum::http::StatusCode;
use axum::http::uri::Uri;
use axum::response::{IntoResponse, Response as HttpResponse};
use axum::routing::{get, post};
use bytes::Bytes;
use serde::Deserialize;
use tracing::{error, warn};
use url::Url;

use crate::network::{Request, Response};
use crate::worker::messages::WorkerMessage;
use crate::worker::push::NotificationClick;
use crate::worker::{Event, EventDispatcher, EventOutcome, FetchOutcome, WorkerState, WorkerStatus};

/// Largest request body the host buffers.
const MAX_BODY: usize = 16 * 1024 * 1024;

#[derive(Debug, Deserialize)]
struct SyncRequest {
    tag: String,
}

#[derive(Debug, Deserialize)]
struct RegisterClient {
    url: String,
}

/// Control-route failure.
struct HostError(StatusCode, String);

impl IntoResponse for HostError {
    fn into_response(self) -> HttpResponse {
        (self.0, self.1).into_response()
    }
}

impl From<anyhow::Error> for HostError {
    fn from(e: anyhow::Error) -> Self {
        error!("Worker event failed: {:#}", e);
        Self(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    }
}

fn unexpected(outcome: EventOutcome) -> HostError {
    HostError(
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("unexpected outcome {:?}", outcome),
    )
}

/// Build the axum router around a dispatcher.
pub fn router(dispatcher: EventDispatcher) -> axum::Router {
    axum::Router::new()
        .route("/__worker/status", get(status))
        .route("/__worker/message", post(message))
        .route("/__worker/push", post(push))
        .route("/__worker/sync", post(sync))
        .route("/__worker/notificationclick", post(notification_click))
        .route("/__worker/clients", post(register_client))
        .fallback(intercept)
        .with_state(dispatcher)
}

async fn status(State(dispatcher): State<EventDispatcher>) -> Json<WorkerStatus> {
    Json(dispatcher.worker().status())
}

async fn message(
    State(dispatcher): State<EventDispatcher>,
    Json(message): Json<WorkerMessage>,
) -> Result<impl IntoResponse, HostError> {
    match dispatcher.dispatch(Event::Message(message)).await? {
        EventOutcome::Message(reply) => Ok(Json(reply)),
        other => Err(unexpected(other)),
    }
}

async fn push(
    State(dispatcher): State<EventDispatcher>,
    body: Bytes,
) -> Result<impl IntoResponse, HostError> {
    match dispatcher.dispatch(Event::Push(body)).await? {
        EventOutcome::Push(notification) => Ok(Json(notification)),
        other => Err(unexpected(other)),
    }
}

async fn sync(
    State(dispatcher): State<EventDispatcher>,
    Json(request): Json<SyncRequest>,
) -> Result<impl IntoResponse, HostError> {
    match dispatcher.dispatch(Event::Sync(request.tag)).await? {
        EventOutcome::Sync { tag, handled } => {
            Ok(Json(serde_json::json!({ "tag": tag, "handled": handled })))
        }
        other => Err(unexpected(other)),
    }
}

async fn notification_click(
    State(dispatcher): State<EventDispatcher>,
    Json(click): Json<NotificationClick>,
) -> Result<impl IntoResponse, HostError> {
    match dispatcher.dispatch(Event::NotificationClick(click)).await? {
        EventOutcome::NotificationClick(outcome) => Ok(Json(outcome)),
        other => Err(unexpected(other)),
    }
}

async fn register_client(
    State(dispatcher): State<EventDispatcher>,
    Json(request): Json<RegisterClient>,
) -> Result<impl IntoResponse, HostError> {
    let worker = dispatcher.worker();
    let url = worker
        .origin()
        .join(&request.url)
        .map_err(|e| HostError(StatusCode::BAD_REQUEST, e.to_string()))?;

    let controlled = worker.state() == WorkerState::Activated;
    let id = worker.clients().register(url, controlled);
    Ok((StatusCode::CREATED, Json(worker.clients().get(id))))
}

/// Resolve the request target: absolute-form targets keep their own
/// origin, everything else is relative to the worker's origin.
fn request_url(origin: &Url, uri: &Uri) -> Option<Url> {
    if uri.scheme().is_some() && uri.authority().is_some() {
        return Url::parse(&uri.to_string()).ok();
    }
    let path = uri.path_and_query().map(|p| p.as_str()).unwrap_or("/");
    origin.join(path).ok()
}

/// Every non-control request is a fetch event.
async fn intercept(
    State(dispatcher): State<EventDispatcher>,
    request: HttpRequest,
) -> HttpResponse {
    let (parts, body) = request.into_parts();

    let Some(url) = request_url(dispatcher.worker().origin(), &parts.uri) else {
        return (StatusCode::BAD_REQUEST, "unresolvable request target").into_response();
    };

    let body = match to_bytes(body, MAX_BODY).await {
        Ok(bytes) => bytes,
        Err(e) => return (StatusCode::PAYLOAD_TOO_LARGE, e.to_string()).into_response(),
    };

    let mode = Request::infer_mode(&parts.method, &parts.headers);
    let mut request = Request::new(parts.method, url).with_mode(mode);
    request.headers = parts.headers;
    if !body.is_empty() {
        request = request.with_body(body);
    }

    let outcome = match dispatcher.dispatch(Event::Fetch(request.clone())).await {
        Ok(EventOutcome::Fetch(outcome)) => outcome,
        Ok(other) => return unexpected(other).into_response(),
        Err(e) => {
            warn!("Fetch for {} failed: {:#}", request.url, e);
            return (StatusCode::BAD_GATEWAY, e.to_string()).into_response();
        }
    };

    match outcome {
        FetchOutcome::Respond(response) => into_http(response),
        FetchOutcome::Passthrough => match dispatcher.worker().fetch_uncached(&request).await {
            Ok(response) => into_http(response),
            Err(e) => {
                warn!("Passthrough for {} failed: {}", request.url, e);
                (StatusCode::BAD_GATEWAY, e.to_string()).into_response()
            }
        },
    }
}

fn into_http(response: Response) -> HttpResponse {
    let mut http = HttpResponse::new(Body::from(response.body));
    *http.status_mut() = response.status;
    *http.headers_mut() = response.headers;
    http
}

#[cfg(test)]
mod tests {
    use axum::http::Method;
    use tower::ServiceExt;

    use super::*;
    use crate::cache::CacheStore;
    use crate::worker::build_dispatcher;
    use crate::worker::test_support::{Fixture, active_fixture};

    fn app(f: &Fixture) -> axum::Router {
        router(build_dispatcher(f.worker.clone()))
    }

    fn http_request(method: Method, uri: &str, body: &'static str) -> HttpRequest {
        axum::http::Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_of(response: HttpResponse) -> Bytes {
        to_bytes(response.into_body(), usize::MAX).await.unwrap()
    }

    #[tokio::test]
    async fn test_strategy_failure_is_bad_gateway() {
        let f = active_fixture().await;
        f.network.set_offline(true);

        let response = app(&f)
            .oneshot(http_request(Method::GET, "/api/trips", ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_cached_response_is_served() {
        let f = active_fixture().await;
        f.network.set_offline(true);

        let response = app(&f)
            .oneshot(http_request(Method::GET, "/offline.html", ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_of(response).await, Bytes::from_static(b"<html>offline</html>"));
    }

    #[tokio::test]
    async fn test_post_goes_to_network_uncached() {
        let f = active_fixture().await;
        f.network.ok("https://wayfarer.app/api/bookings", r#"{"id":1}"#);
        let calls_before = f.network.calls();

        let response = app(&f)
            .oneshot(http_request(Method::POST, "/api/bookings", r#"{"hotel":7}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_of(response).await, Bytes::from_static(br#"{"id":1}"#));

        assert_eq!(f.network.calls(), calls_before + 1);
        let sent = f.network.requests().pop().unwrap();
        assert_eq!(sent.method, Method::POST);
        assert_eq!(sent.body, Some(Bytes::from_static(br#"{"hotel":7}"#)));
        assert!(f.store.keys("wayfarer-api-v2").is_empty());
    }

    #[tokio::test]
    async fn test_clear_cache_message() {
        let f = active_fixture().await;

        let response = app(&f)
            .oneshot(http_request(
                Method::POST,
                "/__worker/message",
                r#"{"type": "CLEAR_CACHE"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let reply: serde_json::Value = serde_json::from_slice(&body_of(response).await).unwrap();
        assert_eq!(reply["result"], "cache_cleared");
        assert!(
            reply["removed"]
                .as_array()
                .unwrap()
                .iter()
                .any(|name| name == "wayfarer-static-v2")
        );
        assert!(f.store.partitions().is_empty());
    }

    #[tokio::test]
    async fn test_status_reports_state() {
        let f = active_fixture().await;

        let response = app(&f)
            .oneshot(http_request(Method::GET, "/__worker/status", ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let status: serde_json::Value = serde_json::from_slice(&body_of(response).await).unwrap();
        assert_eq!(status["state"], "activated");
        assert!(
            status["partitions"]
                .as_array()
                .unwrap()
                .iter()
                .any(|p| p["name"] == "wayfarer-static-v2" && p["entries"] == 4)
        );
    }

    #[test]
    fn test_relative_target_uses_origin() {
        let origin = Url::parse("https://wayfarer.app").unwrap();
        let uri: Uri = "/trips?page=2".parse().unwrap();
        assert_eq!(
            request_url(&origin, &uri).unwrap().as_str(),
            "https://wayfarer.app/trips?page=2"
        );
    }

    #[test]
    fn test_absolute_target_keeps_origin() {
        let origin = Url::parse("https://wayfarer.app").unwrap();
        let uri: Uri = "https://abcd.supabase.co/rest/v1/hotels".parse().unwrap();
        assert_eq!(
            request_url(&origin, &uri).unwrap().as_str(),
            "https://abcd.supabase.co/rest/v1/hotels"
        );
    }

    #[test]
    fn test_into_http_copies_everything() {
        let response = Response::ok(Bytes::from_static(b"hi")).with_header(
            axum::http::header::CONTENT_TYPE,
            axum::http::HeaderValue::from_static("text/plain"),
        );
        let http = into_http(response);
        assert_eq!(http.status(), StatusCode::OK);
        assert_eq!(http.headers()["content-type"], "text/plain");
    }
}
