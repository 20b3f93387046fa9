//! 라우트 단위 HTTP 메트릭 middleware.
//!
//! 라벨은 요청 URI가 아니라 라우터가 매칭한 경로 템플릿입니다.
//! 매칭되지 않은 요청(스캐너, 오타)은 모두 [`UNMATCHED_ROUTE`] 하나로 묶여
//! 라벨 카디널리티가 라우트 수를 넘지 않습니다.

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::metrics::{adjust_http_in_flight, record_http_duration, record_http_response};

/// 라우터에 매칭되지 않은 요청의 라벨.
pub const UNMATCHED_ROUTE: &str = "unmatched";

/// 메트릭 라벨로 쓸 라우트 템플릿.
pub fn route_label(request: &Request) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_string())
}

/// 처리 중 요청 gauge를 drop 시점에 되돌립니다.
///
/// 타임아웃이나 연결 종료로 future가 취소되어도 gauge가 새지 않습니다.
struct InFlight {
    route: String,
}

impl InFlight {
    fn enter(route: &str) -> Self {
        adjust_http_in_flight(route, 1.0);
        Self {
            route: route.to_string(),
        }
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        adjust_http_in_flight(&self.route, -1.0);
    }
}

/// HTTP 메트릭을 수집하는 미들웨어 레이어.
///
/// - `http_requests_in_flight{route}`
/// - `http_responses_total{method, route, status}`
/// - `http_request_duration_seconds{method, route}`
///
/// 5xx 응답은 라우트와 소요 시간과 함께 경고 로그로 남깁니다.
pub async fn metrics_layer(request: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = request.method().to_string();
    let route = route_label(&request);
    let _in_flight = InFlight::enter(&route);

    let response = next.run(request).await;

    let status = response.status();
    let elapsed = started.elapsed().as_secs_f64();
    record_http_response(&method, &route, status.as_u16());
    record_http_duration(&method, &route, elapsed);

    if status.is_server_error() {
        warn!(%method, %route, status = status.as_u16(), elapsed_secs = elapsed, "Request failed");
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{HeaderValue, Method, StatusCode},
        middleware,
        routing::{get, post},
        Router,
    };
    use tower::ServiceExt;

    async fn ok_handler() -> &'static str {
        "OK"
    }

    /// 계산된 라벨을 응답 헤더로 돌려주는 테스트용 레이어.
    async fn echo_route(request: Request, next: Next) -> Response {
        let label = route_label(&request);
        let mut response = next.run(request).await;
        response
            .headers_mut()
            .insert("x-route", HeaderValue::from_str(&label).unwrap());
        response
    }

    fn app() -> Router {
        let models = Router::new().route("/{time_steps}", get(ok_handler));
        Router::new()
            .route("/predict", post(ok_handler))
            .nest("/api/v1/models", models)
            .layer(middleware::from_fn(metrics_layer))
            .layer(middleware::from_fn(echo_route))
    }

    async fn label_for(method: Method, uri: &str) -> (StatusCode, String) {
        let response = app()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let label = response.headers()["x-route"].to_str().unwrap().to_string();
        (response.status(), label)
    }

    #[tokio::test]
    async fn test_label_is_route_template() {
        let (status, label) = label_for(Method::GET, "/api/v1/models/60").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(label, "/api/v1/models/{time_steps}");

        let (_, other) = label_for(Method::GET, "/api/v1/models/120").await;
        assert_eq!(other, label);
    }

    #[tokio::test]
    async fn test_unknown_paths_share_one_label() {
        let (status, label) = label_for(Method::GET, "/wp-admin/setup.php").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(label, UNMATCHED_ROUTE);
    }

    #[tokio::test]
    async fn test_keeps_error_status() {
        let (status, label) = label_for(Method::GET, "/predict").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(label, "/predict");
    }
}
