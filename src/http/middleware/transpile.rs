//! Transpile middleware.
//! Interprets the transpiler's outcome inside the axum middleware chain.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{header, Method, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::http::error::AppError;
use crate::observability::metrics;
use crate::transpile::{Outcome, Transpiler};

pub async fn transpile_middleware(
    State(transpiler): State<Arc<Transpiler>>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    if !matches!(*request.method(), Method::GET | Method::HEAD)
        || !transpiler.is_candidate(request.uri().path())
    {
        return Ok(next.run(request).await);
    }

    let start = Instant::now();
    let path = request.uri().path().to_owned();
    let outcome = transpiler.handle(&path).await;
    metrics::record_transpile(outcome.label(), start);

    match outcome {
        Outcome::Delegate => Ok(next.run(request).await),
        Outcome::Respond(output) => {
            tracing::debug!(
                path = %path,
                bytes = output.code.len(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Served compiled TypeScript"
            );
            Ok(([(header::CONTENT_TYPE, output.content_type)], output.code).into_response())
        }
        Outcome::Fail(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::Router;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use ::metrics::{Counter, CounterFn, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit};
    use tower::ServiceExt;
    use tower_http::services::ServeDir;

    use crate::config::StaticConfig;
    use crate::transpile::{CompiledOutput, Transform, TransformError};

    #[derive(Default)]
    struct CountingTransform {
        calls: AtomicUsize,
    }

    impl Transform for CountingTransform {
        fn transform(&self, source: &str, source_name: &Path) -> Result<CompiledOutput, TransformError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if source.starts_with("!!") {
                return Err(TransformError::Syntax {
                    source_name: source_name.display().to_string(),
                    diagnostics: vec!["bad".to_string()],
                });
            }
            Ok(CompiledOutput::javascript(format!("compiled:{source}")))
        }
    }

    fn app(root: &Path, transform: Arc<CountingTransform>) -> Router {
        let config = StaticConfig {
            root: root.to_path_buf(),
            mount_path: "/".to_string(),
        };
        let transpiler = Arc::new(Transpiler::new(&config, transform).unwrap());
        Router::new()
            .fallback_service(ServeDir::new(root))
            .layer(axum::middleware::from_fn_with_state(transpiler, transpile_middleware))
    }

    async fn send(app: Router, method: Method, uri: &str) -> (StatusCode, Option<String>, String) {
        let response = app
            .oneshot(Request::builder().method(method).uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string());
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, content_type, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_compiled_response() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("app.ts"), "let a: number = 1;").unwrap();

        let (status, content_type, body) =
            send(app(dir.path(), Arc::default()), Method::GET, "/app.js").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("text/javascript; charset=utf-8"));
        assert_eq!(body, "compiled:let a: number = 1;");
    }

    #[tokio::test]
    async fn test_non_script_falls_through_to_static_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("styles.css"), "body { color: red; }").unwrap();
        let transform = Arc::new(CountingTransform::default());

        let (status, content_type, body) =
            send(app(dir.path(), transform.clone()), Method::GET, "/styles.css").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("text/css"));
        assert_eq!(body, "body { color: red; }");
        assert_eq!(transform.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_source_ends_in_404() {
        let dir = tempfile::tempdir().unwrap();

        let (status, _, _) = send(app(dir.path(), Arc::default()), Method::GET, "/import-lib.js").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_existing_js_is_served_when_no_ts_sibling() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("vendor.js"), "var v = 1;").unwrap();
        let transform = Arc::new(CountingTransform::default());

        let (status, _, body) = send(app(dir.path(), transform.clone()), Method::GET, "/vendor.js").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "var v = 1;");
        assert_eq!(transform.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_transform_failure_becomes_500() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.ts"), "!! not typescript").unwrap();

        let (status, _, body) = send(app(dir.path(), Arc::default()), Method::GET, "/broken.js").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.contains("broken.ts"));
        assert!(!body.starts_with("compiled:"));
    }

    #[derive(Default)]
    struct OutcomeRecorder {
        seen: Arc<Mutex<Vec<String>>>,
    }

    struct OutcomeCounter {
        outcome: String,
        seen: Arc<Mutex<Vec<String>>>,
    }

    impl CounterFn for OutcomeCounter {
        fn increment(&self, _value: u64) {
            self.seen.lock().unwrap().push(self.outcome.clone());
        }

        fn absolute(&self, _value: u64) {}
    }

    impl Recorder for OutcomeRecorder {
        fn describe_counter(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
        fn describe_gauge(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
        fn describe_histogram(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

        fn register_counter(&self, key: &Key, _: &Metadata<'_>) -> Counter {
            if key.name() != metrics::TRANSPILE_REQUESTS_TOTAL {
                return Counter::noop();
            }
            let outcome = key
                .labels()
                .find(|label| label.key() == "outcome")
                .map(|label| label.value().to_string())
                .unwrap_or_default();
            Counter::from_arc(Arc::new(OutcomeCounter {
                outcome,
                seen: Arc::clone(&self.seen),
            }))
        }

        fn register_gauge(&self, _: &Key, _: &Metadata<'_>) -> Gauge {
            Gauge::noop()
        }

        fn register_histogram(&self, _: &Key, _: &Metadata<'_>) -> Histogram {
            Histogram::noop()
        }
    }

    #[tokio::test]
    async fn test_only_script_requests_are_counted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("styles.css"), "body {}").unwrap();
        std::fs::write(dir.path().join("app.ts"), "let a = 1;").unwrap();
        let recorder = OutcomeRecorder::default();
        let _guard = ::metrics::set_default_local_recorder(&recorder);

        for uri in ["/styles.css", "/", "/app.js", "/missing.js"] {
            send(app(dir.path(), Arc::default()), Method::GET, uri).await;
        }

        assert_eq!(*recorder.seen.lock().unwrap(), vec!["compiled", "delegated"]);
    }

    #[tokio::test]
    async fn test_other_methods_are_not_transpiled() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("app.ts"), "let a = 1;").unwrap();
        let transform = Arc::new(CountingTransform::default());

        let (status, _, _) = send(app(dir.path(), transform.clone()), Method::POST, "/app.js").await;
        assert_ne!(status, StatusCode::OK);
        assert_eq!(transform.calls.load(Ordering::SeqCst), 0);
    }
}
