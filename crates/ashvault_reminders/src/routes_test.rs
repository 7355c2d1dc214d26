#[cfg(test)]
mod tests {
    use crate::handlers::ReminderState;
    use crate::job::ReminderJob;
    use crate::routes::routes;
    use ashvault_common::testing::{admin, operator};
    use ashvault_common::Caller;
    use ashvault_sms::mock::ScriptedGateway;
    use ashvault_sms::{RetryPolicy, SmsDispatcher};
    use ashvault_store::{MemoryStore, Repositories};
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use axum::{Extension, Router};
    use serde_json::Value;
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    fn state(with_job: bool) -> Arc<ReminderState> {
        let repos = Repositories::new(Arc::new(MemoryStore::new()));
        let job = with_job.then(|| {
            let dispatcher = Arc::new(SmsDispatcher::new(
                Arc::new(ScriptedGateway::new()),
                repos.sms_logs.clone(),
                RetryPolicy {
                    max_attempts: 1,
                    delay: Duration::ZERO,
                },
            ));
            Arc::new(ReminderJob::new(
                repos.clone(),
                dispatcher,
                chrono_tz::Asia::Kolkata,
                3,
            ))
        });
        Arc::new(ReminderState { repos, job })
    }

    async fn call(state: Arc<ReminderState>, caller: Caller, method: Method, uri: &str) -> (StatusCode, Value) {
        let app: Router = routes(state).layer(Extension(caller));
        let response = app
            .oneshot(Request::builder().method(method).uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn test_admin_can_run_and_list() {
        let state = state(true);

        let (status, run) = call(state.clone(), admin(), Method::POST, "/reminders/run").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(run["trigger"], "manual");
        assert_eq!(run["entriesChecked"], 0);

        let (status, run) = call(state.clone(), admin(), Method::POST, "/sms/retry-failed").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(run["trigger"], "retry");

        let (status, runs) = call(state.clone(), admin(), Method::GET, "/reminders/runs?limit=5").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(runs.as_array().unwrap().len(), 2);

        let (status, stats) = call(state, operator(&["loc1"]), Method::GET, "/reminders/status").await;
        assert_eq!(status, StatusCode::OK);
        assert!(stats["lastExpiryCheck"].is_string());
    }

    #[tokio::test]
    async fn test_operators_cannot_trigger_runs() {
        let state = state(true);
        for uri in ["/reminders/run", "/sms/retry-failed"] {
            let (status, _) = call(state.clone(), operator(&["loc1"]), Method::POST, uri).await;
            assert_eq!(status, StatusCode::FORBIDDEN);
        }
        let (status, _) = call(state, operator(&["loc1"]), Method::GET, "/reminders/runs").await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_run_without_sms_is_unavailable() {
        let (status, _) = call(state(false), admin(), Method::POST, "/reminders/run").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }
}
