#[cfg(test)]
mod tests {
    use crate::handlers::EntriesState;
    use crate::routes::routes;
    use crate::test_support::{harness, Harness};
    use ashvault_common::testing::{admin, operator};
    use ashvault_common::Caller;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use axum::{Extension, Router};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(h: &Harness, caller: Caller) -> Router {
        let state = Arc::new(EntriesState {
            service: Arc::new(h.service.clone()),
        });
        routes(state).layer(Extension(caller))
    }

    async fn call(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn intake_body(location_id: &str, locker: u32) -> Value {
        json!({
            "customerName": "Asha",
            "customerMobile": "9876543210",
            "customerCity": "Pune",
            "deceasedPersonName": "Ravi",
            "numberOfPots": 2,
            "lockerNumber": locker,
            "locationId": location_id,
            "months": 3,
            "amount": 1500.0,
            "paymentMethod": "upi"
        })
    }

    #[tokio::test]
    async fn test_intake_then_read_back() {
        let h = harness();
        let loc = h.location("North Hall", 10).await;
        let app = app(&h, operator(&[loc.id.as_str()]));

        let (status, created) =
            call(app.clone(), Method::POST, "/entries", Some(intake_body(&loc.id, 4))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["status"], "active");
        assert_eq!(created["lockerNumber"], 4);
        let id = created["id"].as_str().unwrap().to_string();

        let (status, fetched) = call(app.clone(), Method::GET, &format!("/entries/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["customerName"], "Asha");

        let (status, listed) = call(app.clone(), Method::GET, "/entries?status=active", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed.as_array().unwrap().len(), 1);

        let (status, customer) =
            call(app, Method::GET, "/customers/lookup?mobile=%2B919876543210", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(customer["name"], "Asha");
    }

    #[tokio::test]
    async fn test_other_locations_are_forbidden() {
        let h = harness();
        let loc = h.location("North Hall", 10).await;
        let app = app(&h, operator(&["elsewhere"]));

        let (status, body) = call(app.clone(), Method::POST, "/entries", Some(intake_body(&loc.id, 1))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["code"], 403);

        let (status, _) = call(app, Method::GET, &format!("/lockers/{}", loc.id), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_bad_input_and_missing_records() {
        let h = harness();
        let loc = h.location("North Hall", 10).await;
        let app = app(&h, admin());

        let mut body = intake_body(&loc.id, 1);
        body["customerMobile"] = json!("12345");
        let (status, _) = call(app.clone(), Method::POST, "/entries", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = call(app.clone(), Method::GET, "/entries/missing", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = call(app.clone(), Method::GET, "/customers/lookup?mobile=9999999999", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = call(
            app,
            Method::POST,
            "/entries/missing/renew",
            Some(json!({ "months": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_lockers_and_dashboard() {
        let h = harness();
        let loc = h.location("North Hall", 3).await;
        let app = app(&h, admin());
        call(app.clone(), Method::POST, "/entries", Some(intake_body(&loc.id, 2))).await;

        let (status, grid) = call(app.clone(), Method::GET, &format!("/lockers/{}", loc.id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(grid["free"], 2);
        assert_eq!(grid["occupied"], 1);
        assert_eq!(grid["lockers"][1]["status"], "occupied");
        assert_eq!(grid["lockers"][1]["totalPots"], 2);

        let (status, stats) = call(
            app,
            Method::GET,
            &format!("/dashboard/stats?locationId={}", loc.id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stats["totalEntries"], 1);
        assert_eq!(stats["potsInStorage"], 2);
        assert_eq!(stats["totalCustomers"], 1);
    }

    #[tokio::test]
    async fn test_otp_confirms_a_dispatch() {
        let h = harness();
        let loc = h.location("North Hall", 3).await;
        let app = app(&h, admin());
        let (_, created) = call(app.clone(), Method::POST, "/entries", Some(intake_body(&loc.id, 1))).await;
        let entry_id = created["id"].as_str().unwrap().to_string();

        let (status, issued) = call(
            app.clone(),
            Method::POST,
            "/otp/issue",
            Some(json!({ "entryId": entry_id, "type": "delivery" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(issued["mobile"], "9876543210");
        let otp_id = issued["otpId"].as_str().unwrap().to_string();
        let code = issued["otp"].as_str().unwrap().to_string();
        let wrong = if code == "000000" { "111111" } else { "000000" };

        let (status, _) = call(
            app.clone(),
            Method::POST,
            "/otp/verify",
            Some(json!({ "otpId": otp_id, "otp": wrong })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, verified) = call(
            app.clone(),
            Method::POST,
            "/otp/verify",
            Some(json!({ "otpId": otp_id, "otp": code })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(verified["verified"], true);

        let (status, result) = call(
            app,
            Method::POST,
            &format!("/entries/{}/dispatch", entry_id),
            Some(json!({
                "handoverPersonName": "Kiran",
                "handoverPersonMobile": "9123456780",
                "otpId": otp_id
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(result["entry"]["status"], "dispatched");
        assert_eq!(result["notifications"].as_array().unwrap().len(), 2);
    }
}
