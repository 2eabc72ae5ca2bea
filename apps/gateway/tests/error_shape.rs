use actix_web::{test, web, App, HttpResponse};
use gateway::{AppError, RequestTrace, StructuredLogger};

async fn engine_rejected_handler() -> Result<HttpResponse, AppError> {
    Err(AppError::engine_rejected(
        "Unknown agent type: foo".to_string(),
    ))
}

async fn not_found_handler() -> Result<HttpResponse, AppError> {
    Err(AppError::not_found(
        "GAME_NOT_FOUND",
        "Game not found".to_string(),
    ))
}

#[actix_web::test]
async fn problem_details_shape_and_trace_id() {
    let app = test::init_service(
        App::new()
            .wrap(RequestTrace)
            .route("/_test/rejected", web::get().to(engine_rejected_handler)),
    )
    .await;

    let req = test::TestRequest::get().uri("/_test/rejected").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 500);

    let headers = resp.headers().clone();
    let request_id = headers
        .get("x-request-id")
        .expect("x-request-id header")
        .to_str()
        .unwrap()
        .to_string();
    assert!(!request_id.is_empty());

    let content_type = headers.get("content-type").unwrap().to_str().unwrap();
    assert_eq!(content_type, "application/problem+json");

    let body = test::read_body(resp).await;
    let problem: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(problem["code"], "ENGINE_REJECTED");
    assert_eq!(problem["detail"], "Unknown agent type: foo");
    assert_eq!(problem["status"], 500);
    assert_eq!(problem["title"], "Engine Rejected");

    // The trace id inside the body matches the response header.
    assert_eq!(problem["trace_id"], request_id.as_str());
}

#[actix_web::test]
async fn logger_under_request_trace_preserves_responses() {
    async fn ok_handler() -> Result<HttpResponse, AppError> {
        Ok(HttpResponse::Ok().json(serde_json::json!({"ok": true})))
    }

    // Full middleware stack as wired in main: the logger runs inside
    // the trace scope and must not touch the response either way.
    let app = test::init_service(
        App::new()
            .wrap(StructuredLogger)
            .wrap(RequestTrace)
            .route("/_test/ok", web::get().to(ok_handler))
            .route("/_test/rejected", web::get().to(engine_rejected_handler)),
    )
    .await;

    let req = test::TestRequest::get().uri("/_test/ok").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    assert!(resp.headers().get("x-request-id").is_some());
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["ok"], true);

    let req = test::TestRequest::get().uri("/_test/rejected").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 500);
    let request_id = resp
        .headers()
        .get("x-request-id")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    let problem: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(problem["trace_id"], request_id.as_str());
}

#[actix_web::test]
async fn not_found_is_distinct_from_generic_failure() {
    let app = test::init_service(
        App::new()
            .wrap(RequestTrace)
            .route("/_test/missing", web::get().to(not_found_handler)),
    )
    .await;

    let req = test::TestRequest::get().uri("/_test/missing").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 404);

    let problem: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(problem["code"], "GAME_NOT_FOUND");
}
