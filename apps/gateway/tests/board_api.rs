mod common;

use actix_web::{test, App};
use serde_json::Value;

#[actix_web::test]
async fn board_catalog_is_served_without_engine() {
    // No engine at all; the catalog is pure.
    let state = common::gateway_state(&common::unreachable_engine_url());
    let app = test::init_service(
        App::new()
            .app_data(state)
            .configure(gateway::routes::configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/board").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);

    let body: Value = test::read_body_json(resp).await;
    let board = body["board"].as_array().unwrap();
    assert_eq!(board.len(), 40);
    assert_eq!(body["gambleIndices"], serde_json::json!([9, 19, 29, 39]));
    assert_eq!(body["colors"].as_array().unwrap().len(), 9);

    // Tiles carry their own index and the four gamble slots are typed.
    for (i, tile) in board.iter().enumerate() {
        assert_eq!(tile["index"], i);
        let expected = if [9, 19, 29, 39].contains(&i) {
            "gamble"
        } else {
            "property"
        };
        assert_eq!(tile["type"], expected);
    }

    // First Brown property and its in-district pricing.
    assert_eq!(board[0]["color"], "Brown");
    assert_eq!(board[0]["price"], 60);
    assert_eq!(board[1]["price"], 70);
    assert_eq!(board[1]["fare"], 35);
}
