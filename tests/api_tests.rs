use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt;

mod common;

async fn post_predict(app: axum::Router, body: String) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/predict")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    (status, json)
}

#[tokio::test]
async fn test_root_endpoint() {
    let app = common::setup_test_app();

    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["message"], "Taxi Price Prediction API is running!");
    assert_eq!(json["version"], "1.0.0");
    assert_eq!(json["endpoints"]["predict"], "/predict");
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = common::setup_test_app();

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["model"], "gradient_boosting");
    assert_eq!(json["features"], 10);
}

#[tokio::test]
async fn test_predict_reference_trip() {
    let (status, json) = post_predict(
        common::setup_test_app(),
        common::reference_trip_json().to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["predicted_price"], common::REFERENCE_PRICE);
    assert_eq!(json["currency"], "SEK");
}

#[tokio::test]
async fn test_predict_ignores_key_order() {
    // Categorical fields first, numerical fields reversed
    let reordered = r#"{
        "Weather": "Clear",
        "Traffic_Conditions": "Medium",
        "Day_of_Week": "Weekday",
        "Time_of_Day": "Morning",
        "Trip_Duration_Minutes": 25.0,
        "Per_Minute_Rate": 0.3,
        "Per_Km_Rate": 1.5,
        "Base_Fare": 3.5,
        "Passenger_Count": 2.0,
        "Trip_Distance_km": 15.5
    }"#;

    let (status, json) = post_predict(common::setup_test_app(), reordered.to_string()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["predicted_price"], common::REFERENCE_PRICE);
}

#[tokio::test]
async fn test_predict_rejects_zero_distance() {
    for distance in [0.0, -0.01] {
        let mut trip = common::reference_trip_json();
        trip["Trip_Distance_km"] = json!(distance);

        let (status, json) = post_predict(common::setup_test_app(), trip.to_string()).await;
        assert_eq!(
            status,
            StatusCode::UNPROCESSABLE_ENTITY,
            "distance {} should be rejected",
            distance
        );
        assert_eq!(json["detail"][0]["loc"], json!(["body", "Trip_Distance_km"]));
        assert_eq!(json["detail"][0]["type"], "greater_than");
    }
}

#[tokio::test]
async fn test_predict_rejects_too_many_passengers() {
    let mut trip = common::reference_trip_json();
    trip["Passenger_Count"] = json!(11.0);

    let (status, json) = post_predict(common::setup_test_app(), trip.to_string()).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["detail"][0]["type"], "less_than_equal");
}

#[tokio::test]
async fn test_predict_unknown_category() {
    let mut trip = common::reference_trip_json();
    trip["Time_of_Day"] = json!("Midnight");

    let (status, json) = post_predict(common::setup_test_app(), trip.to_string()).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["detail"][0]["type"], "unknown_category");
    assert_eq!(json["detail"][0]["loc"], json!(["body", "Time_of_Day"]));
    assert_eq!(json["detail"][0]["input"], "Midnight");
}

#[tokio::test]
async fn test_predict_missing_field() {
    let mut trip = common::reference_trip_json();
    trip.as_object_mut().unwrap().remove("Weather");

    let (status, json) = post_predict(common::setup_test_app(), trip.to_string()).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["detail"][0]["type"], "json_invalid");
    assert!(json["detail"][0]["msg"].as_str().unwrap().contains("Weather"));
}

#[tokio::test]
async fn test_predict_malformed_json() {
    let (status, json) = post_predict(common::setup_test_app(), "{not json".to_string()).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["detail"][0]["type"], "json_invalid");
}

#[tokio::test]
async fn test_predict_pipeline_failure_body() {
    // Linear model over the same columns, driven by distance alone
    let scratch = common::ScratchArtifacts::new("linear", "taxi_price_model.json", |model| {
        let names = model["feature_names"].clone();
        let coefficients: Vec<f64> = names
            .as_array()
            .unwrap()
            .iter()
            .map(|name| if name == "Trip_Distance_km" { 10.0 } else { 0.0 })
            .collect();
        *model = json!({
            "type": "linear",
            "feature_names": names,
            "coefficients": coefficients,
            "intercept": 0.0
        });
    });
    let artifacts = taxipred::artifacts::ModelArtifacts::load(scratch.path()).unwrap();
    let app = common::app_with_artifacts(std::sync::Arc::new(artifacts));

    // Model output stays finite but the price cannot be rounded
    let mut trip = common::reference_trip_json();
    trip["Trip_Distance_km"] = json!(1.7e308);

    let (status, json) = post_predict(app, trip.to_string()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let detail = json["detail"].as_str().unwrap();
    assert!(detail.starts_with("Prediction error: "), "detail was: {}", detail);
}
