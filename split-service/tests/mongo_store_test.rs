//! Runs against a live MongoDB (`TEST_MONGODB_URI`, default localhost).
//! `cargo test -- --ignored` to include.

mod common;

use common::{trip_body, TestApp};
use mongodb::bson::{doc, oid::ObjectId};
use split_service::dtos::SplitResponse;

#[tokio::test]
#[ignore = "Requires MongoDB at TEST_MONGODB_URI"]
async fn mongo_create_then_list_round_trips_through_the_collection() {
    let database = format!("split_test_{}", ObjectId::new());
    let (app, _store) = TestApp::spawn_mongo(&database).await;

    let response = app.create_split(&trip_body()).await;
    assert_eq!(response.status().as_u16(), 201);

    let splits: Vec<SplitResponse> = app.list_splits().await.json().await.unwrap();
    assert_eq!(splits.len(), 1);
    assert_eq!(splits[0].group_name, "Trip");
    assert_eq!(splits[0].people, vec!["A", "B"]);
    assert_eq!(splits[0].amounts, vec![10.0, 20.0]);
    assert_eq!(splits[0].selected_indices, vec![0]);
    assert_eq!(splits[0].transactions[0].amount, 5.0);

    let client = mongodb::Client::with_uri_str(
        std::env::var("TEST_MONGODB_URI").unwrap_or_else(|_| "mongodb://localhost:27017".into()),
    )
    .await
    .unwrap();
    let db = client.database(&database);
    let raw = db
        .collection::<mongodb::bson::Document>("splits")
        .find_one(doc! { "groupName": "Trip" }, None)
        .await
        .unwrap()
        .expect("stored document");
    assert!(raw.get_object_id("_id").is_ok());
    assert!(raw.get_datetime("createdAt").is_ok());

    db.drop(None).await.unwrap();
}

#[tokio::test]
#[ignore = "Requires MongoDB at TEST_MONGODB_URI"]
async fn mongo_list_sorts_by_created_at_descending() {
    let database = format!("split_test_{}", ObjectId::new());
    let (app, store) = TestApp::spawn_mongo(&database).await;

    for (name, created_at) in [
        ("b", "2024-02-01T00:00:00Z"),
        ("c", "2024-03-01T00:00:00Z"),
        ("a", "2024-01-01T00:00:00Z"),
    ] {
        app.create_split(&serde_json::json!({ "groupName": name, "createdAt": created_at }))
            .await;
    }

    let splits: Vec<SplitResponse> = app.list_splits().await.json().await.unwrap();
    let names: Vec<&str> = splits.iter().map(|s| s.group_name.as_str()).collect();
    assert_eq!(names, vec!["c", "b", "a"]);

    use split_service::services::SplitStore;
    store.health_check().await.unwrap();

    let client = mongodb::Client::with_uri_str(
        std::env::var("TEST_MONGODB_URI").unwrap_or_else(|_| "mongodb://localhost:27017".into()),
    )
    .await
    .unwrap();
    client.database(&database).drop(None).await.unwrap();
}
