use pixly_core::{ImageStore, MemoryImageStore, NewImage};
use pixly_restlette::build_restlette_router;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::sync::Arc;

struct TestServer {
    base: String,
    ids: Vec<i32>,
}

async fn start_server() -> TestServer {
    let store = Arc::new(MemoryImageStore::new());
    let mut ids = Vec::new();
    for (name, camera, location) in [
        ("img1", "Sony", "San Francisco"),
        ("img2", "Nikon", "Los Angeles"),
        ("img3", "Canon", "New York"),
    ] {
        let url = format!("http://route{}.test", &name[3..]);
        let image = store
            .add(NewImage::new(name, camera, location, url))
            .await
            .unwrap();
        ids.push(image.id);
    }

    let app = build_restlette_router("/images", store);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestServer {
        base: format!("http://{addr}/images"),
        ids,
    }
}

fn img(id: i32, n: u8, camera: &str, location: &str) -> Value {
    json!({
        "id": id,
        "name": format!("img{n}"),
        "camera": camera,
        "style": "normal",
        "imageLocation": location,
        "imageUrl": format!("http://route{n}.test"),
    })
}

// ---- POST /images ----

#[tokio::test]
async fn post_creates_image_with_default_style() {
    let server = start_server().await;
    let resp = reqwest::Client::new()
        .post(&server.base)
        .json(&json!({
            "name": "New Image",
            "camera": "Canon",
            "imageLocation": "Las Vegas",
            "imageUrl": "http://newModel.test"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = resp.json().await.unwrap();
    let image = &body["image"];
    assert!(image["id"].is_i64());
    assert_eq!(image["name"], "New Image");
    assert_eq!(image["style"], "normal");
    assert_eq!(image["imageLocation"], "Las Vegas");
    assert_eq!(image["imageUrl"], "http://newModel.test");
}

#[tokio::test]
async fn post_rejects_missing_data() {
    let server = start_server().await;
    let resp = reqwest::Client::new()
        .post(&server.base)
        .json(&json!({"name": "new", "camera": 10}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["status"], 400);
    assert!(body["error"]["message"].as_array().unwrap().len() >= 3);
}

#[tokio::test]
async fn post_rejects_invalid_url() {
    let server = start_server().await;
    let resp = reqwest::Client::new()
        .post(&server.base)
        .json(&json!({
            "name": "New Image",
            "camera": "Canon",
            "imageLocation": "Las Vegas",
            "imageUrl": "not-a-url"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn post_rejects_duplicate_name() {
    let server = start_server().await;
    let resp = reqwest::Client::new()
        .post(&server.base)
        .json(&json!({
            "name": "img1",
            "camera": "Canon",
            "imageLocation": "Las Vegas",
            "imageUrl": "http://dupe.test"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body,
        json!({"error": {"message": "Duplicate image: img1", "status": 400}})
    );
}

#[tokio::test]
async fn post_rejects_malformed_json() {
    let server = start_server().await;
    let resp = reqwest::Client::new()
        .post(&server.base)
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ---- GET /images ----

#[tokio::test]
async fn get_lists_all_images_by_name() {
    let server = start_server().await;
    let body: Value = reqwest::get(&server.base)
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let ids = &server.ids;
    assert_eq!(
        body,
        json!({
            "images": [
                img(ids[0], 1, "Sony", "San Francisco"),
                img(ids[1], 2, "Nikon", "Los Angeles"),
                img(ids[2], 3, "Canon", "New York"),
            ]
        })
    );
}

#[tokio::test]
async fn get_filters_by_name() {
    let server = start_server().await;
    let body: Value = reqwest::get(format!("{}?name=2", server.base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        body,
        json!({"images": [img(server.ids[1], 2, "Nikon", "Los Angeles")]})
    );
}

#[tokio::test]
async fn get_filters_on_several_fields() {
    let server = start_server().await;
    let body: Value = reqwest::get(format!("{}?style=normal&name=1", server.base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        body,
        json!({"images": [img(server.ids[0], 1, "Sony", "San Francisco")]})
    );
}

#[tokio::test]
async fn get_returns_empty_list_when_nothing_matches() {
    let server = start_server().await;
    let body: Value = reqwest::get(format!("{}?camera=hasselblad", server.base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body, json!({"images": []}));
}

#[tokio::test]
async fn get_rejects_unknown_filter_key() {
    let server = start_server().await;
    let resp = reqwest::get(format!("{}?name=2&nope=nope", server.base))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ---- GET /images/:id ----

#[tokio::test]
async fn get_one_returns_image() {
    let server = start_server().await;
    let body: Value = reqwest::get(format!("{}/{}", server.base, server.ids[0]))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        body,
        json!({"image": img(server.ids[0], 1, "Sony", "San Francisco")})
    );
}

#[tokio::test]
async fn get_one_is_not_found_for_missing_image() {
    let server = start_server().await;
    let resp = reqwest::get(format!("{}/0", server.base)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body,
        json!({"error": {"message": "No image found", "status": 404}})
    );
}

#[tokio::test]
async fn get_one_is_not_found_for_non_numeric_id() {
    let server = start_server().await;
    let resp = reqwest::get(format!("{}/abc", server.base)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ---- PATCH /images/:id ----

#[tokio::test]
async fn patch_updates_only_given_fields() {
    let server = start_server().await;
    let resp = reqwest::Client::new()
        .patch(format!("{}/{}", server.base, server.ids[0]))
        .json(&json!({"style": "black and white"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.unwrap();
    let mut expected = img(server.ids[0], 1, "Sony", "San Francisco");
    expected["style"] = json!("black and white");
    assert_eq!(body, json!({ "image": expected }));
}

#[tokio::test]
async fn patch_is_not_found_for_missing_image() {
    let server = start_server().await;
    let resp = reqwest::Client::new()
        .patch(format!("{}/0", server.base))
        .json(&json!({"name": "new 0"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn patch_rejects_id_change() {
    let server = start_server().await;
    let resp = reqwest::Client::new()
        .patch(format!("{}/{}", server.base, server.ids[0]))
        .json(&json!({"id": 99}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn patch_rejects_invalid_data() {
    let server = start_server().await;
    let resp = reqwest::Client::new()
        .patch(format!("{}/{}", server.base, server.ids[0]))
        .json(&json!({"name": 3}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn patch_rejects_empty_body() {
    let server = start_server().await;
    let resp = reqwest::Client::new()
        .patch(format!("{}/{}", server.base, server.ids[0]))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ---- DELETE /images/:id ----

#[tokio::test]
async fn delete_removes_image() {
    let server = start_server().await;
    let client = reqwest::Client::new();
    let resp = client
        .delete(format!("{}/{}", server.base, server.ids[0]))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({"deleted": server.ids[0].to_string()}));

    let listed: Value = client
        .get(&server.base)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed["images"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn delete_is_not_found_for_missing_image() {
    let server = start_server().await;
    let resp = reqwest::Client::new()
        .delete(format!("{}/0", server.base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
