use std::sync::Arc;

use algorithms_api::collab::StaticTokenVerifier;
use algorithms_api::{build_app, AppContext};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

const ALICE: &str = "token-alice";
const BOB: &str = "token-bob";
const STRANGER: &str = "token-stranger";

// Test client wrapper for making API calls
struct TestClient {
    client: Client,
    base_url: String,
}

impl TestClient {
    async fn start() -> Self {
        let identity = StaticTokenVerifier::default()
            .with_token(ALICE, "1001")
            .with_token(BOB, "1002")
            .with_token(STRANGER, "1003");
        let app = build_app(AppContext::in_memory(Arc::new(identity)));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            client: Client::new(),
            base_url: format!("http://{}", addr),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str, token: Option<&str>) -> reqwest::Response {
        let mut request = self.client.get(self.url(path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request.send().await.expect("GET failed")
    }

    async fn get_query(&self, path: &str, query: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .query(query)
            .send()
            .await
            .expect("GET failed")
    }

    async fn post(&self, path: &str, token: &str, body: Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .expect("POST failed")
    }

    async fn delete(&self, path: &str, token: &str) -> reqwest::Response {
        self.client
            .delete(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("DELETE failed")
    }

    async fn register(&self, token: &str) {
        let response = self.post("/user/", token, json!({})).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}

fn algorithm(id: &str, summary: &str) -> Value {
    json!({
        "algorithmId": id,
        "algorithmSummary": summary,
        "displayName": id.to_uppercase(),
        "linkURL": format!("http://example.org/{}", id),
        "algorithmBLOB": "cHJpbnQoMSk=",
        "algorithmDescription": "description",
        "datasetDescription": "numeric columns"
    })
}

fn dataset(id: &str) -> Value {
    json!({
        "datasetId": id,
        "datasetSummary": "benchmark data",
        "displayName": id,
        "datasetBLOB": "MSwyLDM="
    })
}

#[tokio::test]
async fn test_empty_search_returns_json_array() {
    let client = TestClient::start().await;

    let queries: Vec<Vec<(&str, &str)>> = vec![
        vec![],
        vec![("tags", "algorithm")],
        vec![("tags", "algorithm,data")],
        vec![("tags", "algorithm, data")],
        vec![("tags", "")],
    ];
    for query in queries {
        let response = client.get_query("/algorithms/", &query).await;
        assert_eq!(response.status(), StatusCode::OK, "{:?}", query);
        assert!(response.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("application/json"));
        assert_eq!(response.text().await.unwrap(), "[]");
    }
}

#[tokio::test]
async fn test_malformed_tags_are_rejected() {
    let client = TestClient::start().await;

    for tags in [" ", ",", ", ", " , ", "algorithm data"] {
        let response = client.get_query("/algorithms/", &[("tags", tags)]).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{:?}", tags);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["code"], 400);
        assert_eq!(body["fields"], "tags");
    }
}

#[tokio::test]
async fn test_mutations_require_registered_identity() {
    let client = TestClient::start().await;

    let response = client
        .client
        .post(client.url("/algorithms/"))
        .json(&algorithm("kmeans", "clustering"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = client
        .post("/algorithms/", "forged-token", algorithm("kmeans", "clustering"))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Valid token but no user record yet
    let response = client.post("/algorithms/", ALICE, algorithm("kmeans", "clustering")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Unknown user");
}

#[tokio::test]
async fn test_algorithm_lifecycle_and_ownership() {
    let client = TestClient::start().await;
    client.register(ALICE).await;
    client.register(BOB).await;

    // Create; a client-supplied owner is ignored
    let mut body = algorithm("kmeans", "clustering of points");
    body["userId"] = json!("1002");
    let response = client.post("/algorithms/", ALICE, body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let created: Value = response.json().await.unwrap();
    assert_eq!(created["userId"], "1001");
    let created_at = created["createdAt"].clone();

    // Read back the merged resource
    let response = client.get("/algorithms/kmeans", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let fetched: Value = response.json().await.unwrap();
    assert_eq!(fetched["algorithmBLOB"], "cHJpbnQoMSk=");
    assert_eq!(fetched["displayName"], "KMEANS");

    // Search by tag sees the projection only
    let response = client.get_query("/algorithms/", &[("tags", "points,nothing")]).await;
    let hits: Vec<Value> = response.json().await.unwrap();
    assert_eq!(hits.len(), 1);
    assert!(hits[0].get("algorithmBLOB").is_none());

    // Another user may neither replace nor delete it
    let response = client.post("/algorithms/", BOB, algorithm("kmeans", "hijacked")).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let response = client.delete("/algorithms/kmeans", BOB).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let fetched: Value = client.get("/algorithms/kmeans", None).await.json().await.unwrap();
    assert_eq!(fetched["algorithmSummary"], "clustering of points");

    // The owner replaces it wholesale; creation time survives
    let response = client.post("/algorithms/", ALICE, algorithm("kmeans", "lloyd")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let replaced: Value = response.json().await.unwrap();
    assert_eq!(replaced["algorithmSummary"], "lloyd");
    assert_eq!(replaced["createdAt"], created_at);

    // And deletes it
    let response = client.delete("/algorithms/kmeans", ALICE).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = client.get("/algorithms/kmeans", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], 404);

    let response = client.delete("/algorithms/kmeans", ALICE).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_bodies_and_ids() {
    let client = TestClient::start().await;
    client.register(ALICE).await;

    let response = client.post("/datasets/", ALICE, json!({"datasetId": "iris"})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Malformed Data");

    let response = client.post("/datasets/", ALICE, dataset("has space")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client.get("/algorithms/has%20space", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_user_registration() {
    let client = TestClient::start().await;

    let response = client.get("/user/", Some(ALICE)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = client.post("/user/", ALICE, json!({"userStatus": 2, "userID": "9999"})).await;
    assert_eq!(response.status(), StatusCode::OK);
    let user: Value = response.json().await.unwrap();
    assert_eq!(user["userID"], "1001");
    assert_eq!(user["userStatus"], 2);

    let user: Value = client.get("/user/", Some(ALICE)).await.json().await.unwrap();
    assert_eq!(user["userID"], "1001");

    let response = client.delete("/user/", ALICE).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = client.get("/user/", Some(ALICE)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_execute_and_fetch_results() {
    let client = TestClient::start().await;
    client.register(ALICE).await;
    client.register(BOB).await;

    client.post("/algorithms/", ALICE, algorithm("kmeans", "clustering")).await;
    client.post("/datasets/", ALICE, dataset("iris")).await;

    let response = client.post("/results/kmeans/wine", ALICE, json!({})).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = client.post("/results/kmeans/iris", BOB, json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);
    let result: Value = response.json().await.unwrap();
    assert_eq!(result["userId"], "1002");
    assert_eq!(result["resultBLOB"]["status"], "completed");
    let id = result["resultSetId"].as_str().unwrap().to_string();
    assert_eq!(id, algorithms_api::result_set_id("1002", "kmeans", "iris"));

    let by_pair: Value = client.get("/results/kmeans/iris", Some(BOB)).await.json().await.unwrap();
    assert_eq!(by_pair["resultSetId"], id.as_str());

    let response = client.get(&format!("/results/{}", id), Some(BOB)).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Alice has no result for the pair and may not read Bob's
    let response = client.get("/results/kmeans/iris", Some(ALICE)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = client.get(&format!("/results/{}", id), Some(ALICE)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_bill_is_xml() {
    let client = TestClient::start().await;
    client.register(ALICE).await;

    let response = client
        .client
        .get(client.url("/bill/"))
        .bearer_auth(ALICE)
        .query(&[("from", "20240101"), ("to", "20240110")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("application/xml"));
    let xml = response.text().await.unwrap();
    assert!(xml.contains("user=\"1001\""));
    assert!(xml.contains("<period from=\"2024-01-01\" to=\"2024-01-10\"/>"));
    assert!(xml.contains("quantity=\"10\""));

    let response = client
        .client
        .get(client.url("/bill/"))
        .bearer_auth(ALICE)
        .query(&[("date", "20230229")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["message"].as_str().unwrap().contains("20230229"));
}
