use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Product};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

// --- products ---

#[tokio::test]
async fn list_products_empty() {
    let resp = app().oneshot(empty_request("GET", "/v1/products")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let products: Vec<Product> = body_json(resp).await;
    assert!(products.is_empty());
}

#[tokio::test]
async fn create_product_returns_201() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/v1/products",
            r#"{"product_name":"Desk lamp","unit_price":24.5,"category_id":3}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let product: Product = body_json(resp).await;
    assert_eq!(product.id, 1);
    assert_eq!(product.product_name, "Desk lamp");
    assert_eq!(product.category_id, Some(3));
}

#[tokio::test]
async fn create_product_blank_name_returns_field_errors() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/v1/products",
            r#"{"product_name":"  ","unit_price":1}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = body_json(resp).await;
    assert_eq!(body["error_code"], "validation_failed");
    assert_eq!(body["field_errors"]["product_name"], json!(["can't be blank"]));
}

#[tokio::test]
async fn create_product_camel_case_body_is_rejected() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/v1/products",
            r#"{"productName":"Mug","unitPrice":8}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn get_product_not_found_has_error_body() {
    let resp = app().oneshot(empty_request("GET", "/v1/products/99")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = body_json(resp).await;
    assert_eq!(body["error_code"], "not_found");
}

#[tokio::test]
async fn get_product_bad_id_returns_400() {
    let resp = app().oneshot(empty_request("GET", "/v1/products/abc")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn head_products_has_no_body() {
    let resp = app().oneshot(empty_request("HEAD", "/v1/products")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_bytes(resp).await.is_empty());
}

#[tokio::test]
async fn product_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/v1/products",
            r#"{"product_name":"Mug","unit_price":8}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Product = body_json(resp).await;
    let id = created.id;

    // patch only the price
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("PATCH", &format!("/v1/products/{id}"), r#"{"unit_price":9.5}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let patched: Product = body_json(resp).await;
    assert_eq!(patched.product_name, "Mug");
    assert_eq!(patched.unit_price, 9.5);

    // put replaces everything
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PUT",
            &format!("/v1/products/{id}"),
            r#"{"product_name":"Travel mug","unit_price":12}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let replaced: Product = body_json(resp).await;
    assert_eq!(replaced.product_name, "Travel mug");
    assert_eq!(replaced.created_at, created.created_at);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("DELETE", &format!("/v1/products/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", &format!("/v1/products/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- avatar upload ---

#[tokio::test]
async fn upload_avatar_reports_fields() {
    let boundary = "XBOUNDARYX";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"firstName\"\r\n\r\n\
         Jane\r\n\
         --{boundary}\r\n\
         Content-Disposition: form-data; name=\"avatar\"; filename=\"me.png\"\r\n\
         Content-Type: image/png\r\n\r\n\
         PNGDATA\r\n\
         --{boundary}--\r\n"
    );
    let request = Request::builder()
        .method("POST")
        .uri("/v1/users/7/avatar")
        .header(
            http::header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(body)
        .unwrap();

    let resp = app().oneshot(request).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body["user_id"], 7);
    assert_eq!(body["text_fields"]["firstName"], "Jane");
    assert_eq!(body["file_sizes"]["avatar"], 7);
}

// --- helpers ---

#[tokio::test]
async fn echo_returns_received_payload() {
    let resp = app()
        .oneshot(json_request("POST", "/v1/echo?page=2&ids%5B%5D=1", r#"{"userName":"a"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body["content_type"], "application/json");
    assert_eq!(body["received_body"], json!({ "userName": "a" }));
    assert_eq!(body["received_query"], json!([["page", "2"], ["ids[]", "1"]]));
}

#[tokio::test]
async fn fixed_status_returns_error_body() {
    let resp = app().oneshot(empty_request("GET", "/v1/status/503")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = body_json(resp).await;
    assert_eq!(body["error_code"], "status_503");
    assert_eq!(body["error_message"], "Service Unavailable");
}
