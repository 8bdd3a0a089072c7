use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
    time::Duration,
};

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: u64,
    pub product_name: String,
    pub unit_price: f64,
    pub category_id: Option<u64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct CreateProduct {
    pub product_name: String,
    pub unit_price: f64,
    #[serde(default)]
    pub category_id: Option<u64>,
}

#[derive(Deserialize)]
pub struct UpdateProduct {
    pub product_name: Option<String>,
    pub unit_price: Option<f64>,
    pub category_id: Option<u64>,
}

#[derive(Default)]
pub struct Store {
    next_id: u64,
    products: HashMap<u64, Product>,
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/v1/products", get(list_products).post(create_product))
        .route(
            "/v1/products/{id}",
            get(get_product)
                .put(replace_product)
                .patch(update_product)
                .delete(delete_product),
        )
        .route("/v1/users/{id}/avatar", post(upload_avatar))
        .route("/v1/echo", post(echo).put(echo).patch(echo))
        .route("/v1/status/{code}", get(fixed_status))
        .route("/v1/slow", get(slow))
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn validation_error(field: &str, message: &str) -> Response {
    let body = json!({
        "error_code": "validation_failed",
        "field_errors": { field: [message] },
    });
    (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
}

fn not_found(resource: &str, id: u64) -> Response {
    let body = json!({
        "error_code": "not_found",
        "error_message": format!("{resource} {id} does not exist"),
    });
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}

async fn list_products(
    State(db): State<Db>,
    Query(filter): Query<HashMap<String, String>>,
) -> Json<Vec<Product>> {
    let store = db.read().await;
    let category = filter.get("category_id").and_then(|c| c.parse::<u64>().ok());
    let mut products: Vec<Product> = store
        .products
        .values()
        .filter(|p| category.is_none() || p.category_id == category)
        .cloned()
        .collect();
    products.sort_by_key(|p| p.id);
    Json(products)
}

async fn create_product(State(db): State<Db>, Json(input): Json<CreateProduct>) -> Response {
    if input.product_name.trim().is_empty() {
        return validation_error("product_name", "can't be blank");
    }
    let mut store = db.write().await;
    store.next_id += 1;
    let product = Product {
        id: store.next_id,
        product_name: input.product_name,
        unit_price: input.unit_price,
        category_id: input.category_id,
        created_at: Utc::now(),
    };
    store.products.insert(product.id, product.clone());
    (StatusCode::CREATED, Json(product)).into_response()
}

async fn get_product(State(db): State<Db>, Path(id): Path<u64>) -> Response {
    let store = db.read().await;
    match store.products.get(&id) {
        Some(product) => Json(product.clone()).into_response(),
        None => not_found("product", id),
    }
}

async fn replace_product(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<CreateProduct>,
) -> Response {
    if input.product_name.trim().is_empty() {
        return validation_error("product_name", "can't be blank");
    }
    let mut store = db.write().await;
    let Some(product) = store.products.get_mut(&id) else {
        return not_found("product", id);
    };
    product.product_name = input.product_name;
    product.unit_price = input.unit_price;
    product.category_id = input.category_id;
    Json(product.clone()).into_response()
}

async fn update_product(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<UpdateProduct>,
) -> Response {
    let mut store = db.write().await;
    let Some(product) = store.products.get_mut(&id) else {
        return not_found("product", id);
    };
    if let Some(name) = input.product_name {
        product.product_name = name;
    }
    if let Some(price) = input.unit_price {
        product.unit_price = price;
    }
    if input.category_id.is_some() {
        product.category_id = input.category_id;
    }
    Json(product.clone()).into_response()
}

async fn delete_product(State(db): State<Db>, Path(id): Path<u64>) -> Response {
    let mut store = db.write().await;
    match store.products.remove(&id) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => not_found("product", id),
    }
}

/// Reports the multipart fields it received: text values by name, files by
/// name with their size.
async fn upload_avatar(Path(id): Path<u64>, mut multipart: Multipart) -> Response {
    let mut fields = BTreeMap::new();
    let mut files = BTreeMap::new();
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return (StatusCode::BAD_REQUEST, e.body_text()).into_response(),
        };
        let name = field.name().unwrap_or_default().to_string();
        if field.file_name().is_some() {
            match field.bytes().await {
                Ok(bytes) => {
                    files.insert(name, bytes.len());
                }
                Err(e) => return (StatusCode::BAD_REQUEST, e.body_text()).into_response(),
            }
        } else {
            match field.text().await {
                Ok(text) => {
                    fields.insert(name, text);
                }
                Err(e) => return (StatusCode::BAD_REQUEST, e.body_text()).into_response(),
            }
        }
    }
    Json(json!({
        "user_id": id,
        "text_fields": fields,
        "file_sizes": files,
    }))
    .into_response()
}

/// Echoes what the client sent, so tests can see the wire format.
async fn echo(
    headers: HeaderMap,
    Query(query): Query<Vec<(String, String)>>,
    body: String,
) -> Json<Value> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let received_body = serde_json::from_str::<Value>(&body).unwrap_or(Value::String(body));
    Json(json!({
        "content_type": content_type,
        "received_query": query,
        "received_body": received_body,
    }))
}

async fn fixed_status(Path(code): Path<u16>) -> Response {
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST);
    let body = json!({
        "error_code": format!("status_{}", status.as_u16()),
        "error_message": status.canonical_reason().unwrap_or("unknown"),
    });
    (status, Json(body)).into_response()
}

#[derive(Deserialize)]
struct SlowQuery {
    #[serde(default)]
    delay_ms: u64,
}

async fn slow(Query(q): Query<SlowQuery>) -> Json<Value> {
    tokio::time::sleep(Duration::from_millis(q.delay_ms)).await;
    Json(json!({ "slept_ms": q.delay_ms }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_serializes_snake_case() {
        let product = Product {
            id: 1,
            product_name: "Desk lamp".to_string(),
            unit_price: 24.5,
            category_id: Some(3),
            created_at: "2024-01-01T00:00:00Z".parse().unwrap(),
        };
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["product_name"], "Desk lamp");
        assert_eq!(json["category_id"], 3);
        assert_eq!(json["created_at"], "2024-01-01T00:00:00Z");
    }

    #[test]
    fn create_product_defaults_category_to_none() {
        let input: CreateProduct =
            serde_json::from_str(r#"{"product_name":"Mug","unit_price":8}"#).unwrap();
        assert_eq!(input.product_name, "Mug");
        assert!(input.category_id.is_none());
    }

    #[test]
    fn create_product_rejects_camel_case_keys() {
        let result: Result<CreateProduct, _> =
            serde_json::from_str(r#"{"productName":"Mug","unitPrice":8}"#);
        assert!(result.is_err());
    }

    #[test]
    fn update_product_all_fields_optional() {
        let input: UpdateProduct = serde_json::from_str(r#"{}"#).unwrap();
        assert!(input.product_name.is_none());
        assert!(input.unit_price.is_none());
        assert!(input.category_id.is_none());
    }
}
