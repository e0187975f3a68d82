//! In-memory stand-in for the inventory REST backend.

#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use pushkind_inventory::api::errors::ApiResult;
use pushkind_inventory::api::{ApiRequest, ApiResponse, ApiTransport, Method};
use serde_json::{Map, Value, json};

const PAGING_KEYS: [&str; 2] = ["page", "page_size"];

pub struct FakeBackend {
    collection: String,
    records: Mutex<Vec<Map<String, Value>>>,
    next_id: AtomicUsize,
    expired: AtomicBool,
    requests: Mutex<Vec<ApiRequest>>,
}

impl FakeBackend {
    pub fn new(collection: &str) -> Self {
        Self {
            collection: format!("/{collection}"),
            records: Mutex::new(Vec::new()),
            next_id: AtomicUsize::new(1),
            expired: AtomicBool::new(false),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Adds `count` products named `Item 01`, `Item 02`, … alternating
    /// between the `wood` and `plastic` categories.
    pub fn seed(self, count: usize) -> Self {
        for n in 1..=count {
            let category = if n % 2 == 0 { "plastic" } else { "wood" };
            self.insert(json!({"name": format!("Item {n:02}"), "category": category}));
        }
        self
    }

    pub fn insert(&self, fields: Value) -> Value {
        let mut record = match fields {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        record.insert("id".to_string(), json!(id));
        self.records.lock().unwrap().push(record.clone());
        Value::Object(record)
    }

    pub fn expire_session(&self) {
        self.expired.store(true, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn list(&self, request: &ApiRequest) -> ApiResponse {
        let page: usize = request
            .query_value("page")
            .and_then(|p| p.parse().ok())
            .unwrap_or(1);
        let page_size: usize = request
            .query_value("page_size")
            .and_then(|p| p.parse().ok())
            .unwrap_or(20);

        let matching: Vec<Value> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|record| {
                request
                    .query
                    .iter()
                    .filter(|(key, _)| !PAGING_KEYS.contains(&key.as_str()))
                    .all(|(key, value)| {
                        record.get(key).and_then(Value::as_str) == Some(value.as_str())
                    })
            })
            .cloned()
            .map(Value::Object)
            .collect();

        let data: Vec<Value> = matching
            .iter()
            .skip(page.saturating_sub(1) * page_size)
            .take(page_size)
            .cloned()
            .collect();

        ApiResponse::ok(json!({"data": data, "total_results": matching.len()}))
    }

    fn create(&self, body: Value) -> ApiResponse {
        let name = body.get("name").and_then(Value::as_str).unwrap_or_default();
        let duplicate = self
            .records
            .lock()
            .unwrap()
            .iter()
            .any(|record| record.get("name").and_then(Value::as_str) == Some(name));
        if duplicate {
            return ApiResponse::ok(json!({"success": false, "message": "Name already exists"}));
        }
        let record = self.insert(body);
        ApiResponse::ok(json!({"success": true, "data": record}))
    }

    fn update(&self, body: Value) -> ApiResponse {
        let Value::Object(fields) = body else {
            return ApiResponse::new(400, json!({"message": "expected an object"}));
        };
        let id = fields.get("id").and_then(Value::as_str).unwrap_or_default();
        let mut records = self.records.lock().unwrap();
        let Some(record) = records
            .iter_mut()
            .find(|record| record.get("id").map(Value::to_string).as_deref() == Some(id))
        else {
            return ApiResponse::new(404, json!({"message": "Record not found"}));
        };
        for (key, value) in fields {
            if key != "id" {
                record.insert(key, value);
            }
        }
        ApiResponse::ok(json!({"success": true, "data": Value::Object(record.clone())}))
    }

    fn delete(&self, id: &str) -> ApiResponse {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|record| record.get("id").map(Value::to_string).as_deref() != Some(id));
        if records.len() == before {
            return ApiResponse::new(404, json!({"message": "Record not found"}));
        }
        ApiResponse::ok(json!({"success": true}))
    }
}

#[async_trait]
impl ApiTransport for FakeBackend {
    async fn send(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        self.requests.lock().unwrap().push(request.clone());

        if self.expired.load(Ordering::SeqCst) {
            return Ok(ApiResponse::new(401, json!({"message": "Token expired"})));
        }

        let path = request
            .path
            .strip_prefix(&self.collection)
            .unwrap_or_default()
            .to_string();

        let response = match (request.method, path.as_str()) {
            (Method::Get, "/all") => self.list(&request),
            (Method::Post, "/create") => self.create(request.body.unwrap_or(Value::Null)),
            (Method::Put, "/update") => self.update(request.body.unwrap_or(Value::Null)),
            (Method::Delete, path) => match path.strip_prefix("/delete/") {
                Some(id) => self.delete(id),
                None => ApiResponse::new(404, Value::Null),
            },
            _ => ApiResponse::new(404, Value::Null),
        };

        Ok(response)
    }
}
