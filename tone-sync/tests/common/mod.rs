//! In-memory backend for driving resource handles without a network.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use tone_core::ApiError;
use tone_sync::transport::{Query, Transport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl Request {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

pub type Reply = Result<Value, ApiError>;

type Handler = Box<dyn Fn(&Request, usize) -> Reply + Send + Sync>;

struct Route {
    handler: Handler,
    hits: usize,
    delays: Vec<Duration>,
}

/// Routes are keyed by method and path. Unrouted requests get a 404.
#[derive(Default)]
pub struct FakeTransport {
    routes: Mutex<HashMap<(Method, String), Route>>,
    log: Mutex<Vec<Request>>,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Answer with `handler(request, hit_index)`.
    pub fn route<F>(&self, method: Method, path: &str, handler: F)
    where
        F: Fn(&Request, usize) -> Reply + Send + Sync + 'static,
    {
        self.routes.lock().unwrap().insert(
            (method, path.to_string()),
            Route {
                handler: Box::new(handler),
                hits: 0,
                delays: Vec::new(),
            },
        );
    }

    /// Always answer with `reply`.
    pub fn reply(&self, method: Method, path: &str, reply: Reply) {
        self.route(method, path, move |_, _| reply.clone());
    }

    /// Answer the n-th hit with `replies[n]`; the last reply repeats.
    pub fn script(&self, method: Method, path: &str, replies: Vec<Reply>) {
        self.route(method, path, move |_, hit| {
            let idx = hit.min(replies.len().saturating_sub(1));
            replies[idx].clone()
        });
    }

    /// Hold the n-th response to a route for `delays[n]` before returning it.
    pub fn delay(&self, method: Method, path: &str, delays: Vec<Duration>) {
        if let Some(route) = self.routes.lock().unwrap().get_mut(&(method, path.to_string())) {
            route.delays = delays;
        }
    }

    pub fn requests(&self) -> Vec<Request> {
        self.log.lock().unwrap().clone()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    async fn handle(&self, request: Request) -> Reply {
        self.log.lock().unwrap().push(request.clone());
        let (reply, delay) = {
            let mut routes = self.routes.lock().unwrap();
            match routes.get_mut(&(request.method, request.path.clone())) {
                Some(route) => {
                    let hit = route.hits;
                    route.hits += 1;
                    let delay = route.delays.get(hit).copied().unwrap_or_default();
                    ((route.handler)(&request, hit), delay)
                }
                None => (
                    Err(ApiError::Status {
                        status: 404,
                        detail: "Not Found".into(),
                    }),
                    Duration::ZERO,
                ),
            }
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        reply
    }
}

fn owned(query: Query<'_>) -> Vec<(String, String)> {
    query
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[async_trait]
impl Transport for FakeTransport {
    async fn get(&self, path: &str, query: Query<'_>) -> Result<Value, ApiError> {
        self.handle(Request {
            method: Method::Get,
            path: path.to_string(),
            query: owned(query),
            body: None,
        })
        .await
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        self.handle(Request {
            method: Method::Post,
            path: path.to_string(),
            query: Vec::new(),
            body: Some(body),
        })
        .await
    }

    async fn patch(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        self.handle(Request {
            method: Method::Patch,
            path: path.to_string(),
            query: Vec::new(),
            body: Some(body),
        })
        .await
    }

    async fn delete(&self, path: &str, query: Query<'_>) -> Result<Value, ApiError> {
        self.handle(Request {
            method: Method::Delete,
            path: path.to_string(),
            query: owned(query),
            body: None,
        })
        .await
    }
}

pub fn network_down() -> ApiError {
    ApiError::Network("connection refused".into())
}
