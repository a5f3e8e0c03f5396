//! Request routing and handling for the access API
//!
//! Three mutation endpoints keyed by project name, mirroring the CLI
//! operations: PUT /add/{project}, PUT /remove/{project},
//! PUT /purge/{project}. Bodies are JSON; when a shared secret is
//! configured, a missing or wrong key gets the same generic error payload
//! as a failed validation, so the response never reveals which check
//! rejected the request.

use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::{Method, Request, Response, StatusCode};
use netgrant_core::{plan_add, plan_purge, plan_remove, AccessError, Store};
use netgrant_device::DeviceGateway;
use serde::Deserialize;
use std::convert::Infallible;
use std::sync::Arc;
use tracing::debug;

const USAGE: &str = "PUT /add/<project> with {\"network\": ..., \"key\": ...} to add a network. \
                     PUT /remove/<project> with the same body to remove one. \
                     PUT /purge/<project> with {\"key\": ...} to remove every configured network.";

/// Shared state handed to every connection task
#[derive(Clone)]
pub struct ApiContext {
    pub store: Arc<Store>,
    pub gateway: Arc<dyn DeviceGateway>,
    /// Persist the device configuration after every applied change
    pub save: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Remove,
    Purge,
}

/// JSON body accepted by the mutation endpoints
#[derive(Debug, Default, Deserialize)]
pub struct ChangeRequest {
    #[serde(default)]
    pub network: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
}

pub async fn handle_request(
    req: Request<Incoming>,
    ctx: ApiContext,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    if method == Method::GET && path == "/" {
        return Ok(json_response(
            StatusCode::OK,
            &serde_json::json!({ "usage": USAGE }),
        ));
    }

    let (op, project) = match route(&method, &path) {
        Ok(routed) => routed,
        Err(status) => {
            return Ok(json_response(
                status,
                &serde_json::json!({ "error": "no such endpoint" }),
            ))
        }
    };

    let body = match req.into_body().collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            debug!("Failed to read request body: {e}");
            return Ok(bad_request());
        }
    };

    let change: ChangeRequest = match serde_json::from_slice(&body) {
        Ok(change) => change,
        Err(e) => {
            debug!("Malformed request body: {e}");
            return Ok(bad_request());
        }
    };

    if matches!(op, Operation::Add | Operation::Remove) && change.network.is_none() {
        return Ok(bad_request());
    }

    // Key and validation failures are deliberately indistinguishable
    if !key_allowed(&ctx.store, change.key.as_deref()) {
        debug!("Rejected {path}: shared-secret mismatch");
        return Ok(plan_rejected());
    }

    let lines = match plan_for(&ctx.store, op, &project, &change) {
        Ok(lines) => lines,
        Err(e) => {
            debug!("Planning failed for {path}: {e}");
            return Ok(plan_rejected());
        }
    };

    if let Err(e) = ctx.gateway.apply(&lines, ctx.save).await {
        debug!("Gateway failure for {path}: {e}");
        return Ok(json_response(
            StatusCode::BAD_GATEWAY,
            &serde_json::json!({ "error": "unable to apply configuration" }),
        ));
    }

    let payload = match op {
        Operation::Purge => serde_json::json!({ "project": project }),
        _ => serde_json::json!({ "project": project, "network": change.network }),
    };
    Ok(json_response(StatusCode::OK, &payload))
}

/// Map method + path onto an operation and project name
pub fn route(method: &Method, path: &str) -> Result<(Operation, String), StatusCode> {
    let mut segments = path.trim_matches('/').splitn(2, '/');

    let op = match segments.next() {
        Some("add") => Operation::Add,
        Some("remove") => Operation::Remove,
        Some("purge") => Operation::Purge,
        _ => return Err(StatusCode::NOT_FOUND),
    };

    let project = match segments.next() {
        Some(p) if !p.is_empty() && !p.contains('/') => p.to_string(),
        _ => return Err(StatusCode::NOT_FOUND),
    };

    if method != Method::PUT {
        return Err(StatusCode::METHOD_NOT_ALLOWED);
    }

    Ok((op, project))
}

/// Check the supplied shared secret against the configured one.
/// No configured secret means the endpoints are unguarded.
pub fn key_allowed(store: &Store, supplied: Option<&str>) -> bool {
    match store.credentials().api_key.as_deref() {
        Some(expected) => supplied == Some(expected),
        None => true,
    }
}

/// Plan the batch for one request. Pure; the gateway call happens afterward.
pub fn plan_for(
    store: &Store,
    op: Operation,
    project: &str,
    change: &ChangeRequest,
) -> Result<Vec<String>, AccessError> {
    match op {
        Operation::Add => plan_add(store, project, change.network.as_deref().unwrap_or_default()),
        Operation::Remove => {
            plan_remove(store, project, change.network.as_deref().unwrap_or_default())
        }
        Operation::Purge => plan_purge(store, project),
    }
}

fn json_response(status: StatusCode, value: &serde_json::Value) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(value.to_string())));
    *response.status_mut() = status;
    response.headers_mut().insert(
        hyper::header::CONTENT_TYPE,
        hyper::header::HeaderValue::from_static("application/json"),
    );
    response
}

fn bad_request() -> Response<Full<Bytes>> {
    json_response(
        StatusCode::BAD_REQUEST,
        &serde_json::json!({ "error": "invalid request body" }),
    )
}

fn plan_rejected() -> Response<Full<Bytes>> {
    json_response(
        StatusCode::FORBIDDEN,
        &serde_json::json!({ "error": "unable to generate configuration" }),
    )
}
