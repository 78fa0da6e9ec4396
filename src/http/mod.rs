use std::sync::Arc;

use axum::{
    Router,
    body::Bytes,
    extract::Extension,
    http::{HeaderName, HeaderValue, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::info;

use crate::{
    catalog::{self, ResourceCatalog},
    power::{PowerState, PowerStateCell},
};

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<ResourceCatalog>,
    pub power: PowerStateCell,
}

/// Redfish error document, rendered as
/// `{"error": {"code": ..., "message": ...}}` through the shared encoder.
#[derive(Debug)]
pub struct RedfishError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

const GENERAL_ERROR_CODE: &str = "Base.1.0.GeneralError";

impl RedfishError {
    pub fn resource_not_found(path: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            code: GENERAL_ERROR_CODE,
            message: format!("Resource {path} not found"),
        }
    }

    pub fn action_not_found(path: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            code: GENERAL_ERROR_CODE,
            message: format!("Action {path} not found"),
        }
    }

    pub fn malformed_body() -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: GENERAL_ERROR_CODE,
            message: "Malformed action request body".to_string(),
        }
    }
}

impl IntoResponse for RedfishError {
    fn into_response(self) -> Response {
        RedfishJson(
            self.status,
            json!({
                "error": {
                    "code": self.code,
                    "message": self.message,
                }
            }),
        )
        .into_response()
    }
}

/// Wire encoder for every response body: pretty-printed JSON with key order
/// preserved, `Content-Type: application/json` and `OData-Version: 4.0`.
/// `Content-Length` comes from the fully buffered body.
pub struct RedfishJson(pub StatusCode, pub Value);

impl IntoResponse for RedfishJson {
    fn into_response(self) -> Response {
        let RedfishJson(status, doc) = self;
        let body = serde_json::to_vec_pretty(&doc).expect("resource document serialization failed");
        (
            status,
            [
                (
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("application/json"),
                ),
                (
                    HeaderName::from_static("odata-version"),
                    HeaderValue::from_static("4.0"),
                ),
            ],
            body,
        )
            .into_response()
    }
}

pub fn build_router(catalog: Arc<ResourceCatalog>, power: PowerStateCell) -> Router {
    let state = AppState {
        catalog: catalog.clone(),
        power,
    };

    // Fixed route set: each catalog path with and without trailing slash,
    // plus the one action target. Everything else, including POSTs to
    // GET-only paths, falls through to the Redfish 404 documents.
    let mut app = Router::new();
    for path in catalog.paths() {
        app = app
            .route(path, get(get_resource).fallback(fallback_unmatched))
            .route(
                &format!("{path}/"),
                get(get_resource).fallback(fallback_unmatched),
            );
    }
    app = app
        .route(
            catalog::RESET_ACTION_PATH,
            post(post_system_reset).fallback(fallback_unmatched),
        )
        .route(
            &format!("{}/", catalog::RESET_ACTION_PATH),
            post(post_system_reset).fallback(fallback_unmatched),
        );

    app.fallback(fallback_unmatched)
        .layer(SetResponseHeaderLayer::if_not_present(
            header::SERVER,
            server_header_value(),
        ))
        .layer(Extension(state))
}

fn server_header_value() -> HeaderValue {
    HeaderValue::from_str(&format!("mock-bmc/{}", crate::version::VERSION))
        .expect("server header value")
}

async fn get_resource(Extension(state): Extension<AppState>, uri: Uri) -> Response {
    let Some((canonical, doc)) = state.catalog.lookup(uri.path()) else {
        return RedfishError::resource_not_found(uri.path()).into_response();
    };

    if canonical == catalog::SYSTEM_PATH {
        // Read-time merge: the stored document keeps its placeholder, the
        // response carries the live power state.
        let mut doc = doc.clone();
        doc["PowerState"] = Value::String(state.power.get().await.as_str().to_string());
        return RedfishJson(StatusCode::OK, doc).into_response();
    }

    RedfishJson(StatusCode::OK, doc.clone()).into_response()
}

#[derive(Debug, Default, Deserialize)]
struct ResetRequest {
    #[serde(rename = "ResetType")]
    reset_type: Option<String>,
}

async fn post_system_reset(Extension(state): Extension<AppState>, body: Bytes) -> Response {
    // A zero-length body is an empty action request, same as `{}`.
    let request = if body.is_empty() {
        ResetRequest::default()
    } else {
        match serde_json::from_slice::<ResetRequest>(&body) {
            Ok(request) => request,
            Err(_) => return RedfishError::malformed_body().into_response(),
        }
    };

    let reset_type = request.reset_type.as_deref().unwrap_or("On");
    let next = PowerState::after_reset(reset_type);
    state.power.set(next).await;
    info!(reset_type, power_state = next.as_str(), "reset action applied");

    // The requested value is echoed verbatim even when it is not one of the
    // declared allowable reset types.
    RedfishJson(
        StatusCode::OK,
        json!({ "Message": format!("Reset {reset_type} accepted") }),
    )
    .into_response()
}

async fn fallback_unmatched(method: Method, uri: Uri) -> RedfishError {
    if method == Method::POST {
        RedfishError::action_not_found(uri.path())
    } else {
        RedfishError::resource_not_found(uri.path())
    }
}
