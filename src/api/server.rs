//! API Server Module
//!
//! This module implements a JSON-RPC server exposing the registry operations.
//! Each request names one operation; the caller identity comes from the
//! `x-caller` header set by the hosting environment.

use crate::{
    config::ApiConfig,
    error::RegistryError,
    registry::Registry,
    state::Store,
    types::Caller,
};
use axum::{Json, Router, extract::State, http::HeaderMap, routing::post};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

/// Header carrying the caller's wallet address
pub const CALLER_HEADER: &str = "x-caller";

/// Shared application state that is accessible across all request handlers
///
/// The registry sits behind a single mutex, so requests are processed one at a
/// time and operations never interleave.
pub struct AppState<S> {
    registry: Arc<Mutex<Registry<S>>>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

/// The main API server struct
pub struct Server<S> {
    config: ApiConfig,
    state: AppState<S>,
}

impl<S: Store + Send + Sync + 'static> Server<S> {
    /// Creates a new API server instance
    ///
    /// # Arguments
    /// * `config` - Listening address settings
    /// * `registry` - The registry to serve, over whichever store it was opened with
    pub fn new(config: ApiConfig, registry: Registry<S>) -> Self {
        let state = AppState {
            registry: Arc::new(Mutex::new(registry)),
        };
        Self { config, state }
    }

    /// Builds the router with a single POST endpoint at "/"
    pub fn router(&self) -> Router {
        Router::new()
            .route("/", post(handle_rpc::<S>))
            .with_state(self.state.clone())
    }

    /// Starts the API server and begins listening for incoming requests
    ///
    /// # Returns
    /// `Ok(())` when the server shuts down, or an error if binding fails
    pub async fn start(self) -> anyhow::Result<()> {
        let app = self.router();

        let addr = format!("{}:{}", self.config.host, self.config.port);
        info!("API server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}

/// JSON-RPC 2.0 request structure
#[derive(Debug, Deserialize)]
pub(crate) struct JsonRpcRequest {
    jsonrpc: String,
    method: String,
    #[serde(default)]
    params: Value,
    #[serde(default)]
    id: Value,
}

/// JSON-RPC 2.0 response structure
///
/// Either `result` or `error` will be populated, but not both.
#[derive(Debug, Serialize)]
pub(crate) struct JsonRpcResponse {
    jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
    id: Value,
}

/// JSON-RPC error object
///
/// `data` carries the registry error variant (e.g. "NotFound") when there is one.
#[derive(Debug, Serialize)]
pub(crate) struct JsonRpcError {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl JsonRpcResponse {
    fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    fn failure(id: Value, code: i32, message: String, data: Option<Value>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(JsonRpcError { code, message, data }),
            id,
        }
    }
}

/// Why a request did not produce a result
enum DispatchError {
    InvalidRequest,
    MethodNotFound,
    Registry(RegistryError),
}

impl From<RegistryError> for DispatchError {
    fn from(err: RegistryError) -> Self {
        DispatchError::Registry(err)
    }
}

/// Main RPC request handler
async fn handle_rpc<S: Store + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
    Json(request): Json<JsonRpcRequest>,
) -> Json<JsonRpcResponse> {
    info!("Received RPC request: {}", request.method);

    let caller = caller_from_headers(&headers);
    let id = request.id.clone();
    let method = request.method.clone();

    let response = match dispatch(&state, caller, request).await {
        Ok(result) => JsonRpcResponse::success(id, result),
        Err(DispatchError::InvalidRequest) => {
            JsonRpcResponse::failure(id, -32600, "Invalid request".to_string(), None)
        }
        Err(DispatchError::MethodNotFound) => {
            warn!("Unknown RPC method: {}", method);
            JsonRpcResponse::failure(id, -32601, "Method not found".to_string(), None)
        }
        Err(DispatchError::Registry(err)) => {
            match &err {
                RegistryError::SystemError(_) => error!("{} failed: {}", method, err),
                _ => warn!("{} rejected: {}", method, err),
            }
            JsonRpcResponse::failure(
                id,
                err.code(),
                err.to_string(),
                Some(Value::String(err.kind().to_string())),
            )
        }
    };

    Json(response)
}

/// Routes a request to the matching registry operation
async fn dispatch<S: Store + Send + Sync + 'static>(
    state: &AppState<S>,
    caller: Option<Caller>,
    request: JsonRpcRequest,
) -> Result<Value, DispatchError> {
    if request.jsonrpc != "2.0" {
        return Err(DispatchError::InvalidRequest);
    }

    let params = request.params;
    let mut registry = state.registry.lock().await;

    let result = match request.method.as_str() {
        // Writes
        "createBeekeeperProfile" => encode(
            registry
                .create_beekeeper_profile(require(caller)?, parse(params)?)
                .await?,
        )?,
        "createInvestorProfile" => encode(
            registry
                .create_investor_profile(require(caller)?, parse(params)?)
                .await?,
        )?,
        "createHive" => encode(registry.create_hive(require(caller)?, parse(params)?).await?)?,
        "createHoneyBatch" => encode(
            registry
                .create_honey_batch(require(caller)?, parse(params)?)
                .await?,
        )?,
        "createCarbonCredit" => encode(
            registry
                .create_carbon_credit(require(caller)?, parse(params)?)
                .await?,
        )?,
        "createInvestment" => encode(
            registry
                .create_investment(require(caller)?, parse(params)?)
                .await?,
        )?,

        // Caller-scoped reads
        "getBeekeeperProfileByOwner" => {
            encode(registry.get_beekeeper_profile_by_owner(require(caller)?)?)?
        }
        "getInvestorProfileByOwner" => {
            encode(registry.get_investor_profile_by_owner(require(caller)?)?)?
        }
        "getMyHives" => encode(registry.get_my_hives(require(caller)?)?)?,
        "getMyInvestments" => encode(registry.get_my_investments(require(caller)?)?)?,

        // Lookups by id
        "getBeekeeperProfile" => {
            encode(registry.get_beekeeper_profile(&id_param(&params, "id")?)?)?
        }
        "getInvestorProfile" => encode(registry.get_investor_profile(&id_param(&params, "id")?)?)?,
        "getHive" => encode(registry.get_hive(&id_param(&params, "id")?)?)?,
        "getHiveHoneyBatches" => {
            encode(registry.get_hive_honey_batches(&id_param(&params, "hiveId")?)?)?
        }

        // Listings
        "listBeekeepers" => encode(registry.list_beekeepers()?)?,
        "listInvestors" => encode(registry.list_investors()?)?,
        "listHives" => encode(registry.list_hives()?)?,
        "listHoneyBatches" => encode(registry.list_honey_batches()?)?,
        "listCarbonCredits" => encode(registry.list_carbon_credits()?)?,
        "listInvestments" => encode(registry.list_investments()?)?,

        _ => return Err(DispatchError::MethodNotFound),
    };

    Ok(result)
}

/// Reads the caller identity header, if present and well-formed
fn caller_from_headers(headers: &HeaderMap) -> Option<Caller> {
    let raw = headers.get(CALLER_HEADER)?.to_str().ok()?.trim();
    let hex = raw.strip_prefix("0x").unwrap_or(raw);
    match hex.parse::<Caller>() {
        Ok(caller) => Some(caller),
        Err(_) => {
            warn!("Ignoring malformed {} header: {}", CALLER_HEADER, raw);
            None
        }
    }
}

fn require(caller: Option<Caller>) -> Result<Caller, RegistryError> {
    caller.ok_or_else(|| RegistryError::Unauthorized("Caller identity is required".to_string()))
}

fn parse<T: DeserializeOwned>(params: Value) -> Result<T, RegistryError> {
    serde_json::from_value(params)
        .map_err(|e| RegistryError::InvalidPayload(format!("Invalid params: {}", e)))
}

/// Extracts a single id argument
///
/// Accepts `"<id>"`, `["<id>"]` or `{"<key>": "<id>"}`.
fn id_param(params: &Value, key: &str) -> Result<String, RegistryError> {
    let id = match params {
        Value::String(s) => Some(s),
        Value::Array(items) => match items.first() {
            Some(Value::String(s)) => Some(s),
            _ => None,
        },
        Value::Object(map) => match map.get(key) {
            Some(Value::String(s)) => Some(s),
            _ => None,
        },
        _ => None,
    };

    id.cloned()
        .ok_or_else(|| RegistryError::InvalidPayload(format!("Invalid params: expected '{}'", key)))
}

fn encode<T: Serialize>(value: T) -> Result<Value, RegistryError> {
    Ok(serde_json::to_value(value)?)
}
