use bevy::diagnostic::DiagnosticsStore;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

use crate::engine::camera::focus::FocusRequest;
use crate::engine::camera::orbit_controls::OrbitControls;
use crate::engine::camera::viewer_camera::ViewerCamera;
use crate::engine::error::ViewerError;
use crate::engine::loading::asset_events::{AssetKind, AssetLoadEvent};
use crate::engine::loading::model_loader::ModelReady;
use crate::engine::scene::clickable::{ClickableSurfaces, surface_name};
use crate::engine::systems::fps_tracking::current_fps;
use crate::engine::systems::frame::FrameSet;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

/// JSON-RPC 2.0 request structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 notification structure for one-way communication.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
}

/// JSON-RPC error structure following specification.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Resource managing bidirectional RPC communication between the page and Bevy.
/// Handles both request-response patterns and notification broadcasting.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    /// Send notification to the hosting page without expecting response.
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    /// Queue response for transmission to the hosting page.
    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }
}

/// Plugin establishing WebRPC communication layer for iframe-based deployment.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .init_resource::<MessageQueue>()
            .add_event::<IncomingRpcMessage>()
            .add_systems(
                Update,
                (process_incoming_messages, handle_rpc_messages)
                    .chain()
                    .in_set(FrameSet::Input),
            )
            .add_systems(
                Update,
                (forward_viewer_events, send_outgoing_messages)
                    .chain()
                    .after(FrameSet::Controls),
            );

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener);
    }
}

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(message_queue: Res<MessageQueue>) {
    let queue_clone = message_queue.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        // Filter messages to ensure they contain string data.
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();

            if message_str.contains("jsonrpc") {
                queue_clone.push(message_str);
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    if let Some(window) = window() {
        if let Err(e) =
            window.add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
        {
            error!("Failed to register message listener: {:?}", e);
        }
    }

    // Prevent closure from being dropped by transferring ownership to JS.
    closure.forget();
}

/// Thread-safe queue bridging browser message callbacks into the ECS.
#[derive(Resource, Default, Clone)]
pub struct MessageQueue(Arc<Mutex<Vec<String>>>);

impl MessageQueue {
    pub fn push(&self, message: String) {
        if let Ok(mut queue) = self.0.lock() {
            queue.push(message);
        }
    }

    fn take(&self) -> Vec<String> {
        match self.0.lock() {
            Ok(mut queue) => std::mem::take(&mut *queue),
            Err(_) => Vec::new(),
        }
    }
}

/// Event representing incoming RPC message from the hosting page.
#[derive(Event)]
struct IncomingRpcMessage {
    content: String,
}

fn process_incoming_messages(
    message_queue: Res<MessageQueue>,
    mut message_events: EventWriter<IncomingRpcMessage>,
) {
    for message_str in message_queue.take() {
        message_events.write(IncomingRpcMessage {
            content: message_str,
        });
    }
}

/// World access needed to answer requests.
#[derive(SystemParam)]
pub struct RpcContext<'w, 's> {
    diagnostics: Res<'w, DiagnosticsStore>,
    surfaces: Res<'w, ClickableSurfaces>,
    surface_query: Query<'w, 's, (&'static GlobalTransform, Option<&'static Name>)>,
    camera_query: Query<'w, 's, (&'static Transform, &'static OrbitControls), With<ViewerCamera>>,
    focus_requests: EventWriter<'w, FocusRequest>,
}

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut context: RpcContext,
) {
    for event in events.read() {
        debug!("Received RPC: {}", event.content);

        match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => {
                if let Some(response) = handle_rpc_request(&request, &mut context) {
                    rpc_interface.queue_response(response);
                }
            }
            Err(parse_error) => {
                warn!("RPC parse error: {}", parse_error);
            }
        }
    }
}

/// Handle individual RPC request and generate response based on method.
fn handle_rpc_request(request: &RpcRequest, context: &mut RpcContext) -> Option<RpcResponse> {
    // Only generate responses for requests with IDs (notifications have no ID).
    let id = request.id.clone()?;

    let result = match request.method.as_str() {
        "get_fps" => handle_get_fps(&context.diagnostics),
        "get_clickable_surfaces" => handle_get_clickable_surfaces(context),
        "focus_surface" => handle_focus_surface(&request.params, context),
        "get_camera_pose" => handle_get_camera_pose(context),
        _ => {
            warn!("Unknown RPC method: {}", request.method);
            return Some(create_error_response(
                id,
                -32601,
                "Method not found",
                Some(serde_json::json!({"method": request.method})),
            ));
        }
    };

    match result {
        Ok(result_value) => Some(RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(result_value),
            error: None,
            id: Some(id),
        }),
        Err(error) => Some(RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id: Some(id),
        }),
    }
}

/// Handle FPS retrieval with diagnostic system integration.
fn handle_get_fps(diagnostics: &DiagnosticsStore) -> Result<serde_json::Value, RpcError> {
    Ok(serde_json::json!({
        "fps": current_fps(diagnostics)
    }))
}

/// List every clickable surface with its name and world position.
fn handle_get_clickable_surfaces(context: &RpcContext) -> Result<serde_json::Value, RpcError> {
    let surfaces: Vec<serde_json::Value> = context
        .surfaces
        .iter()
        .filter_map(|entity| context.surface_query.get(entity).ok())
        .map(|(transform, name)| {
            serde_json::json!({
                "name": surface_name(name),
                "position": transform.translation().to_array(),
            })
        })
        .collect();

    Ok(serde_json::json!({
        "count": surfaces.len(),
        "surfaces": surfaces
    }))
}

/// Focus the camera on the first surface with the given name, as a click would.
fn handle_focus_surface(
    params: &serde_json::Value,
    context: &mut RpcContext,
) -> Result<serde_json::Value, RpcError> {
    #[derive(serde::Deserialize)]
    struct FocusSurfaceParams {
        name: String,
    }

    let focus_params = serde_json::from_value::<FocusSurfaceParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'name' parameter"))?;

    let found = context.surfaces.iter().find_map(|entity| {
        let (transform, name) = context.surface_query.get(entity).ok()?;
        (surface_name(name) == focus_params.name).then(|| (entity, transform.translation()))
    });
    let (surface, target) = found.ok_or_else(|| {
        RpcError::invalid_params(&format!("Unknown surface: {}", focus_params.name))
    })?;

    context.focus_requests.write(FocusRequest { surface, target });
    info!("Focus requested over RPC: {}", focus_params.name);

    Ok(serde_json::json!({
        "success": true,
        "name": focus_params.name,
        "target": target.to_array()
    }))
}

fn handle_get_camera_pose(context: &RpcContext) -> Result<serde_json::Value, RpcError> {
    let (transform, controls) = context
        .camera_query
        .single()
        .map_err(|_| RpcError::internal_error("Viewer camera is not ready"))?;

    Ok(serde_json::json!({
        "position": transform.translation.to_array(),
        "target": controls.target.to_array(),
        "distance": transform.translation.distance(controls.target)
    }))
}

// Turn load and focus events into notifications for the hosting page
fn forward_viewer_events(
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut load_events: EventReader<AssetLoadEvent>,
    mut ready_events: EventReader<ModelReady>,
    mut focus_requests: EventReader<FocusRequest>,
    name_query: Query<Option<&Name>>,
) {
    for event in load_events.read() {
        match (&event.kind, &event.outcome) {
            (AssetKind::Environment, Ok(())) => {
                rpc_interface.send_notification("environment_loaded", serde_json::json!({}));
            }
            (_, Err(ViewerError::AssetLoad { kind, path, reason })) => {
                rpc_interface.send_notification(
                    "asset_load_failed",
                    serde_json::json!({
                        "kind": kind,
                        "path": path,
                        "reason": reason
                    }),
                );
            }
            (kind, Err(other)) => {
                rpc_interface.send_notification(
                    "asset_load_failed",
                    serde_json::json!({
                        "kind": kind,
                        "path": serde_json::Value::Null,
                        "reason": other.to_string()
                    }),
                );
            }
            (AssetKind::Model, Ok(())) => {}
        }
    }

    for ready in ready_events.read() {
        rpc_interface.send_notification(
            "model_loaded",
            serde_json::json!({
                "surface_count": ready.meshes.len()
            }),
        );
    }

    if let Some(request) = focus_requests.read().last() {
        let name = surface_name(name_query.get(request.surface).ok().flatten());
        rpc_interface.send_notification(
            "surface_focused",
            serde_json::json!({
                "name": name,
                "position": request.target.to_array()
            }),
        );
    }
}

/// Create standardized error response with optional data payload.
fn create_error_response(
    id: serde_json::Value,
    code: i32,
    message: &str,
    data: Option<serde_json::Value>,
) -> RpcResponse {
    RpcResponse {
        jsonrpc: "2.0".to_string(),
        result: None,
        error: Some(RpcError {
            code,
            message: message.to_string(),
            data,
        }),
        id: Some(id),
    }
}

/// Send queued notifications and responses to the hosting page.
fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    // Send notifications first.
    for notification in rpc_interface.outgoing_notifications.drain(..) {
        send_message_to_parent(&notification);
    }

    // Send responses second to maintain order.
    for response in rpc_interface.outgoing_responses.drain(..) {
        send_message_to_parent(&response);
    }
}

/// Send serialized message to parent window (the hosting page).
fn send_message_to_parent<T: Serialize>(message: &T) {
    #[cfg(target_arch = "wasm32")]
    {
        match serde_json::to_string(message) {
            Ok(json) => {
                if let Some(window) = window() {
                    if let Some(parent) = window.parent().ok().flatten() {
                        if let Err(e) = parent.post_message(&JsValue::from_str(&json), "*") {
                            error!("Failed to send message to parent: {:?}", e);
                        }
                    } else {
                        warn!("No parent window available for message transmission");
                    }
                } else {
                    error!("Window object not available");
                }
            }
            Err(e) => {
                error!("Failed to serialize message: {}", e);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        // No-op for non-WASM targets.
        let _ = message;
    }
}

/// Standard RPC error codes and constructors.
impl RpcError {
    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: -32602,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn internal_error(message: &str) -> Self {
        Self {
            code: -32603,
            message: message.to_string(),
            data: None,
        }
    }
}
