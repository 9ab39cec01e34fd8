//! JSON-RPC 2.0 communication layer between the viewer and its hosting page.
//!
//! Implements bidirectional messaging between the Bevy engine and the page via
//! iframe postMessage, supporting both request-response and notification patterns.
//!
//! ## Architecture
//!
//! The RPC system uses standard JSON-RPC 2.0 protocol with:
//! - **Requests**: Expect responses with matching IDs
//! - **Notifications**: One-way messages without responses
//! - **Responses**: Reply to requests with results or errors
//!
//! ## Message Flow
//!
//! ```text
//! Page (Parent Window)   <──postMessage──>  Bevy (iframe)
//!        │                                        │
//!        ├─ Request (with ID) ──────────────────> │
//!        │                                        ├─ Process request
//!        │ <───────────────── Response (with ID) ─┤
//!        │                                        │
//!        │ <────────── Notification (no ID) ─────┤
//! ```
//!
//! ## Adding New RPC Methods
//!
//! Add a match arm in `handle_rpc_request()` and a handler returning
//! `Result<Value, RpcError>`. Handlers read the world through `RpcContext`;
//! extend it when a method needs another resource or query.
//!
//! ```rust,ignore
//! "focus_surface" => handle_focus_surface(&request.params, context),
//! ```
//!
//! From the page:
//!
//! ```typescript
//! iframe.contentWindow.postMessage(JSON.stringify({
//!   jsonrpc: "2.0",
//!   method: "focus_surface",
//!   params: { name: "hood" },
//!   id: 1
//! }), "*");
//! ```
//!
//! Systems push updates with `WebRpcInterface::send_notification()`.
//!
//! ## Error Handling
//!
//! Standard JSON-RPC 2.0 error codes:
//! - `-32600`: Invalid request
//! - `-32601`: Method not found
//! - `-32602`: Invalid params
//! - `-32603`: Internal error
//!
//! ## Existing Methods
//!
//! ### Requests
//! - `get_fps`: Retrieve current frame rate
//! - `get_clickable_surfaces`: List clickable model surfaces with names and positions
//! - `focus_surface`: Focus the camera on a surface by name, as a click would
//! - `get_camera_pose`: Read camera position, look-target and distance
//!
//! ### Notifications
//! - `fps_update`: Smoothed frame rate, twice per second
//! - `model_loaded`: Model scene spawned, with its surface count
//! - `environment_loaded`: Environment cubemap installed
//! - `asset_load_failed`: Model or environment failed, with path and reason
//! - `surface_focused`: A focus transition started, with surface name and target

/// JSON-RPC 2.0 bidirectional communication system for the hosting page.
///
/// Handles request-response patterns, notifications, and WASM message listeners.
pub mod web_rpc;
