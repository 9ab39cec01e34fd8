//! Interactive tools driven by pointer input.
//!
//! ## Click-to-focus
//!
//! A left click (press and release without dragging past the configured
//! threshold) is resolved against the clickable surfaces of the model:
//!
//! ```text
//! Left click
//!   └─> PointerSample (NDC from cursor and current window size)
//!       └─> Ray3d through the camera
//!           └─> MeshRayCast filtered to ClickableSurfaces
//!               └─> nearest hit ─> FocusRequest
//!                   ├─> FocusIndicator moves to the target
//!                   └─> FocusTransition tweens camera and look-target
//! ```
//!
//! A miss produces no request and leaves the scene untouched. Drags are
//! left to the orbit controls.

/// Pointer to surface resolution and click detection.
pub mod selection;
