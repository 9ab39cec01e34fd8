use bevy::prelude::*;

/// Per-frame ordering of the running viewer: input is resolved first, then
/// focus tweens advance, then orbit controls place the camera.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameSet {
    Input,
    Animate,
    Controls,
}
