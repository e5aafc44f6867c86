use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How pointer rotation relates camera position, target and look-at point.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ControlsType {
    /// Rotate around a target that always sits at the screen center.
    OrbitInCenter,
    /// Rotate around the target while panning keeps it off-center.
    #[default]
    Orbit,
    /// Rotate in place: the camera position never moves.
    FirstPerson,
}

/// What the wheel zooms toward.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum WheelZoomType {
    /// Along the view direction through the screen center.
    Center,
    /// Toward the point under the cursor, continuing past it.
    PastCursor,
    /// Toward the point under the cursor, stopping short of it.
    ToCursor,
    /// `ToCursor` when a picker is available, `PastCursor` otherwise.
    #[default]
    Auto,
}

/// Camera reaction to a click or double click.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum MouseActionType {
    /// Ignore the click.
    #[default]
    None,
    /// Move the target to the picked point without moving the camera.
    SetTarget,
    /// Animate the view direction toward the picked point.
    SetTargetAndCameraDirection,
    /// Animate target and position: frame the picked object, or fly half
    /// way to the picked point.
    SetTargetAndCameraPosition,
}
