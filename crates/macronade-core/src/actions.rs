//! The closed action set: the core's only mutation API.
//!
//! Any host (UI, test harness, network bridge) drives the system exclusively
//! by constructing these and passing them to the reducer. The reducer never
//! fails for any variant.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use macronade_api_core::EntityId;

/// What kind of asset an import produces.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetCategory {
    Background,
    Pantin,
    Objet,
}

/// Direction for swapping a layer with its neighbour.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
}

/// Partial update for a scene item. `None` fields are left untouched;
/// provided maps replace the item's maps wholesale (shallow merge).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPatch {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub asset_path: Option<String>,
    #[serde(default)]
    pub x: Option<f32>,
    #[serde(default)]
    pub y: Option<f32>,
    #[serde(default)]
    pub scale: Option<f32>,
    #[serde(default)]
    pub rotation: Option<f32>,
    #[serde(default)]
    pub width: Option<f32>,
    #[serde(default)]
    pub height: Option<f32>,
    #[serde(default)]
    pub variants: Option<HashMap<String, String>>,
    #[serde(default)]
    pub member_rotations: Option<HashMap<String, f32>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Action {
    // Timeline
    SetFps { fps: u32 },
    SetRange { start: u32, end: u32 },
    SetCurrentFrame { frame: u32 },
    ToggleLoop,
    TogglePlay,
    /// Marks the current frame as a keyframe and captures a snapshot.
    AddKeyframe,
    RemoveKeyframe { frame: u32 },
    JumpPrevKeyframe,
    JumpNextKeyframe,

    // Layers
    AddLayer,
    RemoveLayer { layer_id: EntityId },
    MoveLayer { layer_id: EntityId, direction: MoveDirection },
    ToggleLayerVisible { layer_id: EntityId },
    ToggleLayerLocked { layer_id: EntityId },
    SetActiveLayer { layer_id: EntityId },

    // Scene
    ImportAsset {
        category: AssetCategory,
        path: String,
        label: String,
        size: Option<(f32, f32)>,
    },
    SetBackground { path: Option<String> },
    SetBackgroundSize { width: f32, height: f32 },
    SelectItem { item_id: EntityId },
    UpdateItem { item_id: EntityId, patch: ItemPatch },
    /// Rig manipulation: set one member's additional local rotation.
    SetMemberRotation {
        item_id: EntityId,
        member_id: String,
        degrees: f32,
    },
    ResetScene,

    // Attachment requests (one-shot, resolved outside the reducer)
    RequestAttach {
        item_id: EntityId,
        pantin_id: EntityId,
        member_id: String,
    },
    RequestDetach { item_id: EntityId },
    ClearAttachmentRequest,

    ClearSelection,
}
