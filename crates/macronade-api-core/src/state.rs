//! Application state: timeline, layers, scene, selection.
//!
//! Every type here is a plain serde-serializable value. The in-memory state
//! and the project-file JSON share the same shape (camelCase field names),
//! so persistence is a straight serialize of the non-transient parts.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::ids::EntityId;

/// Discriminates the unique background layer from ordinary item layers.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Background,
    Item,
}

/// One entry in the layer stack.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerItem {
    pub id: EntityId,
    pub name: String,
    pub visible: bool,
    pub locked: bool,
    pub kind: LayerKind,
}

impl LayerItem {
    /// The default background layer: id 0, locked.
    pub fn background() -> Self {
        LayerItem {
            id: EntityId::BACKGROUND,
            name: "Décor".to_string(),
            visible: true,
            locked: true,
            kind: LayerKind::Background,
        }
    }
}

/// A rigged figure (pantin) or a free object (objet).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Pantin,
    Objet,
}

/// Pins an objet's placement to a pantin member's local space.
/// `offset_x`/`offset_y` are the anchor point in member-local coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub pantin_id: EntityId,
    pub member_id: String,
    pub offset_x: f32,
    pub offset_y: f32,
}

/// One item placed in the scene and animated on the timeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneItem {
    pub id: EntityId,
    pub kind: ItemKind,
    pub label: String,
    pub asset_path: String,
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    pub rotation: f32,
    pub width: f32,
    pub height: f32,
    /// Chosen option per named variant group (pantins only).
    /// An absent map and an empty map are equivalent.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub variants: HashMap<String, String>,
    /// Additional local rotation per rig member, in degrees.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub member_rotations: HashMap<String, f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Attachment>,
}

/// Cached pixel size of the background asset.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BackgroundSize {
    pub width: f32,
    pub height: f32,
}

/// Background plus the ordered list of scene items (bottom to top).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneState {
    pub background_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_size: Option<BackgroundSize>,
    pub items: Vec<SceneItem>,
}

impl SceneState {
    pub fn item(&self, id: EntityId) -> Option<&SceneItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn item_mut(&mut self, id: EntityId) -> Option<&mut SceneItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }
}

/// Layer stack plus the active-layer pointer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayersState {
    pub items: Vec<LayerItem>,
    pub active_layer_id: Option<EntityId>,
}

impl Default for LayersState {
    fn default() -> Self {
        LayersState {
            items: vec![LayerItem::background()],
            active_layer_id: Some(EntityId::BACKGROUND),
        }
    }
}

impl LayersState {
    pub fn layer(&self, id: EntityId) -> Option<&LayerItem> {
        self.items.iter().find(|layer| layer.id == id)
    }

    pub fn layer_mut(&mut self, id: EntityId) -> Option<&mut LayerItem> {
        self.items.iter_mut().find(|layer| layer.id == id)
    }
}

/// Immutable deep copy of scene + layers captured at a keyframe.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeyframeSnapshot {
    pub scene: SceneState,
    pub layers: LayersState,
}

/// Timeline bounds, playhead, and the keyframe table.
///
/// Invariants: `keyframes` is strictly ascending and duplicate-free, every
/// keyframe has exactly one snapshot, `current_frame` lies inside
/// `[start_frame, end_frame]`, and `fps >= 1`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineState {
    #[serde(default = "default_fps")]
    pub fps: u32,
    #[serde(default)]
    pub start_frame: u32,
    #[serde(default = "default_end_frame")]
    pub end_frame: u32,
    #[serde(default)]
    pub current_frame: u32,
    pub keyframes: Vec<u32>,
    #[serde(default, rename = "keyframeStates")]
    pub snapshots: HashMap<u32, KeyframeSnapshot>,
    #[serde(default = "default_loop_enabled")]
    pub loop_enabled: bool,
    /// Transient: playback flag, never persisted.
    #[serde(skip)]
    pub is_playing: bool,
}

fn default_fps() -> u32 {
    24
}

fn default_end_frame() -> u32 {
    239
}

fn default_loop_enabled() -> bool {
    true
}

impl Default for TimelineState {
    fn default() -> Self {
        TimelineState {
            fps: default_fps(),
            start_frame: 0,
            end_frame: default_end_frame(),
            current_frame: 0,
            keyframes: Vec::new(),
            snapshots: HashMap::new(),
            loop_enabled: true,
            is_playing: false,
        }
    }
}

impl TimelineState {
    pub fn is_keyframe(&self, frame: u32) -> bool {
        self.keyframes.binary_search(&frame).is_ok()
    }

    pub fn clamp_frame(&self, frame: u32) -> u32 {
        frame.clamp(self.start_frame, self.end_frame)
    }
}

/// What the user currently has selected, if anything.
/// Must always reference an existing entity; re-validated after every
/// structural mutation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Selection {
    Layer {
        #[serde(rename = "layerId")]
        layer_id: EntityId,
    },
    Scene {
        #[serde(rename = "itemId")]
        item_id: EntityId,
    },
}

/// Transient one-shot attach/detach command, consumed by the transform
/// resolver on the next "surface is laid out" opportunity and then cleared.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AttachmentRequest {
    Attach {
        #[serde(rename = "itemId")]
        item_id: EntityId,
        #[serde(rename = "pantinId")]
        pantin_id: EntityId,
        #[serde(rename = "memberId")]
        member_id: String,
    },
    Detach {
        #[serde(rename = "itemId")]
        item_id: EntityId,
    },
}

/// The whole editor state. Created once, mutated exclusively through the
/// reducer, alive for the editor session.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub timeline: TimelineState,
    pub layers: LayersState,
    pub scene: SceneState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<Selection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment_request: Option<AttachmentRequest>,
}

impl AppState {
    pub fn new() -> Self {
        AppState::default()
    }

    /// Smallest unused id across layers and scene items.
    pub fn next_free_id(&self) -> EntityId {
        EntityId::next_free(
            self.layers
                .items
                .iter()
                .map(|layer| layer.id)
                .chain(self.scene.items.iter().map(|item| item.id)),
        )
    }
}
