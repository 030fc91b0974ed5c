//! Macronade animation core (renderer-agnostic)
//!
//! The action-driven state engine behind the puppet editor: a pure reducer
//! over `AppState`, a keyframe snapshot & interpolation engine that
//! reconstructs any frame from sparse keyframes, and transform resolution
//! for items attached to rig members. Hosts drive everything through
//! `Engine::dispatch`; rendering technology stays behind the
//! `TransformProvider` trait.

pub mod actions;
pub mod engine;
pub mod interp;
pub mod manifest;
pub mod project;
pub mod reducer;
pub mod resolver;
pub mod selection;
pub mod snapshot;
pub mod transform;

// Re-exports for consumers (hosts and tests)
pub use actions::{Action, AssetCategory, ItemPatch, MoveDirection};
pub use engine::Engine;
pub use interp::{interpolate_snapshot, lerp, lerp_angle};
pub use manifest::{PantinSpec, RigManifest};
pub use project::{export_project_json, parse_project_json, ProjectFile};
pub use reducer::reduce;
pub use resolver::{resolve_attachment_request, resolve_effective, EffectiveTransform};
pub use snapshot::capture;
pub use transform::{Affine2, TransformProvider};

pub use macronade_api_core::{
    AppState, Attachment, AttachmentRequest, BackgroundSize, EntityId, ItemKind,
    KeyframeSnapshot, LayerItem, LayerKind, LayersState, ProjectError, SceneItem, SceneState,
    Selection, TimelineState,
};
