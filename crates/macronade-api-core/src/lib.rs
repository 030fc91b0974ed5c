//! macronade-api-core: scene/layer/timeline data model (core, renderer-agnostic)

pub mod error;
pub mod ids;
pub mod state;

pub use error::ProjectError;
pub use ids::EntityId;
pub use state::{
    AppState, Attachment, AttachmentRequest, BackgroundSize, ItemKind, KeyframeSnapshot,
    LayerItem, LayerKind, LayersState, SceneItem, SceneState, Selection, TimelineState,
};
