//! The state store: a pure reducer over `AppState`.
//!
//! Contract: `(state, action) -> state`, never mutating its input and never
//! failing for any action. Nearly every arm that touches scene or layers
//! ends with an auto re-capture: if the current frame is a keyframe, its
//! snapshot is overwritten with the post-mutation state.

use macronade_api_core::{
    AppState, AttachmentRequest, BackgroundSize, EntityId, ItemKind, LayerItem, LayerKind,
    LayersState, SceneItem, SceneState, Selection,
};

use crate::actions::{Action, AssetCategory, ItemPatch, MoveDirection};
use crate::interp::finite;
use crate::selection;
use crate::snapshot;

const DEFAULT_PANTIN_SIZE: (f32, f32) = (180.0, 320.0);
const DEFAULT_OBJET_SIZE: (f32, f32) = (120.0, 120.0);
/// Successive imports land offset by this much so new items don't stack.
const IMPORT_OFFSET_STEP: f32 = 24.0;
const IMPORT_BASE_POS: f32 = 120.0;

/// Apply one action, producing the next state.
pub fn reduce(state: &AppState, action: &Action) -> AppState {
    let mut next = state.clone();
    match action {
        // ---- Timeline ----
        Action::SetFps { fps } => {
            next.timeline.fps = (*fps).max(1);
        }
        Action::SetRange { start, end } => {
            let (start, end) = if start <= end {
                (*start, *end)
            } else {
                (*end, *start)
            };
            next.timeline.start_frame = start;
            next.timeline.end_frame = end;
            next.timeline.current_frame = next.timeline.clamp_frame(next.timeline.current_frame);
        }
        Action::SetCurrentFrame { frame } => {
            next.timeline.current_frame = next.timeline.clamp_frame(*frame);
            snapshot::reconstruct(&mut next);
        }
        Action::ToggleLoop => {
            next.timeline.loop_enabled = !next.timeline.loop_enabled;
        }
        Action::TogglePlay => {
            next.timeline.is_playing = !next.timeline.is_playing;
        }
        Action::AddKeyframe => {
            let frame = next.timeline.current_frame;
            snapshot::insert_keyframe(&mut next.timeline, frame);
            let snap = snapshot::capture(&next);
            next.timeline.snapshots.insert(frame, snap);
        }
        Action::RemoveKeyframe { frame } => {
            next.timeline.keyframes.retain(|k| k != frame);
            next.timeline.snapshots.remove(frame);
        }
        // Jumps only consider keyframes inside the playback range, so the
        // playhead can never leave [start_frame, end_frame].
        Action::JumpPrevKeyframe => {
            let current = next.timeline.current_frame;
            if let Some(prev) = next
                .timeline
                .keyframes
                .iter()
                .rev()
                .copied()
                .find(|k| *k < current && next.timeline.clamp_frame(*k) == *k)
            {
                next.timeline.current_frame = prev;
                snapshot::reconstruct(&mut next);
            }
        }
        Action::JumpNextKeyframe => {
            let current = next.timeline.current_frame;
            if let Some(kf) = next
                .timeline
                .keyframes
                .iter()
                .copied()
                .find(|k| *k > current && next.timeline.clamp_frame(*k) == *k)
            {
                next.timeline.current_frame = kf;
                snapshot::reconstruct(&mut next);
            }
        }

        // ---- Layers ----
        Action::AddLayer => {
            let id = next.next_free_id();
            next.layers.items.push(LayerItem {
                id,
                name: default_layer_name(&next.layers),
                visible: true,
                locked: false,
                kind: LayerKind::Item,
            });
            next.layers.active_layer_id = Some(id);
            next.selection = Some(Selection::Layer { layer_id: id });
            snapshot::recapture_if_keyframe(&mut next);
        }
        Action::RemoveLayer { layer_id } => {
            let removable = *layer_id != EntityId::BACKGROUND
                && next.layers.layer(*layer_id).map_or(false, |l| !l.locked);
            if removable {
                next.layers.items.retain(|layer| layer.id != *layer_id);
                next.scene.items.retain(|item| item.id != *layer_id);
                strip_dangling_attachments(&mut next.scene);
                let fallback = next.layers.items.last().map(|layer| layer.id);
                next.layers.active_layer_id = fallback;
                next.selection = fallback.map(|layer_id| Selection::Layer { layer_id });
                selection::revalidate(&mut next);
                snapshot::recapture_if_keyframe(&mut next);
            }
        }
        Action::MoveLayer {
            layer_id,
            direction,
        } => {
            if let Some(idx) = next.layers.items.iter().position(|l| l.id == *layer_id) {
                let target = match direction {
                    MoveDirection::Up => idx + 1,
                    MoveDirection::Down => idx.wrapping_sub(1),
                };
                if target < next.layers.items.len() {
                    next.layers.items.swap(idx, target);
                    snapshot::recapture_if_keyframe(&mut next);
                }
            }
        }
        Action::ToggleLayerVisible { layer_id } => {
            if let Some(layer) = next.layers.layer_mut(*layer_id) {
                layer.visible = !layer.visible;
                snapshot::recapture_if_keyframe(&mut next);
            }
        }
        Action::ToggleLayerLocked { layer_id } => {
            if let Some(layer) = next.layers.layer_mut(*layer_id) {
                layer.locked = !layer.locked;
                snapshot::recapture_if_keyframe(&mut next);
            }
        }
        Action::SetActiveLayer { layer_id } => {
            if next.layers.layer(*layer_id).is_some() {
                next.layers.active_layer_id = Some(*layer_id);
                next.selection = if next.scene.item(*layer_id).is_some() {
                    Some(Selection::Scene { item_id: *layer_id })
                } else {
                    Some(Selection::Layer {
                        layer_id: *layer_id,
                    })
                };
                snapshot::recapture_if_keyframe(&mut next);
            }
        }

        // ---- Scene ----
        Action::ImportAsset {
            category,
            path,
            label,
            size,
        } => {
            import_asset(&mut next, *category, path, label, *size);
            snapshot::recapture_if_keyframe(&mut next);
        }
        Action::SetBackground { path } => {
            next.scene.background_path = path.clone();
            next.scene.background_size = None;
            snapshot::recapture_if_keyframe(&mut next);
        }
        Action::SetBackgroundSize { width, height } => {
            next.scene.background_size = Some(BackgroundSize {
                width: finite(*width),
                height: finite(*height),
            });
            snapshot::recapture_if_keyframe(&mut next);
        }
        Action::SelectItem { item_id } => {
            next.selection = next
                .scene
                .item(*item_id)
                .map(|item| Selection::Scene { item_id: item.id });
        }
        Action::UpdateItem { item_id, patch } => {
            if let Some(item) = next.scene.item_mut(*item_id) {
                apply_patch(item, patch);
                snapshot::recapture_if_keyframe(&mut next);
            }
        }
        Action::SetMemberRotation {
            item_id,
            member_id,
            degrees,
        } => {
            if let Some(item) = next.scene.item_mut(*item_id) {
                item.member_rotations
                    .insert(member_id.clone(), finite(*degrees));
                snapshot::recapture_if_keyframe(&mut next);
            }
        }
        Action::ResetScene => {
            next.scene = SceneState::default();
            next.layers = LayersState::default();
            next.selection = None;
            next.attachment_request = None;
            snapshot::recapture_if_keyframe(&mut next);
        }

        // ---- Attachment requests ----
        Action::RequestAttach {
            item_id,
            pantin_id,
            member_id,
        } => {
            // A new request overwrites any unresolved prior one.
            next.attachment_request = Some(AttachmentRequest::Attach {
                item_id: *item_id,
                pantin_id: *pantin_id,
                member_id: member_id.clone(),
            });
        }
        Action::RequestDetach { item_id } => {
            next.attachment_request = Some(AttachmentRequest::Detach { item_id: *item_id });
        }
        Action::ClearAttachmentRequest => {
            next.attachment_request = None;
        }

        Action::ClearSelection => {
            next.selection = None;
        }
    }
    next
}

/// "Layer N" with the smallest N not already taken by an existing name.
fn default_layer_name(layers: &LayersState) -> String {
    let mut n = 1usize;
    loop {
        let candidate = format!("Layer {n}");
        if !layers.items.iter().any(|layer| layer.name == candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Drop attachments whose pantin no longer exists in the scene.
fn strip_dangling_attachments(scene: &mut SceneState) {
    let pantin_ids: Vec<EntityId> = scene
        .items
        .iter()
        .filter(|item| item.kind == ItemKind::Pantin)
        .map(|item| item.id)
        .collect();
    for item in &mut scene.items {
        if let Some(att) = &item.attachment {
            if !pantin_ids.contains(&att.pantin_id) {
                log::debug!("stripping attachment of item {} to removed pantin", item.id);
                item.attachment = None;
            }
        }
    }
}

fn import_asset(
    state: &mut AppState,
    category: AssetCategory,
    path: &str,
    label: &str,
    size: Option<(f32, f32)>,
) {
    match category {
        AssetCategory::Background => {
            state.scene.background_path = Some(path.to_string());
            state.scene.background_size = None;
            if !label.is_empty() {
                if let Some(bg) = state.layers.layer_mut(EntityId::BACKGROUND) {
                    bg.name = label.to_string();
                }
            }
        }
        AssetCategory::Pantin | AssetCategory::Objet => {
            let kind = match category {
                AssetCategory::Pantin => ItemKind::Pantin,
                _ => ItemKind::Objet,
            };
            let (width, height) = size.unwrap_or(match kind {
                ItemKind::Pantin => DEFAULT_PANTIN_SIZE,
                ItemKind::Objet => DEFAULT_OBJET_SIZE,
            });
            let id = state.next_free_id();
            let offset = IMPORT_BASE_POS + IMPORT_OFFSET_STEP * state.scene.items.len() as f32;
            state.scene.items.push(SceneItem {
                id,
                kind,
                label: label.to_string(),
                asset_path: path.to_string(),
                x: offset,
                y: offset,
                scale: 1.0,
                rotation: 0.0,
                width: finite(width),
                height: finite(height),
                variants: Default::default(),
                member_rotations: Default::default(),
                attachment: None,
            });
            state.layers.items.push(LayerItem {
                id,
                name: label.to_string(),
                visible: true,
                locked: false,
                kind: LayerKind::Item,
            });
            state.layers.active_layer_id = Some(id);
            state.selection = Some(Selection::Scene { item_id: id });
        }
    }
}

/// Shallow merge: provided fields replace, absent fields stay. Numeric
/// fields are sanitized so NaN/Infinity never enter the state.
fn apply_patch(item: &mut SceneItem, patch: &ItemPatch) {
    if let Some(label) = &patch.label {
        item.label = label.clone();
    }
    if let Some(asset_path) = &patch.asset_path {
        item.asset_path = asset_path.clone();
    }
    if let Some(x) = patch.x {
        item.x = finite(x);
    }
    if let Some(y) = patch.y {
        item.y = finite(y);
    }
    if let Some(scale) = patch.scale {
        item.scale = finite(scale);
    }
    if let Some(rotation) = patch.rotation {
        item.rotation = finite(rotation);
    }
    if let Some(width) = patch.width {
        item.width = finite(width);
    }
    if let Some(height) = patch.height {
        item.height = finite(height);
    }
    if let Some(variants) = &patch.variants {
        item.variants = variants.clone();
    }
    if let Some(member_rotations) = &patch.member_rotations {
        item.member_rotations = member_rotations
            .iter()
            .map(|(k, v)| (k.clone(), finite(*v)))
            .collect();
    }
}
