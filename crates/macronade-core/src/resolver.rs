//! Transform resolution & attachment.
//!
//! Computes each item's render-time geometry, rewriting it when the item is
//! attached to a rig member, and applies the one-shot attach/detach
//! requests staged by the reducer.

use macronade_api_core::{
    AppState, Attachment, AttachmentRequest, EntityId, ItemKind, SceneItem, SceneState,
};

use crate::snapshot;
use crate::transform::{Affine2, TransformProvider};

/// An item's final render-time geometry after resolving any attachment.
/// `x`/`y` is the top-left corner; `width`/`height` are already scaled.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EffectiveTransform {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    pub rotation: f32,
    pub width: f32,
    pub height: f32,
}

fn unattached(item: &SceneItem) -> EffectiveTransform {
    EffectiveTransform {
        x: item.x,
        y: item.y,
        scale: item.scale,
        rotation: item.rotation,
        width: item.width * item.scale,
        height: item.height * item.scale,
    }
}

/// The attached member's transform expressed in canvas space:
/// `canvas⁻¹ ∘ member_screen`.
fn member_in_canvas(
    provider: &dyn TransformProvider,
    pantin_id: EntityId,
    member_id: &str,
) -> Option<Affine2> {
    let member_screen = provider.member_transform(pantin_id, member_id)?;
    let canvas_inv = provider.canvas_transform().inverse()?;
    Some(canvas_inv.compose(&member_screen))
}

/// Resolve an item's effective transform, querying the provider when the
/// item is attached. A dangling attachment (missing pantin, member not laid
/// out) falls back to the item's absolute placement.
pub fn resolve_effective(
    scene: &SceneState,
    item: &SceneItem,
    provider: &dyn TransformProvider,
) -> EffectiveTransform {
    let Some(att) = &item.attachment else {
        return unattached(item);
    };
    let pantin_ok = scene
        .item(att.pantin_id)
        .map_or(false, |p| p.kind == ItemKind::Pantin);
    if !pantin_ok {
        log::debug!(
            "item {} attached to missing pantin {}; using absolute placement",
            item.id,
            att.pantin_id
        );
        return unattached(item);
    }
    let Some(member) = member_in_canvas(provider, att.pantin_id, &att.member_id) else {
        return unattached(item);
    };

    let scale = member.scale_factor() * item.scale;
    let rotation = member.rotation_deg() + item.rotation;
    let (anchor_x, anchor_y) = member.apply(att.offset_x, att.offset_y);
    let width = item.width * scale;
    let height = item.height * scale;
    EffectiveTransform {
        x: anchor_x - width / 2.0,
        y: anchor_y - height / 2.0,
        scale,
        rotation,
        width,
        height,
    }
}

/// Consume the pending attachment request, if any.
///
/// Returns the new state with the request cleared; `None` means there was
/// nothing pending. The request is cleared after exactly one resolution
/// attempt, success or failure: an unresolvable member drops the request
/// without altering the item. Both attach and detach preserve the item's
/// effective transform across the representation change.
pub fn resolve_attachment_request(
    state: &AppState,
    provider: &dyn TransformProvider,
) -> Option<AppState> {
    let request = state.attachment_request.clone()?;
    let mut next = state.clone();
    next.attachment_request = None;

    match request {
        AttachmentRequest::Attach {
            item_id,
            pantin_id,
            member_id,
        } => apply_attach(state, &mut next, provider, item_id, pantin_id, member_id),
        AttachmentRequest::Detach { item_id } => apply_detach(state, &mut next, provider, item_id),
    }

    snapshot::recapture_if_keyframe(&mut next);
    Some(next)
}

fn apply_attach(
    state: &AppState,
    next: &mut AppState,
    provider: &dyn TransformProvider,
    item_id: EntityId,
    pantin_id: EntityId,
    member_id: String,
) {
    let Some(item) = state.scene.item(item_id) else {
        log::warn!("attach request for missing item {item_id}; dropped");
        return;
    };
    let pantin_ok = state
        .scene
        .item(pantin_id)
        .map_or(false, |p| p.kind == ItemKind::Pantin);
    if item.kind != ItemKind::Objet || !pantin_ok {
        log::warn!("attach request {item_id} -> {pantin_id}/{member_id} is not objet->pantin; dropped");
        return;
    }
    let Some(member) = member_in_canvas(provider, pantin_id, &member_id) else {
        log::warn!("member {member_id} of pantin {pantin_id} not laid out; attach dropped");
        return;
    };
    let Some(member_inv) = member.inverse() else {
        log::warn!("member {member_id} transform is singular; attach dropped");
        return;
    };
    let member_scale = member.scale_factor();
    if member_scale < 1e-6 {
        log::warn!("member {member_id} has zero scale; attach dropped");
        return;
    }

    // Effective transform the instant before attaching; the compensated
    // offsets/scale/rotation must reproduce it exactly afterwards.
    let eff = resolve_effective(&state.scene, item, provider);
    let center_x = eff.x + eff.width / 2.0;
    let center_y = eff.y + eff.height / 2.0;
    let (offset_x, offset_y) = member_inv.apply(center_x, center_y);

    if let Some(target) = next.scene.item_mut(item_id) {
        target.scale = eff.scale / member_scale;
        target.rotation = eff.rotation - member.rotation_deg();
        target.attachment = Some(Attachment {
            pantin_id,
            member_id,
            offset_x,
            offset_y,
        });
    }
}

fn apply_detach(
    state: &AppState,
    next: &mut AppState,
    provider: &dyn TransformProvider,
    item_id: EntityId,
) {
    let Some(item) = state.scene.item(item_id) else {
        log::warn!("detach request for missing item {item_id}; dropped");
        return;
    };
    let Some(att) = &item.attachment else {
        return;
    };
    // Best effort: if the member cannot be resolved right now, the request
    // is discarded and the item keeps its attached representation.
    if member_in_canvas(provider, att.pantin_id, &att.member_id).is_none()
        && state
            .scene
            .item(att.pantin_id)
            .map_or(false, |p| p.kind == ItemKind::Pantin)
    {
        log::warn!(
            "member {} of pantin {} not laid out; detach dropped",
            att.member_id,
            att.pantin_id
        );
        return;
    }

    let eff = resolve_effective(&state.scene, item, provider);
    if let Some(target) = next.scene.item_mut(item_id) {
        target.x = eff.x;
        target.y = eff.y;
        target.scale = eff.scale;
        target.rotation = eff.rotation;
        target.attachment = None;
    }
}
