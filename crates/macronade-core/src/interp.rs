//! Interpolation helpers: linear blends, shortest-arc angles, and
//! whole-snapshot interpolation between two keyframes.

use hashbrown::HashMap;

use macronade_api_core::{Attachment, KeyframeSnapshot, SceneItem};

/// Non-finite inputs (user-entered fields, corrupt angle data) are treated
/// as 0 so they never propagate through the math.
#[inline]
pub fn finite(v: f32) -> f32 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// Linear interpolation of scalars.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    let (a, b) = (finite(a), finite(b));
    a + (b - a) * t
}

/// Shortest-arc angular interpolation in degrees.
///
/// The delta is normalized into `(-180, 180]` before scaling by `t`, so
/// 350° → 10° takes the +20° path rather than −340°.
#[inline]
pub fn lerp_angle(a: f32, b: f32, t: f32) -> f32 {
    let (a, b) = (finite(a), finite(b));
    let mut delta = (b - a).rem_euclid(360.0);
    if delta > 180.0 {
        delta -= 360.0;
    }
    a + delta * t
}

/// Interpolate one scene item between its `prev` and `next` keyframe poses.
fn interpolate_item(base: &SceneItem, other: &SceneItem, t: f32) -> SceneItem {
    let mut out = base.clone();
    out.x = lerp(base.x, other.x, t);
    out.y = lerp(base.y, other.y, t);
    out.scale = lerp(base.scale, other.scale, t);
    out.rotation = lerp_angle(base.rotation, other.rotation, t);
    out.member_rotations = interpolate_member_rotations(
        &base.member_rotations,
        &other.member_rotations,
        t,
    );
    out.attachment = interpolate_attachment(&base.attachment, &other.attachment, t);
    out
}

/// Union of member keys from both sides; a missing entry counts as 0°.
fn interpolate_member_rotations(
    base: &HashMap<String, f32>,
    other: &HashMap<String, f32>,
    t: f32,
) -> HashMap<String, f32> {
    let mut out = HashMap::with_capacity(base.len().max(other.len()));
    for (member, &a) in base {
        let b = other.get(member).copied().unwrap_or(0.0);
        out.insert(member.clone(), lerp_angle(a, b, t));
    }
    for (member, &b) in other {
        if !base.contains_key(member) {
            out.insert(member.clone(), lerp_angle(0.0, b, t));
        }
    }
    out
}

/// Offsets interpolate only while both keyframes attach the item to the
/// identical (pantin, member) pair; any other combination keeps the prev
/// side verbatim.
fn interpolate_attachment(
    base: &Option<Attachment>,
    other: &Option<Attachment>,
    t: f32,
) -> Option<Attachment> {
    match (base, other) {
        (Some(a), Some(b)) if a.pantin_id == b.pantin_id && a.member_id == b.member_id => {
            Some(Attachment {
                pantin_id: a.pantin_id,
                member_id: a.member_id.clone(),
                offset_x: lerp(a.offset_x, b.offset_x, t),
                offset_y: lerp(a.offset_y, b.offset_y, t),
            })
        }
        _ => base.clone(),
    }
}

/// Compute the snapshot for an intermediate frame.
///
/// Items are matched by id. Items present only in `prev` are carried
/// through unmodified; items absent from `prev` are ignored. Background and
/// layers come from `prev` verbatim.
pub fn interpolate_snapshot(
    prev: &KeyframeSnapshot,
    next: &KeyframeSnapshot,
    t: f32,
) -> KeyframeSnapshot {
    let mut out = prev.clone();
    for item in &mut out.scene.items {
        if let Some(other) = next.scene.items.iter().find(|i| i.id == item.id) {
            *item = interpolate_item(item, other, t);
        }
    }
    out
}
