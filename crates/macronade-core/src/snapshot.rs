//! Keyframe snapshot capture and frame reconstruction.
//!
//! Capture policy: a snapshot is written for the current frame exactly when
//! (a) the user explicitly adds a keyframe there, or (b) any action that
//! mutates scene/layers lands while the current frame is already a
//! keyframe. Scrubbing to a non-keyframe frame never writes one.

use macronade_api_core::{AppState, KeyframeSnapshot, TimelineState};

use crate::interp::interpolate_snapshot;
use crate::selection;

/// Deep copy of the animatable state (scene + layers, including the
/// active-layer pointer).
pub fn capture(state: &AppState) -> KeyframeSnapshot {
    KeyframeSnapshot {
        scene: state.scene.clone(),
        layers: state.layers.clone(),
    }
}

/// Auto re-capture: overwrite the current frame's snapshot if that frame is
/// a keyframe. Called by every reducer arm that touches scene or layers.
pub fn recapture_if_keyframe(state: &mut AppState) {
    let frame = state.timeline.current_frame;
    if state.timeline.is_keyframe(frame) {
        let snap = capture(state);
        state.timeline.snapshots.insert(frame, snap);
    }
}

/// Insert a frame into the sorted, duplicate-free keyframe list.
pub fn insert_keyframe(timeline: &mut TimelineState, frame: u32) {
    if let Err(pos) = timeline.keyframes.binary_search(&frame) {
        timeline.keyframes.insert(pos, frame);
    }
}

/// Greatest keyframe <= `frame` and smallest keyframe >= `frame` that both
/// carry a snapshot.
fn bracketing(timeline: &TimelineState, frame: u32) -> (Option<u32>, Option<u32>) {
    let prev = timeline
        .keyframes
        .iter()
        .rev()
        .copied()
        .find(|k| *k <= frame && timeline.snapshots.contains_key(k));
    let next = timeline
        .keyframes
        .iter()
        .copied()
        .find(|k| *k >= frame && timeline.snapshots.contains_key(k));
    (prev, next)
}

/// Rebuild `scene`/`layers` for the current frame from bracketing keyframes.
///
/// With no keyframes at all the state is left untouched; with only one side
/// available that side's snapshot is applied verbatim; otherwise the two
/// snapshots are interpolated at `t = (f - prev) / (next - prev)`.
pub fn reconstruct(state: &mut AppState) {
    let frame = state.timeline.current_frame;
    let snapshot = match bracketing(&state.timeline, frame) {
        (None, None) => return,
        (Some(prev), Some(next)) if prev == next => state.timeline.snapshots[&prev].clone(),
        (Some(prev), None) => state.timeline.snapshots[&prev].clone(),
        (None, Some(next)) => state.timeline.snapshots[&next].clone(),
        (Some(prev), Some(next)) => {
            let t = (frame - prev) as f32 / (next - prev) as f32;
            interpolate_snapshot(
                &state.timeline.snapshots[&prev],
                &state.timeline.snapshots[&next],
                t,
            )
        }
    };
    state.scene = snapshot.scene;
    state.layers = snapshot.layers;
    selection::revalidate(state);
}
