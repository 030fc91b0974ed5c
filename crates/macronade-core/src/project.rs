//! Project-file import/export.
//!
//! The core defines the JSON shape; dialog/save-load plumbing belongs to
//! the host. A file is accepted only if `timeline.keyframes`,
//! `layers.items` and `scene.items` are present and are arrays; anything
//! else is rejected before any state mutation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use macronade_api_core::{AppState, LayersState, ProjectError, SceneState, TimelineState};

use crate::selection;

fn default_version() -> u32 {
    1
}

/// The persisted shape: everything except the transient parts of the state
/// (`selection`, `attachment_request`, `is_playing`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectFile {
    #[serde(default = "default_version")]
    pub version: u32,
    pub timeline: TimelineState,
    pub layers: LayersState,
    pub scene: SceneState,
}

impl ProjectFile {
    pub fn from_state(state: &AppState) -> ProjectFile {
        ProjectFile {
            version: default_version(),
            timeline: state.timeline.clone(),
            layers: state.layers.clone(),
            scene: state.scene.clone(),
        }
    }

    /// Build a fresh `AppState`: transient fields start cleared.
    pub fn into_state(self) -> AppState {
        let mut state = AppState {
            timeline: self.timeline,
            layers: self.layers,
            scene: self.scene,
            selection: None,
            attachment_request: None,
        };
        state.timeline.is_playing = false;
        selection::revalidate(&mut state);
        state
    }
}

fn expect_array(root: &Value, pointer: &str, label: &'static str) -> Result<(), ProjectError> {
    match root.pointer(pointer) {
        None => Err(ProjectError::MissingField(label)),
        Some(Value::Array(_)) => Ok(()),
        Some(_) => Err(ProjectError::NotAnArray(label)),
    }
}

/// Parse and validate a project file.
pub fn parse_project_json(json: &str) -> Result<ProjectFile, ProjectError> {
    let raw: Value = serde_json::from_str(json)?;
    expect_array(&raw, "/timeline/keyframes", "timeline.keyframes")?;
    expect_array(&raw, "/layers/items", "layers.items")?;
    expect_array(&raw, "/scene/items", "scene.items")?;

    let mut file: ProjectFile = serde_json::from_value(raw)?;
    normalize(&mut file.timeline);
    Ok(file)
}

/// Serialize the non-transient state to the project-file shape.
pub fn export_project_json(state: &AppState) -> Result<String, ProjectError> {
    Ok(serde_json::to_string_pretty(&ProjectFile::from_state(
        state,
    ))?)
}

/// Re-establish the timeline invariants on freshly imported data: fps >= 1,
/// ordered range, clamped playhead, sorted unique keyframes, and an exact
/// one-to-one pairing of keyframes and snapshots.
fn normalize(timeline: &mut TimelineState) {
    timeline.fps = timeline.fps.max(1);
    if timeline.start_frame > timeline.end_frame {
        std::mem::swap(&mut timeline.start_frame, &mut timeline.end_frame);
    }
    timeline.current_frame = timeline.clamp_frame(timeline.current_frame);

    timeline.keyframes.sort_unstable();
    timeline.keyframes.dedup();
    let snapshots = &timeline.snapshots;
    let orphans: Vec<u32> = timeline
        .keyframes
        .iter()
        .copied()
        .filter(|k| !snapshots.contains_key(k))
        .collect();
    if !orphans.is_empty() {
        log::warn!("dropping {} keyframes without snapshots", orphans.len());
        timeline.keyframes.retain(|k| !orphans.contains(k));
    }
    let keyframes = &timeline.keyframes;
    timeline
        .snapshots
        .retain(|frame, _| keyframes.binary_search(frame).is_ok());
}
