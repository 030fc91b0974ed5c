//! Selection & integrity maintenance.
//!
//! Dangling references can arise from legitimate edits (removing the item
//! that is currently selected, reconstructing a frame captured before a
//! layer existed); they are healed silently rather than raised.

use macronade_api_core::{AppState, Selection};

/// Re-validate the selection and the active-layer pointer against the
/// current layers/scene. Called after every structural mutation.
pub fn revalidate(state: &mut AppState) {
    let keep = match &state.selection {
        Some(Selection::Layer { layer_id }) => state.layers.layer(*layer_id).is_some(),
        Some(Selection::Scene { item_id }) => state.scene.item(*item_id).is_some(),
        None => true,
    };
    if !keep {
        log::debug!("selection referenced a removed entity; clearing");
        state.selection = None;
    }

    let active_ok = state
        .layers
        .active_layer_id
        .map_or(true, |id| state.layers.layer(id).is_some());
    if !active_ok {
        // Fall back to the topmost remaining layer.
        state.layers.active_layer_id = state.layers.items.last().map(|layer| layer.id);
    }
}
