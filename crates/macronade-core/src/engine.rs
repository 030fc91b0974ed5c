//! Engine: explicit owner of `AppState` plus the playback clock.
//!
//! There is no ambient/global store: hosts hold an `Engine` and drive it
//! through `dispatch`, `tick` and `resolve_pending_attachment`. The reducer
//! remains the only mutation path: the clock itself just dispatches
//! actions.

use macronade_api_core::{AppState, ProjectError};

use crate::actions::Action;
use crate::project::{parse_project_json, ProjectFile};
use crate::reducer::reduce;
use crate::resolver::resolve_attachment_request;
use crate::transform::TransformProvider;

#[derive(Debug, Default)]
pub struct Engine {
    state: AppState,
    /// Wall-clock seconds not yet converted into whole frames. Keeping the
    /// remainder means drift never exceeds one frame.
    clock_accum: f64,
}

impl Engine {
    pub fn new() -> Self {
        Engine::default()
    }

    pub fn with_state(state: AppState) -> Self {
        Engine {
            state,
            clock_accum: 0.0,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Apply one action through the reducer.
    pub fn dispatch(&mut self, action: &Action) {
        self.state = reduce(&self.state, action);
    }

    /// Advance playback by `dt` wall-clock seconds.
    ///
    /// Whole frames are advanced at the configured fps; the fractional
    /// remainder is carried over. Past the end of the range the playhead
    /// wraps to the start when looping, otherwise clamps to the end and
    /// halts.
    pub fn tick(&mut self, dt: f64) {
        let timeline = &self.state.timeline;
        if !timeline.is_playing {
            return;
        }
        self.clock_accum += dt.max(0.0);
        let fps = timeline.fps.max(1) as f64;
        let frames = (self.clock_accum * fps).floor() as u64;
        if frames == 0 {
            return;
        }
        self.clock_accum -= frames as f64 / fps;

        let (start, end, current) = (
            timeline.start_frame,
            timeline.end_frame,
            timeline.current_frame,
        );
        let advanced = u64::from(current - start) + frames;
        let span = u64::from(end - start) + 1;
        if advanced > u64::from(end - start) {
            if timeline.loop_enabled {
                let frame = start + (advanced % span) as u32;
                self.dispatch(&Action::SetCurrentFrame { frame });
            } else {
                self.dispatch(&Action::SetCurrentFrame { frame: end });
                self.dispatch(&Action::TogglePlay);
                self.clock_accum = 0.0;
            }
        } else {
            let frame = start + advanced as u32;
            self.dispatch(&Action::SetCurrentFrame { frame });
        }
    }

    /// Resolve the pending attach/detach request against the live layout.
    ///
    /// Called by the host on the next "surface is laid out" opportunity
    /// after a request was staged, and after any playback frame update in
    /// the same tick, so attach/detach always wins over a concurrently
    /// arriving frame change. Returns whether a request was consumed.
    pub fn resolve_pending_attachment(&mut self, provider: &dyn TransformProvider) -> bool {
        match resolve_attachment_request(&self.state, provider) {
            Some(next) => {
                self.state = next;
                true
            }
            None => false,
        }
    }

    /// Replace the whole state from a project file. Rejection leaves the
    /// current state untouched.
    pub fn load_project(&mut self, json: &str) -> Result<(), ProjectError> {
        let file = parse_project_json(json)?;
        self.state = file.into_state();
        self.clock_accum = 0.0;
        Ok(())
    }

    pub fn export_project(&self) -> ProjectFile {
        ProjectFile::from_state(&self.state)
    }
}
