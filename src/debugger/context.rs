use super::controller::Controller;
use super::session::ScriptRunner;
use super::stepping::StepMove;
use crate::config::Config;
use crate::error::Result;
use crate::registry::SessionStore;
use crate::state::StepState;
use std::path::Path;
use tracing::info;

/// Per-step entry point. Holds nothing between calls except how to run the
/// debugger; session state lives in the [`SessionStore`] passed in.
pub struct DebugContext<R: ScriptRunner> {
    config: Config,
    runner: R,
}

impl<R: ScriptRunner> DebugContext<R> {
    pub fn new(config: Config, runner: R) -> Self {
        Self { config, runner }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Replay `executable` for `steps` instructions and build the snapshot.
    pub fn capture(&self, executable: &Path, steps: usize) -> Result<StepState> {
        let capture = Controller::new(&self.config, &self.runner).capture(executable, steps)?;
        Ok(StepState::from_capture(&capture))
    }

    /// Move a session's step count and capture the new position. The count
    /// is only stored once the capture succeeded, so a failed step leaves the
    /// session where it was.
    pub fn step_session(&self, store: &SessionStore, id: &str, movement: StepMove) -> Result<StepState> {
        store.with_session(id, |session| {
            let target = movement.apply(session.steps);
            let state = self.capture(&session.executable, target)?;
            info!(%id, ?movement, steps = target, "stepped");
            session.steps = target;
            Ok(state)
        })
    }
}
