use crate::ui::check_bindings;
use crate::{render, update, AppState, BindError, Effect, Msg, UiSurface};

/// The single owned controller: session state plus the surface it renders into.
///
/// Effects are handed back to the caller, which owns all IO.
pub struct Controller<S: UiSurface> {
    state: AppState,
    surface: S,
}

impl<S: UiSurface> Controller<S> {
    /// Binds to `surface` and returns the startup effects (one health check).
    ///
    /// Fails if any required region is missing.
    pub fn new(surface: S) -> Result<(Self, Vec<Effect>), BindError> {
        check_bindings(&surface)?;
        let mut controller = Self {
            state: AppState::new(),
            surface,
        };
        render(&controller.state.view(), &mut controller.surface);
        Ok((controller, vec![Effect::CheckHealth]))
    }

    /// Applies a message, re-renders when the state changed, and returns the effects to run.
    pub fn dispatch(&mut self, msg: Msg) -> Vec<Effect> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        if state.consume_dirty() {
            render(&state.view(), &mut self.surface);
        }
        self.state = state;
        effects
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}
