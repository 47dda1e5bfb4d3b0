//! Process-wide diagram engine with an explicit initialization lifecycle.
//!
//! The first caller initializes the engine; later callers with a different
//! configuration only reconfigure it. The runtime is created once by the
//! host and shared (`Arc`) with every diagram view and processor.
//!
//! Renders under the active configuration share a read lock and run
//! concurrently. Initialization and reconfiguration take the write lock.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use folio_renderer::TrustedMarkup;

use crate::engine::{DiagramEngine, EngineConfig};
use crate::error::DiagramError;

struct RuntimeState {
    engine: Box<dyn DiagramEngine>,
    config: Option<EngineConfig>,
    initializations: usize,
    reconfigurations: usize,
}

/// Shared diagram engine.
pub struct DiagramRuntime {
    state: RwLock<RuntimeState>,
}

impl std::fmt::Debug for DiagramRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.read();
        f.debug_struct("DiagramRuntime")
            .field("config", &state.config)
            .field("initializations", &state.initializations)
            .field("reconfigurations", &state.reconfigurations)
            .finish_non_exhaustive()
    }
}

impl DiagramRuntime {
    pub fn new(engine: impl DiagramEngine + 'static) -> Self {
        Self {
            state: RwLock::new(RuntimeState {
                engine: Box::new(engine),
                config: None,
                initializations: 0,
                reconfigurations: 0,
            }),
        }
    }

    /// Initialize the engine once, or reconfigure it if `config` differs from
    /// the active configuration.
    ///
    /// A failed initialization leaves the runtime uninitialized so the next
    /// call retries.
    pub fn ensure_initialized(&self, config: &EngineConfig) -> Result<(), DiagramError> {
        if self.read().config.as_ref() == Some(config) {
            return Ok(());
        }
        Self::apply_config(&mut self.write(), config)
    }

    /// Render `source` with `config`, initializing or reconfiguring first.
    pub fn render(
        &self,
        session_id: &str,
        source: &str,
        config: &EngineConfig,
    ) -> Result<TrustedMarkup, DiagramError> {
        {
            let state = self.read();
            if state.config.as_ref() == Some(config) {
                return Self::render_with(state.engine.as_ref(), session_id, source);
            }
        }
        let mut state = self.write();
        Self::apply_config(&mut state, config)?;
        Self::render_with(state.engine.as_ref(), session_id, source)
    }

    fn render_with(
        engine: &dyn DiagramEngine,
        session_id: &str,
        source: &str,
    ) -> Result<TrustedMarkup, DiagramError> {
        let markup = engine.render(session_id, source)?;
        if markup.trim().is_empty() {
            return Err(DiagramError::EmptyOutput);
        }
        Ok(TrustedMarkup::from_engine_output(markup))
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.read().config.is_some()
    }

    /// How many times full initialization ran. At most one on success.
    #[must_use]
    pub fn initialization_count(&self) -> usize {
        self.read().initializations
    }

    #[must_use]
    pub fn reconfiguration_count(&self) -> usize {
        self.read().reconfigurations
    }

    fn apply_config(state: &mut RuntimeState, config: &EngineConfig) -> Result<(), DiagramError> {
        match &state.config {
            None => {
                state.engine.initialize(config)?;
                state.initializations += 1;
                state.config = Some(config.clone());
                tracing::info!(theme = %config.theme, "Diagram engine initialized");
            }
            Some(active) if active == config => {}
            Some(_) => {
                state.engine.configure(config);
                state.reconfigurations += 1;
                state.config = Some(config.clone());
                tracing::debug!(theme = %config.theme, "Diagram engine reconfigured");
            }
        }
        Ok(())
    }

    fn read(&self) -> RwLockReadGuard<'_, RuntimeState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RuntimeState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
