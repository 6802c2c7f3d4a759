//! Host collaborators consumed by the player.

use crate::error::{CoreError, Result};
use bridge_traits::capability::CapabilityDetector;
use bridge_traits::playback::MediaElementFactory;
use bridge_traits::plugin::PluginEmbedder;
use bridge_traits::time::{Clock, SystemClock};
use bridge_traits::timer::IntervalScheduler;
use core_playback::registry::PluginRegistry;
use std::fmt;
use std::rc::Rc;

/// Aggregated handle to the bridge implementations a player may need.
///
/// Only the collaborators of the backend that capability detection selects
/// are required; [`Player::new`](crate::Player::new) reports the missing one
/// otherwise. Use [`PlayerDependencies::builder`] to construct instances.
#[derive(Clone)]
pub struct PlayerDependencies {
    /// Decides which engine is usable (required)
    pub capabilities: Rc<dyn CapabilityDetector>,

    /// Creates native media elements (native backend)
    pub media_factory: Option<Rc<dyn MediaElementFactory>>,

    /// Timer source for download progress polling (native backend)
    pub scheduler: Option<Rc<dyn IntervalScheduler>>,

    /// Mounts plugin engines (plugin backend)
    pub plugin_embedder: Option<Rc<dyn PluginEmbedder>>,

    /// Inbound plugin call routing table (defaults to the thread's shared one)
    pub registry: Rc<PluginRegistry>,

    /// Source of the embed cache-busting token (defaults to the system clock)
    pub clock: Rc<dyn Clock>,
}

impl PlayerDependencies {
    pub fn builder() -> PlayerDependenciesBuilder {
        PlayerDependenciesBuilder::default()
    }

    pub(crate) fn require_media_factory(&self) -> Result<Rc<dyn MediaElementFactory>> {
        self.media_factory.clone().ok_or_else(|| CoreError::CapabilityMissing {
            capability: "MediaElementFactory".to_string(),
            message: "Native playback was selected but no media element factory was provided. \
                      Inject one with .media_factory()."
                .to_string(),
        })
    }

    pub(crate) fn require_scheduler(&self) -> Result<Rc<dyn IntervalScheduler>> {
        self.scheduler.clone().ok_or_else(scheduler_missing_error)
    }

    pub(crate) fn require_plugin_embedder(&self) -> Result<Rc<dyn PluginEmbedder>> {
        self.plugin_embedder.clone().ok_or_else(|| CoreError::CapabilityMissing {
            capability: "PluginEmbedder".to_string(),
            message: "Plugin playback was selected but no plugin embedder was provided. \
                      Inject one with .plugin_embedder()."
                .to_string(),
        })
    }
}

impl fmt::Debug for PlayerDependencies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayerDependencies")
            .field("capabilities", &"<detector>")
            .field("media_factory", &self.media_factory.is_some())
            .field("scheduler", &self.scheduler.is_some())
            .field("plugin_embedder", &self.plugin_embedder.is_some())
            .field("registry", &self.registry)
            .finish()
    }
}

#[cfg(feature = "desktop-shims")]
fn scheduler_missing_error() -> CoreError {
    CoreError::CapabilityMissing {
        capability: "IntervalScheduler".to_string(),
        message: "Native playback needs a timer for progress polling. \
                  Desktop: inject a bridge_desktop::TokioIntervalScheduler and drive it with run_until(). \
                  Tests: inject a ManualIntervalScheduler."
            .to_string(),
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn scheduler_missing_error() -> CoreError {
    CoreError::CapabilityMissing {
        capability: "IntervalScheduler".to_string(),
        message: "Native playback needs a timer for progress polling. \
                  Web: inject a setInterval-backed scheduler. \
                  Tests: inject a ManualIntervalScheduler."
            .to_string(),
    }
}

/// Builder for [`PlayerDependencies`].
#[derive(Default)]
pub struct PlayerDependenciesBuilder {
    capabilities: Option<Rc<dyn CapabilityDetector>>,
    media_factory: Option<Rc<dyn MediaElementFactory>>,
    scheduler: Option<Rc<dyn IntervalScheduler>>,
    plugin_embedder: Option<Rc<dyn PluginEmbedder>>,
    registry: Option<Rc<PluginRegistry>>,
    clock: Option<Rc<dyn Clock>>,
}

impl PlayerDependenciesBuilder {
    pub fn capabilities(mut self, detector: Rc<dyn CapabilityDetector>) -> Self {
        self.capabilities = Some(detector);
        self
    }

    pub fn media_factory(mut self, factory: Rc<dyn MediaElementFactory>) -> Self {
        self.media_factory = Some(factory);
        self
    }

    pub fn scheduler(mut self, scheduler: Rc<dyn IntervalScheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    pub fn plugin_embedder(mut self, embedder: Rc<dyn PluginEmbedder>) -> Self {
        self.plugin_embedder = Some(embedder);
        self
    }

    /// Use a private registry instead of the thread's shared one.
    pub fn registry(mut self, registry: Rc<PluginRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn clock(mut self, clock: Rc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Builds the dependency bundle.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::CapabilityMissing`] when no capability detector
    /// was provided.
    pub fn build(self) -> Result<PlayerDependencies> {
        let capabilities = self.capabilities.ok_or_else(|| CoreError::CapabilityMissing {
            capability: "CapabilityDetector".to_string(),
            message: "A capability detector is required to choose a playback backend. \
                      Use .capabilities() to set it."
                .to_string(),
        })?;

        Ok(PlayerDependencies {
            capabilities,
            media_factory: self.media_factory,
            scheduler: self.scheduler,
            plugin_embedder: self.plugin_embedder,
            registry: self.registry.unwrap_or_else(PluginRegistry::shared),
            clock: self.clock.unwrap_or_else(|| Rc::new(SystemClock)),
        })
    }
}
