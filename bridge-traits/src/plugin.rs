//! Plugin engine embedding contracts.
//!
//! The plugin adapter never talks to the plugin runtime directly. It asks a
//! host [`PluginEmbedder`] to embed the engine and gets back a
//! [`PluginHandle`] for outbound commands. Inbound notifications travel the
//! other way: the host's bridge layer looks the adapter up by instance id and
//! invokes its callbacks.

use crate::error::Result;
use std::rc::Rc;
use std::time::Duration;

/// Everything an embedder needs to mount one plugin engine instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedRequest {
    /// Location of the plugin binary (e.g. a `.swf` path).
    pub plugin_path: String,
    /// Id the plugin uses when calling back into the core.
    pub instance_id: String,
    /// Token appended to the load URL so the host never serves a cached copy.
    pub cache_buster: String,
}

impl EmbedRequest {
    pub fn new(
        plugin_path: impl Into<String>,
        instance_id: impl Into<String>,
        cache_buster: impl Into<String>,
    ) -> Self {
        Self {
            plugin_path: plugin_path.into(),
            instance_id: instance_id.into(),
            cache_buster: cache_buster.into(),
        }
    }

    /// Load URL handed to the plugin runtime.
    ///
    /// ```
    /// use bridge_traits::plugin::EmbedRequest;
    ///
    /// let request = EmbedRequest::new("player.swf", "hybrid_audio1", "1700000000000-42");
    /// assert_eq!(
    ///     request.source_url(),
    ///     "player.swf?playerInstance=hybrid_audio1&datetime=1700000000000-42"
    /// );
    /// ```
    pub fn source_url(&self) -> String {
        let separator = if self.plugin_path.contains('?') { '&' } else { '?' };
        format!(
            "{}{}playerInstance={}&datetime={}",
            self.plugin_path, separator, self.instance_id, self.cache_buster
        )
    }
}

/// Outbound command surface of an embedded plugin engine.
pub trait PluginHandle {
    /// Start fetching `url`.
    fn load(&self, url: &str) -> Result<()>;

    fn play(&self) -> Result<()>;

    fn pause(&self) -> Result<()>;

    /// Set output volume in `0.0..=1.0`.
    fn set_volume(&self, volume: f32) -> Result<()>;

    /// Move the playhead. Does not change the play/pause state.
    fn seek_to(&self, position: Duration) -> Result<()>;
}

/// Host component that mounts plugin engines.
pub trait PluginEmbedder {
    /// Embed a plugin engine for `request`. The host must route the engine's
    /// callbacks to `request.instance_id`.
    fn embed(&self, request: &EmbedRequest) -> Result<Rc<dyn PluginHandle>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_url_appends_to_existing_query() {
        let request = EmbedRequest::new("/static/player.swf?v=2", "p7", "123");
        assert_eq!(
            request.source_url(),
            "/static/player.swf?v=2&playerInstance=p7&datetime=123"
        );
    }
}
