//! Caller-facing player options.

use crate::player::Player;
use core_runtime::config::SettingsOverrides;
use std::fmt;
use std::rc::Rc;

/// Invoked once, the first time the active backend reports `ready`.
pub type ReadyCallback = Rc<dyn Fn(&Player)>;

/// Options accepted by [`Player::new`].
///
/// Settings are overrides only; anything left unset falls back to the
/// [`PlayerSettings`](core_runtime::config::PlayerSettings) defaults.
///
/// ```
/// use core_service::PlayerOptions;
///
/// let options = PlayerOptions::from_json(r#"{ "swf_path": "/static/player.swf" }"#)
///     .unwrap()
///     .on_ready(|player| println!("{} backend ready", player.backend_kind()));
/// assert!(options.ready.is_some());
/// ```
#[derive(Clone, Default)]
pub struct PlayerOptions {
    pub settings: SettingsOverrides,
    pub ready: Option<ReadyCallback>,
}

impl PlayerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse settings overrides from JSON. Unknown keys are ignored.
    pub fn from_json(json: &str) -> core_runtime::Result<Self> {
        Ok(Self {
            settings: SettingsOverrides::from_json(json)?,
            ready: None,
        })
    }

    pub fn with_settings(mut self, settings: SettingsOverrides) -> Self {
        self.settings = settings;
        self
    }

    pub fn on_ready<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Player) + 'static,
    {
        self.ready = Some(Rc::new(callback));
        self
    }
}

impl fmt::Debug for PlayerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayerOptions")
            .field("settings", &self.settings)
            .field("ready", &self.ready.is_some())
            .finish()
    }
}
