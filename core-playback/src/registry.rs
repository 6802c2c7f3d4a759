//! # Plugin Instance Registry
//!
//! The plugin bridge calls back by instance id, not by reference, so plugin
//! backends register themselves here during `init` and the host routes every
//! inbound call through [`PluginRegistry::dispatch`] or
//! [`PluginRegistry::dispatch_named`].
//!
//! Ids are `<prefix><n>` with `n` counting from 1 per registry. Entries are
//! only ever appended; they hold weak references, so a dropped backend simply
//! stops resolving. The table is bounded by the lifetime of the host page or
//! process.
//!
//! ```rust
//! use core_playback::registry::PluginCallback;
//! use serde_json::json;
//!
//! let call = PluginCallback::from_call("onTimeUpdate", &[json!(12.5), json!(200.0), json!(true)]).unwrap();
//! assert_eq!(
//!     call,
//!     PluginCallback::TimeUpdate { position: 12.5, duration: 200.0, seekable: true }
//! );
//! ```

use crate::error::{PlaybackError, Result};
use crate::plugin::PluginAudioBackend;
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::{debug, warn};

/// Id under which a plugin backend is registered.
pub type InstanceId = String;

thread_local! {
    static SHARED: Rc<PluginRegistry> = Rc::new(PluginRegistry::new());
}

/// Decoded inbound call from the plugin engine.
#[derive(Debug, Clone, PartialEq)]
pub enum PluginCallback {
    Ready,
    TimeUpdate {
        position: f64,
        duration: f64,
        seekable: bool,
    },
    Progress {
        percent: u8,
    },
    LoadError,
    Play,
    Pause,
    Ended,
}

impl PluginCallback {
    /// Decode a named bridge call.
    ///
    /// Accepts the `onX` names as well as the legacy `eiX` names some plugin
    /// builds still emit (`eiTimeUpdate`, `eiLoadError`, ...).
    pub fn from_call(name: &str, args: &[Value]) -> Result<Self> {
        let base = name
            .strip_prefix("on")
            .or_else(|| name.strip_prefix("ei"))
            .ok_or_else(|| PlaybackError::invalid_callback(name, "unknown callback"))?;

        match base {
            "Ready" => Ok(PluginCallback::Ready),
            "TimeUpdate" => Ok(PluginCallback::TimeUpdate {
                position: number_arg(name, args, 0)?,
                duration: number_arg(name, args, 1)?,
                seekable: flag_arg(name, args, 2)?,
            }),
            "Progress" => {
                let percent = number_arg(name, args, 0)?;
                Ok(PluginCallback::Progress {
                    percent: percent.floor().clamp(0.0, 100.0) as u8,
                })
            }
            "LoadError" => Ok(PluginCallback::LoadError),
            "Play" => Ok(PluginCallback::Play),
            "Pause" => Ok(PluginCallback::Pause),
            "Ended" => Ok(PluginCallback::Ended),
            _ => Err(PlaybackError::invalid_callback(name, "unknown callback")),
        }
    }

    /// Canonical bridge name.
    pub fn name(&self) -> &'static str {
        match self {
            PluginCallback::Ready => "onReady",
            PluginCallback::TimeUpdate { .. } => "onTimeUpdate",
            PluginCallback::Progress { .. } => "onProgress",
            PluginCallback::LoadError => "onLoadError",
            PluginCallback::Play => "onPlay",
            PluginCallback::Pause => "onPause",
            PluginCallback::Ended => "onEnded",
        }
    }
}

fn number_arg(name: &str, args: &[Value], index: usize) -> Result<f64> {
    let value = args
        .get(index)
        .ok_or_else(|| PlaybackError::invalid_callback(name, format!("missing argument {index}")))?;

    // Some bridges stringify numbers
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
        .filter(|n: &f64| n.is_finite())
        .ok_or_else(|| {
            PlaybackError::invalid_callback(name, format!("argument {index} is not a number: {value}"))
        })
}

fn flag_arg(name: &str, args: &[Value], index: usize) -> Result<bool> {
    let Some(value) = args.get(index) else {
        return Ok(false);
    };

    let flag = match value {
        Value::Null => Some(false),
        Value::Bool(flag) => Some(*flag),
        Value::Number(n) => n.as_f64().map(|n| n != 0.0),
        Value::String(s) => match s.trim() {
            "true" | "1" => Some(true),
            "false" | "0" | "" => Some(false),
            _ => None,
        },
        _ => None,
    };
    flag.ok_or_else(|| {
        PlaybackError::invalid_callback(name, format!("argument {index} is not a flag: {value}"))
    })
}

/// Id-keyed table of live plugin backends.
#[derive(Default)]
pub struct PluginRegistry {
    counter: Cell<u64>,
    instances: RefCell<HashMap<InstanceId, Weak<PluginAudioBackend>>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry shared by every player on the current thread.
    pub fn shared() -> Rc<Self> {
        SHARED.with(Rc::clone)
    }

    /// Mint an id from the backend's instance prefix and record the backend.
    pub fn register(&self, backend: &Rc<PluginAudioBackend>) -> InstanceId {
        let n = self.counter.get() + 1;
        self.counter.set(n);
        let id = format!("{}{}", backend.settings().instance_prefix, n);
        self.instances
            .borrow_mut()
            .insert(id.clone(), Rc::downgrade(backend));
        debug!(instance = %id, "Registered plugin instance");
        id
    }

    /// Resolve a live backend.
    pub fn lookup(&self, id: &str) -> Option<Rc<PluginAudioBackend>> {
        self.instances.borrow().get(id).and_then(Weak::upgrade)
    }

    /// Route a decoded inbound call to its backend.
    pub fn dispatch(&self, id: &str, callback: PluginCallback) -> Result<()> {
        let backend = self.resolve(id)?;
        backend.handle_callback(callback);
        Ok(())
    }

    /// Decode and route a named inbound call.
    pub fn dispatch_named(&self, id: &str, name: &str, args: &[Value]) -> Result<()> {
        let backend = self.resolve(id)?;
        let callback = PluginCallback::from_call(name, args).map_err(|err| {
            warn!(instance = %id, error = %err, "Rejected plugin callback");
            err
        })?;
        backend.handle_callback(callback);
        Ok(())
    }

    /// Number of ids minted so far.
    pub fn count(&self) -> u64 {
        self.counter.get()
    }

    /// Number of registered entries, including dropped backends.
    pub fn len(&self) -> usize {
        self.instances.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn resolve(&self, id: &str) -> Result<Rc<PluginAudioBackend>> {
        self.lookup(id).ok_or_else(|| {
            warn!(instance = %id, "Callback for unknown plugin instance");
            PlaybackError::UnknownInstance(id.to_string())
        })
    }
}

impl fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("count", &self.counter.get())
            .field("entries", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_on_and_legacy_names() {
        assert_eq!(
            PluginCallback::from_call("onReady", &[]).unwrap(),
            PluginCallback::Ready
        );
        assert_eq!(
            PluginCallback::from_call("eiLoadError", &[]).unwrap(),
            PluginCallback::LoadError
        );
        assert_eq!(
            PluginCallback::from_call("eiEnded", &[]).unwrap().name(),
            "onEnded"
        );
    }

    #[test]
    fn decodes_progress_as_whole_percent() {
        assert_eq!(
            PluginCallback::from_call("onProgress", &[json!(45.9)]).unwrap(),
            PluginCallback::Progress { percent: 45 }
        );
        assert_eq!(
            PluginCallback::from_call("onProgress", &[json!(180)]).unwrap(),
            PluginCallback::Progress { percent: 100 }
        );
        assert_eq!(
            PluginCallback::from_call("eiProgress", &[json!("12")]).unwrap(),
            PluginCallback::Progress { percent: 12 }
        );
    }

    #[test]
    fn time_update_seekable_defaults_to_false() {
        assert_eq!(
            PluginCallback::from_call("onTimeUpdate", &[json!(1), json!(2)]).unwrap(),
            PluginCallback::TimeUpdate {
                position: 1.0,
                duration: 2.0,
                seekable: false
            }
        );
    }

    #[test]
    fn time_update_accepts_loose_seekable_flags() {
        for (flag, expected) in [
            (json!("true"), true),
            (json!(1), true),
            (json!("0"), false),
            (json!(null), false),
        ] {
            assert_eq!(
                PluginCallback::from_call("onTimeUpdate", &[json!(1), json!(2), flag]).unwrap(),
                PluginCallback::TimeUpdate {
                    position: 1.0,
                    duration: 2.0,
                    seekable: expected
                }
            );
        }
        assert!(matches!(
            PluginCallback::from_call("onTimeUpdate", &[json!(1), json!(2), json!("maybe")]),
            Err(PlaybackError::InvalidCallback { .. })
        ));
    }

    #[test]
    fn rejects_bad_calls() {
        assert!(matches!(
            PluginCallback::from_call("onSeeked", &[]),
            Err(PlaybackError::InvalidCallback { .. })
        ));
        assert!(matches!(
            PluginCallback::from_call("Ready", &[]),
            Err(PlaybackError::InvalidCallback { .. })
        ));
        assert!(PluginCallback::from_call("onTimeUpdate", &[json!(1)]).is_err());
        assert!(PluginCallback::from_call("onProgress", &[json!("abc")]).is_err());
        assert!(PluginCallback::from_call("onProgress", &[json!(null)]).is_err());
    }

    #[test]
    fn unknown_instance_is_an_error() {
        let registry = PluginRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.lookup("hybrid_audio1").is_none());
        assert!(matches!(
            registry.dispatch("hybrid_audio1", PluginCallback::Play),
            Err(PlaybackError::UnknownInstance(_))
        ));
        assert!(matches!(
            registry.dispatch_named("nope", "onPlay", &[]),
            Err(PlaybackError::UnknownInstance(_))
        ));
    }

    #[test]
    fn shared_registry_is_per_thread_singleton() {
        let a = PluginRegistry::shared();
        let b = PluginRegistry::shared();
        assert!(Rc::ptr_eq(&a, &b));
    }
}
