//! Multi-instance application registry for the token-push family.
//!
//! Operators may register several Gotify applications (independent
//! token credentials) plus an optional legacy unnamed slot. Selection
//! must be deterministic and observable: ambiguous fallbacks are
//! logged at warning level, never silently random.

use std::collections::BTreeMap;
use tracing::warn;

use super::endpoint::Endpoint;

/// Registered applications, read-only after startup.
#[derive(Debug, Clone, Default)]
pub struct AppRegistry {
    apps: BTreeMap<String, Endpoint>,
    legacy: Option<Endpoint>,
}

/// How an application was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// The explicitly requested application.
    Requested,
    /// The legacy unnamed slot, or the only registered application.
    Single,
    /// Multiple applications, none requested; the one literally named
    /// "default" won.
    NamedDefault,
    /// Multiple applications, none requested, no "default"; first by
    /// name order.
    FirstRegistered,
}

impl AppRegistry {
    pub fn new(legacy: Option<Endpoint>, apps: BTreeMap<String, Endpoint>) -> Self {
        Self { apps, legacy }
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty() && self.legacy.is_none()
    }

    /// Resolve which application endpoint to use. First match wins:
    /// the requested name, the legacy slot (or an only registered
    /// application), an application named "default", then the first
    /// registered application. Returns `None` only when the registry
    /// is empty, which callers report as a configuration error.
    pub fn resolve(&self, requested: Option<&str>) -> Option<(Selection, &Endpoint)> {
        if let Some(name) = requested {
            if let Some(endpoint) = self.apps.get(name) {
                return Some((Selection::Requested, endpoint));
            }
            warn!(app = name, "requested application is not registered, falling back");
        }

        if let Some(endpoint) = &self.legacy {
            return Some((Selection::Single, endpoint));
        }
        if self.apps.len() == 1 {
            let endpoint = self.apps.values().next()?;
            return Some((Selection::Single, endpoint));
        }
        if let Some(endpoint) = self.apps.get("default") {
            warn!("multiple applications registered, using \"default\"");
            return Some((Selection::NamedDefault, endpoint));
        }
        if let Some((name, endpoint)) = self.apps.iter().next() {
            warn!(app = %name, "no application selected, using first registered");
            return Some((Selection::FirstRegistered, endpoint));
        }
        None
    }
}
