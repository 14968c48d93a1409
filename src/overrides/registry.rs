//! Named handler registry for external override references.

use dashmap::DashMap;
use std::any::Any;
use std::sync::{Arc, OnceLock};

use super::{HandlerFn, HookContext};

type ErasedHandler = Arc<dyn Any + Send + Sync>;

/// Registry of named hook handlers.
///
/// [`Handler::External`](super::Handler::External) values carry only a name; the
/// function behind it is looked up here when the hook fires, not when the provider or
/// binary is declared. Hosts can therefore declare binaries first and register the
/// handlers later during startup.
///
/// Registration and lookup may happen from any thread; the map is a [`DashMap`], so
/// a hook firing never blocks on an unrelated registration.
///
/// Handlers are stored type-erased and recovered by downcasting, so a name registered
/// for one hook type (say `Vec<String>` for `packages`) cannot be used for another.
///
/// # Examples
///
/// ```rust
/// use binresolve::overrides::HandlerRegistry;
///
/// let registry = HandlerRegistry::new();
/// registry.register("ytdlp.packages", |_ctx| Ok(vec!["yt-dlp[default]".to_string()]));
/// assert!(registry.contains("ytdlp.packages"));
/// ```
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: DashMap<String, ErasedHandler>,
}

impl HandlerRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry used by providers that were not given one explicitly.
    pub fn global() -> Arc<Self> {
        static GLOBAL: OnceLock<Arc<HandlerRegistry>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(Self::new())))
    }

    /// Register `handler` under `name`, replacing any previous registration.
    pub fn register<T, F>(&self, name: impl Into<String>, handler: F)
    where
        T: 'static,
        F: Fn(&HookContext<'_>) -> anyhow::Result<T> + Send + Sync + 'static,
    {
        let name = name.into();
        let handler: HandlerFn<T> = Arc::new(handler);
        tracing::debug!(target: "overrides", "Registering handler '{}'", name);
        self.handlers.insert(name, Arc::new(handler));
    }

    /// Remove a registration. Returns `true` when `name` was registered.
    pub fn unregister(&self, name: &str) -> bool {
        self.handlers.remove(name).is_some()
    }

    /// Whether a handler is registered under `name`, regardless of its type.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Look up `name` as a handler producing `T`.
    ///
    /// The error is a human-readable reason; callers wrap it into
    /// [`BinError::OverrideResolution`](crate::core::BinError::OverrideResolution) with
    /// the provider and hook that asked.
    pub(crate) fn resolve<T: 'static>(&self, name: &str) -> std::result::Result<HandlerFn<T>, String> {
        let erased = self.handlers.get(name).ok_or_else(|| "no handler registered under this name".to_string())?;
        erased.value().downcast_ref::<HandlerFn<T>>().cloned().ok_or_else(|| {
            format!("handler is registered for a different hook type than {}", std::any::type_name::<T>())
        })
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<String> = self.handlers.iter().map(|entry| entry.key().clone()).collect();
        names.sort();
        f.debug_struct("HandlerRegistry").field("handlers", &names).finish()
    }
}
