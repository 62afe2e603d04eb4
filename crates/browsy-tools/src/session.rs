//! Session Provider
//!
//! Every binding asks a [`SessionProvider`] for the browser to use. A
//! provider either carries a caller-owned [`Session`] or defers to a
//! [`SessionRegistry`], which builds its default session at most once.
//! The process-wide registry is reached through [`SessionRegistry::global`];
//! tests build their own registries to get a fresh default.

use crate::error::Result;
use browsy_engine::{Engine, HtmlEngine};
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, MutexGuard};
use tracing::info;

/// Shared handle to one engine and its current page
///
/// Clones refer to the same engine. Engine calls are serialized by an
/// async mutex held for the duration of one operation.
#[derive(Clone)]
pub struct Session {
    engine: Arc<AsyncMutex<Box<dyn Engine>>>,
}

impl Session {
    /// Wrap an engine in a new session
    pub fn new(engine: impl Engine + 'static) -> Self {
        Self::from_boxed(Box::new(engine))
    }

    /// Wrap an already boxed engine
    #[must_use]
    pub fn from_boxed(engine: Box<dyn Engine>) -> Self {
        Self {
            engine: Arc::new(AsyncMutex::new(engine)),
        }
    }

    /// Lock the engine for one operation
    pub async fn lock(&self) -> MutexGuard<'_, Box<dyn Engine>> {
        self.engine.lock().await
    }

    /// Whether both handles refer to the same engine
    #[must_use]
    pub fn ptr_eq(&self, other: &Session) -> bool {
        Arc::ptr_eq(&self.engine, &other.engine)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("engine", &Arc::as_ptr(&self.engine))
            .finish()
    }
}

type EngineFactory = Box<dyn Fn() -> browsy_engine::Result<Box<dyn Engine>> + Send + Sync>;

/// Owner of a lazily built default session
pub struct SessionRegistry {
    factory: EngineFactory,
    default: Mutex<Option<Session>>,
}

static GLOBAL: OnceLock<Arc<SessionRegistry>> = OnceLock::new();

impl SessionRegistry {
    /// Create a registry whose default session is built by `factory`
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> browsy_engine::Result<Box<dyn Engine>> + Send + Sync + 'static,
    {
        Self {
            factory: Box::new(factory),
            default: Mutex::new(None),
        }
    }

    /// Registry building an [`HtmlEngine`] with default configuration
    #[must_use]
    pub fn html() -> Self {
        Self::new(|| Ok(Box::new(HtmlEngine::new()?) as Box<dyn Engine>))
    }

    /// The process-wide registry
    pub fn global() -> Arc<SessionRegistry> {
        GLOBAL.get_or_init(|| Arc::new(Self::html())).clone()
    }

    /// Install the process-wide registry before its first use
    ///
    /// Returns the registry back if one was already installed.
    pub fn install_global(registry: SessionRegistry) -> std::result::Result<(), Arc<SessionRegistry>> {
        GLOBAL.set(Arc::new(registry))
    }

    /// The default session, built on first call
    ///
    /// Construction runs under the registry lock, so a second engine is
    /// never built once the first exists. A failed construction leaves the
    /// slot empty for the next caller.
    pub fn default_session(&self) -> Result<Session> {
        let mut slot = self.default.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(session) = slot.as_ref() {
            return Ok(session.clone());
        }

        let session = Session::from_boxed((self.factory)()?);
        info!("Default browsing session created");
        *slot = Some(session.clone());
        Ok(session)
    }

    /// An explicit session unchanged, otherwise the default
    pub fn resolve(&self, explicit: Option<&Session>) -> Result<Session> {
        match explicit {
            Some(session) => Ok(session.clone()),
            None => self.default_session(),
        }
    }

    /// Whether the default session has been built
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.default
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

/// Session source held by each binding
///
/// A provider without a registry falls back to [`SessionRegistry::global`]
/// when it resolves, so building bindings never fixes the global registry.
#[derive(Debug, Clone, Default)]
pub struct SessionProvider {
    explicit: Option<Session>,
    registry: Option<Arc<SessionRegistry>>,
}

impl SessionProvider {
    /// Use the process-wide default session
    #[must_use]
    pub fn shared() -> Self {
        Self::default()
    }

    /// Use the default session of the given registry
    #[must_use]
    pub fn from_registry(registry: Arc<SessionRegistry>) -> Self {
        Self {
            explicit: None,
            registry: Some(registry),
        }
    }

    /// Use a caller-owned session; the default is never touched
    #[must_use]
    pub fn explicit(session: Session) -> Self {
        Self {
            explicit: Some(session),
            registry: None,
        }
    }

    /// The session to run the next operation against
    pub fn resolve(&self) -> Result<Session> {
        if let Some(session) = &self.explicit {
            return Ok(session.clone());
        }
        match &self.registry {
            Some(registry) => registry.default_session(),
            None => SessionRegistry::global().default_session(),
        }
    }
}

impl From<Session> for SessionProvider {
    fn from(session: Session) -> Self {
        Self::explicit(session)
    }
}

impl From<Option<Session>> for SessionProvider {
    fn from(session: Option<Session>) -> Self {
        session.map_or_else(Self::shared, Self::explicit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_registry(builds: Arc<AtomicUsize>) -> SessionRegistry {
        SessionRegistry::new(move || {
            builds.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(HtmlEngine::new()?) as Box<dyn Engine>)
        })
    }

    #[test]
    fn test_default_session_is_built_once() {
        let builds = Arc::new(AtomicUsize::new(0));
        let registry = counting_registry(builds.clone());
        assert!(!registry.is_initialized());

        let first = registry.resolve(None).unwrap();
        let second = registry.resolve(None).unwrap();

        assert!(first.ptr_eq(&second));
        assert!(registry.is_initialized());
        assert_eq!(builds.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_explicit_session_is_returned_unchanged() {
        let builds = Arc::new(AtomicUsize::new(0));
        let registry = counting_registry(builds.clone());
        let own = Session::new(HtmlEngine::new().unwrap());

        let resolved = registry.resolve(Some(&own)).unwrap();

        assert!(resolved.ptr_eq(&own));
        assert!(!registry.is_initialized());
        assert_eq!(builds.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_concurrent_first_use_builds_one_engine() {
        let builds = Arc::new(AtomicUsize::new(0));
        let registry = Arc::new(counting_registry(builds.clone()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = registry.clone();
                std::thread::spawn(move || registry.default_session().unwrap())
            })
            .collect();
        let sessions: Vec<Session> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(builds.load(Ordering::SeqCst), 1);
        assert!(sessions.iter().all(|s| s.ptr_eq(&sessions[0])));
    }

    #[test]
    fn test_failed_construction_is_retried() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = attempts.clone();
        let registry = SessionRegistry::new(move || {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(browsy_engine::Error::Network("offline".to_string()))
            } else {
                Ok(Box::new(HtmlEngine::new()?) as Box<dyn Engine>)
            }
        });

        assert!(registry.default_session().is_err());
        assert!(!registry.is_initialized());
        assert!(registry.default_session().is_ok());
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_provider_clones_share_state() {
        let provider = SessionProvider::from_registry(Arc::new(SessionRegistry::html()));
        let other = provider.clone();

        provider
            .resolve()
            .unwrap()
            .lock()
            .await
            .load("<title>Shared</title>", "https://example.com/")
            .unwrap();

        let page = other.resolve().unwrap().lock().await.current_page();
        assert_eq!(page.map(|p| p.title), Some("Shared".to_string()));
    }
}
