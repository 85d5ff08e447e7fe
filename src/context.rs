use std::cell::{Cell, OnceCell, RefCell};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use restricted_fs_core::access::Decision;
use restricted_fs_core::path as path_check;
use restricted_fs_core::policy::{AccessPolicy, EngineConfig, Strictness};
use restricted_fs_core::{Error, Result};

use crate::resolve::soft_canonicalize;
use crate::roots::RootPaths;
use crate::validator::{self, Strategy, Validate};

#[derive(Debug, Default)]
struct DecisionCaches {
    readable_dir: RefCell<HashMap<PathBuf, Decision>>,
    readable_file: RefCell<HashMap<PathBuf, Decision>>,
    writable_dir: RefCell<HashMap<PathBuf, Decision>>,
    writable_file: RefCell<HashMap<PathBuf, Decision>>,
}

/// One policy-and-validator pairing: the effective policy, the chosen
/// strategy, the root-path sets, and the per-path decision caches. Each
/// (strategy, strictness) variant gets its own context, so independent
/// policies coexist in one process without shared state.
///
/// Interior mutability is `RefCell`/`Cell`: the context serves one logical
/// thread of control and needs external synchronization for anything else.
#[derive(Debug)]
pub struct AccessContext {
    config: EngineConfig,
    policy: AccessPolicy,
    strategy: Strategy,
    strictness: Strictness,
    roots: OnceCell<RootPaths>,
    resolved_paranoid_roots: RefCell<Option<Vec<PathBuf>>>,
    caches: DecisionCaches,
    resolve_cache: RefCell<HashMap<PathBuf, PathBuf>>,
    resolutions: Cell<u64>,
}

impl AccessContext {
    pub fn new(config: EngineConfig, strategy: Strategy, strictness: Strictness) -> Result<Self> {
        config.validate()?;
        let policy = strictness.apply(&config.access);
        Ok(Self {
            config,
            policy,
            strategy,
            strictness,
            roots: OnceCell::new(),
            resolved_paranoid_roots: RefCell::new(None),
            caches: DecisionCaches::default(),
            resolve_cache: RefCell::new(HashMap::new()),
            resolutions: Cell::new(0),
        })
    }

    /// The policy in force, after the strictness override.
    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn strictness(&self) -> Strictness {
        self.strictness
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Root-path sets, derived on first use and fixed afterward.
    pub fn roots(&self) -> &RootPaths {
        self.roots.get_or_init(|| RootPaths::derive(&self.config))
    }

    /// Paranoid roots with every member resolved through the filesystem.
    pub fn paranoid_roots_resolved(&self) -> Result<Vec<PathBuf>> {
        self.ensure_resolved_paranoid_roots()?;
        Ok(self
            .resolved_paranoid_roots
            .borrow()
            .clone()
            .unwrap_or_default())
    }

    pub fn readable_dir(&self, path: &Path) -> Result<Decision> {
        self.decide(&self.caches.readable_dir, path, |validator, ctx, p| {
            validator.readable_dir(ctx, p)
        })
    }

    pub fn readable_file(&self, path: &Path) -> Result<Decision> {
        self.decide(&self.caches.readable_file, path, |validator, ctx, p| {
            validator.readable_file(ctx, p)
        })
    }

    pub fn writable_dir(&self, path: &Path) -> Result<Decision> {
        self.decide(&self.caches.writable_dir, path, |validator, ctx, p| {
            validator.writable_dir(ctx, p)
        })
    }

    pub fn writable_file(&self, path: &Path) -> Result<Decision> {
        self.decide(&self.caches.writable_file, path, |validator, ctx, p| {
            validator.writable_file(ctx, p)
        })
    }

    /// Drop every cached decision and cached resolution. For callers that
    /// changed the filesystem under already-judged paths; without it, cached
    /// decisions assume a single pass over a static filesystem. Root-path
    /// sets stay, since configuration is fixed for the process.
    pub fn invalidate(&self) {
        self.caches.readable_dir.borrow_mut().clear();
        self.caches.readable_file.borrow_mut().clear();
        self.caches.writable_dir.borrow_mut().clear();
        self.caches.writable_file.borrow_mut().clear();
        self.resolve_cache.borrow_mut().clear();
    }

    /// How many times a path has actually been resolved through the
    /// filesystem. Cached predicate and resolution lookups leave it
    /// unchanged.
    pub fn resolution_count(&self) -> u64 {
        self.resolutions.get()
    }

    /// Anchor a relative path at the configured working directory.
    pub fn anchored(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.config.working_directory.join(path)
        }
    }

    /// Fully resolve a path, anchoring relative paths at the working
    /// directory first. Resolutions are cached per path value.
    pub fn resolve(&self, path: &Path) -> Result<PathBuf> {
        if let Some(resolved) = self.resolve_cache.borrow().get(path) {
            return Ok(resolved.clone());
        }
        let anchored = self.anchored(path);
        self.resolutions.set(self.resolutions.get() + 1);
        tracing::debug!(path = %anchored.display(), "resolving path through the filesystem");
        let resolved = soft_canonicalize(&anchored).map_err(|source| Error::Io {
            path: anchored.display().to_string(),
            source,
        })?;
        self.resolve_cache
            .borrow_mut()
            .insert(path.to_path_buf(), resolved.clone());
        Ok(resolved)
    }

    pub(crate) fn within_resolved_paranoid_roots(&self, candidate: &Path) -> Result<bool> {
        self.ensure_resolved_paranoid_roots()?;
        let borrow = self.resolved_paranoid_roots.borrow();
        let roots = borrow.as_deref().unwrap_or_default();
        Ok(roots
            .iter()
            .any(|root| path_check::is_within(candidate, root)))
    }

    fn ensure_resolved_paranoid_roots(&self) -> Result<()> {
        if self.resolved_paranoid_roots.borrow().is_some() {
            return Ok(());
        }
        let mut resolved_roots = Vec::new();
        for root in self.roots().paranoid_roots() {
            let resolved = self.resolve(root)?;
            if !resolved_roots.contains(&resolved) {
                resolved_roots.push(resolved);
            }
        }
        *self.resolved_paranoid_roots.borrow_mut() = Some(resolved_roots);
        Ok(())
    }

    fn decide(
        &self,
        cache: &RefCell<HashMap<PathBuf, Decision>>,
        path: &Path,
        check: fn(&dyn Validate, &AccessContext, &Path) -> Result<Decision>,
    ) -> Result<Decision> {
        if let Some(decision) = cache.borrow().get(path) {
            return Ok(decision.clone());
        }
        let decision = check(validator::for_strategy(self.strategy), self, path)?;
        cache
            .borrow_mut()
            .insert(path.to_path_buf(), decision.clone());
        Ok(decision)
    }
}
