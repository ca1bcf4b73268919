//! Plugin registry for algorithms, readers, and writers.
//!
//! Drivers resolve sensor-specific plugins by `(kind, name)`. Plugins are
//! registered at startup under a named root (a package of plugins);
//! lookup walks the configured roots in order and the first match wins,
//! so the resolution order is deterministic and overridable by root
//! ordering alone.

use std::fmt;
use std::sync::Arc;

use sat_common::MaskedGrid;

use crate::adapters::{ReaderAdapter, WriterAdapter};
use crate::algorithm::SceneInput;
use crate::error::{PipelineError, Result};
use crate::spec::ProductSpec;

/// Category of a registered plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginKind {
    Algorithm,
    Reader,
    Writer,
}

impl PluginKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PluginKind::Algorithm => "algorithm",
            PluginKind::Reader => "reader",
            PluginKind::Writer => "writer",
        }
    }
}

impl fmt::Display for PluginKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Signature of a registered pixel algorithm.
pub type AlgorithmFn = dyn Fn(&SceneInput, &ProductSpec) -> Result<MaskedGrid> + Send + Sync;

/// A registered callable.
#[derive(Clone)]
pub enum Plugin {
    Algorithm(Arc<AlgorithmFn>),
    Reader(Arc<dyn ReaderAdapter + Send + Sync>),
    Writer(Arc<dyn WriterAdapter + Send + Sync>),
}

impl Plugin {
    pub fn kind(&self) -> PluginKind {
        match self {
            Plugin::Algorithm(_) => PluginKind::Algorithm,
            Plugin::Reader(_) => PluginKind::Reader,
            Plugin::Writer(_) => PluginKind::Writer,
        }
    }
}

impl fmt::Debug for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Plugin({})", self.kind())
    }
}

struct Entry {
    root: String,
    name: String,
    plugin: Plugin,
}

/// Startup-populated plugin registry with root-ordered lookup.
pub struct Registry {
    roots: Vec<String>,
    entries: Vec<Entry>,
}

impl Registry {
    /// Create a registry with the given root resolution order.
    pub fn new(roots: Vec<String>) -> Self {
        Self {
            roots,
            entries: Vec::new(),
        }
    }

    /// Register a plugin under a root. Unknown roots are appended to the
    /// end of the resolution order.
    pub fn register(&mut self, root: &str, name: &str, plugin: Plugin) {
        if !self.roots.iter().any(|r| r == root) {
            self.roots.push(root.to_string());
        }
        self.entries.push(Entry {
            root: root.to_string(),
            name: name.to_string(),
            plugin,
        });
    }

    /// Resolve a plugin by kind and name, walking roots in configured
    /// order; the first match wins.
    pub fn lookup(&self, kind: PluginKind, name: &str) -> Result<&Plugin> {
        for root in &self.roots {
            if let Some(entry) = self.entries.iter().find(|e| {
                e.root == *root && e.name == name && e.plugin.kind() == kind
            }) {
                return Ok(&entry.plugin);
            }
        }
        Err(PipelineError::PluginNotFound {
            kind: kind.as_str(),
            name: name.to_string(),
        })
    }

    /// Names registered for one kind, in resolution order.
    pub fn names(&self, kind: PluginKind) -> Vec<&str> {
        let mut names = Vec::new();
        for root in &self.roots {
            for entry in &self.entries {
                if entry.root == *root
                    && entry.plugin.kind() == kind
                    && !names.contains(&entry.name.as_str())
                {
                    names.push(entry.name.as_str());
                }
            }
        }
        names
    }
}
