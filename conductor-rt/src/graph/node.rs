//! Graph node metadata.

// Layer 1: Standard library imports
use std::sync::Arc;

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::token::{Token, TokenId};

/// Reference to a dependency token: identity plus description for
/// diagnostics.
#[derive(Debug, Clone)]
pub struct DepRef {
    id: TokenId,
    description: Arc<str>,
}

impl DepRef {
    /// Token identity.
    pub fn id(&self) -> TokenId {
        self.id
    }

    /// Token description.
    pub fn description(&self) -> &str {
        &self.description
    }
}

impl<T> From<&Token<T>> for DepRef {
    fn from(token: &Token<T>) -> Self {
        Self {
            id: token.id(),
            description: token.description_arc(),
        }
    }
}

/// One node of the dependency graph: a token and the tokens it depends on.
///
/// Construction normalizes the dependency list: duplicates collapse to the
/// first occurrence and self-references are dropped.
#[derive(Debug, Clone)]
pub struct GraphNode {
    id: TokenId,
    description: Arc<str>,
    dependencies: Vec<DepRef>,
}

impl GraphNode {
    /// Build a node, deduplicating dependencies and discarding
    /// self-references.
    pub fn new(id: TokenId, description: Arc<str>, dependencies: Vec<DepRef>) -> Self {
        let mut seen = Vec::with_capacity(dependencies.len());
        let mut normalized = Vec::with_capacity(dependencies.len());
        for dep in dependencies {
            if dep.id() == id || seen.contains(&dep.id()) {
                continue;
            }
            seen.push(dep.id());
            normalized.push(dep);
        }
        Self {
            id,
            description,
            dependencies: normalized,
        }
    }

    /// Token identity of this node.
    pub fn id(&self) -> TokenId {
        self.id
    }

    /// Token description of this node.
    pub fn description(&self) -> &str {
        &self.description
    }

    pub(crate) fn description_arc(&self) -> Arc<str> {
        Arc::clone(&self.description)
    }

    /// Normalized dependency list.
    pub fn dependencies(&self) -> &[DepRef] {
        &self.dependencies
    }
}
