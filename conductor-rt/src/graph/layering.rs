//! Deterministic topological layering (Kahn's algorithm).

// Layer 1: Standard library imports
use std::collections::HashMap;
use std::sync::Arc;

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use super::node::GraphNode;
use crate::diagnostic::{ErrorCode, ErrorContext, OrchestratorError};
use crate::token::TokenId;

/// One slot of a layer: token identity plus description for trace output.
#[derive(Debug, Clone)]
pub struct LayerSlot {
    /// Token identity
    pub id: TokenId,
    /// Token description
    pub description: Arc<str>,
}

/// Ordered partition of the dependency graph.
///
/// Layer `i` contains only nodes whose dependencies all live in layers
/// `0..i`. Within a layer, nodes appear in the order determined by node
/// insertion and in-degree exhaustion, so the partition is deterministic for
/// a given registration sequence.
#[derive(Debug, Clone)]
pub struct Layers {
    layers: Vec<Vec<LayerSlot>>,
    layer_of: HashMap<TokenId, usize>,
}

impl Layers {
    /// Compute the layering for a set of graph nodes.
    ///
    /// Fails with ORK1008 when a dependency references a token absent from
    /// the node set, and with ORK1009 when the graph contains a cycle.
    pub fn compute(nodes: &[GraphNode]) -> Result<Self, OrchestratorError> {
        let index: HashMap<TokenId, usize> = nodes
            .iter()
            .enumerate()
            .map(|(position, node)| (node.id(), position))
            .collect();

        // Every dependency must name a node in the set.
        for node in nodes {
            for dep in node.dependencies() {
                if !index.contains_key(&dep.id()) {
                    return Err(OrchestratorError::with_message(
                        ErrorCode::UnknownDependency,
                        format!(
                            "dependency '{}' of '{}' is not registered",
                            dep.description(),
                            node.description()
                        ),
                    )
                    .with_context(ErrorContext::new().token(dep.description())));
                }
            }
        }

        let mut in_degree: Vec<usize> = nodes
            .iter()
            .map(|node| node.dependencies().len())
            .collect();

        // dependency position -> dependent positions, in insertion order
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
        for (position, node) in nodes.iter().enumerate() {
            for dep in node.dependencies() {
                if let Some(dep_position) = index.get(&dep.id()) {
                    dependents[*dep_position].push(position);
                }
            }
        }

        let mut frontier: Vec<usize> = (0..nodes.len())
            .filter(|position| in_degree[*position] == 0)
            .collect();

        let mut layers: Vec<Vec<LayerSlot>> = Vec::new();
        let mut layer_of: HashMap<TokenId, usize> = HashMap::new();
        let mut emitted = 0usize;

        while !frontier.is_empty() {
            let layer_index = layers.len();
            let mut next_frontier: Vec<usize> = Vec::new();

            let mut layer = Vec::with_capacity(frontier.len());
            for position in &frontier {
                let node = &nodes[*position];
                layer.push(LayerSlot {
                    id: node.id(),
                    description: node.description_arc(),
                });
                layer_of.insert(node.id(), layer_index);
                emitted += 1;

                for dependent in &dependents[*position] {
                    in_degree[*dependent] -= 1;
                    if in_degree[*dependent] == 0 {
                        next_frontier.push(*dependent);
                    }
                }
            }

            layers.push(layer);
            frontier = next_frontier;
        }

        if emitted != nodes.len() {
            return Err(OrchestratorError::new(ErrorCode::CycleDetected));
        }

        Ok(Self { layers, layer_of })
    }

    /// Ordered layers, bottom-up.
    pub fn iter(&self) -> impl Iterator<Item = &[LayerSlot]> {
        self.layers.iter().map(Vec::as_slice)
    }

    /// Number of layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether the partition is empty.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Total number of tokens across all layers.
    pub fn total(&self) -> usize {
        self.layers.iter().map(Vec::len).sum()
    }

    /// Layer index of a token, when it is part of the partition.
    pub fn layer_of(&self, id: TokenId) -> Option<usize> {
        self.layer_of.get(&id).copied()
    }

    /// Token descriptions per layer, for trace output.
    pub fn descriptions(&self) -> Vec<Vec<String>> {
        self.layers
            .iter()
            .map(|layer| {
                layer
                    .iter()
                    .map(|slot| slot.description.to_string())
                    .collect()
            })
            .collect()
    }

    /// Bucket a subset of tokens by layer and emit the buckets from the
    /// highest layer down — the teardown order.
    ///
    /// Input order is preserved within each bucket; tokens outside the
    /// partition are ignored.
    pub fn group(&self, tokens: &[TokenId]) -> Vec<Vec<TokenId>> {
        let mut buckets: Vec<Vec<TokenId>> = vec![Vec::new(); self.layers.len()];
        for id in tokens {
            if let Some(layer_index) = self.layer_of(*id) {
                buckets[layer_index].push(*id);
            }
        }
        buckets.retain(|bucket| !bucket.is_empty());
        buckets.reverse();
        buckets
    }
}
