//! Start-order resolution.
//!
//! # Responsibilities
//! - Build the dependency graph from the registry
//! - Reject unknown dependency names and cycles
//! - Produce a start order with dependencies first, then higher priority first
//!
//! # Design Decisions
//! - Pure function of the registry; the graph is rebuilt on every call
//! - DFS reverse-postorder, roots visited in registration order
//! - Priority only reorders adapters the dependency edges leave free

use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap, HashMap};
use std::sync::Arc;

use crate::adapter::Adapter;
use crate::error::ConfigurationError;
use crate::registry::{Registration, Registry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

struct TopoSort<'a> {
    entries: &'a [Registration],
    index: &'a HashMap<&'a str, usize>,
    marks: Vec<Mark>,
    order: Vec<usize>,
}

impl<'a> TopoSort<'a> {
    fn visit(&mut self, node: usize) -> Result<(), ConfigurationError> {
        let entries = self.entries;
        match self.marks[node] {
            Mark::Done => return Ok(()),
            Mark::InProgress => {
                return Err(ConfigurationError::CircularDependency {
                    node: entries[node].name().to_string(),
                });
            }
            Mark::Unvisited => {}
        }

        self.marks[node] = Mark::InProgress;
        for dep in &entries[node].dependencies {
            let Some(&dep_node) = self.index.get(dep.as_str()) else {
                return Err(ConfigurationError::UnknownDependency {
                    adapter: entries[node].name().to_string(),
                    dependency: dep.clone(),
                });
            };
            self.visit(dep_node)?;
        }
        self.marks[node] = Mark::Done;
        self.order.push(node);
        Ok(())
    }
}

/// Dependency-first topological order as registry indices.
fn topological_order(
    entries: &[Registration],
    index: &HashMap<&str, usize>,
) -> Result<Vec<usize>, ConfigurationError> {
    let mut sort = TopoSort {
        entries,
        index,
        marks: vec![Mark::Unvisited; entries.len()],
        order: Vec::with_capacity(entries.len()),
    };
    for node in 0..entries.len() {
        sort.visit(node)?;
    }
    Ok(sort.order)
}

/// Reorder a valid topological order by descending priority.
///
/// Emits, among entries whose dependencies were all emitted, the highest
/// priority first; ties keep their topological position.
fn prioritize(entries: &[Registration], index: &HashMap<&str, usize>, topo: &[usize]) -> Vec<usize> {
    let mut position = vec![0usize; entries.len()];
    for (pos, &node) in topo.iter().enumerate() {
        position[node] = pos;
    }

    let mut pending = vec![0usize; entries.len()];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); entries.len()];
    for (node, entry) in entries.iter().enumerate() {
        // Repeated dependency names count once.
        let deps: BTreeSet<usize> = entry
            .dependencies
            .iter()
            .filter_map(|d| index.get(d.as_str()).copied())
            .collect();
        pending[node] = deps.len();
        for dep in deps {
            dependents[dep].push(node);
        }
    }

    let mut ready: BinaryHeap<(i32, Reverse<usize>, usize)> = (0..entries.len())
        .filter(|&node| pending[node] == 0)
        .map(|node| (entries[node].priority, Reverse(position[node]), node))
        .collect();

    let mut order = Vec::with_capacity(entries.len());
    while let Some((_, _, node)) = ready.pop() {
        order.push(node);
        for &dependent in &dependents[node] {
            pending[dependent] -= 1;
            if pending[dependent] == 0 {
                ready.push((entries[dependent].priority, Reverse(position[dependent]), dependent));
            }
        }
    }
    order
}

/// Compute the start order for every registered adapter.
pub fn resolve_start_order(registry: &Registry) -> Result<Vec<Arc<dyn Adapter>>, ConfigurationError> {
    let entries = registry.entries();
    let index: HashMap<&str, usize> = entries
        .iter()
        .enumerate()
        .map(|(i, e)| (e.name(), i))
        .collect();

    let topo = topological_order(entries, &index)?;
    let order = prioritize(entries, &index, &topo);

    tracing::debug!(
        order = ?order.iter().map(|&i| entries[i].name()).collect::<Vec<_>>(),
        "Resolved start order"
    );

    Ok(order.into_iter().map(|i| entries[i].adapter.clone()).collect())
}
