//! Instantiation order resolution
//!
//! Depth-first traversal over the dependency graph, started from every
//! node in registration order so the result is deterministic. Nodes carry
//! three colors: unvisited, on the current recursion path, and done. A
//! neighbor already on the path is a cycle; the error carries the full
//! recursion path including the repeated name that closes it.

use crate::error::{WireError, WireResult};
use crate::graph::DependencyGraph;
use tracing::debug;

#[derive(Clone, Copy, PartialEq)]
enum Color {
	Unvisited,
	OnPath,
	Done,
}

/// Resolves the order components must be instantiated in.
///
/// A component never precedes a component it depends on. Self-loops are
/// one-node cycles and are rejected like any other cycle.
pub(crate) fn instantiation_order(graph: &DependencyGraph) -> WireResult<Vec<usize>> {
	let mut colors = vec![Color::Unvisited; graph.components.len()];
	let mut stack = Vec::with_capacity(graph.components.len());
	let mut path = Vec::new();

	for node in 0..graph.components.len() {
		if colors[node] == Color::Unvisited {
			visit(graph, node, &mut colors, &mut stack, &mut path)?;
		}
	}

	// Providers were pushed after their dependents; reverse for the
	// construction order.
	stack.reverse();
	debug!(
		order = ?stack
			.iter()
			.map(|&node| graph.components[node].name)
			.collect::<Vec<_>>(),
		"resolved instantiation order"
	);
	Ok(stack)
}

fn visit(
	graph: &DependencyGraph,
	node: usize,
	colors: &mut [Color],
	stack: &mut Vec<usize>,
	path: &mut Vec<&'static str>,
) -> WireResult<()> {
	path.push(graph.components[node].name);
	if colors[node] == Color::OnPath {
		return Err(WireError::CyclicDependency {
			path: path.iter().map(|name| name.to_string()).collect(),
		});
	}

	colors[node] = Color::OnPath;
	for &dependent in &graph.edges[node] {
		if colors[dependent] != Color::Done {
			visit(graph, dependent, colors, stack, path)?;
		}
	}
	colors[node] = Color::Done;
	stack.push(node);
	path.pop();

	Ok(())
}
