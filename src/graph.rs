//! Dependency graph construction
//!
//! Introspects every registered component, indexes their providers by name
//! and by output capability, resolves every dependency slot to exactly one
//! providing component, and records the resulting provider-to-dependent
//! edges. All ambiguity and resolution errors surface here, before
//! anything is instantiated.

use crate::blueprint::{CoerceFn, Component};
use crate::capability::Capability;
use crate::error::{WireError, WireResult};
use crate::introspect::{InspectedComponent, inspect};
use indexmap::{IndexMap, IndexSet};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// Immutable dependency graph over all registered components.
///
/// Nodes are registration indices; an edge (P, D) means D cannot be
/// instantiated until P has executed all of its providers. Every
/// component is a node, isolated ones included. Duplicate edges between
/// the same pair collapse into one.
pub(crate) struct DependencyGraph {
	pub(crate) components: Vec<InspectedComponent>,
	/// `edges[p]` holds every dependent of component `p`, in the order
	/// the dependencies were discovered.
	pub(crate) edges: Vec<IndexSet<usize>>,
	/// Coercions keyed by (provider output, assignable-to capability),
	/// collected from every provider's `satisfies` declarations.
	pub(crate) coercions: HashMap<(Capability, Capability), CoerceFn>,
}

impl fmt::Debug for DependencyGraph {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("DependencyGraph")
			.field("components", &self.components)
			.field("edges", &self.edges)
			.finish_non_exhaustive()
	}
}

impl DependencyGraph {
	/// Builds the graph for a set of components, in registration order.
	///
	/// Error priority follows the build phases: component shape first,
	/// then duplicate provider names, then per-component name and type
	/// resolution. Cycles are the order resolver's concern.
	pub(crate) fn build(components: &[Box<dyn Component>]) -> WireResult<Self> {
		let mut inspected = Vec::with_capacity(components.len());
		for (index, component) in components.iter().enumerate() {
			inspected.push(inspect(index, component.as_ref())?);
		}
		debug!(components = inspected.len(), "building dependency graph");

		let name_index = build_name_index(&inspected)?;
		let (type_index, coercions) = build_type_index(&inspected);

		let mut edges: Vec<IndexSet<usize>> = vec![IndexSet::new(); inspected.len()];
		for component in &inspected {
			for slot in &component.named_slots {
				let Some(&owner) = name_index.get(slot.depends_on) else {
					return Err(WireError::UnresolvedNamedDependency {
						component: component.name.to_string(),
						name: slot.depends_on.to_string(),
					});
				};
				edges[owner].insert(component.index);
			}
			for slot in &component.typed_slots {
				let owners: &[usize] = match type_index.get(&slot.expected) {
					Some(owners) => owners.as_slice(),
					None => assignable_owners(component, slot.expected, &type_index, &coercions)?,
				};
				match owners {
					[] => {
						return Err(WireError::UnresolvedTypedDependency {
							component: component.name.to_string(),
							capability: slot.expected.to_string(),
						});
					}
					[owner] => {
						edges[*owner].insert(component.index);
					}
					owners => {
						return Err(WireError::AmbiguousProvider {
							component: component.name.to_string(),
							capability: slot.expected.to_string(),
							owners: owners
								.iter()
								.map(|&owner| inspected[owner].name.to_string())
								.collect(),
						});
					}
				}
			}
		}

		Ok(Self {
			components: inspected,
			edges,
			coercions,
		})
	}
}

/// Maps every provider name to its owning component, failing on the first
/// duplicate anywhere in the container.
fn build_name_index(inspected: &[InspectedComponent]) -> WireResult<IndexMap<&'static str, usize>> {
	let mut name_index = IndexMap::new();
	for component in inspected {
		for provider in &component.providers {
			if let Some(&first) = name_index.get(provider.name) {
				let first: &InspectedComponent = &inspected[first];
				return Err(WireError::DuplicateProviderName {
					name: provider.name.to_string(),
					first: first.name.to_string(),
					second: component.name.to_string(),
				});
			}
			name_index.insert(provider.name, component.index);
		}
	}
	Ok(name_index)
}

/// Maps every output capability to the components providing it, in
/// discovery order, and collects the assignability coercions.
#[allow(clippy::type_complexity)]
fn build_type_index(
	inspected: &[InspectedComponent],
) -> (
	IndexMap<Capability, Vec<usize>>,
	HashMap<(Capability, Capability), CoerceFn>,
) {
	let mut type_index: IndexMap<Capability, Vec<usize>> = IndexMap::new();
	let mut coercions = HashMap::new();
	for component in inspected {
		for provider in &component.providers {
			type_index
				.entry(provider.output)
				.or_default()
				.push(component.index);
			for (capability, coerce) in &provider.satisfies {
				coercions.insert((provider.output, *capability), coerce.clone());
			}
		}
	}
	(type_index, coercions)
}

/// Finds the providers reachable through a single assignable capability
/// when no provider outputs `expected` exactly.
fn assignable_owners<'a>(
	component: &InspectedComponent,
	expected: Capability,
	type_index: &'a IndexMap<Capability, Vec<usize>>,
	coercions: &HashMap<(Capability, Capability), CoerceFn>,
) -> WireResult<&'a [usize]> {
	let mut matched: Option<(Capability, &'a [usize])> = None;
	for (&capability, owners) in type_index {
		if !coercions.contains_key(&(capability, expected)) {
			continue;
		}
		if let Some((first, _)) = matched {
			return Err(WireError::AmbiguousAssignableType {
				component: component.name.to_string(),
				capability: expected.to_string(),
				first: first.to_string(),
				second: capability.to_string(),
			});
		}
		matched = Some((capability, owners.as_slice()));
	}
	Ok(matched.map(|(_, owners)| owners).unwrap_or(&[]))
}
