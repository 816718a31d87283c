//! Container: wiring driver and instance store
//!
//! Drives introspection, graph construction and order resolution, then
//! instantiates every component in that order, filling its dependency
//! slots from already-built instances before invoking its providers.
//! Population is single-threaded and synchronous; the store is mutated
//! only during [`Container::populate`] and is read-only afterwards, so
//! the query operations may be called concurrently once it returns.

use crate::blueprint::{CoerceFn, Component, Instance};
use crate::capability::Capability;
use crate::error::{WireError, WireResult};
use crate::graph::DependencyGraph;
use crate::introspect::InspectedComponent;
use crate::order::instantiation_order;
use indexmap::IndexMap;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// A populated object graph.
///
/// Created by [`Container::populate`]; on failure no container exists, so
/// a partially wired graph can never be queried. The container owns its
/// components for the lifetime of the graph and never disposes the
/// produced instances.
///
/// # Examples
///
/// ```
/// use armature::{Blueprint, Component, Container};
///
/// #[derive(Default)]
/// struct ConfigModule;
///
/// impl Component for ConfigModule {
/// 	fn blueprint(&self) -> Blueprint {
/// 		Blueprint::new("ConfigModule").provider("Retries", |_: &ConfigModule| 3u32)
/// 	}
/// }
///
/// let container = Container::populate(vec![Box::new(ConfigModule)]).unwrap();
/// assert_eq!(*container.instance::<u32>().unwrap(), 3);
/// ```
pub struct Container {
	components: Vec<Box<dyn Component>>,
	by_name: IndexMap<&'static str, Instance>,
	/// Instances per output capability, in provider invocation order.
	by_type: IndexMap<Capability, Vec<Instance>>,
	coercions: HashMap<(Capability, Capability), CoerceFn>,
}

impl fmt::Debug for Container {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Container")
			.field("names", &self.by_name.keys().collect::<Vec<_>>())
			.field("types", &self.by_type.keys().collect::<Vec<_>>())
			.finish_non_exhaustive()
	}
}

impl Container {
	/// Wires and instantiates the given components.
	///
	/// Builds the dependency graph, resolves the instantiation order and
	/// constructs every component in it. Any configuration defect -
	/// malformed shape, duplicate provider names, unresolved or ambiguous
	/// slots, cycles - aborts the whole call with the first error in
	/// build-phase order. These are static configuration errors; retrying
	/// with the same components will fail identically.
	pub fn populate(components: Vec<Box<dyn Component>>) -> WireResult<Self> {
		let graph = DependencyGraph::build(&components)?;
		let order = instantiation_order(&graph)?;
		let DependencyGraph {
			components: inspected,
			coercions,
			..
		} = graph;

		let mut container = Self {
			components,
			by_name: IndexMap::new(),
			by_type: IndexMap::new(),
			coercions,
		};
		let mut inspected: Vec<Option<InspectedComponent>> =
			inspected.into_iter().map(Some).collect();
		for index in order {
			let component = inspected[index]
				.take()
				.unwrap_or_else(|| panic!("component #{index} scheduled twice"));
			container.instantiate(component);
		}
		debug!(
			instances = container.by_name.len(),
			"container population complete"
		);
		Ok(container)
	}

	/// Fills every slot of one component, then runs its providers.
	///
	/// The resolved order guarantees every dependency is already stored;
	/// a miss here is an engine defect, not a configuration error, and
	/// aborts the process.
	fn instantiate(&mut self, component: InspectedComponent) {
		let InspectedComponent {
			index,
			name,
			providers,
			named_slots,
			typed_slots,
		} = component;

		for slot in &named_slots {
			let instance = match self.by_name.get(slot.depends_on) {
				Some(instance) => Arc::clone(instance),
				None => panic!(
					"named dependency {name}.{} vanished after graph validation",
					slot.depends_on
				),
			};
			let target: &mut dyn Any = self.components[index].as_mut();
			if !(slot.set)(target, instance) {
				panic!(
					"injection target {name}.{} rejected the resolved instance",
					slot.depends_on
				);
			}
		}

		for slot in &typed_slots {
			let instance = self.resolve_stored(name, slot.expected);
			let target: &mut dyn Any = self.components[index].as_mut();
			if !(slot.set)(target, instance) {
				panic!(
					"injection target {name}.{} rejected the resolved instance",
					slot.expected
				);
			}
		}

		for provider in &providers {
			let value = {
				let source: &dyn Any = self.components[index].as_ref();
				(provider.invoke)(source).unwrap_or_else(|| {
					panic!(
						"provider {name}.{} was invoked against a foreign component",
						provider.name
					)
				})
			};
			trace!(component = name, provider = provider.name, "provider invoked");
			self.by_name.insert(provider.name, Arc::clone(&value));
			self.by_type.entry(provider.output).or_default().push(value);
		}
	}

	/// Resolves a typed slot against the live instance store: exact
	/// capability first, then the unique assignable fallback. Ambiguity
	/// was excluded at graph-build time, so any miss is an engine defect.
	fn resolve_stored(&self, component: &str, expected: Capability) -> Instance {
		if let Some(bucket) = self.by_type.get(&expected) {
			match bucket.as_slice() {
				[instance] => return Arc::clone(instance),
				other => panic!(
					"typed dependency {component}.{expected} resolved to {} stored instances after graph validation",
					other.len()
				),
			}
		}

		let mut matched: Option<(Capability, &Instance)> = None;
		for (&capability, bucket) in &self.by_type {
			if !self.coercions.contains_key(&(capability, expected)) {
				continue;
			}
			for instance in bucket {
				if matched.is_some() {
					panic!("typed dependency {component}.{expected} became ambiguous after graph validation");
				}
				matched = Some((capability, instance));
			}
		}
		let Some((capability, instance)) = matched else {
			panic!("typed dependency {component}.{expected} vanished after graph validation");
		};
		let coerce = &self.coercions[&(capability, expected)];
		coerce(instance).unwrap_or_else(|| {
			panic!("stored instance for {capability} no longer matches its declared capability")
		})
	}

	/// Returns the single stored instance of type `T`.
	///
	/// Looks up the exact capability first; when nothing was stored under
	/// it, falls back to scanning every stored instance whose provider
	/// declared assignability to `T`. Zero matches fail with
	/// [`WireError::TypeNotFound`], more than one - whether an exact
	/// bucket holding several instances or several assignable matches -
	/// with [`WireError::AmbiguousType`].
	///
	/// # Examples
	///
	/// ```
	/// use armature::{Blueprint, Component, Container};
	///
	/// struct Clock;
	/// #[derive(Default)]
	/// struct TimeModule;
	///
	/// impl Component for TimeModule {
	/// 	fn blueprint(&self) -> Blueprint {
	/// 		Blueprint::new("TimeModule").provider("Clock", |_: &TimeModule| Clock)
	/// 	}
	/// }
	///
	/// let container = Container::populate(vec![Box::new(TimeModule)]).unwrap();
	/// let _clock = container.instance::<Clock>().unwrap();
	/// ```
	pub fn instance<T: Any + Send + Sync>(&self) -> WireResult<Arc<T>> {
		let capability = Capability::of::<T>();
		if let Some(bucket) = self.by_type.get(&capability) {
			match bucket.as_slice() {
				[instance] => return Ok(downcast_stored(instance, capability)),
				bucket => {
					return Err(WireError::AmbiguousType {
						capability: capability.to_string(),
						count: bucket.len(),
					});
				}
			}
		}

		let mut matches = Vec::new();
		for (&stored, bucket) in &self.by_type {
			let Some(coerce) = self.coercions.get(&(stored, capability)) else {
				continue;
			};
			for instance in bucket {
				let coerced = coerce(instance).unwrap_or_else(|| {
					panic!("stored instance for {stored} no longer matches its declared capability")
				});
				matches.push(coerced);
			}
		}
		match matches.as_slice() {
			[] => Err(WireError::TypeNotFound {
				capability: capability.to_string(),
			}),
			[instance] => Ok(downcast_stored(instance, capability)),
			matches => Err(WireError::AmbiguousType {
				capability: capability.to_string(),
				count: matches.len(),
			}),
		}
	}

	/// Returns the instance registered under a provider name.
	///
	/// Fails with [`WireError::NameNotFound`] when no provider carries the
	/// name, and with [`WireError::NameTypeMismatch`] when the stored
	/// instance is not a `T`.
	///
	/// # Examples
	///
	/// ```
	/// use armature::{Blueprint, Component, Container};
	///
	/// #[derive(Default)]
	/// struct ConfigModule;
	///
	/// impl Component for ConfigModule {
	/// 	fn blueprint(&self) -> Blueprint {
	/// 		Blueprint::new("ConfigModule").provider("Retries", |_: &ConfigModule| 3u32)
	/// 	}
	/// }
	///
	/// let container = Container::populate(vec![Box::new(ConfigModule)]).unwrap();
	/// assert_eq!(*container.instance_by_name::<u32>("Retries").unwrap(), 3);
	/// ```
	pub fn instance_by_name<T: Any + Send + Sync>(&self, name: &str) -> WireResult<Arc<T>> {
		let instance = self
			.by_name
			.get(name)
			.ok_or_else(|| WireError::NameNotFound {
				name: name.to_string(),
			})?;
		Arc::clone(instance)
			.downcast::<T>()
			.map_err(|_| WireError::NameTypeMismatch {
				name: name.to_string(),
				expected: std::any::type_name::<T>().to_string(),
			})
	}
}

fn downcast_stored<T: Any + Send + Sync>(instance: &Instance, capability: Capability) -> Arc<T> {
	Arc::clone(instance).downcast::<T>().unwrap_or_else(|_| {
		panic!("stored instance for {capability} no longer matches its declared capability")
	})
}
