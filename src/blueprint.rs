//! Component declaration surface
//!
//! Rust has no runtime reflection, so a component describes itself through
//! a [`Blueprint`]: the list of providers it exposes and the dependency
//! slots it wants filled before those providers run. The engine consumes
//! only the blueprint; how a component computes it is the component's
//! business.

use crate::capability::Capability;
use std::any::Any;
use std::sync::Arc;

/// A value produced by a provider, stored type-erased in the container.
pub type Instance = Arc<dyn Any + Send + Sync>;

/// Invokes a provider against its owning component. `None` means the
/// component instance was not of the declared type, which is an engine
/// defect, never a configuration error.
pub(crate) type ProviderFn = Box<dyn Fn(&dyn Any) -> Option<Instance> + Send + Sync>;

/// Delivers a resolved instance into a slot's target location. `false`
/// means the component or the instance was of an unexpected type.
pub(crate) type SetterFn = Box<dyn Fn(&mut dyn Any, Instance) -> bool + Send + Sync>;

/// Re-shapes a stored instance into an assignable capability.
pub(crate) type CoerceFn = Arc<dyn Fn(&Instance) -> Option<Instance> + Send + Sync>;

/// Marker capability for values that participate in wiring.
///
/// A component declares zero or more providers (factory operations that
/// produce one value each) and zero or more dependency slots (inputs that
/// must be filled before any provider runs). Components are compared by
/// identity, never by value; the container takes ownership of them for the
/// lifetime of the wired graph.
///
/// # Examples
///
/// ```
/// use armature::{Blueprint, Component};
///
/// #[derive(Default)]
/// struct ConfigModule;
///
/// impl Component for ConfigModule {
/// 	fn blueprint(&self) -> Blueprint {
/// 		Blueprint::new("ConfigModule").provider("Retries", |_: &ConfigModule| 3u32)
/// 	}
/// }
/// ```
pub trait Component: Any + Send + Sync {
	/// Describes this component's providers and dependency slots.
	fn blueprint(&self) -> Blueprint;
}

pub(crate) struct ProviderSpec {
	pub(crate) name: &'static str,
	pub(crate) output: Capability,
	/// Capabilities this provider's output may be delivered as, with the
	/// coercion performing the delivery.
	pub(crate) satisfies: Vec<(Capability, CoerceFn)>,
	pub(crate) invoke: ProviderFn,
}

pub(crate) struct NamedSlotSpec {
	pub(crate) depends_on: &'static str,
	pub(crate) set: SetterFn,
}

pub(crate) struct TypedSlotSpec {
	pub(crate) expected: Capability,
	pub(crate) set: SetterFn,
}

/// Declarative description of one component: its name, providers and
/// dependency slots, in declaration order.
///
/// Built with a chained builder API. Declaration order is meaningful:
/// providers are invoked in the order declared, and `satisfies` applies to
/// the most recently declared provider.
pub struct Blueprint {
	pub(crate) name: &'static str,
	pub(crate) providers: Vec<ProviderSpec>,
	pub(crate) named_slots: Vec<NamedSlotSpec>,
	pub(crate) typed_slots: Vec<TypedSlotSpec>,
	/// Set when `satisfies` was called before any provider existed.
	pub(crate) stray_satisfies: bool,
}

impl Blueprint {
	/// Starts a blueprint for the component named `name`.
	///
	/// The name identifies the component in error messages and cycle
	/// paths; it does not take part in resolution.
	pub fn new(name: &'static str) -> Self {
		Self {
			name,
			providers: Vec::new(),
			named_slots: Vec::new(),
			typed_slots: Vec::new(),
			stray_satisfies: false,
		}
	}

	/// Declares a provider: a factory taking only the component itself and
	/// producing exactly one value.
	///
	/// The provider name must be unique across the whole container, even
	/// when no slot consumes it. The output capability is the closure's
	/// return type; returning an `Arc<dyn Trait>` value makes the provider
	/// produce that interface capability directly.
	///
	/// # Examples
	///
	/// ```
	/// use armature::{Blueprint, Component};
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
	/// ```
	pub fn provider<C, R>(
		mut self,
		name: &'static str,
		produce: impl Fn(&C) -> R + Send + Sync + 'static,
	) -> Self
	where
		C: Component,
		R: Any + Send + Sync,
	{
		let invoke: ProviderFn = Box::new(move |component| {
			let component = component.downcast_ref::<C>()?;
			Some(Arc::new(produce(component)) as Instance)
		});
		self.providers.push(ProviderSpec {
			name,
			output: Capability::of::<R>(),
			satisfies: Vec::new(),
			invoke,
		});
		self
	}

	/// Declares that the most recently declared provider's output is
	/// assignable to another capability, supplying the coercion that
	/// delivers it in that shape.
	///
	/// This is the explicit compatibility declaration a typed slot falls
	/// back to when no provider outputs its expected capability exactly.
	/// Calling this before any `provider` marks the blueprint malformed.
	///
	/// # Examples
	///
	/// ```
	/// use armature::{Blueprint, Component};
	/// use std::sync::Arc;
	///
	/// trait Store: Send + Sync {}
	/// struct DiskStore;
	/// impl Store for DiskStore {}
	///
	/// #[derive(Default)]
	/// struct PersistModule;
	///
	/// impl Component for PersistModule {
	/// 	fn blueprint(&self) -> Blueprint {
	/// 		Blueprint::new("PersistModule")
	/// 			.provider("DiskStore", |_: &PersistModule| DiskStore)
	/// 			.satisfies(|s: Arc<DiskStore>| s as Arc<dyn Store>)
	/// 	}
	/// }
	/// ```
	pub fn satisfies<R, I>(mut self, coerce: impl Fn(Arc<R>) -> I + Send + Sync + 'static) -> Self
	where
		R: Any + Send + Sync,
		I: Any + Send + Sync,
	{
		let capability = Capability::of::<I>();
		let coerce: CoerceFn = Arc::new(move |instance: &Instance| {
			let concrete = Arc::clone(instance).downcast::<R>().ok()?;
			Some(Arc::new(coerce(concrete)) as Instance)
		});
		match self.providers.last_mut() {
			Some(provider) => provider.satisfies.push((capability, coerce)),
			None => self.stray_satisfies = true,
		}
		self
	}

	/// Declares a dependency slot resolved by provider name.
	///
	/// `depends_on` must match a provider name exactly; the setter is the
	/// slot's target location and runs before any of this component's
	/// providers.
	pub fn named_slot<C, R>(
		mut self,
		depends_on: &'static str,
		set: impl Fn(&mut C, Arc<R>) + Send + Sync + 'static,
	) -> Self
	where
		C: Component,
		R: Any + Send + Sync,
	{
		self.named_slots.push(NamedSlotSpec {
			depends_on,
			set: erase_setter(set),
		});
		self
	}

	/// Declares a dependency slot resolved by capability.
	///
	/// Resolution prefers a provider whose output capability is exactly
	/// `R`; failing that, a single provider declaring `satisfies` for `R`
	/// is used. Anything else is a wiring error.
	pub fn typed_slot<C, R>(mut self, set: impl Fn(&mut C, Arc<R>) + Send + Sync + 'static) -> Self
	where
		C: Component,
		R: Any + Send + Sync,
	{
		self.typed_slots.push(TypedSlotSpec {
			expected: Capability::of::<R>(),
			set: erase_setter(set),
		});
		self
	}
}

fn erase_setter<C, R>(set: impl Fn(&mut C, Arc<R>) + Send + Sync + 'static) -> SetterFn
where
	C: Component,
	R: Any + Send + Sync,
{
	Box::new(move |component, instance| {
		let Some(component) = component.downcast_mut::<C>() else {
			return false;
		};
		let Ok(value) = instance.downcast::<R>() else {
			return false;
		};
		set(component, value);
		true
	})
}
