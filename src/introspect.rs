//! Component introspection
//!
//! Turns one registered component into its validated wiring description.
//! The rest of the engine depends only on the [`InspectedComponent`]
//! contract, not on how a component assembled its blueprint.

use crate::blueprint::{Component, NamedSlotSpec, ProviderSpec, TypedSlotSpec};
use crate::error::{WireError, WireResult};
use std::fmt;

/// One component's wiring description, tied back to its registration index.
pub(crate) struct InspectedComponent {
	/// Position in the registration order; doubles as the node id.
	pub(crate) index: usize,
	pub(crate) name: &'static str,
	pub(crate) providers: Vec<ProviderSpec>,
	pub(crate) named_slots: Vec<NamedSlotSpec>,
	pub(crate) typed_slots: Vec<TypedSlotSpec>,
}

impl fmt::Debug for InspectedComponent {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("InspectedComponent")
			.field("index", &self.index)
			.field("name", &self.name)
			.field("providers", &self.providers.len())
			.field("named_slots", &self.named_slots.len())
			.field("typed_slots", &self.typed_slots.len())
			.finish()
	}
}

/// Validates a component's blueprint and extracts its providers and slots.
///
/// Shape violations the builder cannot prevent at compile time surface
/// here as [`WireError::InvalidComponentShape`]. Cross-component checks
/// (duplicate provider names) belong to the graph builder.
pub(crate) fn inspect(index: usize, component: &dyn Component) -> WireResult<InspectedComponent> {
	let blueprint = component.blueprint();

	if blueprint.name.is_empty() {
		return Err(WireError::InvalidComponentShape {
			component: format!("#{index}"),
			reason: "blueprint declares an empty component name".to_string(),
		});
	}
	if blueprint.stray_satisfies {
		return Err(WireError::InvalidComponentShape {
			component: blueprint.name.to_string(),
			reason: "satisfies was declared before any provider".to_string(),
		});
	}

	Ok(InspectedComponent {
		index,
		name: blueprint.name,
		providers: blueprint.providers,
		named_slots: blueprint.named_slots,
		typed_slots: blueprint.typed_slots,
	})
}
