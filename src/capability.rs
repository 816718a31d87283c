//! Capability identity for provider outputs and slot expectations

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identity of a type a provider produces or a slot expects.
///
/// A capability pairs the `TypeId` used for matching with the type's
/// human-readable name used in error messages. Two capabilities compare
/// equal exactly when their `TypeId`s do.
///
/// # Examples
///
/// ```
/// use armature::Capability;
///
/// let a = Capability::of::<u32>();
/// let b = Capability::of::<u32>();
/// assert_eq!(a, b);
/// assert_ne!(a, Capability::of::<u64>());
/// ```
#[derive(Clone, Copy)]
pub struct Capability {
	id: TypeId,
	name: &'static str,
}

impl Capability {
	/// Returns the capability of type `T`.
	pub fn of<T: ?Sized + 'static>() -> Self {
		Self {
			id: TypeId::of::<T>(),
			name: std::any::type_name::<T>(),
		}
	}

	/// The full type name this capability was created from.
	pub fn name(&self) -> &'static str {
		self.name
	}
}

impl PartialEq for Capability {
	fn eq(&self, other: &Self) -> bool {
		self.id == other.id
	}
}

impl Eq for Capability {}

impl Hash for Capability {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.id.hash(state);
	}
}

impl fmt::Debug for Capability {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Capability").field(&self.name).finish()
	}
}

impl fmt::Display for Capability {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name)
	}
}
