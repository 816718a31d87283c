//! Wiring error taxonomy
//!
//! Every variant is a configuration or programmer error, never a transient
//! fault. Errors raised while building the graph or resolving the order
//! abort the whole populate call; query errors are returned to the caller
//! of the query operation.

/// Result alias used throughout the crate.
pub type WireResult<T> = Result<T, WireError>;

/// Errors raised while wiring a container or querying it afterwards.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
	/// The component does not satisfy the structural contract.
	#[error("component {component} is not a wireable shape: {reason}")]
	InvalidComponentShape {
		/// Name (or registration position) of the offending component
		component: String,
		/// What the blueprint got wrong
		reason: String,
	},

	/// Two providers anywhere in the container share a name.
	#[error("duplicated provider name {name} in components {first} and {second}")]
	DuplicateProviderName {
		name: String,
		first: String,
		second: String,
	},

	/// A named slot references a provider name nothing declares.
	#[error("dependency name {component}.{name} is not provided by any component")]
	UnresolvedNamedDependency { component: String, name: String },

	/// A typed slot matches no provider output, exactly or by assignability.
	#[error("dependency type {component}.{capability} is not provided by any component")]
	UnresolvedTypedDependency { component: String, capability: String },

	/// A typed slot matches more than one provider of the same capability.
	#[error("dependency type {component}.{capability} is provided by multiple components: {}", .owners.join(", "))]
	AmbiguousProvider {
		component: String,
		capability: String,
		/// Names of every component owning a matching provider
		owners: Vec<String>,
	},

	/// A typed slot with no exact match is satisfiable through two
	/// different assignable capabilities.
	#[error("multiple assignable types {first} and {second} for dependency type {component}.{capability}")]
	AmbiguousAssignableType {
		component: String,
		capability: String,
		first: String,
		second: String,
	},

	/// The dependency graph contains a cycle. The path runs along the
	/// recursion stack and repeats the closing component name.
	#[error("cyclic dependencies for components: {}", .path.join(" -> "))]
	CyclicDependency { path: Vec<String> },

	/// Post-populate query: no stored instance matches the requested type.
	#[error("no instance of type {capability} is registered")]
	TypeNotFound { capability: String },

	/// Post-populate query: more than one stored instance matches the
	/// requested type.
	#[error("type {capability} matches {count} stored instances")]
	AmbiguousType { capability: String, count: usize },

	/// Post-populate query: no stored instance carries the requested name.
	#[error("no instance is registered under the name {name}")]
	NameNotFound { name: String },

	/// Post-populate query: the named instance exists but is not of the
	/// requested type.
	#[error("instance {name} is not of the requested type {expected}")]
	NameTypeMismatch { name: String, expected: String },
}
