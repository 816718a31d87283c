//! # armature
//!
//! Declarative dependency-wiring container.
//!
//! Components declare *providers* (factory operations producing one value
//! each) and *dependency slots* (inputs that must be injected before any
//! provider runs) through a [`Blueprint`]. [`Container::populate`] builds
//! a dependency graph over all registered components, resolves every slot
//! to exactly one provider, orders the components topologically - with
//! full cycle paths on failure - and instantiates them so that every
//! dependency exists before its consumer.
//!
//! ## Features
//!
//! - **Deterministic**: the same components in the same order always give
//!   the same construction order and store contents
//! - **Fail-fast**: duplicate provider names, unresolved or ambiguous
//!   slots and cycles abort population before anything is built
//! - **By name or by type**: slots resolve against an exact provider name
//!   or against a provider's output capability, with an explicit
//!   assignability fallback
//! - **Single pass**: populate once, then query concurrently; there is no
//!   runtime re-wiring
//!
//! ## Example
//!
//! ```
//! use armature::{Blueprint, Component, Container, WireResult};
//! use std::sync::Arc;
//!
//! struct HttpClient {
//! 	retries: u32,
//! }
//!
//! #[derive(Default)]
//! struct ConfigModule;
//!
//! impl Component for ConfigModule {
//! 	fn blueprint(&self) -> Blueprint {
//! 		Blueprint::new("ConfigModule").provider("Retries", |_: &ConfigModule| 3u32)
//! 	}
//! }
//!
//! #[derive(Default)]
//! struct ClientModule {
//! 	retries: Option<Arc<u32>>,
//! }
//!
//! impl Component for ClientModule {
//! 	fn blueprint(&self) -> Blueprint {
//! 		Blueprint::new("ClientModule")
//! 			.named_slot("Retries", |m: &mut ClientModule, v: Arc<u32>| {
//! 				m.retries = Some(v)
//! 			})
//! 			.provider("HTTPClient", |m: &ClientModule| HttpClient {
//! 				retries: **m.retries.as_ref().expect("injected before providers run"),
//! 			})
//! 	}
//! }
//!
//! # fn main() -> WireResult<()> {
//! // Registration order does not matter for correctness: the container
//! // wires ConfigModule first because ClientModule depends on it.
//! let container = Container::populate(vec![
//! 	Box::new(ClientModule::default()),
//! 	Box::new(ConfigModule),
//! ])?;
//!
//! let client = container.instance::<HttpClient>()?;
//! assert_eq!(client.retries, 3);
//! assert_eq!(*container.instance_by_name::<u32>("Retries")?, 3);
//! # Ok(())
//! # }
//! ```

mod blueprint;
mod capability;
mod container;
mod error;
mod graph;
mod introspect;
mod order;

pub use blueprint::{Blueprint, Component, Instance};
pub use capability::Capability;
pub use container::Container;
pub use error::{WireError, WireResult};
