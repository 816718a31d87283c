//! Configuration defects detected while building the dependency graph

use armature::{Blueprint, Component, Container, WireError};
use rstest::rstest;
use std::sync::Arc;

struct Token(#[allow(dead_code)] u8);

trait Cache: Send + Sync + std::fmt::Debug {}

#[derive(Debug)]
struct MemoryCache;
impl Cache for MemoryCache {}

#[derive(Debug)]
struct DiskCache;
impl Cache for DiskCache {}

struct TokenSource;

impl Component for TokenSource {
	fn blueprint(&self) -> Blueprint {
		Blueprint::new("TokenSource").provider("token", |_: &TokenSource| Token(1))
	}
}

#[rstest]
fn duplicate_provider_names_across_components_fail() {
	// Arrange: the duplicated name is never consumed by any slot, which
	// must not matter.
	struct OtherTokenSource;
	impl Component for OtherTokenSource {
		fn blueprint(&self) -> Blueprint {
			Blueprint::new("OtherTokenSource").provider("token", |_: &OtherTokenSource| Token(2))
		}
	}

	// Act
	let err = Container::populate(vec![Box::new(TokenSource), Box::new(OtherTokenSource)])
		.unwrap_err();

	// Assert
	match err {
		WireError::DuplicateProviderName {
			name,
			first,
			second,
		} => {
			assert_eq!(name, "token");
			assert_eq!(first, "TokenSource");
			assert_eq!(second, "OtherTokenSource");
		}
		other => panic!("expected DuplicateProviderName, got {other}"),
	}
}

#[rstest]
fn duplicate_provider_names_within_one_component_fail() {
	// Arrange
	struct Doubled;
	impl Component for Doubled {
		fn blueprint(&self) -> Blueprint {
			Blueprint::new("Doubled")
				.provider("token", |_: &Doubled| Token(1))
				.provider("token", |_: &Doubled| Token(2))
		}
	}

	// Act
	let err = Container::populate(vec![Box::new(Doubled)]).unwrap_err();

	// Assert
	assert!(matches!(
		err,
		WireError::DuplicateProviderName { first, second, .. }
			if first == "Doubled" && second == "Doubled"
	));
}

#[rstest]
fn unresolved_named_dependency_reports_component_and_name() {
	// Arrange
	#[derive(Default)]
	struct M;
	impl Component for M {
		fn blueprint(&self) -> Blueprint {
			Blueprint::new("M").named_slot("x", |_: &mut M, _: Arc<Token>| {})
		}
	}

	// Act
	let err = Container::populate(vec![Box::new(M::default())]).unwrap_err();

	// Assert
	assert!(matches!(
		err,
		WireError::UnresolvedNamedDependency { component, name }
			if component == "M" && name == "x"
	));
}

#[rstest]
fn unresolved_typed_dependency_fails() {
	// Arrange
	#[derive(Default)]
	struct Consumer;
	impl Component for Consumer {
		fn blueprint(&self) -> Blueprint {
			Blueprint::new("Consumer").typed_slot(|_: &mut Consumer, _: Arc<String>| {})
		}
	}

	// Act
	let err =
		Container::populate(vec![Box::new(Consumer), Box::new(TokenSource)]).unwrap_err();

	// Assert
	assert!(matches!(
		err,
		WireError::UnresolvedTypedDependency { component, .. } if component == "Consumer"
	));
}

#[rstest]
fn two_providers_of_one_capability_make_a_typed_slot_ambiguous() {
	// Arrange
	struct Left;
	impl Component for Left {
		fn blueprint(&self) -> Blueprint {
			Blueprint::new("Left").provider("left", |_: &Left| Token(1))
		}
	}
	struct Right;
	impl Component for Right {
		fn blueprint(&self) -> Blueprint {
			Blueprint::new("Right").provider("right", |_: &Right| Token(2))
		}
	}
	#[derive(Default)]
	struct Consumer;
	impl Component for Consumer {
		fn blueprint(&self) -> Blueprint {
			Blueprint::new("Consumer").typed_slot(|_: &mut Consumer, _: Arc<Token>| {})
		}
	}

	// Act
	let err = Container::populate(vec![
		Box::new(Left),
		Box::new(Right),
		Box::new(Consumer),
	])
	.unwrap_err();

	// Assert
	match err {
		WireError::AmbiguousProvider {
			component, owners, ..
		} => {
			assert_eq!(component, "Consumer");
			assert_eq!(owners, vec!["Left".to_string(), "Right".to_string()]);
		}
		other => panic!("expected AmbiguousProvider, got {other}"),
	}
}

#[rstest]
fn two_assignable_capabilities_are_ambiguous() {
	// Arrange: no provider outputs Arc<dyn Cache> exactly, but two
	// different concrete capabilities declare assignability to it.
	struct MemoryModule;
	impl Component for MemoryModule {
		fn blueprint(&self) -> Blueprint {
			Blueprint::new("MemoryModule")
				.provider("memory", |_: &MemoryModule| MemoryCache)
				.satisfies(|c: Arc<MemoryCache>| c as Arc<dyn Cache>)
		}
	}
	struct DiskModule;
	impl Component for DiskModule {
		fn blueprint(&self) -> Blueprint {
			Blueprint::new("DiskModule")
				.provider("disk", |_: &DiskModule| DiskCache)
				.satisfies(|c: Arc<DiskCache>| c as Arc<dyn Cache>)
		}
	}
	#[derive(Default)]
	struct Consumer;
	impl Component for Consumer {
		fn blueprint(&self) -> Blueprint {
			Blueprint::new("Consumer").typed_slot(|_: &mut Consumer, _: Arc<Arc<dyn Cache>>| {})
		}
	}

	// Act
	let err = Container::populate(vec![
		Box::new(MemoryModule),
		Box::new(DiskModule),
		Box::new(Consumer),
	])
	.unwrap_err();

	// Assert
	assert!(matches!(
		err,
		WireError::AmbiguousAssignableType { component, .. } if component == "Consumer"
	));
}

#[rstest]
fn unique_assignable_capability_resolves() {
	// Arrange
	#[derive(Default)]
	struct MemoryModule;
	impl Component for MemoryModule {
		fn blueprint(&self) -> Blueprint {
			Blueprint::new("MemoryModule")
				.provider("memory", |_: &MemoryModule| MemoryCache)
				.satisfies(|c: Arc<MemoryCache>| c as Arc<dyn Cache>)
		}
	}
	#[derive(Default)]
	struct Consumer {
		cache: Option<Arc<dyn Cache>>,
	}
	impl Component for Consumer {
		fn blueprint(&self) -> Blueprint {
			Blueprint::new("Consumer")
				.typed_slot(|c: &mut Consumer, v: Arc<Arc<dyn Cache>>| {
					c.cache = Some(Arc::clone(&*v))
				})
				.provider("cache_ready", |c: &Consumer| c.cache.is_some())
		}
	}

	// Act
	let container =
		Container::populate(vec![Box::new(MemoryModule), Box::new(Consumer::default())])
			.unwrap();

	// Assert: the slot was filled through the declared coercion
	assert!(*container.instance_by_name::<bool>("cache_ready").unwrap());

	// The assignable fallback also serves unqualified type queries.
	let cache = container.instance::<Arc<dyn Cache>>().unwrap();
	let _: &dyn Cache = &**cache;
}

#[rstest]
fn two_assignable_matches_make_a_type_query_ambiguous() {
	// Arrange: both concrete capabilities declare assignability to
	// Arc<dyn Cache>. Storing them is legal because no slot consumes the
	// interface, but an unqualified type query must refuse to pick one.
	struct MemoryModule;
	impl Component for MemoryModule {
		fn blueprint(&self) -> Blueprint {
			Blueprint::new("MemoryModule")
				.provider("memory", |_: &MemoryModule| MemoryCache)
				.satisfies(|c: Arc<MemoryCache>| c as Arc<dyn Cache>)
		}
	}
	struct DiskModule;
	impl Component for DiskModule {
		fn blueprint(&self) -> Blueprint {
			Blueprint::new("DiskModule")
				.provider("disk", |_: &DiskModule| DiskCache)
				.satisfies(|c: Arc<DiskCache>| c as Arc<dyn Cache>)
		}
	}
	let container =
		Container::populate(vec![Box::new(MemoryModule), Box::new(DiskModule)]).unwrap();

	// Act
	let err = container.instance::<Arc<dyn Cache>>().unwrap_err();

	// Assert
	assert!(matches!(err, WireError::AmbiguousType { count: 2, .. }));

	// The concrete capabilities stay reachable by name.
	assert!(container.instance_by_name::<MemoryCache>("memory").is_ok());
	assert!(container.instance_by_name::<DiskCache>("disk").is_ok());
}

#[rstest]
fn exact_capability_wins_over_assignable_fallback() {
	// Arrange: one provider outputs Arc<dyn Cache> directly, another is
	// merely assignable to it. The exact output must win silently.
	#[derive(Default)]
	struct ExactModule;
	impl Component for ExactModule {
		fn blueprint(&self) -> Blueprint {
			Blueprint::new("ExactModule")
				.provider("exact", |_: &ExactModule| Arc::new(DiskCache) as Arc<dyn Cache>)
		}
	}
	#[derive(Default)]
	struct AssignableModule;
	impl Component for AssignableModule {
		fn blueprint(&self) -> Blueprint {
			Blueprint::new("AssignableModule")
				.provider("assignable", |_: &AssignableModule| MemoryCache)
				.satisfies(|c: Arc<MemoryCache>| c as Arc<dyn Cache>)
		}
	}
	#[derive(Default)]
	struct Consumer {
		seen: bool,
	}
	impl Component for Consumer {
		fn blueprint(&self) -> Blueprint {
			Blueprint::new("Consumer")
				.typed_slot(|c: &mut Consumer, _: Arc<Arc<dyn Cache>>| c.seen = true)
				.provider("seen", |c: &Consumer| c.seen)
		}
	}

	// Act
	let container = Container::populate(vec![
		Box::new(ExactModule),
		Box::new(AssignableModule),
		Box::new(Consumer::default()),
	])
	.unwrap();

	// Assert
	assert!(*container.instance_by_name::<bool>("seen").unwrap());
}

#[rstest]
fn empty_component_name_is_an_invalid_shape() {
	// Arrange
	struct Nameless;
	impl Component for Nameless {
		fn blueprint(&self) -> Blueprint {
			Blueprint::new("")
		}
	}

	// Act
	let err = Container::populate(vec![Box::new(Nameless)]).unwrap_err();

	// Assert
	assert!(matches!(err, WireError::InvalidComponentShape { .. }));
}

#[rstest]
fn stray_satisfies_is_an_invalid_shape() {
	// Arrange
	struct Stray;
	impl Component for Stray {
		fn blueprint(&self) -> Blueprint {
			Blueprint::new("Stray").satisfies(|v: Arc<u32>| *v as u64)
		}
	}

	// Act
	let err = Container::populate(vec![Box::new(Stray)]).unwrap_err();

	// Assert
	assert!(matches!(
		err,
		WireError::InvalidComponentShape { component, .. } if component == "Stray"
	));
}

#[rstest]
fn shape_errors_win_over_duplicate_names() {
	// Arrange: the set carries both a malformed component and a name
	// collision; introspection runs first, so the shape error surfaces.
	struct Nameless;
	impl Component for Nameless {
		fn blueprint(&self) -> Blueprint {
			Blueprint::new("")
		}
	}
	struct OtherTokenSource;
	impl Component for OtherTokenSource {
		fn blueprint(&self) -> Blueprint {
			Blueprint::new("OtherTokenSource").provider("token", |_: &OtherTokenSource| Token(9))
		}
	}

	// Act
	let err = Container::populate(vec![
		Box::new(TokenSource),
		Box::new(Nameless),
		Box::new(OtherTokenSource),
	])
	.unwrap_err();

	// Assert
	assert!(matches!(err, WireError::InvalidComponentShape { .. }));
}

#[rstest]
fn duplicate_names_win_over_unresolved_slots() {
	// Arrange
	struct OtherTokenSource;
	impl Component for OtherTokenSource {
		fn blueprint(&self) -> Blueprint {
			Blueprint::new("OtherTokenSource").provider("token", |_: &OtherTokenSource| Token(9))
		}
	}
	#[derive(Default)]
	struct M;
	impl Component for M {
		fn blueprint(&self) -> Blueprint {
			Blueprint::new("M").named_slot("missing", |_: &mut M, _: Arc<Token>| {})
		}
	}

	// Act
	let err = Container::populate(vec![
		Box::new(M::default()),
		Box::new(TokenSource),
		Box::new(OtherTokenSource),
	])
	.unwrap_err();

	// Assert
	assert!(matches!(err, WireError::DuplicateProviderName { .. }));
}
