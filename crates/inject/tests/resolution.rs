use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use pretty_assertions::assert_eq;
use rstest::rstest;
use subst_inject::{BuildError, Container, ContainerBuilder, Dependencies, ResolveError};
use subst_overrides::{AnyType, ConfigError, OverrideRule, RuleRegistry, RuleSpec, Settings, TypeRef, bootstrap};
use rustc_hash as _;
use thiserror as _;
use tracing as _;

/// Built value recording what it was constructed from.
#[derive(Debug)]
struct Page {
	ty: String,
	deps: Vec<Arc<Page>>,
}

type Value = Arc<Page>;

fn page(deps: Dependencies<Value>) -> Result<Value, BuildError> {
	let ty = deps.owner().to_string();
	Ok(Arc::new(Page {
		ty,
		deps: deps.into_values().collect(),
	}))
}

/// `Outer(Inner, Other(Leaf))` rendering of a built graph.
fn shape(page: &Page) -> String {
	if page.deps.is_empty() {
		return page.ty.clone();
	}
	let deps: Vec<_> = page.deps.iter().map(|dep| shape(dep)).collect();
	format!("{}({})", page.ty, deps.join(", "))
}

fn rule(expr: &str, uses: &str, instead_of: &str) -> OverrideRule {
	OverrideRule::for_domain(expr, uses, instead_of).expect("test rule should build")
}

fn builder(providers: &[(&str, &[&str])]) -> ContainerBuilder<Value> {
	let mut builder = ContainerBuilder::new();
	for (ty, deps) in providers {
		builder.provide(*ty, deps, page);
	}
	builder
}

fn container(rules: Vec<OverrideRule>, providers: &[(&str, &[&str])]) -> Container<Value> {
	builder(providers).build(Arc::new(RuleRegistry::new(rules)))
}

fn bookstore() -> Container<Value> {
	container(
		vec![rule("example.com", "ISBNBookPage", "BookPage")],
		&[("BookPage", &[]), ("ISBNBookPage", &["BookPage"])],
	)
}

#[rstest]
#[case::overridden_domain("http://example.com/book/1", "ISBNBookPage(BookPage)")]
#[case::subdomain("https://shop.example.com/book/1", "ISBNBookPage(BookPage)")]
#[case::other_domain("http://other.com/book/1", "BookPage")]
fn replacement_receives_the_original(#[case] url: &str, #[case] expected: &str) {
	let container = bookstore();
	let mut session = container.session(url);
	let built = session.resolve(&"BookPage".into()).expect("resolution should succeed");
	assert_eq!(shape(&built), expected);
}

#[test]
fn no_type_is_substituted_twice() {
	let container = bookstore();
	let mut session = container.session("http://example.com/book/1");

	let first = session.resolve(&"BookPage".into()).expect("resolution should succeed");
	let second = session.resolve(&"BookPage".into()).expect("resolution should succeed");

	assert_eq!(shape(&first), "ISBNBookPage(BookPage)");
	assert_eq!(shape(&second), "BookPage");
	assert!(Arc::ptr_eq(&first.deps[0], &second));
	assert_eq!(session.guard().excluded().collect::<Vec<_>>(), vec![&TypeRef::from("BookPage")]);
}

#[test]
fn overrides_apply_inside_a_replacement() {
	let container = container(
		vec![
			rule("example.com", "ISBNBookPage", "BookPage"),
			rule("example.com", "DollarPrice", "Price"),
		],
		&[
			("BookPage", &[]),
			("Price", &[]),
			("ISBNBookPage", &["BookPage", "Price"]),
			("DollarPrice", &["Price"]),
		],
	);
	let mut session = container.session("http://example.com/");

	let built = session.resolve(&"BookPage".into()).expect("resolution should succeed");
	assert_eq!(shape(&built), "ISBNBookPage(BookPage, DollarPrice(Price))");
}

#[test]
fn sessions_do_not_share_excluded_types() {
	let container = bookstore();
	for _ in 0..2 {
		let mut session = container.session("http://example.com/");
		let built = session.resolve(&"BookPage".into()).expect("resolution should succeed");
		assert_eq!(shape(&built), "ISBNBookPage(BookPage)");
	}
}

#[test]
fn concurrent_sessions_are_independent() {
	let container = bookstore();
	std::thread::scope(|scope| {
		for idx in 0..4 {
			let container = &container;
			scope.spawn(move || {
				let url = if idx % 2 == 0 { "http://example.com/" } else { "http://other.com/" };
				let expected = if idx % 2 == 0 { "ISBNBookPage(BookPage)" } else { "BookPage" };
				for _ in 0..50 {
					let built = container.session(url).resolve(&"BookPage".into()).expect("resolution should succeed");
					assert_eq!(shape(&built), expected);
				}
			});
		}
	});
}

#[test]
fn values_are_memoized_per_session() {
	let container = container(Vec::new(), &[("BookPage", &[]), ("BookListPage", &["BookPage"])]);
	let mut session = container.session("http://example.com/");

	let built = session
		.resolve_all(&["BookPage".into(), "BookListPage".into()])
		.expect("resolution should succeed");
	assert!(Arc::ptr_eq(&built[0], &built[1].deps[0]));

	let fresh = container.session("http://example.com/").resolve(&"BookPage".into()).expect("resolution should succeed");
	assert!(!Arc::ptr_eq(&built[0], &fresh));
}

#[test]
fn dependency_cycle_hits_depth_limit() {
	let mut builder = builder(&[("A", &["B"]), ("B", &["A"])]);
	builder.max_depth(8);
	let container = builder.build(Arc::new(RuleRegistry::new(Vec::new())));

	let err = container.session("http://example.com/").resolve(&"A".into()).unwrap_err();
	assert!(matches!(err, ResolveError::DepthExceeded { max: 8, .. }), "got {err:?}");
}

#[test]
fn missing_dependency_names_the_dependent() {
	let container = container(
		vec![rule("example.com", "ISBNBookPage", "BookPage")],
		&[("BookPage", &[]), ("ISBNBookPage", &["BookPage", "Isbn"])],
	);

	let err = container.session("http://example.com/").resolve(&"BookPage".into()).unwrap_err();
	let ResolveError::MissingProvider { ty, requested_by } = &err else {
		panic!("expected MissingProvider, got {err:?}");
	};
	assert_eq!(ty.as_str(), "Isbn");
	assert_eq!(requested_by.as_ref().map(TypeRef::as_str), Some("ISBNBookPage"));
	assert_eq!(err.to_string(), "no provider for `Isbn` (required by `ISBNBookPage`)");
}

#[test]
fn build_failures_carry_their_source() {
	let mut builder = builder(&[("BookPage", &[])]);
	builder.provide("BrokenPage", &["BookPage"], |deps: Dependencies<Value>| {
		deps.require("BookPage")?;
		deps.require("Price")?;
		Err("unreachable".into())
	});
	let container = builder.build(Arc::new(RuleRegistry::new(Vec::new())));

	let err = container.session("http://example.com/").resolve(&"BrokenPage".into()).unwrap_err();
	assert_eq!(err.to_string(), "failed to build `BrokenPage`: `BrokenPage` did not declare a dependency on `Price`");
}

#[test]
fn configuration_is_checked_against_registered_providers() {
	let builder = builder(&[("BookPage", &[]), ("ISBNBookPage", &["BookPage"])]);

	let typo = Settings {
		rules: vec![RuleSpec::triplet("example.com", "ISBNBokPage", "BookPage")],
		..Settings::default()
	};
	let err = bootstrap(typo, &builder).err().expect("unknown type should be rejected");
	assert!(matches!(err, ConfigError::UnknownType { field: "use", .. }), "got {err:?}");

	let settings = Settings {
		rules: vec![RuleSpec::triplet("example.com", "ISBNBookPage", "BookPage")],
		..Settings::default()
	};
	let started = bootstrap(settings, &builder).expect("bootstrap should succeed");
	let container = builder.build_from(&started);
	assert_eq!(container.max_depth(), Settings::default().max_depth);

	let built = container.session("http://example.com/").resolve(&"BookPage".into()).expect("resolution should succeed");
	assert_eq!(shape(&built), "ISBNBookPage(BookPage)");
}

#[test]
fn configured_depth_limit_reaches_the_container() {
	let settings = Settings::from_toml_str("max_depth = 2").expect("settings should parse");
	let started = bootstrap(settings, &AnyType).expect("bootstrap should succeed");
	let container = builder(&[("A", &["B"]), ("B", &["C"]), ("C", &[])]).build_from(&started);

	assert_eq!(container.max_depth(), 2);
	let err = container.session("http://example.com/").resolve(&"A".into()).unwrap_err();
	assert!(matches!(&err, ResolveError::DepthExceeded { ty, max: 2 } if ty.as_str() == "C"), "got {err:?}");
	assert!(container.session("http://example.com/").resolve(&"B".into()).is_ok());
}

#[test]
fn replacement_requested_directly_is_built_once() {
	let builds = Arc::new(AtomicUsize::new(0));
	let mut builder = builder(&[("BookPage", &[])]);
	let counter = Arc::clone(&builds);
	builder.provide("ISBNBookPage", &["BookPage"], move |deps: Dependencies<Value>| {
		counter.fetch_add(1, Ordering::Relaxed);
		page(deps)
	});
	let container = builder.build(Arc::new(RuleRegistry::new(vec![rule(
		"example.com",
		"ISBNBookPage",
		"BookPage",
	)])));
	let mut session = container.session("http://example.com/");

	let direct = session.resolve(&"ISBNBookPage".into()).expect("resolution should succeed");
	let via_override = session.resolve(&"BookPage".into()).expect("resolution should succeed");

	assert_eq!(builds.load(Ordering::Relaxed), 1);
	assert_eq!(shape(&direct), "ISBNBookPage(BookPage)");
	assert_eq!(shape(&via_override), "BookPage");
}
