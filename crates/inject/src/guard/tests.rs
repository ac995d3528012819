use std::sync::atomic::{AtomicUsize, Ordering};

use pretty_assertions::assert_eq;
use rstest::rstest;
use subst_overrides::{OverrideRule, RuleRegistry};

use super::*;

struct CountingRegistry {
	inner: RuleRegistry,
	calls: AtomicUsize,
}

impl OverridesRegistry for CountingRegistry {
	fn overrides_for(&self, url: &str) -> Overrides {
		self.calls.fetch_add(1, Ordering::Relaxed);
		self.inner.overrides_for(url)
	}
}

fn books() -> CountingRegistry {
	let rule = OverrideRule::for_domain("example.com", "ISBNBookPage", "BookPage").expect("rule should build");
	CountingRegistry {
		inner: RuleRegistry::new(vec![rule]),
		calls: AtomicUsize::new(0),
	}
}

#[test]
fn substitutes_once_then_short_circuits() {
	let registry = books();
	let mut guard = ResolutionGuard::new(&registry, "http://example.com/book/1");
	let book = TypeRef::from("BookPage");

	assert_eq!(
		guard.select(&book),
		Selection::Substituted {
			original: book.clone(),
			replacement: "ISBNBookPage".into(),
		}
	);
	assert!(guard.is_excluded("BookPage"));
	assert_eq!(guard.select(&book), Selection::Original(book.clone()));
	assert_eq!(guard.select(&book).target(), &book);
}

#[rstest]
#[case::other_domain("http://other.com/book/1", "BookPage")]
#[case::unmapped_type("http://example.com/book/1", "BookListPage")]
fn unmapped_requests_keep_original(#[case] url: &str, #[case] requested: &str) {
	let registry = books();
	let mut guard = ResolutionGuard::new(&registry, url);
	let requested = TypeRef::from(requested);

	assert_eq!(guard.select(&requested), Selection::Original(requested.clone()));
	assert_eq!(guard.excluded().count(), 0);
}

#[test]
fn override_map_is_fetched_once_per_session() {
	let registry = books();
	let mut guard = ResolutionGuard::new(&registry, "http://example.com/");
	for name in ["BookPage", "BookListPage", "BookPage", "ISBNBookPage"] {
		guard.select(&TypeRef::from(name));
	}
	assert_eq!(registry.calls.load(Ordering::Relaxed), 1);

	let mut second = ResolutionGuard::new(&registry, "http://example.com/");
	assert!(matches!(second.select(&"BookPage".into()), Selection::Substituted { .. }));
	assert_eq!(registry.calls.load(Ordering::Relaxed), 2);
}
