use std::io::Write as _;

use clap::Parser;
use pretty_assertions::assert_eq;
use subst_overrides::{Overrides, TypeRef};

use crate::cli::{Cli, Command};
use crate::commands;

const SETTINGS: &str = r#"
environment = "test"
rules = [
	["example.com", "ISBNBookPage", "BookPage"],
	["example.com", "ExampleListPage", "BookListPage"],
]
"#;

fn settings_file(text: &str) -> tempfile::NamedTempFile {
	let mut file = tempfile::NamedTempFile::new().expect("temp file");
	file.write_all(text.as_bytes()).expect("write settings");
	file
}

#[test]
fn parses_check_with_types() {
	let cli = Cli::try_parse_from(["subst", "-v", "check", "subst.toml", "--types", "BookPage,ISBNBookPage"])
		.expect("arguments should parse");
	assert!(cli.verbose);
	let Command::Check { config, types } = cli.command else {
		panic!("expected check");
	};
	assert_eq!(config.to_str(), Some("subst.toml"));
	assert_eq!(types, Some(vec!["BookPage".to_owned(), "ISBNBookPage".to_owned()]));
}

#[test]
fn match_requires_a_url() {
	assert!(Cli::try_parse_from(["subst", "match", "subst.toml"]).is_err());
}

#[test]
fn check_reports_rule_count() {
	let file = settings_file(SETTINGS);
	let out = commands::check(file.path(), None).expect("settings should validate");
	assert!(out.ends_with(": 2 rule(s) ok (registry `rules`, environment `test`)\n"), "{out}");
}

#[test]
fn check_rejects_unknown_types() {
	let file = settings_file(SETTINGS);
	let types = ["BookPage".to_owned(), "ISBNBookPage".to_owned()];
	let err = commands::check(file.path(), Some(&types[..])).unwrap_err();
	assert!(format!("{err:#}").contains("unknown type `ExampleListPage` in `use`"), "{err:#}");
}

#[test]
fn lookup_prints_sorted_mapping_per_url() {
	let file = settings_file(SETTINGS);
	let urls = ["http://example.com/book/1".to_owned(), "http://other.com/".to_owned()];
	let out = commands::lookup(file.path(), &urls).expect("lookup should succeed");
	assert_eq!(
		out,
		"http://example.com/book/1\n  BookListPage -> ExampleListPage\n  BookPage -> ISBNBookPage\nhttp://other.com/\n  (no overrides)\n"
	);
}

#[test]
fn render_handles_empty_mapping() {
	assert_eq!(commands::render("x", &Overrides::default()), "x\n  (no overrides)\n");

	let mut overrides = Overrides::default();
	overrides.insert(TypeRef::from("B"), TypeRef::from("C"));
	overrides.insert(TypeRef::from("A"), TypeRef::from("D"));
	assert_eq!(commands::render("x", &overrides), "x\n  A -> D\n  B -> C\n");
}
