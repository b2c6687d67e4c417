//! App info resolution and catalog listing.

#![allow(clippy::expect_used)]

use appctl_cli::application::services::app_info::get_app_info;
use appctl_cli::application::services::catalog::list_available_apps;
use appctl_cli::domain::AppError;
use appctl_cli::infra::OsFs;
use appctl_common::ResolutionSource;

use crate::helpers::{Fixture, app_error, secret_manifest, simple_manifest};

// ── get_app_info ─────────────────────────────────────────────────────────────

#[test]
fn catalog_manifest_when_not_installed() {
    let fx = Fixture::new();
    fx.add_catalog_app("simple", &simple_manifest("simple"));
    let resolved = get_app_info(&OsFs, &fx.paths, "simple").expect("info");
    assert_eq!(resolved.source, ResolutionSource::Catalog);
    assert_eq!(resolved.manifest.name, "Simple");
}

#[test]
fn local_override_wins_over_catalog() {
    let fx = Fixture::new();
    fx.add_catalog_app("simple", &simple_manifest("simple"));
    fx.write_override("simple", r#"{"id":"simple","name":"Pinned locally"}"#);

    let resolved = get_app_info(&OsFs, &fx.paths, "simple").expect("info");
    assert_eq!(resolved.source, ResolutionSource::LocalOverride);
    assert_eq!(resolved.manifest.name, "Pinned locally");
}

#[test]
fn override_without_catalog_entry_still_resolves() {
    let fx = Fixture::new();
    fx.write_override("retired", r#"{"id":"retired","name":"Retired"}"#);
    let resolved = get_app_info(&OsFs, &fx.paths, "retired").expect("info");
    assert_eq!(resolved.source, ResolutionSource::LocalOverride);
}

#[test]
fn broken_override_falls_back_to_catalog() {
    let fx = Fixture::new();
    fx.add_catalog_app("simple", &simple_manifest("simple"));
    fx.write_override("simple", "{ not json");
    let resolved = get_app_info(&OsFs, &fx.paths, "simple").expect("info");
    assert_eq!(resolved.source, ResolutionSource::Catalog);
}

#[test]
fn unknown_app_is_a_load_error() {
    let fx = Fixture::new();
    let err = get_app_info(&OsFs, &fx.paths, "ghost").expect_err("unknown");
    assert!(matches!(app_error(&err), AppError::LoadError { app_id, .. } if app_id == "ghost"));
}

#[test]
fn unparseable_catalog_manifest_is_a_load_error() {
    let fx = Fixture::new();
    fx.add_catalog_app("broken", "[]");
    let err = get_app_info(&OsFs, &fx.paths, "broken").expect_err("broken");
    assert!(matches!(app_error(&err), AppError::LoadError { .. }));
}

#[test]
fn manifest_declaring_another_id_is_rejected() {
    let fx = Fixture::new();
    fx.add_catalog_app("alpha", &simple_manifest("beta"));
    let err = get_app_info(&OsFs, &fx.paths, "alpha").expect_err("mismatch");
    assert!(matches!(app_error(&err), AppError::LoadError { .. }));
}

#[test]
fn traversal_id_is_rejected_before_any_io() {
    let fx = Fixture::new();
    let err = get_app_info(&OsFs, &fx.paths, "../etc").expect_err("invalid");
    assert_eq!(app_error(&err), AppError::InvalidAppId("../etc".into()));
}

// ── list_available_apps ──────────────────────────────────────────────────────

#[test]
fn clean_catalog_lists_each_app_once() {
    let fx = Fixture::new();
    fx.add_catalog_app("simple", &simple_manifest("simple"));
    fx.add_catalog_app("secret", &secret_manifest("secret"));
    // Installed state does not duplicate or hide catalog entries.
    fx.write_override("secret", &secret_manifest("secret"));

    let ids: Vec<String> = list_available_apps(&OsFs, &fx.paths)
        .expect("list")
        .into_iter()
        .map(|m| m.id)
        .collect();
    assert_eq!(ids, vec!["secret", "simple"]);
}

#[test]
fn partially_malformed_catalog_skips_bad_entries() {
    let fx = Fixture::new();
    fx.add_catalog_app("good", &simple_manifest("good"));
    fx.add_catalog_app("broken", "{ nope");
    fx.add_catalog_app("liar", &simple_manifest("someone-else"));
    std::fs::create_dir_all(fx.catalog_path("Bad_Name")).expect("mkdir");
    std::fs::create_dir_all(fx.catalog_path("empty")).expect("mkdir");
    std::fs::write(fx.catalog_path("README.md"), "not an app").expect("write");

    let ids: Vec<String> = list_available_apps(&OsFs, &fx.paths)
        .expect("list")
        .into_iter()
        .map(|m| m.id)
        .collect();
    assert_eq!(ids, vec!["good"]);
}

#[test]
fn missing_catalog_is_empty() {
    let fx = Fixture::new();
    assert!(list_available_apps(&OsFs, &fx.paths).expect("list").is_empty());
}
