//! Port requirement checks with a scripted probe.

#![allow(clippy::expect_used)]

use appctl_cli::application::services::requirements::{check_requirements, requirement_report};
use appctl_cli::domain::AppError;
use appctl_cli::infra::OsFs;

use crate::helpers::{FakeProbe, Fixture, app_error, secret_manifest, simple_manifest};

#[tokio::test]
async fn no_declared_ports_is_satisfied_without_probing() {
    let fx = Fixture::new();
    fx.add_catalog_app("simple", &simple_manifest("simple"));
    let probe = FakeProbe::default();

    assert!(check_requirements(&OsFs, &fx.paths, &probe, "simple").await.expect("check"));
    assert!(probe.probed().is_empty());
}

#[tokio::test]
async fn free_port_is_satisfied() {
    let fx = Fixture::new();
    fx.add_catalog_app("secret", &secret_manifest("secret"));
    let probe = FakeProbe::default();
    assert!(check_requirements(&OsFs, &fx.paths, &probe, "secret").await.expect("check"));
    assert_eq!(probe.probed(), vec![8080]);
}

#[tokio::test]
async fn bound_port_is_false_not_an_error() {
    let fx = Fixture::new();
    fx.add_catalog_app("secret", &secret_manifest("secret"));
    let probe = FakeProbe::default();
    probe.bind(8080);

    assert!(!check_requirements(&OsFs, &fx.paths, &probe, "secret").await.expect("check"));
    let report = requirement_report(&OsFs, &fx.paths, &probe, "secret")
        .await
        .expect("report");
    assert_eq!(report.busy_ports, vec![8080]);
}

#[tokio::test]
async fn unknown_app_fails_instead_of_returning_false() {
    let fx = Fixture::new();
    let err = check_requirements(&OsFs, &fx.paths, &FakeProbe::default(), "ghost")
        .await
        .expect_err("unknown app");
    assert_eq!(app_error(&err), AppError::AppNotFound("ghost".into()));
}

#[tokio::test]
async fn duplicate_ports_are_probed_once() {
    let fx = Fixture::new();
    fx.add_catalog_app(
        "dupes",
        r#"{"id":"dupes","name":"Dupes","requiredPorts":[80,443,80]}"#,
    );
    let probe = FakeProbe::default();
    let report = requirement_report(&OsFs, &fx.paths, &probe, "dupes")
        .await
        .expect("report");
    assert_eq!(report.required_ports, vec![80, 443]);
    assert_eq!(probe.probed(), vec![80, 443]);
}

#[tokio::test]
async fn installed_override_ports_take_precedence() {
    let fx = Fixture::new();
    fx.add_catalog_app("secret", &secret_manifest("secret"));
    fx.write_override("secret", r#"{"id":"secret","name":"Pinned","requiredPorts":[9000]}"#);
    let probe = FakeProbe::default();
    probe.bind(8080);

    assert!(check_requirements(&OsFs, &fx.paths, &probe, "secret").await.expect("check"));
    assert_eq!(probe.probed(), vec![9000]);
}
