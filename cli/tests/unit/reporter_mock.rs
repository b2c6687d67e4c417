//! Progress events emitted by lifecycle actions, checked with a mockall mock.

#![allow(clippy::expect_used)]

use appctl_cli::application::ports::ProgressReporter;
use mockall::Sequence;
use mockall::predicate::{eq, function};

use crate::helpers::{Fakes, Fixture, fields, secret_manifest};

mockall::mock! {
    pub Reporter {}

    impl ProgressReporter for Reporter {
        fn step(&self, message: &str);
        fn success(&self, message: &str);
        fn warn(&self, message: &str);
    }
}

#[tokio::test]
async fn install_reports_steps_then_success() {
    let fx = Fixture::new();
    fx.add_catalog_app("whoami", &secret_manifest("whoami"));
    let fakes = Fakes::default();

    let mut reporter = MockReporter::new();
    let mut seq = Sequence::new();
    reporter
        .expect_step()
        .with(function(|m: &str| m.contains("requirements")))
        .times(1)
        .in_sequence(&mut seq)
        .return_const(());
    reporter
        .expect_step()
        .with(function(|m: &str| m.contains("environment")))
        .times(1)
        .in_sequence(&mut seq)
        .return_const(());
    reporter
        .expect_step()
        .with(function(|m: &str| m.contains("install script")))
        .times(1)
        .in_sequence(&mut seq)
        .return_const(());
    reporter
        .expect_success()
        .with(eq("app 'whoami' installed"))
        .times(1)
        .in_sequence(&mut seq)
        .return_const(());
    reporter.expect_warn().never();

    fx.manager(&fakes)
        .install("whoami", &fields(&[("TEST_FIELD", "hello")]), &reporter)
        .await
        .expect("install");
}

#[tokio::test]
async fn failed_start_never_reports_success() {
    let fx = Fixture::new();
    fx.add_catalog_app("whoami", &secret_manifest("whoami"));
    let fakes = Fakes::default();

    let mut reporter = MockReporter::new();
    reporter.expect_step().never();
    reporter.expect_success().never();
    reporter.expect_warn().never();

    assert!(fx.manager(&fakes).start("whoami", &reporter).await.is_err());
}

#[tokio::test]
async fn install_over_a_leftover_pin_warns_once() {
    let fx = Fixture::new();
    fx.add_catalog_app("whoami", &secret_manifest("whoami"));
    fx.write_override("whoami", &secret_manifest("whoami"));
    let fakes = Fakes::default();

    let mut reporter = MockReporter::new();
    reporter.expect_step().times(3).return_const(());
    reporter
        .expect_warn()
        .with(function(|m: &str| m.contains("leftover pinned manifest")))
        .times(1)
        .return_const(());
    reporter.expect_success().times(1).return_const(());

    fx.manager(&fakes)
        .install("whoami", &fields(&[("TEST_FIELD", "hello")]), &reporter)
        .await
        .expect("install");
}
