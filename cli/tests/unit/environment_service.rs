//! Environment resolution, validation and generation against a real
//! temp-dir filesystem.

#![allow(clippy::expect_used)]

use appctl_cli::application::services::environment::{
    generate_environment, get_environment, validate_environment,
};
use appctl_cli::domain::AppError;
use appctl_cli::infra::OsFs;

use crate::helpers::{Fixture, app_error, fields, secret_manifest, simple_manifest};

#[test]
fn supplied_field_round_trips_through_env_file() {
    let fx = Fixture::new();
    fx.add_catalog_app("simple", &simple_manifest("simple"));

    generate_environment(&OsFs, &fx.paths, "simple", &fields(&[("TEST_FIELD", "abc")]))
        .expect("generate");

    assert!(fx.read_env("simple").contains("TEST_FIELD=abc\n"));
    let env = get_environment(&OsFs, &fx.paths, "simple").expect("get");
    assert_eq!(env.get("TEST_FIELD"), Some("abc"));
}

#[test]
fn random_field_is_generated_once_and_kept() {
    let fx = Fixture::new();
    fx.add_catalog_app("secret", &secret_manifest("secret"));
    let user = fields(&[("TEST_FIELD", "abc")]);

    let first = generate_environment(&OsFs, &fx.paths, "secret", &user).expect("first");
    let secret = first.get("RANDOM_FIELD").expect("generated").to_string();
    assert_eq!(secret.len(), 32);

    let second = generate_environment(&OsFs, &fx.paths, "secret", &user).expect("second");
    assert_eq!(second.get("RANDOM_FIELD"), Some(secret.as_str()));
}

#[test]
fn edited_random_value_survives_regeneration() {
    let fx = Fixture::new();
    fx.add_catalog_app("secret", &secret_manifest("secret"));
    let user = fields(&[("TEST_FIELD", "abc")]);
    generate_environment(&OsFs, &fx.paths, "secret", &user).expect("first");

    let seed = "seed1234567890abcdefghijklmnopqr";
    assert_eq!(seed.len(), 32);
    fx.write_env("secret", &format!("RANDOM_FIELD={seed}\nTEST_FIELD=abc\n"));

    let env = generate_environment(&OsFs, &fx.paths, "secret", &user).expect("regenerate");
    assert_eq!(env.get("RANDOM_FIELD"), Some(seed));
    assert!(fx.read_env("secret").contains(&format!("RANDOM_FIELD={seed}\n")));
}

#[test]
fn caller_cannot_override_a_random_field() {
    let fx = Fixture::new();
    fx.add_catalog_app("secret", &secret_manifest("secret"));
    let env = generate_environment(
        &OsFs,
        &fx.paths,
        "secret",
        &fields(&[("TEST_FIELD", "abc"), ("RANDOM_FIELD", "chosen")]),
    )
    .expect("generate");
    assert_ne!(env.get("RANDOM_FIELD"), Some("chosen"));
}

#[test]
fn omitted_required_field_fails_and_writes_nothing() {
    let fx = Fixture::new();
    fx.add_catalog_app("simple", &simple_manifest("simple"));

    let err = generate_environment(&OsFs, &fx.paths, "simple", &fields(&[]))
        .expect_err("missing field");
    assert_eq!(app_error(&err), AppError::MissingField("TEST_FIELD".into()));
    assert!(!fx.paths.env_file("simple").exists());
}

#[test]
fn generation_for_unknown_app_is_not_found() {
    let fx = Fixture::new();
    let err = generate_environment(&OsFs, &fx.paths, "ghost", &fields(&[]))
        .expect_err("unknown app");
    assert_eq!(app_error(&err), AppError::AppNotFound("ghost".into()));
}

#[test]
fn env_for_app_never_configured_is_empty() {
    let fx = Fixture::new();
    let env = get_environment(&OsFs, &fx.paths, "whoami").expect("get");
    assert!(env.is_empty());
}

#[test]
fn validate_reports_newly_required_fields() {
    let fx = Fixture::new();
    fx.add_catalog_app("secret", &secret_manifest("secret"));
    fx.write_env("secret", "TEST_FIELD=abc\n");

    let err = validate_environment(&OsFs, &fx.paths, "secret").expect_err("outdated");
    assert_eq!(
        app_error(&err),
        AppError::ConfigOutdated {
            app_id: "secret".into(),
            missing: vec!["RANDOM_FIELD".into()],
        }
    );
}

#[test]
fn validate_treats_empty_value_as_missing() {
    let fx = Fixture::new();
    fx.add_catalog_app("simple", &simple_manifest("simple"));
    fx.write_env("simple", "TEST_FIELD=\n");
    let err = validate_environment(&OsFs, &fx.paths, "simple").expect_err("outdated");
    assert!(matches!(app_error(&err), AppError::ConfigOutdated { .. }));
}

#[test]
fn validate_passes_after_generation() {
    let fx = Fixture::new();
    fx.add_catalog_app("secret", &secret_manifest("secret"));
    generate_environment(&OsFs, &fx.paths, "secret", &fields(&[("TEST_FIELD", "x")]))
        .expect("generate");
    validate_environment(&OsFs, &fx.paths, "secret").expect("valid");
}

#[cfg(unix)]
#[test]
fn env_file_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;
    let fx = Fixture::new();
    fx.add_catalog_app("simple", &simple_manifest("simple"));
    generate_environment(&OsFs, &fx.paths, "simple", &fields(&[("TEST_FIELD", "x")]))
        .expect("generate");
    let mode = std::fs::metadata(fx.paths.env_file("simple"))
        .expect("metadata")
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn padded_key_is_refused_and_nothing_is_written() {
    let fx = Fixture::new();
    fx.add_catalog_app("simple", &simple_manifest("simple"));

    let err = generate_environment(
        &OsFs,
        &fx.paths,
        "simple",
        &fields(&[("TEST_FIELD", "abc"), (" EXTRA ", "v")]),
    )
    .expect_err("padded key");

    assert_eq!(app_error(&err), AppError::InvalidField(" EXTRA ".into()));
    assert!(!fx.paths.env_file("simple").exists());
}

#[test]
fn every_supplied_field_reads_back_exactly() {
    let fx = Fixture::new();
    fx.add_catalog_app("simple", &simple_manifest("simple"));
    let user = fields(&[
        ("TEST_FIELD", "abc"),
        ("EXTRA", " spaced value "),
        ("URL", "postgres://u:p@h/db?x=1"),
    ]);

    generate_environment(&OsFs, &fx.paths, "simple", &user).expect("generate");
    let read = get_environment(&OsFs, &fx.paths, "simple").expect("get");
    for (key, value) in user.iter() {
        assert_eq!(read.get(key), Some(value), "{key}");
    }
}

#[cfg(unix)]
mod permissions {
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    use anyhow::Result;
    use appctl_cli::application::ports::LocalFs;
    use appctl_cli::application::services::environment::generate_environment;
    use appctl_cli::infra::OsFs;

    use crate::helpers::{Fixture, fields, secret_manifest};

    /// Delegates to `OsFs` and records each file's mode as soon as `write` returns.
    #[derive(Default)]
    struct ModeRecordingFs {
        modes: Mutex<Vec<(PathBuf, u32)>>,
    }

    impl LocalFs for ModeRecordingFs {
        fn exists(&self, path: &Path) -> bool {
            OsFs.exists(path)
        }
        fn is_dir(&self, path: &Path) -> bool {
            OsFs.is_dir(path)
        }
        fn create_dir_all(&self, path: &Path) -> Result<()> {
            OsFs.create_dir_all(path)
        }
        fn remove_dir_all(&self, path: &Path) -> Result<()> {
            OsFs.remove_dir_all(path)
        }
        fn write(&self, path: &Path, content: String, mode: u32) -> Result<()> {
            OsFs.write(path, content, mode)?;
            let actual = std::fs::metadata(path)?.permissions().mode() & 0o777;
            self.modes.lock().expect("lock").push((path.to_path_buf(), actual));
            Ok(())
        }
        fn read_to_string(&self, path: &Path) -> Result<String> {
            OsFs.read_to_string(path)
        }
        fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
            OsFs.read_dir(path)
        }
    }

    #[test]
    fn env_file_is_owner_only_when_it_appears() {
        let fx = Fixture::new();
        fx.add_catalog_app("secret", &secret_manifest("secret"));
        let fs = ModeRecordingFs::default();

        generate_environment(&fs, &fx.paths, "secret", &fields(&[("TEST_FIELD", "abc")]))
            .expect("generate");

        let modes = fs.modes.lock().expect("lock").clone();
        assert_eq!(modes, vec![(fx.paths.env_file("secret"), 0o600)]);
        assert!(!fx.paths.app_data_dir("secret").join("app.env.tmp").exists());
    }
}
