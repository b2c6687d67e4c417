//! Env file model and generation policy. Pure functions without I/O.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.

use std::collections::BTreeMap;

use appctl_common::AppManifest;
use serde::Serialize;

use crate::domain::error::AppError;

/// Parsed `app.env` content: key → value, one entry per key.
///
/// Rendered sorted by key so that regenerating the same configuration always
/// yields byte-identical files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EnvMap(BTreeMap<String, String>);

impl EnvMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `KEY=VALUE` lines.
    ///
    /// Blank lines, `#` comments and lines without `=` are skipped. The value
    /// is the literal text after the first `=`. A repeated key keeps its last value.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let mut map = BTreeMap::new();
        for line in content.lines() {
            let line = line.trim_end_matches('\r');
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            map.insert(key.to_string(), value.to_string());
        }
        Self(map)
    }

    /// Render as `KEY=VALUE\n` lines.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.0 {
            out.push_str(key);
            out.push('=');
            out.push_str(value);
            out.push('\n');
        }
        out
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// `true` when `key` is present with a non-empty value.
    #[must_use]
    pub fn has_value(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| !v.is_empty())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Required keys of `manifest` lacking a non-empty value in `env`, in declared order.
#[must_use]
pub fn missing_required(manifest: &AppManifest, env: &EnvMap) -> Vec<String> {
    manifest
        .required_keys()
        .filter(|key| !env.has_value(key))
        .map(String::from)
        .collect()
}

/// Compute the env file produced by a generation call.
///
/// - required, non-random fields: non-empty caller value, else
///   [`AppError::MissingField`] for the first such key in declared order; a
///   manifest default does not satisfy a required field
/// - random fields: existing non-empty value kept, else `generate()`; caller
///   values for these keys are ignored
/// - optional fields with a default the caller left out receive the default
/// - every other caller entry is written verbatim
///
/// Keys that are neither random nor supplied do not survive.
///
/// # Errors
///
/// Returns [`AppError::MissingField`] or [`AppError::InvalidField`].
pub fn plan_environment(
    manifest: &AppManifest,
    existing: &EnvMap,
    user_fields: &EnvMap,
    mut generate: impl FnMut() -> String,
) -> Result<EnvMap, AppError> {
    for (key, value) in user_fields.iter() {
        if !is_writable_entry(key, value) {
            return Err(AppError::InvalidField(key.to_string()));
        }
    }

    let mut out = EnvMap::new();

    for field in manifest.form_fields.iter().filter(|f| !f.random_generate) {
        let supplied = user_fields.get(&field.key).filter(|v| !v.is_empty());
        if field.required {
            let value = supplied.ok_or_else(|| AppError::MissingField(field.key.clone()))?;
            out.insert(&field.key, value);
            continue;
        }
        let default = field.default.as_deref().filter(|v| !v.is_empty());
        if let Some(value) = supplied.or(default) {
            out.insert(&field.key, value);
        }
    }

    for field in manifest.random_fields() {
        let value = match existing.get(&field.key).filter(|v| !v.is_empty()) {
            Some(kept) => kept.to_string(),
            None => generate(),
        };
        out.insert(&field.key, value);
    }

    for (key, value) in user_fields.iter() {
        let declared = manifest.form_fields.iter().find(|f| f.key == key);
        match declared {
            Some(f) if f.random_generate => {}
            Some(_) if out.get(key).is_some() => {}
            _ => out.insert(key, value),
        }
    }

    Ok(out)
}

/// A key/value pair that renders to exactly one line parsing back to the
/// same key and value. `parse` trims keys, so padded keys are refused.
fn is_writable_entry(key: &str, value: &str) -> bool {
    !key.is_empty()
        && key == key.trim()
        && !key.starts_with('#')
        && !key.contains(['=', '\n', '\r'])
        && !value.contains(['\n', '\r'])
}
