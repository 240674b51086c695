/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0.
 */

//! Process environment shim
//!
//! Region, credentials and user agent providers read `AWS_*` variables through [`Env`] so their
//! tests can supply a fixed environment instead of calling `std::env::set_var`.

use std::collections::HashMap;
use std::env::VarError;
use std::sync::Arc;

/// Handle to either the real process environment or a fixed map of variables
///
/// Cloning is cheap: a fixed environment sits behind an `Arc`.
#[derive(Clone)]
pub struct Env(Arc<Source>);

enum Source {
    Process,
    Fixed(HashMap<String, String>),
}

impl Default for Env {
    fn default() -> Self {
        Self::real()
    }
}

impl Env {
    /// Delegates to [`std::env::var`]
    pub fn real() -> Self {
        Self(Arc::new(Source::Process))
    }

    /// Fixed environment for tests
    ///
    /// ```rust
    /// use aws_types::os_shim_internal::Env;
    /// let env = Env::from_slice(&[("AWS_REGION", "eu-north-1")]);
    /// assert_eq!(env.get("AWS_REGION").unwrap(), "eu-north-1");
    /// ```
    pub fn from_slice(vars: &[(&str, &str)]) -> Self {
        Self(Arc::new(Source::Fixed(
            vars.iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )))
    }

    pub fn get(&self, key: &str) -> Result<String, VarError> {
        match self.0.as_ref() {
            Source::Process => std::env::var(key),
            Source::Fixed(vars) => vars.get(key).cloned().ok_or(VarError::NotPresent),
        }
    }

    /// The value of the first key in `keys` that is set to a non-empty string
    ///
    /// An exported but empty variable (`AWS_REGION=`) counts as unset.
    pub fn first_non_empty(&self, keys: &[&str]) -> Option<String> {
        keys.iter()
            .filter_map(|key| self.get(key).ok())
            .find(|value| !value.is_empty())
    }
}

impl std::fmt::Debug for Env {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0.as_ref() {
            Source::Process => f.write_str("Env::Process"),
            Source::Fixed(vars) => f
                .debug_tuple("Env::Fixed")
                .field(&vars.keys().collect::<Vec<_>>())
                .finish(),
        }
    }
}

impl From<HashMap<String, String>> for Env {
    fn from(vars: HashMap<String, String>) -> Self {
        Self(Arc::new(Source::Fixed(vars)))
    }
}

#[cfg(test)]
mod test {
    use crate::os_shim_internal::Env;
    use std::collections::HashMap;
    use std::env::VarError;

    #[test]
    fn fixed_environment() {
        let env = Env::from_slice(&[("AWS_REGION", "eu-west-1")]);
        assert_eq!(env.get("AWS_REGION").unwrap(), "eu-west-1");
        assert_eq!(
            env.get("AWS_DEFAULT_REGION").expect_err("not present"),
            VarError::NotPresent
        );
    }

    #[test]
    fn empty_values_are_skipped() {
        let env = Env::from_slice(&[("AWS_REGION", ""), ("AWS_DEFAULT_REGION", "us-east-2")]);
        assert_eq!(
            env.first_non_empty(&["AWS_REGION", "AWS_DEFAULT_REGION"]),
            Some("us-east-2".to_string())
        );
        assert_eq!(env.first_non_empty(&["AWS_PROFILE"]), None);
    }

    #[test]
    fn debug_output_hides_values() {
        let mut vars = HashMap::new();
        vars.insert("AWS_SECRET_ACCESS_KEY".to_string(), "hunter2".to_string());
        let env = Env::from(vars);
        let debug = format!("{:?}", env);
        assert!(debug.contains("AWS_SECRET_ACCESS_KEY"));
        assert!(!debug.contains("hunter2"));
    }
}
