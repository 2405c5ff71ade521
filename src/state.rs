//! # Vault Defaults
//!
//! The process-wide default vault and compartment.
//!
//! Every operation that needs a vault scope receives an `Arc<VaultDefaults>`
//! and resolves its effective identifiers against it. The pair lives behind a
//! single `RwLock`, so readers always observe both fields from the same write.

use std::sync::{PoisonError, RwLock};

use tracing::info;

use crate::error::VaultError;

const VAULT_ID_HINT: &str =
    "Either provide the vault_id parameter, call configure_vault, or set the OCI_VAULT_ID environment variable";
const COMPARTMENT_ID_HINT: &str = "Either provide the compartment_id parameter, call configure_vault, or set the OCI_COMPARTMENT_ID environment variable";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct DefaultPair {
    vault_id: Option<String>,
    compartment_id: Option<String>,
}

/// Vault/compartment pair resolved for one call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultScope {
    pub vault_id: String,
    pub compartment_id: String,
}

#[derive(Debug, Default)]
pub struct VaultDefaults {
    pair: RwLock<DefaultPair>,
}

impl VaultDefaults {
    pub fn new(vault_id: Option<String>, compartment_id: Option<String>) -> Self {
        Self {
            pair: RwLock::new(DefaultPair {
                vault_id,
                compartment_id,
            }),
        }
    }

    /// Overwrite both defaults. Identifiers are not validated.
    pub fn set(&self, vault_id: String, compartment_id: String) {
        info!(
            vault_id = %vault_id,
            compartment_id = %compartment_id,
            "Vault config updated"
        );
        let mut pair = self.pair.write().unwrap_or_else(PoisonError::into_inner);
        *pair = DefaultPair {
            vault_id: Some(vault_id),
            compartment_id: Some(compartment_id),
        };
    }

    /// Snapshot of `(vault_id, compartment_id)`
    pub fn get(&self) -> (Option<String>, Option<String>) {
        let pair = self.pair.read().unwrap_or_else(PoisonError::into_inner);
        (pair.vault_id.clone(), pair.compartment_id.clone())
    }

    /// Resolve the effective scope: explicit argument, then the configured
    /// default, otherwise `MissingParameter`.
    ///
    /// Empty strings count as absent.
    pub fn resolve(
        &self,
        vault_id: Option<&str>,
        compartment_id: Option<&str>,
    ) -> Result<VaultScope, VaultError> {
        let (default_vault, default_compartment) = self.get();

        let vault_id = non_empty(vault_id)
            .map(str::to_string)
            .or_else(|| default_vault.filter(|v| !v.is_empty()))
            .ok_or(VaultError::MissingParameter {
                parameter: "vault_id",
                hint: VAULT_ID_HINT,
            })?;
        let compartment_id = non_empty(compartment_id)
            .map(str::to_string)
            .or_else(|| default_compartment.filter(|c| !c.is_empty()))
            .ok_or(VaultError::MissingParameter {
                parameter: "compartment_id",
                hint: COMPARTMENT_ID_HINT,
            })?;

        Ok(VaultScope {
            vault_id,
            compartment_id,
        })
    }
}

/// Values that `resolve` would accept
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_empty_defaults() {
        let defaults = VaultDefaults::default();
        assert_eq!(defaults.get(), (None, None));
    }

    #[test]
    fn test_set_overwrites_both_fields() {
        let defaults = VaultDefaults::new(Some("vault-a".into()), None);
        defaults.set("vault-b".into(), "comp-b".into());
        assert_eq!(
            defaults.get(),
            (Some("vault-b".to_string()), Some("comp-b".to_string()))
        );
    }

    #[test]
    fn test_resolve_prefers_explicit_arguments() {
        let defaults = VaultDefaults::new(Some("vault-default".into()), Some("comp-default".into()));
        let scope = defaults
            .resolve(Some("vault-explicit"), Some("comp-explicit"))
            .unwrap();
        assert_eq!(scope.vault_id, "vault-explicit");
        assert_eq!(scope.compartment_id, "comp-explicit");
    }

    #[test]
    fn test_resolve_falls_back_per_field() {
        let defaults = VaultDefaults::new(Some("vault-default".into()), Some("comp-default".into()));
        let scope = defaults.resolve(None, Some("comp-explicit")).unwrap();
        assert_eq!(scope.vault_id, "vault-default");
        assert_eq!(scope.compartment_id, "comp-explicit");
    }

    #[test]
    fn test_resolve_treats_empty_string_as_absent() {
        let defaults = VaultDefaults::new(Some("vault-default".into()), Some("comp-default".into()));
        let scope = defaults.resolve(Some(""), Some("")).unwrap();
        assert_eq!(scope.vault_id, "vault-default");
        assert_eq!(scope.compartment_id, "comp-default");
    }

    #[test]
    fn test_resolve_missing_vault() {
        let defaults = VaultDefaults::new(None, Some("comp".into()));
        match defaults.resolve(None, None) {
            Err(VaultError::MissingParameter { parameter, .. }) => assert_eq!(parameter, "vault_id"),
            other => panic!("expected MissingParameter, got {other:?}"),
        }
    }

    #[test]
    fn test_resolve_missing_compartment() {
        let defaults = VaultDefaults::new(Some("vault".into()), None);
        match defaults.resolve(None, None) {
            Err(VaultError::MissingParameter { parameter, .. }) => {
                assert_eq!(parameter, "compartment_id");
            }
            other => panic!("expected MissingParameter, got {other:?}"),
        }
    }

    #[test]
    fn test_concurrent_writers_never_tear_the_pair() {
        let defaults = Arc::new(VaultDefaults::default());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let defaults = Arc::clone(&defaults);
                std::thread::spawn(move || {
                    for _ in 0..200 {
                        defaults.set(format!("vault-{i}"), format!("comp-{i}"));
                        let (vault, comp) = defaults.get();
                        let vault = vault.unwrap();
                        let comp = comp.unwrap();
                        assert_eq!(
                            vault.trim_start_matches("vault-"),
                            comp.trim_start_matches("comp-")
                        );
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
    }
}
