//! Process-wide type alias registry.
//!
//! Aliases map a user-chosen name onto an entry of the primitive table. They
//! are consulted only while a schema is compiled, so registering them is
//! configuration: do it before building the codecs that use them. A compiled
//! [`Codec`](crate::Codec) has already resolved every name and is unaffected
//! by later registrations.

use std::collections::HashMap;
use std::sync::{OnceLock, PoisonError, RwLock};

use crate::error::ConfigError;
use crate::types::{is_reserved, normalize_type_name, PrimitiveType};

fn aliases() -> &'static RwLock<HashMap<String, PrimitiveType>> {
    static ALIASES: OnceLock<RwLock<HashMap<String, PrimitiveType>>> = OnceLock::new();
    ALIASES.get_or_init(|| {
        let mut map = HashMap::new();
        map.insert("bool".to_string(), PrimitiveType::Boolean);
        RwLock::new(map)
    })
}

/// Register `alias` as another name for `existing`, which may be a built-in
/// type or a previously registered alias. Re-registering an alias replaces it.
pub fn add_type_alias(alias: &str, existing: &str) -> Result<(), ConfigError> {
    let alias = normalize_type_name(alias);
    let existing = normalize_type_name(existing);

    for name in [&alias, &existing] {
        if is_reserved(name) {
            return Err(ConfigError::ReservedNameCollision(name.clone()));
        }
    }
    if PrimitiveType::from_builtin_name(&alias).is_some() {
        return Err(ConfigError::ShadowsBuiltin(alias));
    }

    let target = resolve_type_name(&existing).ok_or_else(|| ConfigError::UnknownAliasTarget {
        alias: alias.clone(),
        target: existing.clone(),
    })?;

    aliases()
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(alias, target);
    Ok(())
}

/// Resolve a normalized type name against the built-in table, then the alias
/// table. Reserved marker names never resolve.
pub fn resolve_type_name(name: &str) -> Option<PrimitiveType> {
    if is_reserved(name) {
        return None;
    }
    PrimitiveType::from_builtin_name(name).or_else(|| {
        aliases()
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .copied()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bool_alias() {
        assert_eq!(resolve_type_name("bool"), Some(PrimitiveType::Boolean));
    }

    #[test]
    fn test_alias_of_alias() {
        add_type_alias("registry_test_flag", "bool").unwrap();
        add_type_alias("Registry_Test_Switch", "registry_test_flag").unwrap();
        assert_eq!(
            resolve_type_name("registry_test_switch"),
            Some(PrimitiveType::Boolean)
        );
    }

    #[test]
    fn test_reserved_names_rejected() {
        let err = add_type_alias("__obj", "uint8").unwrap_err();
        assert!(matches!(err, ConfigError::ReservedNameCollision(_)));
        let err = add_type_alias("registry_test_marker", "__ARREND").unwrap_err();
        assert!(matches!(err, ConfigError::ReservedNameCollision(_)));
        assert_eq!(resolve_type_name("__arr"), None);
    }

    #[test]
    fn test_unknown_target_and_shadowing() {
        let err = add_type_alias("registry_test_u128", "uint128").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownAliasTarget { .. }));
        let err = add_type_alias("uint8", "int8").unwrap_err();
        assert!(matches!(err, ConfigError::ShadowsBuiltin(_)));
    }
}
