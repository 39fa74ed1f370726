//! Built-in resource kind descriptors embedded in the binary
//!
//! Each supported kind ships as a small YAML descriptor under `kinds/`, so
//! `--kind guest_type` works without any provider-side resource section.

use crate::config::ResourceDefinition;
use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Built-in kind YAML descriptors
pub static BUILTIN_KINDS: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut m = BTreeMap::new();

    // Guest access
    m.insert("guest_type", include_str!("../kinds/guest_type.yaml"));
    m.insert("guest_user", include_str!("../kinds/guest_user.yaml"));
    m.insert("sponsor_group", include_str!("../kinds/sponsor_group.yaml"));

    // Network access
    m.insert("ipsec", include_str!("../kinds/ipsec.yaml"));
    m.insert(
        "network_access_condition",
        include_str!("../kinds/network_access_condition.yaml"),
    );
    m.insert(
        "radius_server_sequence",
        include_str!("../kinds/radius_server_sequence.yaml"),
    );

    // Deployment
    m.insert("node", include_str!("../kinds/node.yaml"));
    m.insert(
        "connector_config",
        include_str!("../kinds/connector_config.yaml"),
    );

    m
});

/// Raw YAML of a built-in kind
pub fn get_builtin(kind: &str) -> Option<&'static str> {
    BUILTIN_KINDS.get(kind).copied()
}

/// Check if a kind is built in
pub fn is_builtin(kind: &str) -> bool {
    BUILTIN_KINDS.contains_key(kind)
}

/// All built-in kind names, sorted
pub fn list_builtin() -> Vec<&'static str> {
    BUILTIN_KINDS.keys().copied().collect()
}

/// Parsed and validated descriptor of a built-in kind
pub fn builtin_definition(kind: &str) -> Result<ResourceDefinition> {
    let yaml = get_builtin(kind).ok_or_else(|| Error::unknown_kind(kind))?;
    let def: ResourceDefinition = serde_yaml::from_str(yaml)?;
    def.validate()?;
    Ok(def)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::LookupMethod;
    use crate::resource::DeleteSupport;

    #[test]
    fn test_every_builtin_parses() {
        for kind in list_builtin() {
            let def = builtin_definition(kind).unwrap();
            assert_eq!(def.kind, kind);
        }
        assert_eq!(list_builtin().len(), 8);
    }

    #[test]
    fn test_unknown_kind() {
        assert!(!is_builtin("printer"));
        assert!(matches!(
            builtin_definition("printer"),
            Err(Error::UnknownKind { .. })
        ));
    }

    #[test]
    fn test_ipsec_is_compound() {
        let kind = builtin_definition("ipsec").unwrap().to_kind();
        assert_eq!(kind.compound_key, vec!["host_name", "nad_ip"]);
        assert_eq!(kind.keys[0].source(), "hostName");
        assert!(kind.plan().supports(LookupMethod::ByCompoundKey));
    }

    #[test]
    fn test_connector_config_has_no_remote_delete() {
        let def = builtin_definition("connector_config").unwrap();
        assert_eq!(def.delete, DeleteSupport::Unsupported);
        assert_eq!(
            builtin_definition("guest_type").unwrap().delete,
            DeleteSupport::Remote
        );
    }

    #[test]
    fn test_ers_kinds_use_wrappers() {
        let def = builtin_definition("guest_user").unwrap();
        assert_eq!(def.detail_path(), Some("GuestUser"));
        assert_eq!(def.items_path, "SearchResult.resources");
        assert!(def.name_path.is_some());
    }
}
