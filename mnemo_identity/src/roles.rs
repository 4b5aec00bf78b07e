use std::collections::HashMap;
use std::path::Path;

use mnemo_core::{Error, Result, Role};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct RoleRegistryFile {
    roles: Vec<Role>,
}

/// Static persona configuration loaded once at startup.
pub struct RoleRegistry {
    roles: HashMap<String, Role>,
}

impl RoleRegistry {
    /// Load a registry from a JSON file of the shape `{"roles": [...]}`.
    /// Every `Role` field not given in the file defaults per
    /// `mnemo_core::Role`'s serde defaults.
    pub async fn load(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| Error::ConfigInvalid(format!("reading role registry {}: {e}", path.display())))?;

        let file: RoleRegistryFile = serde_json::from_slice(&bytes)
            .map_err(|e| Error::ConfigInvalid(format!("parsing role registry {}: {e}", path.display())))?;

        let roles = file.roles.into_iter().map(|r| (r.role_id.clone(), r)).collect();
        Ok(Self { roles })
    }

    /// A registry containing only the built-in default assistant role, used
    /// when no registry file is configured.
    #[must_use]
    pub fn with_default_only() -> Self {
        let default = Role::default_assistant();
        let mut roles = HashMap::new();
        roles.insert(default.role_id.clone(), default);
        Self { roles }
    }

    /// Look up a role by id, failing with `Error::InvalidRole` if unknown
    ///.
    pub fn resolve(&self, role_id: &str) -> Result<&Role> {
        self.roles.get(role_id).ok_or_else(|| Error::InvalidRole(role_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_resolves_default_role() {
        let registry = RoleRegistry::with_default_only();
        assert!(registry.resolve("default").is_ok());
        assert!(registry.resolve("missing").is_err());
    }

    #[tokio::test]
    async fn loads_roles_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roles.json");
        tokio::fs::write(
            &path,
            r#"{"roles": [{"role_id": "coach", "name": "Coach", "system_prompt": "You are a coach."}]}"#,
        )
        .await
        .unwrap();

        let registry = RoleRegistry::load(&path).await.unwrap();
        let role = registry.resolve("coach").unwrap();
        assert_eq!(role.name, "Coach");
    }
}
