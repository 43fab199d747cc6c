//! Tenancy configuration

/// Configuration shared by the tenancy services.
///
/// The defaults match the platform conventions; embedders override them
/// when their domain directory uses different role codes.
///
/// # Examples
///
/// ```
/// use atrium_tenancy::TenancyConfig;
///
/// let config = TenancyConfig::default();
/// assert_eq!(config.domain_type_code, "tenant");
/// assert_eq!(config.owner_role, "tenant_admin");
///
/// let custom = TenancyConfig::default().with_owner_role("admin");
/// assert_eq!(custom.owner_role, "admin");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenancyConfig {
    /// Domain type code used when provisioning tenant domains
    pub domain_type_code: String,

    /// Role granted to the creating owner
    pub owner_role: String,

    /// Role granted to members added without an explicit role
    pub default_member_role: String,
}

impl TenancyConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the domain type code.
    pub fn with_domain_type_code(mut self, type_code: impl Into<String>) -> Self {
        self.domain_type_code = type_code.into();
        self
    }

    /// Overrides the owner role.
    pub fn with_owner_role(mut self, role: impl Into<String>) -> Self {
        self.owner_role = role.into();
        self
    }

    /// Overrides the default member role.
    pub fn with_default_member_role(mut self, role: impl Into<String>) -> Self {
        self.default_member_role = role.into();
        self
    }
}

impl Default for TenancyConfig {
    fn default() -> Self {
        Self {
            domain_type_code: "tenant".to_string(),
            owner_role: "tenant_admin".to_string(),
            default_member_role: "member".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TenancyConfig::default();
        assert_eq!(config.domain_type_code, "tenant");
        assert_eq!(config.owner_role, "tenant_admin");
        assert_eq!(config.default_member_role, "member");
    }
}
