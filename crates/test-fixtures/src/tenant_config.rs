//! `TenantConfig` fixture helper.

use mindscape_core::models::TenantConfig;

/// Defaults with only `tenant` overridden — the common case for tests that
/// just need a config scoped to a specific tenant string.
pub fn tenant_config_with_tenant(tenant: impl Into<String>) -> TenantConfig {
    TenantConfig {
        tenant: tenant.into(),
        ..TenantConfig::default()
    }
}
