use serde::Serialize;

/// Directory server details read from the root DSE after bind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfo {
    pub default_naming_context: Option<String>,
    pub schema_naming_context: Option<String>,
    pub configuration_naming_context: Option<String>,
    pub dns_host_name: Option<String>,
    pub server_name: Option<String>,
    pub domain_functionality: Option<String>,
    pub supported_sasl_mechanisms: Vec<String>,
}

impl ServerInfo {
    /// Naming context by its root DSE attribute name; empty values count as absent
    pub fn naming_context(&self, attribute: &str) -> Option<&str> {
        let value = if attribute.eq_ignore_ascii_case("defaultNamingContext") {
            &self.default_naming_context
        } else if attribute.eq_ignore_ascii_case("schemaNamingContext") {
            &self.schema_naming_context
        } else if attribute.eq_ignore_ascii_case("configurationNamingContext") {
            &self.configuration_naming_context
        } else {
            return None;
        };
        value.as_deref().filter(|v| !v.trim().is_empty())
    }
}
