//! Group Policy Object listing
//!
//! GPOs are `groupPolicyContainer` objects under `CN=Policies,CN=System` of
//! the domain partition.

use super::ad_search::{paged_search, resolve_naming_context};
use super::directory::{DirectorySession, SearchResult, SearchScope};
use crate::domain::{generalized_time_to_iso8601, GpoStatus, GpoVersion, GroupPolicyObject, ServerInfo};
use crate::error::{AppResult, QueryStep};

const GPO_FILTER: &str = "(objectClass=groupPolicyContainer)";

const GPO_ATTRIBUTES: &[&str] = &[
    "cn",
    "displayName",
    "gPCFileSysPath",
    "versionNumber",
    "flags",
    "whenCreated",
    "whenChanged",
];

/// DN of the policies container for a domain
pub fn policies_container_dn(domain_dn: &str) -> String {
    format!("CN=Policies,CN=System,{}", domain_dn)
}

fn gpo_from_entry(entry: &SearchResult) -> GroupPolicyObject {
    let guid = entry
        .get("cn")
        .cloned()
        .unwrap_or_default();
    let name = entry
        .get("displayName")
        .cloned()
        .unwrap_or_else(|| guid.clone());

    GroupPolicyObject {
        name,
        path: entry.get("gPCFileSysPath").cloned(),
        version: GpoVersion::parse(entry.get("versionNumber").map(String::as_str)),
        status: GpoStatus::from_flags(entry.get("flags").map(String::as_str)),
        created: entry
            .get("whenCreated")
            .and_then(|v| generalized_time_to_iso8601(v)),
        modified: entry
            .get("whenChanged")
            .and_then(|v| generalized_time_to_iso8601(v)),
        distinguished_name: entry.dn.clone(),
        guid,
    }
}

/// List every GPO in the domain, sorted by display name
pub fn list_gpos<S: DirectorySession>(
    session: &mut S,
    server_info: Option<&ServerInfo>,
    page_size: u32,
) -> AppResult<Vec<GroupPolicyObject>> {
    let domain_dn = resolve_naming_context(session, server_info, "defaultNamingContext")?;
    let base_dn = policies_container_dn(&domain_dn);

    let mut gpos: Vec<GroupPolicyObject> = paged_search(
        session,
        &base_dn,
        GPO_FILTER,
        SearchScope::Subtree,
        GPO_ATTRIBUTES,
        page_size,
        QueryStep::GroupPolicy,
    )?
    .iter()
    .map(gpo_from_entry)
    .collect();

    gpos.sort_by_cached_key(|gpo| gpo.name.to_lowercase());

    tracing::info!(count = gpos.len(), "Group Policy Objects enumerated");
    Ok(gpos)
}
