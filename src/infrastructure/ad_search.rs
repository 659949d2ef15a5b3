//! Active Directory search operations
//!
//! Root DSE lookup and the paged search loop used by the enumerators.

use super::directory::{DirectorySession, PageControl, SearchRequest, SearchResult, SearchScope};
use crate::domain::ServerInfo;
use crate::error::{AppError, AppResult, QueryStep};

/// Request all user and operational attributes
const ROOT_DSE_ATTRIBUTES: &[&str] = &["*", "+"];

/// Log progress every N pages on long paging runs
const LOG_INTERVAL_PAGES: usize = 10;

/// Read the root DSE entry.
///
/// A server that answers with no entry is treated as a schema discovery
/// failure, since none of the naming contexts can be resolved.
pub fn read_root_dse<S: DirectorySession>(session: &mut S) -> AppResult<SearchResult> {
    let request = SearchRequest {
        base: "",
        filter: "(objectClass=*)",
        scope: SearchScope::Base,
        attributes: ROOT_DSE_ATTRIBUTES,
        paging: None,
    };

    let page = session
        .search(&request)
        .map_err(|e| AppError::query(QueryStep::RootDse, e))?;

    page.entries.into_iter().next().ok_or_else(|| {
        tracing::error!("Root DSE search returned no entry");
        AppError::SchemaDiscovery("root DSE search returned no entry".into())
    })
}

/// Single-valued naming context attribute from the root DSE
pub fn naming_context(root_dse: &SearchResult, attribute: &str) -> AppResult<String> {
    match root_dse.get(attribute) {
        Some(value) if !value.trim().is_empty() => Ok(value.clone()),
        _ => {
            tracing::error!(attribute = attribute, "Root DSE does not advertise naming context");
            Err(AppError::SchemaDiscovery(format!(
                "root DSE has no {} attribute",
                attribute
            )))
        }
    }
}

/// Naming context from server metadata discovered at bind time.
///
/// The root DSE is only queried when no metadata was discovered. Metadata that
/// lacks the attribute is a discovery failure without another lookup.
pub fn resolve_naming_context<S: DirectorySession>(
    session: &mut S,
    server_info: Option<&ServerInfo>,
    attribute: &str,
) -> AppResult<String> {
    match server_info {
        Some(info) => info.naming_context(attribute).map(str::to_string).ok_or_else(|| {
            tracing::error!(attribute = attribute, "Root DSE does not advertise naming context");
            AppError::SchemaDiscovery(format!("root DSE has no {} attribute", attribute))
        }),
        None => {
            tracing::debug!(attribute = attribute, "No server metadata, reading root DSE");
            let root_dse = read_root_dse(session)?;
            naming_context(&root_dse, attribute)
        }
    }
}

pub fn server_info_from_root_dse(root_dse: &SearchResult) -> ServerInfo {
    ServerInfo {
        default_naming_context: root_dse.get("defaultNamingContext").cloned(),
        schema_naming_context: root_dse.get("schemaNamingContext").cloned(),
        configuration_naming_context: root_dse.get("configurationNamingContext").cloned(),
        dns_host_name: root_dse.get("dnsHostName").cloned(),
        server_name: root_dse.get("serverName").cloned(),
        domain_functionality: root_dse.get("domainFunctionality").cloned(),
        supported_sasl_mechanisms: root_dse
            .get_all("supportedSASLMechanisms")
            .cloned()
            .unwrap_or_default(),
    }
}

pub fn read_server_info<S: DirectorySession>(session: &mut S) -> AppResult<ServerInfo> {
    read_root_dse(session).map(|entry| server_info_from_root_dse(&entry))
}

/// Unpaged search for result sets known to be small
pub fn search_all<S: DirectorySession>(
    session: &mut S,
    base_dn: &str,
    filter: &str,
    scope: SearchScope,
    attributes: &[&str],
    step: QueryStep,
) -> AppResult<Vec<SearchResult>> {
    tracing::info!(base_dn = base_dn, filter = filter, scope = ?scope, "LDAP SEARCH: Starting query");

    let request = SearchRequest {
        base: base_dn,
        filter,
        scope,
        attributes,
        paging: None,
    };
    let page = session
        .search(&request)
        .map_err(|e| AppError::query(step, e))?;

    tracing::info!(base_dn = base_dn, result_count = page.entries.len(), "LDAP search completed");
    Ok(page.entries)
}

/// Search with the simple paged results control.
///
/// Each request carries the cookie returned by the previous one; the loop ends
/// when the server returns an empty or absent cookie. Any failure discards the
/// pages accumulated so far.
pub fn paged_search<S: DirectorySession>(
    session: &mut S,
    base_dn: &str,
    filter: &str,
    scope: SearchScope,
    attributes: &[&str],
    page_size: u32,
    step: QueryStep,
) -> AppResult<Vec<SearchResult>> {
    if page_size == 0 {
        return Err(AppError::Config("page size must be at least 1".into()));
    }

    tracing::info!(
        base_dn = base_dn,
        filter = filter,
        scope = ?scope,
        page_size = page_size,
        "LDAP SEARCH: Starting paged query"
    );

    let mut results = Vec::new();
    let mut cookie = Vec::new();
    let mut pages = 0usize;

    loop {
        let request = SearchRequest {
            base: base_dn,
            filter,
            scope,
            attributes,
            paging: Some(PageControl {
                size: page_size,
                cookie,
            }),
        };
        let page = session.search(&request).map_err(|e| {
            tracing::error!(
                base_dn = base_dn,
                filter = filter,
                pages_fetched = pages,
                error = %e,
                "Paged search failed, discarding partial results"
            );
            AppError::query(step, e)
        })?;

        pages += 1;
        tracing::debug!(page = pages, entries = page.entries.len(), "Received result page");
        results.extend(page.entries);

        if pages % LOG_INTERVAL_PAGES == 0 {
            tracing::info!(
                base_dn = base_dn,
                pages = pages,
                rows_processed = results.len(),
                "LDAP search in progress (large result set)..."
            );
        }

        match page.cookie {
            Some(next) if !next.is_empty() => cookie = next,
            _ => break,
        }
    }

    tracing::info!(
        base_dn = base_dn,
        pages = pages,
        result_count = results.len(),
        "LDAP paged search completed"
    );
    Ok(results)
}

/// Value of the leading RDN of a DN (`CN=Foo,CN=Schema,...` yields `Foo`)
pub fn leading_rdn_value(dn: &str) -> Option<&str> {
    let first = dn.split(',').next()?.trim();
    let (_, value) = first.split_once('=')?;
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}
