//! Schema enumeration
//!
//! Finds the schema partition from the root DSE metadata, pulls every classSchema
//! and attributeSchema definition, and separates the ones a stock forest does
//! not ship with.

use super::ad_search::{leading_rdn_value, paged_search, resolve_naming_context, search_all};
use super::directory::{DirectorySession, SearchResult, SearchScope};
use crate::domain::{EnumerationResult, ReferenceSet, SchemaKind, SchemaObject, ServerInfo};
use crate::error::{AppError, AppResult, QueryStep};

/// Page size for the attributeSchema query
pub const DEFAULT_PAGE_SIZE: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumerationOptions {
    pub page_size: u32,
}

impl Default for EnumerationOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

fn schema_object(entry: SearchResult, kind: SchemaKind) -> SchemaObject {
    let common_name = entry
        .get("cn")
        .cloned()
        .or_else(|| leading_rdn_value(&entry.dn).map(str::to_string))
        .unwrap_or_else(|| entry.dn.clone());
    let identifier = entry.get(kind.identifier_attribute()).cloned();
    SchemaObject::new(common_name, identifier, kind)
}

/// Enumerate the schema and classify it against `reference`.
///
/// The schema partition comes from `server_info` when metadata was discovered
/// at bind time. Classes are fetched in one unpaged request; attributes are
/// paged. Any query failure aborts the whole run.
pub fn enumerate<S: DirectorySession>(
    session: &mut S,
    server_info: Option<&ServerInfo>,
    reference: &ReferenceSet,
    options: &EnumerationOptions,
) -> AppResult<EnumerationResult> {
    if options.page_size == 0 {
        return Err(AppError::Config("page size must be at least 1".into()));
    }

    let schema_dn = resolve_naming_context(session, server_info, "schemaNamingContext")?;
    tracing::info!(schema_dn = %schema_dn, "Schema naming context discovered");

    let class_filter = format!("(objectClass={})", SchemaKind::Class.object_class());
    let classes: Vec<SchemaObject> = search_all(
        session,
        &schema_dn,
        &class_filter,
        SearchScope::Subtree,
        &["cn", SchemaKind::Class.identifier_attribute()],
        QueryStep::ClassSchema,
    )?
    .into_iter()
    .map(|entry| schema_object(entry, SchemaKind::Class))
    .collect();

    let attribute_filter = format!("(objectClass={})", SchemaKind::Attribute.object_class());
    let attributes: Vec<SchemaObject> = paged_search(
        session,
        &schema_dn,
        &attribute_filter,
        SearchScope::Subtree,
        &["cn", SchemaKind::Attribute.identifier_attribute()],
        options.page_size,
        QueryStep::AttributeSchema,
    )?
    .into_iter()
    .map(|entry| schema_object(entry, SchemaKind::Attribute))
    .collect();

    let result = EnumerationResult::classify(schema_dn, classes, attributes, reference);
    tracing::info!(
        classes = result.class_count(),
        attributes = result.attribute_count(),
        custom_classes = result.custom_classes.len(),
        custom_attributes = result.custom_attributes.len(),
        "Schema enumeration complete"
    );
    Ok(result)
}
