//! Schema enumeration command

use super::OutputFormat;
use crate::domain::{EnumerationResult, ReferenceSet, ServerInfo};
use crate::error::AppResult;
use crate::infrastructure::{enumerate, DirectorySession, EnumerationOptions};
use std::io::Write;

/// Enumerate custom schema classes and attributes and write the report to `out`
pub fn find_custom_schema<S: DirectorySession, W: Write>(
    session: &mut S,
    server_info: Option<&ServerInfo>,
    options: &EnumerationOptions,
    format: OutputFormat,
    out: &mut W,
) -> AppResult<EnumerationResult> {
    let result = enumerate(session, server_info, ReferenceSet::builtin(), options)?;

    match format {
        OutputFormat::Text => write_schema_report(&result, out)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &result)?;
            writeln!(out)?;
        }
    }
    Ok(result)
}

pub fn write_schema_report<W: Write>(result: &EnumerationResult, out: &mut W) -> AppResult<()> {
    writeln!(out, "[+] Schema DN: {}", result.schema_dn)?;
    writeln!(
        out,
        "[+] Found {} classes and {} attributes in schema",
        result.class_count(),
        result.attribute_count()
    )?;

    writeln!(
        out,
        "[+] Custom classes: {} of {}",
        result.custom_classes.len(),
        result.class_count()
    )?;
    for name in result.custom_class_names() {
        writeln!(out, "    {}", name)?;
    }

    writeln!(
        out,
        "[+] Custom attributes: {} of {}",
        result.custom_attributes.len(),
        result.attribute_count()
    )?;
    for name in result.custom_attribute_names() {
        writeln!(out, "    {}", name)?;
    }
    Ok(())
}
