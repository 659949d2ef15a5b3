//! GPO listing command

use super::OutputFormat;
use crate::domain::{GroupPolicyObject, ServerInfo};
use crate::error::AppResult;
use crate::infrastructure::{list_gpos, DirectorySession};
use std::io::Write;

/// List the domain's Group Policy Objects and write them to `out`
pub fn list_group_policies<S: DirectorySession, W: Write>(
    session: &mut S,
    server_info: Option<&ServerInfo>,
    page_size: u32,
    format: OutputFormat,
    out: &mut W,
) -> AppResult<Vec<GroupPolicyObject>> {
    let gpos = list_gpos(session, server_info, page_size)?;

    match format {
        OutputFormat::Text => write_gpo_report(&gpos, out)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &gpos)?;
            writeln!(out)?;
        }
    }
    Ok(gpos)
}

pub fn write_gpo_report<W: Write>(gpos: &[GroupPolicyObject], out: &mut W) -> AppResult<()> {
    writeln!(out, "[+] Found {} Group Policy Objects", gpos.len())?;
    for gpo in gpos {
        writeln!(out)?;
        writeln!(out, "{}", gpo.name)?;
        writeln!(out, "    GUID:     {}", gpo.guid)?;
        writeln!(out, "    Path:     {}", gpo.path.as_deref().unwrap_or("-"))?;
        writeln!(out, "    Version:  {}", gpo.version)?;
        writeln!(out, "    Status:   {}", gpo.status.display_name())?;
        if let Some(created) = &gpo.created {
            writeln!(out, "    Created:  {}", created)?;
        }
        if let Some(modified) = &gpo.modified {
            writeln!(out, "    Modified: {}", modified)?;
        }
    }
    Ok(())
}
