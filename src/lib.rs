pub mod commands;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod logging;

use commands::{find_custom_schema, list_group_policies};
use config::Cli;
use error::AppResult;
use infrastructure::{connect, DirectoryConnector};
use std::io::Write;

/// Connect, run the selected enumeration and write its output to `out`
pub fn run<C: DirectoryConnector, W: Write>(connector: &C, cli: &Cli, out: &mut W) -> AppResult<()> {
    let credentials = cli.credentials();
    tracing::debug!(credentials = ?credentials, "Starting adbarbaros");

    let mut connection = connect(connector, &credentials)?;

    let server_info = connection.server_info.as_ref();
    let result = if cli.gpos {
        list_group_policies(
            &mut connection.session,
            server_info,
            cli.page_size,
            cli.output_format(),
            out,
        )
        .map(|_| ())
    } else {
        find_custom_schema(
            &mut connection.session,
            server_info,
            &cli.enumeration_options(),
            cli.output_format(),
            out,
        )
        .map(|_| ())
    };

    connection.close();
    result?;
    out.flush()?;
    Ok(())
}
