use adbarbaros::config::Cli;
use adbarbaros::error::ErrorReport;
use adbarbaros::infrastructure::LdapDirectory;
use adbarbaros::logging;
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let _guard = logging::init_logging(cli.verbose, cli.log_file.as_deref());

    let connector = LdapDirectory::new().with_conn_timeout(cli.conn_timeout());
    let stdout = std::io::stdout();

    match adbarbaros::run(&connector, &cli, &mut stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(code = e.error_code(), "{}", e);
            if cli.json {
                if let Ok(report) = serde_json::to_string_pretty(&ErrorReport::from(&e)) {
                    println!("{}", report);
                }
            }
            ExitCode::from(e.exit_code())
        }
    }
}
