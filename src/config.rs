//! Command-line configuration

use crate::commands::OutputFormat;
use crate::domain::Credentials;
use crate::infrastructure::{EnumerationOptions, DEFAULT_PAGE_SIZE};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Enumerate custom schema classes/attributes or Group Policy Objects in Active Directory
#[derive(Parser, Debug)]
#[command(name = "adbarbaros", version, about, long_about = None)]
pub struct Cli {
    /// IP or hostname of the LDAP server
    #[arg(long)]
    pub host: String,

    /// AD domain name (e.g., example.local)
    #[arg(long)]
    pub domain: String,

    /// Username
    #[arg(long)]
    pub username: String,

    /// Password
    #[arg(long)]
    pub password: String,

    /// Page size for paged searches
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE, value_parser = clap::value_parser!(u32).range(1..=i32::MAX as i64))]
    pub page_size: u32,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,

    /// List Group Policy Objects instead of enumerating the schema
    #[arg(long)]
    pub gpos: bool,

    /// Connection timeout in seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Also write diagnostics to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn credentials(&self) -> Credentials {
        Credentials::new(
            self.host.clone(),
            self.domain.clone(),
            self.username.clone(),
            self.password.clone(),
        )
    }

    pub fn enumeration_options(&self) -> EnumerationOptions {
        EnumerationOptions {
            page_size: self.page_size,
        }
    }

    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }

    pub fn conn_timeout(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }
}
