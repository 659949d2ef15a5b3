//! Directory client abstraction
//!
//! The connection policy and the enumeration logic talk to the directory only
//! through these traits, so they can run against the LDAP client or against
//! a simulated server in tests.

use crate::error::AppResult;
use std::collections::HashMap;
use std::fmt;

/// Transport security of a server descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// LDAP over TLS (ldaps)
    Tls,
    /// Plain LDAP
    Plain,
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transport::Tls => write!(f, "ldaps"),
            Transport::Plain => write!(f, "ldap"),
        }
    }
}

/// Where and how to reach the directory server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerDescriptor {
    pub address: String,
    pub transport: Transport,
    pub verify_certificates: bool,
    pub discover_metadata: bool,
}

impl ServerDescriptor {
    /// Encrypted descriptor with certificate validation disabled
    pub fn tls(address: &str) -> Self {
        Self {
            address: address.to_string(),
            transport: Transport::Tls,
            verify_certificates: false,
            discover_metadata: true,
        }
    }

    /// Plaintext descriptor
    pub fn plain(address: &str) -> Self {
        Self {
            address: address.to_string(),
            transport: Transport::Plain,
            verify_certificates: false,
            discover_metadata: true,
        }
    }

    /// LDAP URL; the scheme's default port applies when the address has none.
    ///
    /// A bare IPv6 literal is bracketed. Use `[addr]:port` to give an IPv6
    /// address a port.
    pub fn url(&self) -> String {
        let host = self
            .address
            .trim_start_matches("ldaps://")
            .trim_start_matches("ldap://")
            .trim_end_matches('/');
        if host.matches(':').count() > 1 && !host.starts_with('[') {
            format!("{}://[{}]", self.transport, host)
        } else {
            format!("{}://{}", self.transport, host)
        }
    }
}

/// NTLM bind parameters
#[derive(Clone)]
pub struct BindRequest<'a> {
    /// Down-level logon name (`DOMAIN\user`)
    pub username: &'a str,
    pub password: &'a str,
    pub channel_binding: bool,
}

impl fmt::Debug for BindRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindRequest")
            .field("username", &self.username)
            .field("channel_binding", &self.channel_binding)
            .finish_non_exhaustive()
    }
}

/// LDAP search scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchScope {
    Base,
    OneLevel,
    Subtree,
}

/// Simple paged results request control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageControl {
    pub size: u32,
    /// Empty on the first page
    pub cookie: Vec<u8>,
}

/// A single search operation
#[derive(Debug, Clone)]
pub struct SearchRequest<'a> {
    pub base: &'a str,
    pub filter: &'a str,
    pub scope: SearchScope,
    pub attributes: &'a [&'a str],
    pub paging: Option<PageControl>,
}

/// Search result row containing attribute values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResult {
    pub dn: String,
    pub attributes: HashMap<String, Vec<String>>,
}

impl SearchResult {
    pub fn new(dn: impl Into<String>) -> Self {
        Self {
            dn: dn.into(),
            attributes: HashMap::new(),
        }
    }

    /// Builder used when materialising entries; attribute names are case-insensitive
    pub fn with(mut self, attr: &str, values: Vec<String>) -> Self {
        self.attributes.insert(attr.to_lowercase(), values);
        self
    }

    pub fn get(&self, attr: &str) -> Option<&String> {
        self.attributes.get(&attr.to_lowercase()).and_then(|v| v.first())
    }

    pub fn get_all(&self, attr: &str) -> Option<&Vec<String>> {
        self.attributes.get(&attr.to_lowercase())
    }
}

/// Entries returned by one search request, plus the paging cookie if any
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    pub entries: Vec<SearchResult>,
    pub cookie: Option<Vec<u8>>,
}

/// An authenticated directory session
pub trait DirectorySession {
    fn search(&mut self, request: &SearchRequest<'_>) -> AppResult<SearchPage>;

    fn unbind(&mut self) -> AppResult<()>;
}

/// Opens sessions: one network bind per call
pub trait DirectoryConnector {
    type Session: DirectorySession;

    /// Connect to `server` and perform an NTLM bind.
    ///
    /// Errors are classified as `Transport` (socket, TLS, timeout),
    /// `Authentication` (bind rejected) or `Unknown`.
    fn bind(&self, server: &ServerDescriptor, request: &BindRequest<'_>) -> AppResult<Self::Session>;
}
