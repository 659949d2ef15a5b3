//! Simulated directory server for tests
//!
//! Scripted bind outcomes per transport, an in-memory root DSE, schema and
//! policy containers, and cookie-based paging that behaves like Active
//! Directory: a non-empty cookie while entries remain, an empty one on the
//! last page. Every bind attempt and search request is recorded.

use super::directory::{
    BindRequest, DirectoryConnector, DirectorySession, SearchPage, SearchRequest, SearchResult,
    SearchScope, ServerDescriptor, Transport,
};
use crate::error::{AppError, AppResult};
use std::cell::RefCell;
use std::rc::Rc;

pub const SCHEMA_DN: &str = "CN=Schema,CN=Configuration,DC=contoso,DC=com";
pub const DOMAIN_DN: &str = "DC=contoso,DC=com";

/// How the server answers a bind on one transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindBehavior {
    Accept,
    /// TLS handshake or socket failure
    TransportFailure,
    /// Bind result with invalidCredentials
    Reject,
    /// Anything the client cannot classify
    Crash,
}

impl BindBehavior {
    fn outcome(&self) -> AppResult<()> {
        match self {
            BindBehavior::Accept => Ok(()),
            BindBehavior::TransportFailure => Err(AppError::Transport(
                "native TLS error: handshake failure".into(),
            )),
            BindBehavior::Reject => Err(AppError::Authentication(
                "bind rejected (rc=49): 80090308: LdapErr: DSID-0C09056B".into(),
            )),
            BindBehavior::Crash => Err(AppError::Unknown("unexpected response PDU".into())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedBind {
    pub transport: Transport,
    pub url: String,
    pub username: String,
    pub channel_binding: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedSearch {
    pub base: String,
    pub filter: String,
    pub scope: SearchScope,
    pub page_size: Option<u32>,
    pub cookie: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct MockLog {
    pub binds: Vec<RecordedBind>,
    pub searches: Vec<RecordedSearch>,
}

impl MockLog {
    pub fn searches_for(&self, filter: &str) -> Vec<&RecordedSearch> {
        self.searches.iter().filter(|s| s.filter == filter).collect()
    }

    pub fn root_dse_searches(&self) -> usize {
        self.searches
            .iter()
            .filter(|s| s.base.is_empty() && s.scope == SearchScope::Base)
            .count()
    }
}

/// Directory contents served by the mock
#[derive(Debug, Clone, Default)]
pub struct MockData {
    pub root_dse: Option<SearchResult>,
    pub classes: Vec<SearchResult>,
    pub attributes: Vec<SearchResult>,
    pub gpos: Vec<SearchResult>,
    /// Fail the n-th (1-based) request carrying this filter
    pub fail_on: Option<(String, usize)>,
}

impl MockData {
    /// A domain controller whose root DSE advertises all naming contexts
    pub fn contoso() -> Self {
        Self {
            root_dse: Some(
                SearchResult::new("")
                    .with("defaultNamingContext", vec![DOMAIN_DN.into()])
                    .with("schemaNamingContext", vec![SCHEMA_DN.into()])
                    .with(
                        "configurationNamingContext",
                        vec!["CN=Configuration,DC=contoso,DC=com".into()],
                    )
                    .with("dnsHostName", vec!["dc01.contoso.com".into()])
                    .with("domainFunctionality", vec!["7".into()])
                    .with(
                        "supportedSASLMechanisms",
                        vec!["GSSAPI".into(), "GSS-SPNEGO".into(), "EXTERNAL".into()],
                    ),
            ),
            ..Default::default()
        }
    }

    pub fn with_classes(mut self, names: &[&str]) -> Self {
        self.classes = names
            .iter()
            .enumerate()
            .map(|(i, name)| schema_entry(name, "governsID", &format!("1.2.840.113556.1.5.{}", i)))
            .collect();
        self
    }

    pub fn with_attribute_names(mut self, names: &[String]) -> Self {
        self.attributes = names
            .iter()
            .enumerate()
            .map(|(i, name)| schema_entry(name, "attributeID", &format!("1.2.840.113556.1.4.{}", i)))
            .collect();
        self
    }

    /// `count` attributes named `attr-0`, `attr-1`, ...
    pub fn with_attribute_count(self, count: usize) -> Self {
        let names: Vec<String> = (0..count).map(|i| format!("attr-{}", i)).collect();
        self.with_attribute_names(&names)
    }
}

fn schema_entry(name: &str, id_attr: &str, oid: &str) -> SearchResult {
    SearchResult::new(format!("CN={},{}", name, SCHEMA_DN))
        .with("cn", vec![name.to_string()])
        .with(id_attr, vec![oid.to_string()])
}

/// Simulated server
#[derive(Debug, Clone)]
pub struct MockDirectory {
    pub tls: BindBehavior,
    pub plain: BindBehavior,
    pub data: Rc<MockData>,
    pub log: Rc<RefCell<MockLog>>,
}

impl MockDirectory {
    pub fn new(tls: BindBehavior, plain: BindBehavior, data: MockData) -> Self {
        Self {
            tls,
            plain,
            data: Rc::new(data),
            log: Rc::new(RefCell::new(MockLog::default())),
        }
    }

    /// A session that skips the bind step
    pub fn session(data: MockData) -> MockSession {
        Self::new(BindBehavior::Accept, BindBehavior::Accept, data).open()
    }

    fn open(&self) -> MockSession {
        MockSession {
            data: Rc::clone(&self.data),
            log: Rc::clone(&self.log),
            requests_by_filter: Default::default(),
        }
    }

    pub fn bind_count(&self) -> usize {
        self.log.borrow().binds.len()
    }
}

impl DirectoryConnector for MockDirectory {
    type Session = MockSession;

    fn bind(&self, server: &ServerDescriptor, request: &BindRequest<'_>) -> AppResult<MockSession> {
        self.log.borrow_mut().binds.push(RecordedBind {
            transport: server.transport,
            url: server.url(),
            username: request.username.to_string(),
            channel_binding: request.channel_binding,
        });
        let behavior = match server.transport {
            Transport::Tls => self.tls,
            Transport::Plain => self.plain,
        };
        behavior.outcome().map(|_| self.open())
    }
}

#[derive(Debug)]
pub struct MockSession {
    data: Rc<MockData>,
    log: Rc<RefCell<MockLog>>,
    requests_by_filter: std::collections::HashMap<String, usize>,
}

impl MockSession {
    pub fn log(&self) -> std::cell::Ref<'_, MockLog> {
        self.log.borrow()
    }

    fn container(&self, request: &SearchRequest<'_>) -> Vec<SearchResult> {
        if request.scope == SearchScope::Base && request.base.is_empty() {
            return self.data.root_dse.iter().cloned().collect();
        }
        match request.filter {
            "(objectClass=classSchema)" => self.data.classes.clone(),
            "(objectClass=attributeSchema)" => self.data.attributes.clone(),
            "(objectClass=groupPolicyContainer)" => self.data.gpos.clone(),
            _ => Vec::new(),
        }
    }
}

impl DirectorySession for MockSession {
    fn search(&mut self, request: &SearchRequest<'_>) -> AppResult<SearchPage> {
        self.log.borrow_mut().searches.push(RecordedSearch {
            base: request.base.to_string(),
            filter: request.filter.to_string(),
            scope: request.scope,
            page_size: request.paging.as_ref().map(|p| p.size),
            cookie: request
                .paging
                .as_ref()
                .map(|p| p.cookie.clone())
                .unwrap_or_default(),
        });

        let seen = self
            .requests_by_filter
            .entry(request.filter.to_string())
            .or_insert(0);
        *seen += 1;
        if let Some((filter, nth)) = &self.data.fail_on {
            if filter == request.filter && *nth == *seen {
                return Err(AppError::LdapError(
                    "LDAP operation result: rc=50 (insufficientAccessRights)".into(),
                ));
            }
        }

        let entries = self.container(request);
        match &request.paging {
            None => Ok(SearchPage {
                entries,
                cookie: None,
            }),
            Some(paging) => {
                let offset = if paging.cookie.is_empty() {
                    0
                } else {
                    String::from_utf8_lossy(&paging.cookie)
                        .parse::<usize>()
                        .map_err(|_| AppError::LdapError("unwillingToPerform: bad cookie".into()))?
                };
                let end = (offset + paging.size as usize).min(entries.len());
                let page = entries[offset.min(end)..end].to_vec();
                let cookie = if end < entries.len() {
                    end.to_string().into_bytes()
                } else {
                    Vec::new()
                };
                Ok(SearchPage {
                    entries: page,
                    cookie: Some(cookie),
                })
            }
        }
    }

    fn unbind(&mut self) -> AppResult<()> {
        Ok(())
    }
}
