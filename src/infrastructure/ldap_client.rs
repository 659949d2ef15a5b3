//! LDAP implementation of the directory client traits, built on `ldap3`
//!
//! Binds use NTLM over GSS-SPNEGO. On an ldaps connection the client adds the
//! tls-server-end-point channel binding token to the NTLM AUTHENTICATE message.

use super::directory::{
    BindRequest, DirectoryConnector, DirectorySession, SearchPage, SearchRequest, SearchResult,
    SearchScope, ServerDescriptor, Transport,
};
use crate::error::{AppError, AppResult};
use ldap3::controls::{Control, ControlType, PagedResults};
use ldap3::{LdapConn, LdapConnSettings, LdapError, Scope, SearchEntry};
use std::time::Duration;

impl From<SearchScope> for Scope {
    fn from(scope: SearchScope) -> Self {
        match scope {
            SearchScope::Base => Scope::Base,
            SearchScope::OneLevel => Scope::OneLevel,
            SearchScope::Subtree => Scope::Subtree,
        }
    }
}

/// Map a connect or bind failure onto the connection error taxonomy
fn classify_bind_error(err: LdapError) -> AppError {
    match err {
        LdapError::Io { .. }
        | LdapError::Timeout { .. }
        | LdapError::NativeTLS { .. }
        | LdapError::EndOfStream
        | LdapError::ResultRecv { .. }
        | LdapError::OpSend { .. }
        | LdapError::UrlParsing { .. }
        | LdapError::UnknownScheme(_) => AppError::Transport(err.to_string()),
        LdapError::LdapResult { result } => AppError::Authentication(format!(
            "bind rejected (rc={}): {}",
            result.rc,
            if result.text.is_empty() { "no diagnostic text" } else { result.text.as_str() }
        )),
        LdapError::SSPIError { .. } | LdapError::NoNtlmChallengeToken => {
            AppError::Authentication(err.to_string())
        }
        other => AppError::Unknown(other.to_string()),
    }
}

/// Extract the paging cookie from the response controls
fn paged_results_cookie(ctrls: &[Control]) -> Option<Vec<u8>> {
    ctrls.iter().find_map(|ctrl| match ctrl {
        Control(Some(ControlType::PagedResults), raw) if raw.val.is_some() => {
            Some(raw.parse::<PagedResults>().cookie)
        }
        _ => None,
    })
}

/// Opens `ldap3` connections
#[derive(Debug, Clone, Default)]
pub struct LdapDirectory {
    conn_timeout: Option<Duration>,
}

impl LdapDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the library's default connection timeout
    pub fn with_conn_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.conn_timeout = timeout;
        self
    }

    fn settings(&self, server: &ServerDescriptor) -> LdapConnSettings {
        let mut settings = LdapConnSettings::new();
        if server.transport == Transport::Tls {
            settings = settings.set_no_tls_verify(!server.verify_certificates);
        }
        if let Some(timeout) = self.conn_timeout {
            settings = settings.set_conn_timeout(timeout);
        }
        settings
    }
}

impl DirectoryConnector for LdapDirectory {
    type Session = LdapSession;

    fn bind(&self, server: &ServerDescriptor, request: &BindRequest<'_>) -> AppResult<LdapSession> {
        let url = server.url();
        tracing::debug!(
            url = %url,
            user = request.username,
            channel_binding = request.channel_binding,
            "Opening LDAP connection"
        );

        let mut conn =
            LdapConn::with_settings(self.settings(server), &url).map_err(classify_bind_error)?;

        if request.channel_binding && server.transport != Transport::Tls {
            tracing::warn!(url = %url, "Channel binding requested on a plaintext connection, no token will be sent");
        }

        conn.sasl_ntlm_bind(request.username, request.password)
            .and_then(|res| res.success())
            .map_err(classify_bind_error)?;

        tracing::debug!(url = %url, "NTLM bind succeeded");
        Ok(LdapSession { conn, url })
    }
}

/// A bound `ldap3` connection
pub struct LdapSession {
    conn: LdapConn,
    url: String,
}

impl std::fmt::Debug for LdapSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LdapSession").field("url", &self.url).finish()
    }
}

impl DirectorySession for LdapSession {
    fn search(&mut self, request: &SearchRequest<'_>) -> AppResult<SearchPage> {
        if let Some(paging) = &request.paging {
            let size = i32::try_from(paging.size).map_err(|_| {
                AppError::Config(format!("page size {} exceeds the LDAP limit", paging.size))
            })?;
            self.conn.with_controls(PagedResults {
                size,
                cookie: paging.cookie.clone(),
            });
        }

        let (entries, result) = self
            .conn
            .search(
                request.base,
                request.scope.into(),
                request.filter,
                request.attributes.to_vec(),
            )
            .and_then(|res| res.success())
            .map_err(|e| {
                tracing::error!(
                    base_dn = request.base,
                    filter = request.filter,
                    error = %e,
                    "LDAP SEARCH FAILED"
                );
                AppError::LdapError(e.to_string())
            })?;

        let entries = entries
            .into_iter()
            .map(|entry| {
                let entry = SearchEntry::construct(entry);
                let mut result = SearchResult::new(entry.dn);
                for (name, values) in entry.attrs {
                    result = result.with(&name, values);
                }
                result
            })
            .collect();

        let cookie = if request.paging.is_some() {
            paged_results_cookie(&result.ctrls)
        } else {
            None
        };

        Ok(SearchPage { entries, cookie })
    }

    fn unbind(&mut self) -> AppResult<()> {
        self.conn
            .unbind()
            .map_err(|e| AppError::LdapError(e.to_string()))
    }
}
