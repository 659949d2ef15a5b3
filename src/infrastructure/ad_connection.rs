//! Active Directory connection over LDAP
//!
//! Binds with NTLM over ldaps with a channel binding token first. When that
//! fails at the transport or authentication level the bind is retried once
//! over plain LDAP without channel binding. There is no third attempt.

use super::ad_search::read_server_info;
use super::directory::{BindRequest, DirectoryConnector, DirectorySession, ServerDescriptor, Transport};
use crate::domain::{Credentials, ServerInfo};
use crate::error::AppResult;

/// Authenticated Active Directory connection handle
#[derive(Debug)]
pub struct AdConnection<S> {
    pub session: S,
    pub transport: Transport,
    pub bind_user: String,
    pub server_info: Option<ServerInfo>,
}

impl<S: DirectorySession> AdConnection<S> {
    /// Human-readable name of the authentication path that succeeded
    pub fn method(&self) -> &'static str {
        match self.transport {
            Transport::Tls => "ntlm - channel binding",
            Transport::Plain => "ntlm",
        }
    }

    pub fn close(mut self) {
        if let Err(e) = self.session.unbind() {
            tracing::warn!(error = %e, "Failed to unbind LDAP session");
        }
    }
}

/// Connect and authenticate to the directory server in `credentials`
pub fn connect<C: DirectoryConnector>(
    connector: &C,
    credentials: &Credentials,
) -> AppResult<AdConnection<C::Session>> {
    let bind_user = credentials.bind_user();
    let tls = ServerDescriptor::tls(&credentials.server);
    let request = BindRequest {
        username: &bind_user,
        password: credentials.password(),
        channel_binding: true,
    };

    tracing::info!(url = %tls.url(), user = %bind_user, "Connecting using ntlm - channel binding");

    let (session, descriptor) = match connector.bind(&tls, &request) {
        Ok(session) => (session, tls),
        Err(e) if e.is_recoverable_bind_failure() => {
            tracing::warn!(error = %e, "Encrypted bind failed, falling back to plaintext LDAP");

            let plain = ServerDescriptor::plain(&credentials.server);
            let request = BindRequest {
                channel_binding: false,
                ..request
            };
            tracing::info!(url = %plain.url(), user = %bind_user, "Connecting using ntlm");

            match connector.bind(&plain, &request) {
                Ok(session) => (session, plain),
                Err(e) => {
                    tracing::error!(error = %e, "Plaintext bind failed, giving up");
                    return Err(e);
                }
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "Encrypted bind failed with an unrecoverable error");
            return Err(e);
        }
    };

    let mut connection = AdConnection {
        session,
        transport: descriptor.transport,
        bind_user,
        server_info: None,
    };
    tracing::info!(
        url = %descriptor.url(),
        method = connection.method(),
        "AD connection established"
    );

    if descriptor.discover_metadata {
        match read_server_info(&mut connection.session) {
            Ok(info) => {
                tracing::debug!(
                    dns_host_name = ?info.dns_host_name,
                    default_naming_context = ?info.default_naming_context,
                    domain_functionality = ?info.domain_functionality,
                    "Server metadata discovered"
                );
                connection.server_info = Some(info);
            }
            Err(e) => tracing::warn!(error = %e, "Server metadata discovery failed, continuing"),
        }
    }

    Ok(connection)
}
