use std::fmt;

/// Connection credentials supplied once at startup
#[derive(Clone)]
pub struct Credentials {
    pub server: String,
    pub domain: String,
    pub username: String,
    password: String,
}

impl Credentials {
    pub fn new(server: String, domain: String, username: String, password: String) -> Self {
        Self {
            server,
            domain,
            username,
            password,
        }
    }

    /// Down-level logon name (`DOMAIN\user`) used for NTLM binds
    pub fn bind_user(&self) -> String {
        format!("{}\\{}", self.domain, self.username)
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("server", &self.server)
            .field("domain", &self.domain)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
