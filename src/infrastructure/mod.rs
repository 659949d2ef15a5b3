pub mod ad_connection;
pub mod ad_search;
pub mod directory;
pub mod gpo_enumeration;
pub mod ldap_client;
pub mod schema_enumeration;

#[cfg(test)]
pub mod mock_directory;

pub use ad_connection::*;
pub use ad_search::*;
pub use directory::*;
pub use gpo_enumeration::*;
pub use ldap_client::*;
pub use schema_enumeration::*;
