pub mod ad_objects;
pub mod credentials;
pub mod gpo;
pub mod reference;
pub mod schema;

pub use ad_objects::*;
pub use credentials::*;
pub use gpo::*;
pub use reference::*;
pub use schema::*;
