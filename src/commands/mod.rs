pub mod gpo;
pub mod schema;

pub use gpo::*;
pub use schema::*;

/// How results are written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
