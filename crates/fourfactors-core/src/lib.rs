// Library root: Four Factors import pipeline and snapshot loader, shared by
// the command-line tools and integration tests.

pub mod config;
pub mod importer;
pub mod loader;
pub mod normalize;
pub mod resolver;
pub mod schema;
pub mod snapshot;
pub mod table;
pub mod teams;

pub use importer::{ImportError, ImportSummary, Importer};
pub use loader::{load_team_factors, LoadError, LoadedSnapshot, StaleDataWarning};
pub use schema::TeamFactorRecord;
