// Local storage module.
// Persists fetched agencies in SQLite and exposes live snapshots of the table.

pub mod agency;
pub mod paths;

pub use agency::{AgencyFeed, AgencyStore};
