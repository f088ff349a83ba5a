// Agencies API types.
// Defines the agency record shared by the HTTP layer, the store and the display.

use std::fmt;

use serde::Deserialize;

/// Transit operator record.
///
/// Unknown fields in API responses are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Agency {
    pub id: String,
    pub name: String,
}

impl fmt::Display for Agency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}
