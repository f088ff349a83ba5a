// Agency source abstraction.
// The sync coordinator depends on this trait rather than on the HTTP client directly.

use async_trait::async_trait;

use crate::error::ApiError;

use super::client::MetroClient;
use super::types::Agency;

/// Anything that can list the full set of agencies in one call.
#[async_trait]
pub trait AgencySource: Send + Sync {
    async fn list_agencies(&self) -> Result<Vec<Agency>, ApiError>;
}

#[async_trait]
impl AgencySource for MetroClient {
    async fn list_agencies(&self) -> Result<Vec<Agency>, ApiError> {
        self.get_agencies().await
    }
}
