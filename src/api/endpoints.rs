// Agencies API endpoint functions.
// Fetches and decodes the full agency list in a single request.

use tracing::debug;

use crate::error::ApiError;

use super::client::MetroClient;
use super::types::Agency;

const AGENCIES_ENDPOINT: &str = "agencies/";

impl MetroClient {
    /// Get every agency. The body is fully buffered before decoding.
    pub async fn get_agencies(&self) -> Result<Vec<Agency>, ApiError> {
        let response = self.get(AGENCIES_ENDPOINT).await?;
        let body = response.text().await.map_err(ApiError::Transport)?;
        self.log_body(&body);

        let agencies = decode_agencies(&body)?;
        debug!(count = agencies.len(), "decoded agencies");
        Ok(agencies)
    }
}

/// Decode a JSON array of agencies, keeping response order.
pub fn decode_agencies(body: &str) -> Result<Vec<Agency>, ApiError> {
    Ok(serde_json::from_str(body)?)
}
