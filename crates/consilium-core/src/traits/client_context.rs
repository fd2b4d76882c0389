use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::ConsiliumResult;

/// Client/case profile injected into prompts for personalization.
/// Absence never affects correctness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientProfile {
    pub id: String,
    pub display_name: String,
    /// e.g. tax regime, sector, VAT registration notes.
    pub notes: Vec<String>,
}

/// Optional CRM collaborator resolving a client/case reference.
#[async_trait]
pub trait ClientContext: Send + Sync {
    async fn get(&self, id: &str) -> ConsiliumResult<Option<ClientProfile>>;
}
