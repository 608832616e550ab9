//! Beneficiary endpoints (saved recipients)

use std::sync::Arc;

use crate::adapters::{Ack, ApiClient};
use crate::domain::result::Result;
use crate::domain::{Beneficiary, BeneficiaryDraft};

pub struct BeneficiariesApi {
    client: Arc<ApiClient>,
}

impl BeneficiariesApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// GET /beneficiaries
    pub async fn list(&self) -> Result<Vec<Beneficiary>> {
        self.client
            .get("/beneficiaries")
            .await?
            .decode("beneficiaries")
    }

    /// POST /beneficiaries
    #[tracing::instrument(skip(self))]
    pub async fn create(&self, draft: &BeneficiaryDraft) -> Result<Beneficiary> {
        self.client
            .post("/beneficiaries", draft)
            .await?
            .decode("beneficiary")
    }

    /// GET /beneficiaries/:id
    pub async fn get(&self, id: &str) -> Result<Beneficiary> {
        self.client
            .get(&format!("/beneficiaries/{}", id))
            .await?
            .decode("beneficiary")
    }

    /// PUT /beneficiaries/:id
    #[tracing::instrument(skip(self))]
    pub async fn update(&self, id: &str, draft: &BeneficiaryDraft) -> Result<Beneficiary> {
        self.client
            .put(&format!("/beneficiaries/{}", id), draft)
            .await?
            .decode("beneficiary")
    }

    /// DELETE /beneficiaries/:id
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<Ack> {
        self.client
            .delete(&format!("/beneficiaries/{}", id))
            .await?
            .ack()
    }
}
