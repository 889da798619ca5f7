use anyhow::Result;

use super::decode;
use super::types::{Itinerary, TravelPlan, TravelPlanUpdate, TravelRequest};
use crate::credential::CredentialStore;
use crate::http::{RequestClient, Transport};

impl<T: Transport, S: CredentialStore> RequestClient<T, S> {
    /// Asks the planner to generate an itinerary and save it as a new plan.
    #[tracing::instrument(skip(self, request), fields(destination = %request.destination))]
    pub async fn create_travel_plan(&self, request: &TravelRequest) -> Result<Itinerary> {
        decode(self.post("/travel/plan", request).await?, "itinerary")
    }

    pub async fn travel_plans(&self) -> Result<Vec<TravelPlan>> {
        decode(self.get("/travel/plans", &[]).await?, "travel plan list")
    }

    pub async fn travel_plan(&self, plan_id: i64) -> Result<TravelPlan> {
        let path = format!("/travel/plans/{}", plan_id);
        decode(self.get(&path, &[]).await?, "travel plan")
    }

    pub async fn update_travel_plan(
        &self,
        plan_id: i64,
        update: &TravelPlanUpdate,
    ) -> Result<TravelPlan> {
        let path = format!("/travel/plans/{}", plan_id);
        decode(self.put(&path, update).await?, "travel plan")
    }

    pub async fn delete_travel_plan(&self, plan_id: i64) -> Result<()> {
        let path = format!("/travel/plans/{}", plan_id);
        self.delete(&path).await?;
        Ok(())
    }
}
