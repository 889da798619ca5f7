use anyhow::{Context, Result};
use log::debug;

use crate::{
    api::{TravelPlan, TravelPlanUpdate, TravelRequest},
    credential::CredentialStore,
    http::{RequestClient, Transport},
    runtime::Runtime,
};

fn summary_line(plan: &TravelPlan) -> String {
    format!(
        "#{} {} ({}, {} days, budget {:.2})",
        plan.id, plan.title, plan.destination, plan.days, plan.budget
    )
}

fn pretty(value: &impl serde::Serialize) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to format response")
}

/// Generate a new itinerary
#[tracing::instrument(skip(client, request), fields(destination = %request.destination))]
pub async fn create<T: Transport, S: CredentialStore>(
    client: &RequestClient<T, S>,
    request: &TravelRequest,
) -> Result<()> {
    let itinerary = client.create_travel_plan(request).await?;
    println!(
        "Created plan #{}: {} ({} days)",
        itinerary.travel_plan_id, itinerary.title, itinerary.days
    );
    println!("{}", pretty(&itinerary.itinerary)?);
    Ok(())
}

pub async fn list<T: Transport, S: CredentialStore>(client: &RequestClient<T, S>) -> Result<()> {
    let plans = client.travel_plans().await?;
    if plans.is_empty() {
        println!("No travel plans.");
        return Ok(());
    }
    for plan in &plans {
        println!("{}", summary_line(plan));
    }
    Ok(())
}

pub async fn show<T: Transport, S: CredentialStore>(
    client: &RequestClient<T, S>,
    plan_id: i64,
) -> Result<()> {
    let plan = client.travel_plan(plan_id).await?;
    println!("{}", pretty(&plan)?);
    Ok(())
}

pub async fn update<T: Transport, S: CredentialStore>(
    client: &RequestClient<T, S>,
    plan_id: i64,
    update: &TravelPlanUpdate,
) -> Result<()> {
    let plan = client.update_travel_plan(plan_id, update).await?;
    println!("Updated {}", summary_line(&plan));
    Ok(())
}

/// Delete a plan, asking first unless `yes` is set
#[tracing::instrument(skip(runtime, client))]
pub async fn delete<R: Runtime, T: Transport, S: CredentialStore>(
    runtime: &R,
    client: &RequestClient<T, S>,
    plan_id: i64,
    yes: bool,
) -> Result<()> {
    if !yes && !runtime.confirm(&format!("Delete travel plan #{}?", plan_id))? {
        debug!("Deletion of plan {} declined", plan_id);
        println!("Deletion cancelled.");
        return Ok(());
    }
    client.delete_travel_plan(plan_id).await?;
    println!("Deleted travel plan #{}", plan_id);
    Ok(())
}
