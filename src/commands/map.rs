use anyhow::{Context, Result};
use serde_json::Value;

use crate::{
    credential::CredentialStore,
    http::{RequestClient, Transport},
};

fn print_data(data: &Value) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(data).context("Failed to format response")?
    );
    Ok(())
}

pub async fn geocode<T: Transport, S: CredentialStore>(
    client: &RequestClient<T, S>,
    address: &str,
) -> Result<()> {
    print_data(&client.geocode(address).await?)
}

pub async fn poi<T: Transport, S: CredentialStore>(
    client: &RequestClient<T, S>,
    query: &str,
    city: Option<&str>,
    types: Option<&str>,
) -> Result<()> {
    print_data(&client.search_poi(query, city, types).await?)
}

pub async fn route<T: Transport, S: CredentialStore>(
    client: &RequestClient<T, S>,
    origin: &str,
    destination: &str,
    mode: &str,
) -> Result<()> {
    print_data(&client.route(origin, destination, mode).await?)
}

pub async fn weather<T: Transport, S: CredentialStore>(
    client: &RequestClient<T, S>,
    city: &str,
) -> Result<()> {
    print_data(&client.weather(city).await?)
}
