use crate::client::ApiClient;
use anyhow::Result;
use serde::Deserialize;

#[derive(Deserialize)]
struct Health {
    status: String,
    version: String,
}

pub async fn run(client: &ApiClient) -> Result<()> {
    let health: Health = client.get("/health").await?;
    println!("Planner API: {} (version {})", health.status, health.version);
    Ok(())
}
