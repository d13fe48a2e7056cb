use crate::client::ApiClient;
use crate::commands::plan::load;
use anyhow::Result;
use netplan_core::{plan, render_plan, RouterConfig};
use std::path::Path;

pub async fn run(client: Option<&ApiClient>, file: &Path, router: Option<&str>) -> Result<()> {
    let request = load(file)?;
    let configs: Vec<RouterConfig> = match client {
        Some(client) => client.post("/api/plan/configs", &request).await?,
        None => render_plan(&plan(&request)?),
    };

    let selected = select(configs, router)?;
    for config in selected {
        println!("! {} ({})", config.name, config.router_id);
        println!("{}", config.config);
    }
    Ok(())
}

fn select(configs: Vec<RouterConfig>, router: Option<&str>) -> Result<Vec<RouterConfig>> {
    match router {
        None => Ok(configs),
        Some(id) => {
            let selected: Vec<RouterConfig> =
                configs.into_iter().filter(|c| c.router_id == id).collect();
            if selected.is_empty() {
                anyhow::bail!("Router {} is not part of the plan", id);
            }
            Ok(selected)
        }
    }
}
