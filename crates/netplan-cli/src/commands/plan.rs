use crate::client::ApiClient;
use anyhow::{Context, Result};
use netplan_core::interface::lan_interface;
use netplan_core::{plan, summary_rows, Plan, PlanRequest};
use std::path::Path;

pub fn load(path: &Path) -> Result<PlanRequest> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read plan file {}", path.display()))?;
    let request = serde_yaml::from_str(&contents)
        .with_context(|| format!("Failed to parse plan file {}", path.display()))?;
    Ok(request)
}

/// Compute the plan, remotely when a client is given
pub async fn compute(client: Option<&ApiClient>, request: &PlanRequest) -> Result<Plan> {
    match client {
        Some(client) => client.post("/api/plan", request).await,
        None => Ok(plan(request)?),
    }
}

pub async fn run(client: Option<&ApiClient>, file: &Path) -> Result<()> {
    let request = load(file)?;
    let plan = compute(client, &request).await?;
    print!("{}", format_plan(&plan));
    Ok(())
}

pub fn format_plan(plan: &Plan) -> String {
    let rows = summary_rows(plan);
    let mut out = format!(
        "{:<16} {:<18} {:<10} {:<16} {:<16}\n",
        "Router", "Network", "Interface", "Peer", "IP Address"
    );
    out.push_str(&"-".repeat(80));
    out.push('\n');

    for row in rows {
        out.push_str(&format!(
            "{:<16} {:<18} {:<10} {:<16} {:<16}\n",
            row.router,
            format!("{}/{}", row.network, row.mask),
            row.interface,
            row.peer,
            row.ip_address
        ));
    }

    for router in &plan.routers {
        if let Some(dhcp) = &router.dhcp_subnets {
            for (i, subnet) in dhcp.iter().enumerate() {
                out.push_str(&format!(
                    "{:<16} {:<18} {:<10} {:<16} {:<16}\n",
                    router.name,
                    subnet.to_string(),
                    lan_interface(i),
                    "(DHCP)",
                    subnet.first_address
                ));
            }
        }
    }

    for warning in &plan.warnings {
        out.push_str(&format!("warning: {}\n", warning));
    }
    out
}
