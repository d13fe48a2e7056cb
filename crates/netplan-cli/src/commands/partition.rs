use crate::client::ApiClient;
use anyhow::Result;
use netplan_core::{partition, Subnet};
use serde_json::json;

pub async fn run(
    client: Option<&ApiClient>,
    network: String,
    prefix: u8,
    new_prefix: u8,
) -> Result<()> {
    let subnets: Vec<Subnet> = match client {
        Some(client) => {
            let body = json!({
                "network": network,
                "original_prefix": prefix,
                "new_prefix": new_prefix,
            });
            client.post("/api/subnets/partition", &body).await?
        }
        None => partition(&network, prefix, new_prefix)?,
    };

    print!("{}", format_subnets(&subnets));
    Ok(())
}

pub fn format_subnets(subnets: &[Subnet]) -> String {
    if subnets.is_empty() {
        return "No usable subnets\n".to_string();
    }

    let mut out = format!(
        "{:<5} {:<18} {:<6} {:<16} {:<16}\n",
        "#", "Network", "Mask", "First", "Last"
    );
    out.push_str(&"-".repeat(64));
    out.push('\n');

    for (i, subnet) in subnets.iter().enumerate() {
        out.push_str(&format!(
            "{:<5} {:<18} /{:<5} {:<16} {:<16}\n",
            i + 1,
            subnet.network,
            subnet.mask,
            subnet.first_address,
            subnet.last_address
        ));
    }
    out
}
