//! Health check command - checks a running Signet server.

use std::time::Duration;

use serde::Deserialize;

use crate::cli::HealthArgs;

#[derive(Debug, Deserialize)]
struct HealthBody {
    status: String,
    #[serde(default)]
    users: Option<usize>,
}

fn health_url(base: &str) -> String {
    let base = base.trim_end_matches('/');
    if base.ends_with("/health") {
        base.to_string()
    } else {
        format!("{base}/health")
    }
}

/// Run the health check command
pub async fn run(args: &HealthArgs) -> Result<(), Box<dyn std::error::Error>> {
    let url = health_url(&args.url);
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(args.timeout))
        .build()?;

    let response = match client.get(&url).send().await {
        Ok(response) => response,
        Err(e) => {
            eprintln!("unhealthy: failed to connect to {url}: {e}");
            std::process::exit(1);
        }
    };

    if !response.status().is_success() {
        eprintln!("unhealthy: server returned HTTP status {}", response.status());
        std::process::exit(1);
    }

    let body: HealthBody = response.json().await?;
    if body.status != "healthy" {
        eprintln!("unhealthy: server reported status {}", body.status);
        std::process::exit(1);
    }

    match body.users {
        Some(users) => println!("healthy: {users} users"),
        None => println!("healthy"),
    }
    Ok(())
}
