//! Verify command - checks every record of an export against a public key.
//!
//! Sources are either local files (`--input` plus `--public-key`) or a running
//! server (`--url`), in which case both are fetched over HTTP. The process exits
//! non-zero when any record fails verification.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use signet::verify::{Summary, VerificationResult, verify_export};

use crate::cli::VerifyArgs;
use crate::output::{OutputFormat, print_table};

const EXPORT_PATH: &str = "/api/v1/users/export/protobuf";
const PUBLIC_KEY_PATH: &str = "/api/v1/users/public-key";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PublicKeyBody {
    public_key: String,
}

#[derive(Serialize)]
struct Report<'a> {
    summary: Summary,
    results: &'a [VerificationResult],
}

fn endpoint(base: &str, path: &str) -> String {
    format!("{}{path}", base.trim_end_matches('/'))
}

async fn fetch(base: &str, timeout: u64) -> Result<(Vec<u8>, String), Box<dyn std::error::Error>> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout))
        .build()?;

    let key: PublicKeyBody = client
        .get(endpoint(base, PUBLIC_KEY_PATH))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    let buffer = client
        .get(endpoint(base, EXPORT_PATH))
        .send()
        .await?
        .error_for_status()?
        .bytes()
        .await?;

    Ok((buffer.to_vec(), key.public_key))
}

async fn load(args: &VerifyArgs) -> Result<(Vec<u8>, String), Box<dyn std::error::Error>> {
    if let Some(url) = &args.url {
        tracing::info!("Fetching export and public key from {url}");
        return fetch(url, args.timeout).await;
    }

    let (Some(input), Some(key_path)) = (&args.input, &args.public_key) else {
        return Err("either --url or both --input and --public-key are required".into());
    };
    let buffer = tokio::fs::read(input).await?;
    let pem = tokio::fs::read_to_string(key_path).await?;
    Ok((buffer, pem))
}

fn result_rows(results: &[VerificationResult]) -> Vec<Vec<String>> {
    results
        .iter()
        .map(|r| {
            vec![
                r.record.id.to_string(),
                r.record.email.clone(),
                r.record.role.to_string(),
                r.record.effective_status().to_string(),
                r.outcome.to_string(),
            ]
        })
        .collect()
}

/// Run the verify command
pub async fn run(args: &VerifyArgs, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let (buffer, pem) = load(args).await?;
    let results = verify_export(&buffer, &pem)?;
    let summary = Summary::from_results(&results);

    match format {
        OutputFormat::Json => {
            let report = Report {
                summary,
                results: &results,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Human => {
            print_table(
                &["ID", "EMAIL", "ROLE", "STATUS", "RESULT"],
                &result_rows(&results),
            );
            println!();
            println!(
                "{} of {} records verified ({} missing seal, {} fingerprint mismatch, {} bad signature)",
                summary.verified,
                summary.total,
                summary.missing_seal,
                summary.fingerprint_mismatch,
                summary.bad_signature
            );
        }
    }

    if !summary.all_verified() {
        std::process::exit(1);
    }
    Ok(())
}
