//! Keys command - creates the signing keypair if needed and prints the public key.

use serde::Serialize;
use signet::KeyStore;
use signet::constants::KEYS_DIR;

use crate::cli::KeysArgs;
use crate::output::OutputFormat;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct KeysReport {
    key_dir: String,
    algorithm: &'static str,
    public_key: String,
}

/// Run the keys command
pub async fn run(args: &KeysArgs, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let key_dir = args.data_dir.join(KEYS_DIR);
    let keystore = {
        let key_dir = key_dir.clone();
        tokio::task::spawn_blocking(move || KeyStore::open(key_dir)).await??
    };

    let report = KeysReport {
        key_dir: key_dir.display().to_string(),
        algorithm: keystore.public_key().algorithm(),
        public_key: keystore.public_key_pem().to_string(),
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Human => {
            println!("Key directory: {}", report.key_dir);
            println!("Algorithm:     {}", report.algorithm);
            println!();
            print!("{}", report.public_key);
        }
    }
    Ok(())
}
