/*! Integration tests for Signet.
 *
 * This test suite is organized as a single integration test binary
 * following the pattern described by matklad in
 * https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html
 *
 * The module structure mirrors the main library structure:
 * - keystore: Key loading, generation and persistence
 * - crypto: Fingerprint and signature properties
 * - codec: Binary export encoding and decoding
 * - verify: Offline verification of decoded records
 * - directory: The in-process user directory
 * - scenarios: End-to-end flows from creation to verification
 */

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("signet=info".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

mod codec;
mod crypto;
mod directory;
mod helpers;
mod scenarios;
mod verify;
