/*! Integration tests for Arbor.
 *
 * This test suite is organized as a single integration test binary
 * following the pattern described by matklad in
 * https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html
 *
 * The module structure mirrors the main library structure:
 * - object: Path addressing, typed getters, merging and conversions of Object
 * - flatten: Flattening and structural diffs
 * - deepcopy: Cycle-safe deep copies of values and user types
 * - delimited: The delimited-pattern decoder
 * - value: Equality, coercion, normalization and serde of Value
 */

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("arbor=info".parse().unwrap()))
        .with_test_writer()
        .try_init();
}

mod flatten;
mod helpers;
mod object;
mod value;
