//! Version handling for zk
//!
//! Cargo.toml carries a 0.x.y version while the protocol layer is unstable.
//! The CLI reports it with a `-dev` suffix until the first stable release.

/// Suffix appended to pre-1.0 versions when reported by the CLI
const DEV_SUFFIX: &str = "-dev";

/// The Cargo version with the dev suffix, built at compile time
const DEV_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "-dev");

/// Get the version string that should be reported by the CLI and the
/// `serverInfo` block of the initialize response.
pub fn cli_version() -> &'static str {
    let cargo_version = cargo_version();

    if cargo_version.starts_with("0.") {
        DEV_VERSION
    } else {
        cargo_version
    }
}

/// Get the Cargo package version (for internal use)
pub fn cargo_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
