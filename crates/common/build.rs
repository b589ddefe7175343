//! Stamps build metadata into the crate as `rustc-env` variables read by
//! `version::build_info`.

use std::env;
use std::process::Command;

const BUILD_REF_ENV: &str = "TOKENSEAL_BUILD_REF";

/// Trimmed stdout of a successful command, if any
fn command_output(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn git_output(args: &[&str]) -> Option<String> {
    command_output("git", args)
}

fn set_env(key: &str, value: impl AsRef<str>) {
    println!("cargo:rustc-env={}={}", key, value.as_ref());
}

/// Explicit ref, then the nearest tag, then the short commit, then the
/// package version
fn repository_version() -> String {
    env::var(BUILD_REF_ENV)
        .ok()
        .filter(|v| !v.is_empty())
        .or_else(|| git_output(&["describe", "--always", "--dirty", "--long", "--tags"]))
        .or_else(|| git_output(&["rev-parse", "--short", "HEAD"]))
        .or_else(|| env::var("CARGO_PKG_VERSION").ok())
        .unwrap_or_else(|| "unknown".to_string())
}

fn enabled_features() -> String {
    let mut features: Vec<String> = env::vars()
        .filter_map(|(key, _)| key.strip_prefix("CARGO_FEATURE_").map(str::to_lowercase))
        .collect();
    if features.is_empty() {
        return "none".to_string();
    }
    features.sort();
    features.join(",")
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=../../.git/HEAD");
    println!("cargo:rerun-if-changed=../../.git/refs/heads");
    println!("cargo:rerun-if-env-changed={}", BUILD_REF_ENV);

    set_env(
        "BUILD_PROFILE",
        env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string()),
    );
    set_env("BUILD_FEATURES", enabled_features());
    set_env("REPO_VERSION", repository_version());
    set_env("BUILD_TIMESTAMP", chrono::Utc::now().to_rfc3339());
    set_env(
        "RUST_VERSION",
        command_output("rustc", &["--version"]).unwrap_or_else(|| "unknown".to_string()),
    );

    for (var, key) in [("TARGET", "BUILD_TARGET"), ("HOST", "BUILD_HOST")] {
        if let Ok(value) = env::var(var) {
            set_env(key, value);
        }
    }
}
