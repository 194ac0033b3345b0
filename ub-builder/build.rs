//! Build script for ub-builder
//!
//! Stamps the binary with a build identifier (`<git hash> <profile> <date>`)
//! so decks can be traced back to the builder that produced them.

use std::process::Command;

fn main() {
    let git_hash = Command::new("git")
        .args(["rev-parse", "--short=8", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());
    let date = chrono::Local::now().format("%Y-%m-%d");

    println!("cargo:rustc-env=UB_BUILD_ID={} {} {}", git_hash, profile, date);
    println!("cargo:rerun-if-changed=../.git/HEAD");
}
