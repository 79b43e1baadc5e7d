//! Stamps `TALLY_BUILD_SHA` into the binary for `tally --version`.
//!
//! Order: an explicit `TALLY_BUILD_SHA` in the build environment, then
//! `git describe` of the workspace checkout, then `unknown` for source
//! archives without a `.git` directory.

use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

const SHA_VAR: &str = "TALLY_BUILD_SHA";

fn workspace_root() -> PathBuf {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    Path::new(&manifest_dir)
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(".."))
}

fn describe_head(root: &Path) -> Option<String> {
    let out = Command::new("git")
        .arg("-C")
        .arg(root)
        .args(["describe", "--always", "--dirty", "--abbrev=10"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let sha = String::from_utf8_lossy(&out.stdout).trim().to_string();
    (!sha.is_empty()).then_some(sha)
}

fn main() {
    let root = workspace_root();
    let git_dir = root.join(".git");

    println!("cargo:rerun-if-env-changed={SHA_VAR}");
    if git_dir.exists() {
        // HEAD moves on checkout, refs on commit
        println!("cargo:rerun-if-changed={}", git_dir.join("HEAD").display());
        println!("cargo:rerun-if-changed={}", git_dir.join("refs").display());
    } else {
        println!("cargo:rerun-if-changed=build.rs");
    }

    let sha = env::var(SHA_VAR)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .or_else(|| git_dir.exists().then(|| describe_head(&root)).flatten())
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env={SHA_VAR}={sha}");
}
