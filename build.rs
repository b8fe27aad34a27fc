//! Generates `build_info.rs` in `OUT_DIR` with the commit and build date
//! reported by `scenegen --version`.

use std::env;
use std::fs;
use std::path::PathBuf;
use std::process::Command;

const COMMIT_VAR: &str = "SCENEGEN_BUILD_COMMIT";
const DATE_VAR: &str = "SCENEGEN_BUILD_DATE";

fn git_short_hash() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short=7", "HEAD"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let hash = String::from_utf8(output.stdout).ok()?.trim().to_string();
    (!hash.is_empty()).then_some(hash)
}

fn main() {
    let commit = env::var(COMMIT_VAR)
        .ok()
        .or_else(git_short_hash)
        .unwrap_or_else(|| "unknown".to_string());
    let date = env::var(DATE_VAR)
        .unwrap_or_else(|_| chrono::Utc::now().format("%Y-%m-%d").to_string());

    let generated = format!(
        "pub const BUILD_COMMIT: &str = {commit:?};\npub const BUILD_DATE: &str = {date:?};\n"
    );
    let out = PathBuf::from(env::var_os("OUT_DIR").expect("cargo sets OUT_DIR"));
    fs::write(out.join("build_info.rs"), generated).expect("write build_info.rs");

    for var in [COMMIT_VAR, DATE_VAR] {
        println!("cargo:rerun-if-env-changed={var}");
    }
    println!("cargo:rerun-if-changed=.git/HEAD");
}
