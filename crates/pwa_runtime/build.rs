use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Profile {
    reminder_cooldown_ms: u64,
    reminder_delay_ms: u64,
    reminder_min_visits: u32,
    install_prompt_cooldown_ms: u64,
    update_poll_interval_ms: u64,
    install_recheck_interval_ms: u64,
    auto_prompt_delay_ms: u64,
    fab_reveal_delay_ms: u64,
    debug_log_delay_ms: u64,
    toast_duration_ms: u64,
    simulated_install_choice: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    schema_version: u32,
    production: Profile,
    development: Profile,
}

fn validate(name: &str, profile: &Profile) {
    if profile.reminder_min_visits == 0 {
        panic!("pwa.config.toml [{name}]: reminder_min_visits must be at least 1");
    }
    if profile.update_poll_interval_ms == 0 || profile.install_recheck_interval_ms == 0 {
        panic!("pwa.config.toml [{name}]: polling intervals must be non-zero");
    }
    if !matches!(
        profile.simulated_install_choice.as_str(),
        "accepted" | "dismissed"
    ) {
        panic!(
            "pwa.config.toml [{name}]: simulated_install_choice must be `accepted` or `dismissed`, found `{}`",
            profile.simulated_install_choice
        );
    }
}

fn main() {
    let crate_root = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").expect("manifest dir"));
    let path = crate_root.join("pwa.config.toml");
    println!("cargo:rerun-if-changed={}", path.display());

    let raw = fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("failed to read {}: {err}", path.display()));
    let config: ConfigFile = toml::from_str(&raw)
        .unwrap_or_else(|err| panic!("failed to parse {}: {err}", path.display()));
    if config.schema_version != 1 {
        panic!(
            "config schema mismatch in {}: expected 1 found {}",
            path.display(),
            config.schema_version
        );
    }
    validate("production", &config.production);
    validate("development", &config.development);

    let json = serde_json::to_string_pretty(&config).expect("serialize pwa config");
    let generated = format!(
        "/// Build-time generated PWA timing profiles JSON.\n\
pub const PWA_CONFIG_JSON: &str = r##\"{}\"##;\n",
        json
    );

    let out_dir = PathBuf::from(std::env::var("OUT_DIR").expect("OUT_DIR"));
    let out_file = out_dir.join("pwa_config_generated.rs");
    fs::write(&out_file, generated)
        .unwrap_or_else(|err| panic!("failed to write {}: {err}", out_file.display()));
}
