//! Doctor command implementation.

use crate::cli::preflight;
use crate::cli::Output;
use crate::config::{FileTemplate, Settings, TemplateSource};
use anyhow::Result;

/// Run the doctor command: report the state of every external requirement.
pub fn run_doctor(settings: &Settings) -> Result<()> {
    Output::header("System");

    match preflight::tool_version("yt-dlp") {
        Some(version) => Output::kv("yt-dlp", &version),
        None => Output::error("yt-dlp not found. Install it and ensure it's in your PATH."),
    }

    Output::header("Configuration");
    Output::kv(
        "config file",
        &Settings::default_config_path().display().to_string(),
    );
    Output::kv("data dir", &settings.data_dir().display().to_string());
    Output::kv("chat api", &settings.chat.base_url);

    Output::header("Credentials");
    let credential_path = settings.credential_path();
    match preflight::check_credential(settings) {
        Ok(()) => Output::kv("session token", &credential_path.display().to_string()),
        Err(e) => Output::error(&format!("{}", e)),
    }

    Output::header("Prompt template");
    match settings.template_path() {
        Some(path) => match FileTemplate::new(Some(path.clone())).load() {
            Ok(_) => Output::kv("template", &path.display().to_string()),
            Err(e) => Output::error(&format!("{}", e)),
        },
        None => Output::kv("template", "bundled default"),
    }

    println!();
    Output::success("Doctor check complete.");
    Ok(())
}
