//! Firmware definition commands

use anyhow::{Context, Result};
use fwpkg_core::FirmwareSpec;
use fwpkg_core::validate::validate_model;
use std::path::Path;

use crate::ui::Output;

/// Create a new firmware definition template
pub fn new(model: &str, output_dir: &Path, output: &Output) -> Result<()> {
    // The model doubles as the file name, so hold it to the same rules.
    validate_model(model).context("Invalid model")?;

    let path = output_dir.join(format!("{model}.toml"));
    if path.exists() {
        anyhow::bail!("Firmware definition already exists: {}", path.display());
    }

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;
    std::fs::write(&path, FirmwareSpec::template(model))
        .with_context(|| format!("Failed to write {}", path.display()))?;

    output.success(&format!("Created firmware definition: {}", path.display()));
    output.info(&format!(
        "Edit it and run 'fwpkg check {}' to validate.",
        path.display()
    ));

    Ok(())
}

/// Validate a firmware definition
pub fn check(path: &Path, output: &Output) -> Result<()> {
    let spec = FirmwareSpec::from_file(path)
        .with_context(|| format!("Failed to load {}", path.display()))?;
    let spec = spec.validate().context("Firmware definition is invalid")?;

    output.success("Firmware definition is valid");
    output.field("Name:", &spec.display_name);
    output.field("Model:", &spec.model);
    output.field("Type:", spec.kind);
    output.field("Boards:", spec.boards.join(", "));
    output.field("Enforce model:", spec.enforce_model);
    output.field("Encryption:", spec.encryption);
    if let Some(params) = spec.params() {
        output.field("Params:", format!("{} bytes", params.len()));
    }
    if spec.display_name.is_empty() {
        output.warning("No display name set");
    }

    Ok(())
}
