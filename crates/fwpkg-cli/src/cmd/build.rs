//! `fwpkg build`

use anyhow::{Context, Result};
use fwpkg_core::{FirmwareSpec, Tea, TeaKey, Transform, Unkeyed};
use std::fs;

use crate::BuildArgs;
use crate::ui::Output;

/// Read the image, build the package and write it to `--output`.
pub fn build(args: &BuildArgs, output: &Output) -> Result<()> {
    if args.output.exists() && !args.force {
        anyhow::bail!(
            "Output already exists: {} (use --force to overwrite)",
            args.output.display()
        );
    }

    let spec = resolve_spec(args)?;
    let data = fs::read(&args.firmware)
        .with_context(|| format!("Failed to read firmware {}", args.firmware.display()))?;
    tracing::debug!(
        "Read {} bytes from {}",
        data.len(),
        args.firmware.display()
    );

    let transform: Box<dyn Transform> = match args.key.as_deref() {
        Some(hex) => Box::new(Tea::new(
            TeaKey::from_hex(hex).context("Invalid encryption key")?,
        )),
        None => Box::new(Unkeyed),
    };

    let package = fwpkg_core::build(&data, &spec, transform.as_ref())
        .context("Failed to build package")?;

    fs::write(&args.output, &package.archive)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    let firmware = &package.manifest.firmware;
    output.success(&format!(
        "Built {} ({} bytes)",
        args.output.display(),
        package.archive.len()
    ));
    output.field("Model:", &firmware.model);
    output.field("Type:", firmware.kind);
    output.field("Encryption:", firmware.encryption);
    if let Some(md5) = &firmware.md5.bin {
        output.field("md5 bin:", md5);
    }
    if let Some(md5) = &firmware.md5.enc {
        output.field("md5 enc:", md5);
    }

    Ok(())
}

/// Load `--spec` (if any) and apply the flag overrides on top.
pub fn resolve_spec(args: &BuildArgs) -> Result<FirmwareSpec> {
    let mut spec = match &args.spec {
        Some(path) => FirmwareSpec::from_file(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => FirmwareSpec::default(),
    };

    if let Some(name) = &args.name {
        spec.display_name.clone_from(name);
    }
    if let Some(model) = &args.model {
        spec.model.clone_from(model);
    }
    if let Some(type_flag) = &args.type_flag {
        spec.type_flag.clone_from(type_flag);
    }
    if !args.boards.is_empty() {
        spec.boards = args
            .boards
            .iter()
            .map(|b| b.trim().to_string())
            .filter(|b| !b.is_empty())
            .collect();
    }
    if let Some(enforce) = args.enforce_model {
        spec.enforce_model = enforce;
    }
    if let Some(encryption) = &args.encryption {
        spec.encryption.clone_from(encryption);
    }
    if let Some(version) = args.schema_version {
        spec.schema_version = version;
    }
    if let Some(params) = &args.params {
        spec.params = Some(params.clone());
    } else if let Some(path) = &args.params_file {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read params {}", path.display()))?;
        spec.params = Some(text);
    }

    Ok(spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Cli, Commands};
    use clap::Parser;

    fn parse(args: &[&str]) -> BuildArgs {
        let cli = Cli::try_parse_from(
            ["fwpkg", "build", "fw.bin", "-o", "out.zip"]
                .iter()
                .chain(args),
        )
        .unwrap();
        match cli.command {
            Commands::Build(args) => args,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_flags_only() {
        let spec = resolve_spec(&parse(&[
            "--model",
            "max",
            "--type",
            "BMS",
            "--board",
            "b1, b2",
            "--board",
            "b3",
            "--encryption",
            "both",
            "--enforce-model",
        ]))
        .unwrap();

        assert_eq!(spec.model, "max");
        assert_eq!(spec.type_flag, "BMS");
        assert_eq!(spec.boards, vec!["b1", "b2", "b3"]);
        assert_eq!(spec.encryption, "both");
        assert!(spec.enforce_model);
        assert_eq!(spec.schema_version, 1);
        assert!(spec.params.is_none());
    }

    #[test]
    fn test_flags_override_definition() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("max.toml");
        fs::write(
            &path,
            r#"
display_name = "Stock"
model = "max"
boards = ["b1"]
type = "DRV"
enforce_model = true
encryption = "plain"
params = "a=1"
"#,
        )
        .unwrap();

        let spec = resolve_spec(&parse(&[
            "--spec",
            path.to_str().unwrap(),
            "--enforce-model",
            "false",
            "--encryption",
            "encrypted",
            "--params",
            "b=2",
        ]))
        .unwrap();

        assert_eq!(spec.display_name, "Stock");
        assert_eq!(spec.boards, vec!["b1"]);
        assert!(!spec.enforce_model);
        assert_eq!(spec.encryption, "encrypted");
        assert_eq!(spec.params.as_deref(), Some("b=2"));
    }

    #[test]
    fn test_params_conflict() {
        let result = Cli::try_parse_from([
            "fwpkg",
            "build",
            "fw.bin",
            "-o",
            "out.zip",
            "--params",
            "a",
            "--params-file",
            "p.txt",
        ]);
        assert!(result.is_err());
    }
}
