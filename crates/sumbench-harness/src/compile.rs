//! Compilation step: build every registered variant before measuring anything.

use std::path::Path;
use std::process::{Command, Stdio};

use tracing::info;

use crate::config::Variant;
use crate::error::{HarnessError, HarnessResult};

/// Full compiler argument list: `<flags...> <source> -o <binary>`.
pub fn compiler_args(variant: &Variant) -> Vec<String> {
    let mut args = variant.flags.clone();
    args.push(variant.source.display().to_string());
    args.push("-o".into());
    args.push(variant.binary.display().to_string());
    args
}

/// Compile one variant, blocking until the compiler exits.
///
/// The binary's parent directory is created if missing; an existing binary
/// is overwritten.
pub fn compile_variant(variant: &Variant) -> HarnessResult<()> {
    if let Some(parent) = variant.binary.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            HarnessError::Io(format!("Failed to create {}: {}", parent.display(), e))
        })?;
    }

    let args = compiler_args(variant);
    info!("Compiling {}: {} {}", variant.label, variant.compiler, args.join(" "));

    let output = Command::new(&variant.compiler)
        .args(&args)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| HarnessError::Compilation {
            label: variant.label.clone(),
            status: format!("could not run {}", variant.compiler),
            stderr: e.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        let diagnostics = if stderr.trim().is_empty() {
            stdout.trim().to_string()
        } else {
            stderr.trim().to_string()
        };
        return Err(HarnessError::Compilation {
            label: variant.label.clone(),
            status: output.status.to_string(),
            stderr: diagnostics,
        });
    }

    Ok(())
}

/// Compile all variants in registry order; the first failure stops the run.
pub fn compile_all(variants: &[Variant]) -> HarnessResult<()> {
    for variant in variants {
        compile_variant(variant)?;
    }
    info!("Compiled {} variant(s)", variants.len());
    Ok(())
}

/// Check that every variant's binary exists, for runs that skip compilation.
pub fn ensure_binaries(variants: &[Variant]) -> HarnessResult<()> {
    for variant in variants {
        if !Path::new(&variant.binary).is_file() {
            return Err(HarnessError::Config(format!(
                "binary for '{}' not found at {} (compile first)",
                variant.label,
                variant.binary.display()
            )));
        }
    }
    Ok(())
}
