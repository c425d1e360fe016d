//! Legacy-format conversion: `.doc` → `.docx` with an external tool.
//!
//! [`LibreOfficeConverter`] runs a headless LibreOffice with a throwaway
//! user profile inside the output directory, so concurrent conversions do
//! not fight over the shared profile lock. Conversion succeeds only when the
//! process exits 0 **and** the expected `<stem>.docx` exists; LibreOffice
//! happily exits 0 without writing anything for inputs it cannot read.

use crate::error::Doc2MdError;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Converts a legacy document into its modern equivalent.
pub trait DocumentConverter: Send + Sync + fmt::Debug {
    /// Convert `input` into `out_dir` and return the path of the new file.
    ///
    /// The caller owns `out_dir` and removes it afterwards.
    fn convert(&self, input: &Path, out_dir: &Path) -> Result<PathBuf, Doc2MdError>;
}

/// Headless LibreOffice (`soffice`) conversion to `.docx`.
#[derive(Debug, Clone)]
pub struct LibreOfficeConverter {
    command: String,
}

impl LibreOfficeConverter {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl Default for LibreOfficeConverter {
    fn default() -> Self {
        Self::new("libreoffice")
    }
}

/// Where a converter is expected to leave the `.docx` for `input`.
pub fn expected_output(input: &Path, out_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    out_dir.join(format!("{stem}.docx"))
}

impl DocumentConverter for LibreOfficeConverter {
    fn convert(&self, input: &Path, out_dir: &Path) -> Result<PathBuf, Doc2MdError> {
        let failed = |detail: String| Doc2MdError::ConversionFailed {
            path: input.to_path_buf(),
            detail,
        };

        let profile = format!("-env:UserInstallation=file://{}", out_dir.join("profile").display());
        debug!("Converting {} with {}", input.display(), self.command);

        let output = Command::new(&self.command)
            .arg("--headless")
            .arg(profile)
            .args(["--convert-to", "docx", "--outdir"])
            .arg(out_dir)
            .arg(input)
            .output()
            .map_err(|e| failed(format!("failed to run '{}': {e}", self.command)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(failed(format!("{} ({})", output.status, stderr.trim())));
        }

        let converted = expected_output(input, out_dir);
        if !converted.is_file() {
            return Err(failed(format!(
                "converter exited successfully but produced no {}",
                converted.display()
            )));
        }
        Ok(converted)
    }
}
