use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use super::DocumentFormat;

/// Where an emitted document or report goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputDestination {
    Stdout,
    File(PathBuf),
}

impl OutputDestination {
    pub fn file(path: impl AsRef<Path>) -> Self {
        OutputDestination::File(path.as_ref().to_path_buf())
    }
}

#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format: DocumentFormat,
    pub pretty: bool,
    pub destinations: Vec<OutputDestination>,
}

impl OutputOptions {
    /// Pretty output to stdout in `format`.
    pub fn new(format: DocumentFormat) -> Self {
        Self {
            format,
            pretty: true,
            destinations: vec![OutputDestination::Stdout],
        }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_destinations(mut self, destinations: Vec<OutputDestination>) -> Self {
        self.destinations = destinations;
        self
    }
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self::new(DocumentFormat::Json)
    }
}

/// Render `value` once and write it, newline-terminated, to every destination.
pub fn emit<T: Serialize + ?Sized>(value: &T, options: &OutputOptions) -> Result<()> {
    if options.destinations.is_empty() {
        return Ok(());
    }
    let mut payload = render(value, options)?;
    payload.push('\n');
    for destination in &options.destinations {
        match destination {
            OutputDestination::Stdout => {
                let mut stdout = io::stdout().lock();
                stdout
                    .write_all(payload.as_bytes())
                    .and_then(|()| stdout.flush())
                    .context("failed to write to stdout")?;
            }
            OutputDestination::File(path) => fs::write(path, &payload)
                .with_context(|| format!("failed to write {}", path.display()))?,
        }
    }
    Ok(())
}

fn render<T: Serialize + ?Sized>(value: &T, options: &OutputOptions) -> Result<String> {
    let rendered = match (options.format, options.pretty) {
        (DocumentFormat::Json, true) => serde_json::to_string_pretty(value)?,
        (DocumentFormat::Json, false) => serde_json::to_string(value)?,
        #[cfg(feature = "yaml")]
        (DocumentFormat::Yaml, _) => serde_yaml::to_string(value)?,
        #[cfg(feature = "toml")]
        (DocumentFormat::Toml, true) => toml::to_string_pretty(value)?,
        #[cfg(feature = "toml")]
        (DocumentFormat::Toml, false) => toml::to_string(value)?,
    };
    Ok(rendered)
}
