use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::runtime::Runtime;

/// Directory holding the credential file when none is given explicitly.
#[tracing::instrument(skip(runtime))]
pub fn default_config_dir<R: Runtime>(runtime: &R) -> Result<PathBuf> {
    let base = runtime
        .config_dir()
        .context("Could not find a configuration directory; pass --config-dir")?;
    Ok(base.join("tripmate"))
}
