use std::{fs, path::Path};

use crate::{PrepaidError, Result, config::Config};

/// Creates a default configuration file if it doesn't exist
pub fn create_default_config_file(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| PrepaidError::io(e, parent))?;
    }

    let defaults =
        toml::to_string_pretty(&Config::default()).map_err(|e| PrepaidError::ConfigValidation {
            component: "default config".to_string(),
            details: e.to_string(),
        })?;

    let content = format!("# prepaid-manager configuration file\n\n{defaults}");
    fs::write(path, content).map_err(|e| PrepaidError::io(e, path))?;

    Ok(())
}
