use std::fs;
use std::path::Path;

use super::{Result, ViewReport, ViewSpec};

fn yaml_extension(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml")
    )
}

/// Reads a view spec, YAML or JSON by file extension.
pub fn load_spec(path: impl AsRef<Path>) -> Result<ViewSpec> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)?;
    let spec = if yaml_extension(path) {
        serde_yaml::from_str::<ViewSpec>(&raw)?
    } else {
        serde_json::from_str::<ViewSpec>(&raw)?
    };
    spec.validate()?;
    Ok(spec)
}

/// Writes a run report, YAML or JSON by file extension.
pub fn save_report(path: impl AsRef<Path>, report: &ViewReport) -> Result<()> {
    let path = path.as_ref();
    let serialized = if yaml_extension(path) {
        serde_yaml::to_string(report)?
    } else {
        serde_json::to_string_pretty(report)?
    };
    fs::write(path, serialized)?;
    Ok(())
}
