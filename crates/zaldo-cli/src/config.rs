use std::fs;
use std::path::Path;

use zaldo_core::policy::LedgerPolicy;

/// Load a policy override. `.json` files are read as JSON, anything else as
/// YAML.
pub fn load_policy(path: &str) -> Result<LedgerPolicy, Box<dyn std::error::Error>> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config '{}': {}", path, e))?;
    let is_json = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    let policy: LedgerPolicy = if is_json {
        serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse config '{}': {}", path, e))?
    } else {
        serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config '{}': {}", path, e))?
    };
    policy.validate()?;
    tracing::debug!(path, ?policy, "policy override loaded");
    Ok(policy)
}
