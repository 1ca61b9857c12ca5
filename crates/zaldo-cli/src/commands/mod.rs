pub mod collections;
pub mod documents;
pub mod ledger;
pub mod maintenance;

use serde::de::DeserializeOwned;
use serde_json::Value;

use zaldo_core::policy::LedgerPolicy;

use crate::input;

/// Settings shared by every subcommand.
pub struct Context {
    /// Replaces the `policy` of each input document when set
    pub policy: Option<LedgerPolicy>,
}

/// Read the input document from `--input` or piped stdin.
pub fn read_document(path: Option<&str>) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    match path {
        Some(p) => Ok(Some(input::file::read_json_value(p)?)),
        None => input::stdin::read_stdin(),
    }
}

/// Apply the policy override to a raw input document and deserialise it.
pub fn from_document<T: DeserializeOwned>(
    mut doc: Value,
    ctx: &Context,
) -> Result<T, Box<dyn std::error::Error>> {
    if let (Some(policy), Value::Object(map)) = (&ctx.policy, &mut doc) {
        map.insert("policy".into(), serde_json::to_value(policy)?);
    }
    Ok(serde_json::from_value(doc)?)
}

/// Read a document that must be present.
pub fn require_document(path: Option<&str>, what: &str) -> Result<Value, Box<dyn std::error::Error>> {
    read_document(path)?
        .ok_or_else(|| format!("--input <file.json> or stdin required for {}", what).into())
}

/// Set a top-level field of the input document from a command-line flag.
pub fn override_field(doc: &mut Value, key: &str, value: Option<Value>) {
    if let (Some(v), Value::Object(map)) = (value, doc) {
        map.insert(key.to_string(), v);
    }
}
