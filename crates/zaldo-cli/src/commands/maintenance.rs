use clap::Args;
use serde_json::Value;

use zaldo_core::maintenance::operations::{self, MaintenanceInput};

use super::{override_field, require_document};

/// Arguments for a maintenance batch
#[derive(Args)]
pub struct MaintenanceArgs {
    /// Path to JSON input file: { book, operations, actor, dedupe? }
    #[arg(long)]
    pub input: Option<String>,

    /// Who is making the change (overrides actor in the input)
    #[arg(long)]
    pub actor: Option<String>,

    /// Also delete redundant copies of double-submitted payments
    #[arg(long)]
    pub dedupe: bool,
}

pub fn run_maintenance(args: MaintenanceArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut doc = require_document(args.input.as_deref(), "maintenance")?;
    override_field(&mut doc, "actor", args.actor.map(Value::String));
    if args.dedupe {
        override_field(&mut doc, "dedupe", Some(Value::Bool(true)));
    }
    let maintenance_input: MaintenanceInput = serde_json::from_value(doc)?;
    let result = operations::run_maintenance(&maintenance_input)?;
    Ok(serde_json::to_value(result)?)
}
