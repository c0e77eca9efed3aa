use serde_json::json;
use wax_bridge::decode_envelope;
use wax_common::Result;

use super::print_json;

pub fn run(url: &str) -> Result<()> {
    let envelope = decode_envelope(url)?;
    print_json(&json!({
        "action": envelope.action,
        "payload": envelope.payload,
    }))
}
