//! @ai:module:intent Render the evaluator's opaque result as indented JSON
//! @ai:module:layer infrastructure
//! @ai:module:public_api render_result, write_result
//! @ai:module:stateless true

use anyhow::{Context, Result};
use serde_json::Value;
use std::io::Write;

/// @ai:intent Serialize the result with 2-space indentation
/// @ai:effects pure
pub fn render_result(result: &Value) -> Result<String> {
    serde_json::to_string_pretty(result).context("Failed to serialize evaluation result")
}

/// @ai:intent Write the rendered result followed by a newline
/// @ai:effects io
pub fn write_result<W: Write>(writer: &mut W, result: &Value) -> Result<()> {
    let rendered = render_result(result)?;
    writeln!(writer, "{rendered}")?;
    writer.flush()?;
    Ok(())
}
