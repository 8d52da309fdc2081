use std::io::Write;

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;

use crate::admin::*;

/// Writes to the given file, or to the standard output when no file or
/// `stdout` is given.
pub fn write_output(text: &str, out: &Option<String>) -> AdminResult<()> {
    match out.as_deref() {
        None | Some("") | Some("stdout") => {
            let mut stdout = std::io::stdout();
            stdout
                .write_all(text.as_bytes())
                .context(WritingFileSnafu { path: "stdout" })?;
            stdout.flush().context(WritingFileSnafu { path: "stdout" })
        }
        Some(path) => {
            info!("Writing {} bytes to {:?}", text.len(), path);
            fs::write(path, text).context(WritingFileSnafu { path })
        }
    }
}

pub fn table_to_json(table: &Table) -> JSValue {
    let rows: Vec<JSValue> = table
        .rows
        .iter()
        .map(|r| {
            let mut obj: JSMap<String, JSValue> = JSMap::new();
            for (name, value) in r.iter() {
                obj.insert(name.to_string(), json!(value));
            }
            JSValue::Object(obj)
        })
        .collect();
    json!({ "columns": table.columns, "rows": rows })
}
