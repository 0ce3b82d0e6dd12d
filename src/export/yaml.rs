//! YAML Export functionality
//!
//! Same content as the JSON export, in a form that is easier to read and
//! hand-edit.

use std::io::Write;

use crate::error::{BilltrackError, BilltrackResult};
use crate::export::json::FullExport;
use crate::storage::Storage;

/// Export the full database to YAML format
pub fn export_full_yaml<W: Write>(storage: &Storage, writer: &mut W) -> BilltrackResult<()> {
    let export = FullExport::from_storage(storage)?;

    let header = format!(
        "# billtrack export\n# Generated: {}\n# App Version: {}\n\n",
        export.exported_at, export.app_version
    );
    writer
        .write_all(header.as_bytes())
        .map_err(|e| BilltrackError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, &export).map_err(|e| BilltrackError::Export(e.to_string()))
}

/// Parse and validate a YAML export
///
/// Comment lines are ignored by the YAML parser, so an export can be fed
/// back unchanged.
pub fn import_from_yaml(yaml_str: &str) -> BilltrackResult<FullExport> {
    let export: FullExport =
        serde_yaml::from_str(yaml_str).map_err(|e| BilltrackError::Import(e.to_string()))?;

    export.validate().map_err(BilltrackError::Import)?;

    Ok(export)
}
