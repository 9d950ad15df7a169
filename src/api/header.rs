//! Makes sure a sheet starts with its header row before records are appended to it.

use crate::api::{Range, Sheet};
use crate::Result;
use tracing::debug;

/// What was found in the first row of a sheet.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum HeaderState {
    /// The first row is empty, or the sheet could not be read.
    Missing,
    /// The first row has at least one cell. Its contents are not compared to the expected header.
    Present,
}

/// Reads the first `width` cells of the first row of `sheet_name`. A failed read counts as
/// `Missing` so that a sheet that does not exist yet is treated like an empty one.
pub async fn header_state(sheet: &dyn Sheet, sheet_name: &str, width: usize) -> HeaderState {
    match sheet.read(&Range::header_row(sheet_name, width)).await {
        Ok(grid) if grid.iter().any(|row| !row.is_empty()) => HeaderState::Present,
        Ok(_) => HeaderState::Missing,
        Err(e) => {
            debug!("Unable to read the header row of {sheet_name}, treating it as missing: {e}");
            HeaderState::Missing
        }
    }
}

/// Appends `header` to `sheet_name` when its first row is missing and returns what was observed
/// before writing.
///
/// This is a read followed by a write with nothing in between to stop another writer. Two
/// concurrent first writes to the same empty sheet can both see `Missing` and append the header
/// twice.
pub async fn ensure_header(
    sheet: &dyn Sheet,
    sheet_name: &str,
    header: &[String],
) -> Result<HeaderState> {
    let state = header_state(sheet, sheet_name, header.len()).await;
    if state == HeaderState::Missing {
        debug!("Writing the header row of {sheet_name}");
        sheet
            .append(&Range::sheet(sheet_name), &[header.to_vec()])
            .await?;
    }
    Ok(state)
}
