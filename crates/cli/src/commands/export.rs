//! Record export command.
//!
//! Writes the same JSON array the `/view` route returns, without going
//! through HTTP.

use std::io::Write;
use std::path::Path;

use fingerprint_collector::db::{FingerprintStore, PgFingerprintStore};
use fingerprint_core::FingerprintRecord;

use super::{CliError, connect};

/// Export every stored fingerprint, newest first.
///
/// # Errors
///
/// Returns `CliError` if the query fails or the output cannot be written.
pub async fn run(output: Option<&Path>) -> Result<(), CliError> {
    let store = PgFingerprintStore::new(connect().await?);
    let records = store.list_recent().await?;

    match output {
        Some(path) => {
            let mut file = std::fs::File::create(path)?;
            write_records(&mut file, &records)?;
            tracing::info!(count = records.len(), path = %path.display(), "Export complete");
        }
        None => {
            let stdout = std::io::stdout();
            write_records(&mut stdout.lock(), &records)?;
        }
    }

    Ok(())
}

/// Write records as a pretty-printed JSON array followed by a newline.
fn write_records<W: Write>(writer: &mut W, records: &[FingerprintRecord]) -> Result<(), CliError> {
    serde_json::to_writer_pretty(&mut *writer, records)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
