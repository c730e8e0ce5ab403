//! Stats command implementation.

use crate::error::Result;
use crate::output::Formatter;
use astrolit_domain::CitationStore;
use astrolit_store::SqliteStore;

/// Execute the stats command.
pub fn execute_stats(store: &SqliteStore, formatter: &Formatter) -> Result<()> {
    let counts = store.counts()?;
    println!("{}", formatter.format_counts(&counts)?);
    Ok(())
}
