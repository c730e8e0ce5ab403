//! Reclassify command implementation.

use crate::cli::ReclassifyArgs;
use crate::error::Result;
use crate::output::Formatter;
use astrolit_classifier::{CitationClassifier, Reclassifier};
use astrolit_domain::CompletionProvider;
use astrolit_store::SqliteStore;
use std::fmt::Display;

/// Execute the reclassify command.
pub fn execute_reclassify<P>(
    args: ReclassifyArgs,
    classifier: &CitationClassifier<P>,
    store: &mut SqliteStore,
    formatter: &Formatter,
) -> Result<()>
where
    P: CompletionProvider,
    P::Error: Display,
{
    if args.dry_run {
        eprintln!("{}", formatter.info("Dry run: no changes will be written"));
    }
    eprintln!(
        "{}",
        formatter.info(&format!(
            "Reclassifying with the {} classifier{}",
            classifier.mode(),
            classifier
                .model_name()
                .map(|m| format!(" ({})", m))
                .unwrap_or_default()
        ))
    );

    let report = Reclassifier::new(classifier)
        .dry_run(args.dry_run)
        .run(store)?;

    println!("{}", formatter.format_report(&report)?);
    Ok(())
}
