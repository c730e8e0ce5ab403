//! Hypothesis command implementation.

use crate::cli::{HypothesisAction, HypothesisArgs};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use astrolit_domain::{
    CitationStore, Hypothesis, HypothesisId, HypothesisQuery, HypothesisStatus, HypothesisUpdate,
    NewHypothesis,
};
use astrolit_store::SqliteStore;

/// Execute the hypothesis command.
pub fn execute_hypothesis(
    args: HypothesisArgs,
    store: &mut SqliteStore,
    formatter: &Formatter,
) -> Result<()> {
    match args.action {
        HypothesisAction::Add {
            name,
            description,
            origin,
            status,
        } => {
            let mut new = NewHypothesis::new(name)?;
            if let Some(description) = description {
                new = new.with_description(description);
            }
            if let Some(origin) = origin {
                new = new.with_originating_bibcode(origin);
            }
            if let Some(status) = status {
                new = new.with_status(status.parse::<HypothesisStatus>()?);
            }

            let id = store.add_hypothesis(&new)?;
            println!("{}", formatter.success(&format!("Recorded hypothesis {}", id)));
        }
        HypothesisAction::List { status } => {
            let query = HypothesisQuery {
                status: status.map(|s| s.parse::<HypothesisStatus>()).transpose()?,
            };
            let hypotheses = store.query_hypotheses(&query)?;
            println!("{}", formatter.format_hypotheses(&hypotheses)?);
        }
        HypothesisAction::Update {
            id,
            status,
            superseded_by,
        } => {
            let update = HypothesisUpdate {
                status: status.map(|s| s.parse::<HypothesisStatus>()).transpose()?,
                superseded_by,
                ..HypothesisUpdate::default()
            };
            let updated = update_hypothesis(store, HypothesisId(id), &update)?;
            println!("{}", formatter.format_hypotheses(&[updated])?);
        }
        HypothesisAction::RuledOut { id, bibcode, reason } => {
            let update = HypothesisUpdate::ruled_out(bibcode, reason);
            let updated = update_hypothesis(store, HypothesisId(id), &update)?;
            println!(
                "{}",
                formatter.success(&format!("Hypothesis {} marked {}", updated.id, updated.status))
            );
        }
    }
    Ok(())
}

/// Apply an update, rejecting empty updates and unknown ids.
pub fn update_hypothesis(
    store: &mut SqliteStore,
    id: HypothesisId,
    update: &HypothesisUpdate,
) -> Result<Hypothesis> {
    if update.is_empty() {
        return Err(CliError::InvalidInput("Nothing to update".to_string()));
    }
    if store.get_hypothesis(id)?.is_none() {
        return Err(CliError::NotFound(format!("hypothesis {}", id)));
    }
    Ok(store.update_hypothesis(id, update)?)
}
