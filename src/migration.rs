use crate::audit;
use crate::classification::{self, BootstrapOutcome};
use crate::config::RunConfig;
use crate::error::Result;
use crate::legacy;
use crate::occupations::{self, OccupationImportSummary};
use crate::oid::OidTranslator;
use crate::spaces::{self, SpaceImportSummary};
use rusqlite::Connection;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub classifications: BootstrapOutcome,
    pub spaces: SpaceImportSummary,
    pub occupations: Option<OccupationImportSummary>,
}

/// Runs the whole cutover pipeline against `conn`.
pub fn run(conn: &mut Connection, cfg: &RunConfig) -> Result<RunSummary> {
    audit::log_input_digests(&cfg.input_files())?;

    let tx = conn.transaction()?;
    let classifications = classification::ensure_classifications(&tx, &cfg.classifications)?;
    tx.commit()?;
    classification::log_tree(conn)?;

    let translator = OidTranslator::from_catalog(conn)?;
    info!("space class id {}", translator.space_cid());

    let records = legacy::read_spaces(&cfg.spaces_file)?;
    info!("read {} space records from {}", records.len(), cfg.spaces_file.display());
    let spaces = spaces::import_spaces(conn, &translator, &records, cfg.chunk_size)?;
    info!(
        "spaces updated {}, skipped {}, informations {}",
        spaces.updated, spaces.skipped_missing, spaces.informations
    );

    let occupations = if cfg.with_occupations {
        let records = legacy::read_occupations(&cfg.occupations_file)?;
        info!(
            "read {} occupation records from {}",
            records.len(),
            cfg.occupations_file.display()
        );
        let summary = occupations::import_occupations(conn, &translator, &records, cfg.chunk_size)?;
        info!(
            "occupations created {}, space links {}",
            summary.created, summary.space_links
        );
        Some(summary)
    } else {
        info!("occupation import disabled");
        None
    };

    Ok(RunSummary {
        classifications,
        spaces,
        occupations,
    })
}
