// src/simulation.rs
// The orchestrator: personas x repetitions x statements, retry loop included.

use std::fs;
use std::path::PathBuf;

use crate::client::{CompletionBackend, TEMP_SIMULATION};
use crate::errors::SimResult;
use crate::export;
use crate::integrity;
use crate::prompt::build_rating_messages;
use crate::survey::Persona;
use crate::validator::{evaluate_reply, RatingResult};

/// Attempts per statement before the last (possibly sentinel) result stands.
pub const MAX_ATTEMPTS: u32 = 10;

pub const RESULTS_HEADER: &str = "Statement|Rating|Rationale";

const PROGRESS_INTERVAL: usize = 10;

/// Process-wide tally of extreme ratings. Owned by the engine and only fed
/// the accepted final rating of each statement; discarded retry attempts
/// never count. Cumulative across every run of one invocation.
#[derive(Debug, Default, Clone, Copy)]
pub struct RunCounters {
    pub minus_100: u64,
    pub plus_100: u64,
}

impl RunCounters {
    fn record(&mut self, rating: i64) {
        if rating == -100 {
            self.minus_100 += 1;
        }
        if rating == 100 {
            self.plus_100 += 1;
        }
    }
}

/// Output locations for one experiment.
pub struct RunPaths {
    pub archive_dir: PathBuf,
    pub raw_export_dir: PathBuf,
}

impl RunPaths {
    pub fn for_experiment(experiment_id: &str) -> Self {
        Self {
            archive_dir: PathBuf::from(format!("txt_files/E{experiment_id}")),
            raw_export_dir: PathBuf::from(format!(
                "data/E{experiment_id}_simulated_responses_raw"
            )),
        }
    }
}

pub struct SimulationEngine<'a> {
    backend: &'a dyn CompletionBackend,
    counters: RunCounters,
}

impl<'a> SimulationEngine<'a> {
    pub fn new(backend: &'a dyn CompletionBackend) -> Self {
        Self {
            backend,
            counters: RunCounters::default(),
        }
    }

    pub fn counters(&self) -> RunCounters {
        self.counters
    }

    /// Queries the backend until one well-formed reply arrives, up to
    /// MAX_ATTEMPTS. Transport errors count as unsuccessful attempts and are
    /// retried like malformed replies. On exhaustion the last attempt's
    /// result stands, sentinel values and all, so the output sequence never
    /// has a gap.
    pub fn rate_with_retries(&self, persona: &Persona, statement: &str) -> RatingResult {
        let messages = build_rating_messages(statement, persona);
        let mut last = RatingResult::sentinel(statement);

        for attempt in 1..=MAX_ATTEMPTS {
            match self.backend.complete(&messages, TEMP_SIMULATION) {
                Ok(completion) => {
                    let (result, success) = evaluate_reply(statement, &completion.content);
                    if success {
                        return result;
                    }
                    log::error!("Malformed reply on attempt {attempt} for statement: {statement}");
                    last = result;
                }
                Err(e) => {
                    log::error!(
                        "Completion failed on attempt {attempt} for statement '{statement}': {e}"
                    );
                    last = RatingResult::sentinel(statement);
                }
            }
        }

        log::error!("Retries exhausted after {MAX_ATTEMPTS} attempts for statement: {statement}");
        last
    }

    /// One full pass over the statement list for one persona repetition.
    /// Results come back in statement order, one entry each.
    fn run_single(&mut self, persona: &Persona, statements: &[String]) -> Vec<RatingResult> {
        let mut results = Vec::with_capacity(statements.len());
        for (idx, statement) in statements.iter().enumerate() {
            if (idx + 1) % PROGRESS_INTERVAL == 0 {
                log::info!("{} statements rated", idx + 1);
            }
            let result = self.rate_with_retries(persona, statement);
            self.counters.record(result.rating);
            results.push(result);
        }
        results
    }

    /// Runs every persona for `num_simulations` repetitions. Each finished
    /// run is audited, archived as pipe-delimited text, and converted to a
    /// raw spreadsheet. Filesystem trouble with one run is logged and
    /// skipped; it never takes down the whole experiment.
    pub fn run(
        &mut self,
        experiment_id: &str,
        num_simulations: u32,
        personas: &[Persona],
        statements: &[String],
        paths: &RunPaths,
    ) -> SimResult<()> {
        fs::create_dir_all(&paths.archive_dir)?;
        fs::create_dir_all(&paths.raw_export_dir)?;

        let mut simulation_count = 1u32;

        for persona in personas {
            for sim in 1..=num_simulations {
                let label = format!("{} S{}", persona.name, sim);
                println!("{label}   Total Simulations Count: {simulation_count}");
                log::info!("{label}   Total Simulations Count: {simulation_count}");
                simulation_count += 1;

                let results = self.run_single(persona, statements);
                let serialized = serialize_run(&results);

                let issues = integrity::scan_serialized(&serialized);
                if issues.is_empty() {
                    log::info!("No issues found.");
                } else {
                    log::error!("Found {} issues:", issues.len());
                    for issue in &issues {
                        log::error!(
                            "Line {}: {} -> {}",
                            issue.line_number,
                            issue.description,
                            issue.line
                        );
                    }
                }

                let file_stem = label.replace(' ', "_");
                let archive_path = paths.archive_dir.join(format!("{file_stem}.txt"));
                match fs::write(&archive_path, &serialized) {
                    Ok(()) => {
                        log::info!("Archived run to {}", archive_path.display());
                        let xlsx_path = paths
                            .raw_export_dir
                            .join(format!("E{experiment_id}_{file_stem}.xlsx"));
                        if let Err(e) = export::archive_to_workbook(&archive_path, &xlsx_path) {
                            log::error!("Could not export {}: {}", xlsx_path.display(), e);
                        }
                    }
                    Err(e) => {
                        log::error!("Could not archive {}: {}", archive_path.display(), e);
                    }
                }

                log::info!("Cumulative number of -100 Ratings:  {}", self.counters.minus_100);
                log::info!("Cumulative number of +100 Ratings:  {}", self.counters.plus_100);
            }
        }

        Ok(())
    }
}

/// Header row plus one pipe-delimited row per result, no trailing newline.
pub fn serialize_run(results: &[RatingResult]) -> String {
    let mut out = String::from(RESULTS_HEADER);
    for result in results {
        out.push('\n');
        out.push_str(&result.to_line());
    }
    out
}
