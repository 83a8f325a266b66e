//! Subgrade modulus sweep
//!
//! Each modulus gets its own model, built and solved independently. A failed
//! or timed-out modulus becomes an error row; the other rows are kept.

use std::fmt;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::beam::BeamProperties;
use crate::builder::{build_and_solve, SpringReactions};
use crate::error::{GradeBeamError, GradeBeamResult};
use crate::loads::LoadSet;

/// How a sweep is executed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SweepOptions {
    /// Solve every modulus on the rayon thread pool
    pub parallel: bool,
    /// Upper bound on the whole sweep; unfinished moduli are reported as failures
    ///
    /// No solve starts after the deadline. A solve already running is not
    /// interrupted, so callers bound its size (see `request::MAX_SPRINGS`).
    pub timeout: Option<Duration>,
}

impl SweepOptions {
    pub fn sequential() -> Self {
        Self::default()
    }

    pub fn parallel() -> Self {
        Self {
            parallel: true,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Outcome of one modulus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowOutcome {
    Solved(SpringReactions),
    Failed(GradeBeamError),
}

/// One row of the reaction table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepRow {
    pub subgrade_modulus: f64,
    #[serde(flatten)]
    pub outcome: RowOutcome,
}

impl SweepRow {
    fn new(subgrade_modulus: f64, result: GradeBeamResult<SpringReactions>) -> Self {
        let outcome = match result {
            Ok(reactions) => RowOutcome::Solved(reactions),
            Err(err) => RowOutcome::Failed(err),
        };
        Self {
            subgrade_modulus,
            outcome,
        }
    }

    pub fn reactions(&self) -> Option<&SpringReactions> {
        match &self.outcome {
            RowOutcome::Solved(reactions) => Some(reactions),
            RowOutcome::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&GradeBeamError> {
        match &self.outcome {
            RowOutcome::Solved(_) => None,
            RowOutcome::Failed(err) => Some(err),
        }
    }
}

/// Spring reactions keyed by subgrade modulus, one row per input modulus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionTable {
    pub n_springs: usize,
    pub rows: Vec<SweepRow>,
}

impl ReactionTable {
    pub fn moduli(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.subgrade_modulus).collect()
    }

    /// First row for a modulus
    pub fn row(&self, subgrade_modulus: f64) -> Option<&SweepRow> {
        self.rows.iter().find(|r| r.subgrade_modulus == subgrade_modulus)
    }

    pub fn successes(&self) -> impl Iterator<Item = &SweepRow> {
        self.rows.iter().filter(|r| r.reactions().is_some())
    }

    pub fn failures(&self) -> impl Iterator<Item = &SweepRow> {
        self.rows.iter().filter(|r| r.error().is_some())
    }

    pub fn all_succeeded(&self) -> bool {
        self.failures().next().is_none()
    }
}

/// Renders one column per solved modulus and one line per node
impl fmt::Display for ReactionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let solved: Vec<(f64, &SpringReactions)> = self
            .rows
            .iter()
            .filter_map(|r| r.reactions().map(|s| (r.subgrade_modulus, s)))
            .collect();

        if let Some((_, first)) = solved.first() {
            write!(f, "{:>8} {:>12}", "node", "x")?;
            for (k, _) in &solved {
                write!(f, " {:>14}", format!("k_s={}", k))?;
            }
            writeln!(f)?;

            for (i, node) in first.nodes.iter().enumerate() {
                write!(f, "{:>8} {:>12.2}", node, first.positions[i])?;
                for (_, s) in &solved {
                    write!(f, " {:>14.1}", s.reactions[i])?;
                }
                writeln!(f)?;
            }

            write!(f, "{:>8} {:>12}", "sum", "")?;
            for (_, s) in &solved {
                write!(f, " {:>14.1}", s.total())?;
            }
            writeln!(f)?;
        }

        for row in self.failures() {
            if let Some(err) = row.error() {
                writeln!(f, "k_s={}: {}", row.subgrade_modulus, err)?;
            }
        }
        Ok(())
    }
}

/// Solve every modulus in order on the calling thread
pub fn run_sweep(
    beam: &BeamProperties,
    moduli: &[f64],
    n_springs: usize,
    loads: &LoadSet,
) -> ReactionTable {
    run_sweep_with(beam, moduli, n_springs, loads, &SweepOptions::sequential())
}

/// Solve every modulus with the given execution options
pub fn run_sweep_with(
    beam: &BeamProperties,
    moduli: &[f64],
    n_springs: usize,
    loads: &LoadSet,
    options: &SweepOptions,
) -> ReactionTable {
    info!(
        "Sweeping {} subgrade moduli on {} springs ({})",
        moduli.len(),
        n_springs,
        if options.parallel { "parallel" } else { "sequential" }
    );
    let deadline = options.timeout.map(|t| Instant::now() + t);

    let results = if options.parallel {
        solve_parallel(beam, moduli, n_springs, loads, options.timeout)
    } else {
        moduli
            .iter()
            .map(|&k| match deadline {
                Some(d) if Instant::now() >= d => Err(timed_out(options.timeout.unwrap_or_default())),
                _ => build_and_solve(beam, k, n_springs, loads),
            })
            .collect()
    };

    let rows: Vec<SweepRow> = moduli
        .iter()
        .zip(results)
        .map(|(&k, result)| {
            if let Err(err) = &result {
                warn!("k_s = {}: {}", k, err);
            }
            SweepRow::new(k, result)
        })
        .collect();

    let table = ReactionTable { n_springs, rows };
    info!(
        "Sweep finished: {} solved, {} failed",
        table.successes().count(),
        table.failures().count()
    );
    table
}

fn solve_parallel(
    beam: &BeamProperties,
    moduli: &[f64],
    n_springs: usize,
    loads: &LoadSet,
    timeout: Option<Duration>,
) -> Vec<GradeBeamResult<SpringReactions>> {
    let deadline = timeout.map(|t| Instant::now() + t);
    let (tx, rx) = mpsc::channel();
    for (idx, &k) in moduli.iter().enumerate() {
        let tx = tx.clone();
        let beam = beam.clone();
        let loads = loads.clone();
        rayon::spawn(move || {
            let result = match (deadline, timeout) {
                (Some(d), Some(t)) if Instant::now() >= d => Err(timed_out(t)),
                _ => build_and_solve(&beam, k, n_springs, &loads),
            };
            // The receiver is gone once the deadline has passed
            let _ = tx.send((idx, result));
        });
    }
    drop(tx);

    let mut results: Vec<Option<GradeBeamResult<SpringReactions>>> = vec![None; moduli.len()];
    let mut pending = moduli.len();
    while pending > 0 {
        let received = match deadline {
            Some(d) => rx.recv_timeout(d.saturating_duration_since(Instant::now())),
            None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };
        match received {
            Ok((idx, result)) => {
                results[idx] = Some(result);
                pending -= 1;
            }
            Err(RecvTimeoutError::Timeout) => break,
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    results
        .into_iter()
        .map(|r| {
            r.unwrap_or_else(|| match timeout {
                Some(t) => Err(timed_out(t)),
                None => Err(GradeBeamError::SolverFailure(
                    "worker stopped without a result".to_string(),
                )),
            })
        })
        .collect()
}

fn timed_out(timeout: Duration) -> GradeBeamError {
    GradeBeamError::SolverFailure(format!("timed out after {:?}", timeout))
}
