//! Harness: drives the requested workloads, one fresh store per workload.

use crate::config::BenchConfig;
use crate::keygen::KeyGenerator;
use crate::report::{self, WorkloadReport};
use crate::store::Store;
use crate::workload::{self, Workload};
use anyhow::Result;

pub struct Harness {
    config: BenchConfig,
    keys: KeyGenerator,
}

impl Harness {
    pub fn new(config: BenchConfig) -> Self {
        let keys = match config.seed {
            Some(seed) => KeyGenerator::seeded(seed),
            None => KeyGenerator::from_entropy(),
        };
        log::debug!("key generator seed: {}", keys.seed());
        Self { config, keys }
    }

    /// Print the banner and run each named workload in order.
    ///
    /// Unknown names are reported on stderr and skipped. Any store or step
    /// failure stops the run and is returned.
    pub fn run<S: AsRef<str>>(&mut self, names: &[S]) -> Result<Vec<WorkloadReport>> {
        self.config.validate()?;
        report::print_banner(&self.config);

        let mut reports = Vec::with_capacity(names.len());
        for name in names {
            let workload = match name.as_ref().parse::<Workload>() {
                Ok(w) => w,
                Err(e) => {
                    eprintln!("{e}");
                    continue;
                }
            };
            let result = self.run_workload(workload)?;
            report::print_report(&result);
            reports.push(result);
        }

        if self.config.summary {
            report::print_summary(&reports);
        }
        Ok(reports)
    }

    /// Run a single workload against a freshly recreated store.
    pub fn run_workload(&mut self, workload: Workload) -> Result<WorkloadReport> {
        self.config.validate()?;
        let mut store = Store::open(&self.config.location, &self.config.pragmas)?;
        let result = workload::run(workload, store.connection()?, &self.config, &mut self.keys)?;
        if log::log_enabled!(log::Level::Debug) {
            log::debug!("{workload}: {} rows after run", store.row_count()?);
        }
        store.close()?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_names_are_skipped() {
        let mut harness = Harness::new(BenchConfig::in_memory(50, 8));
        let reports = harness
            .run(&["fillseq", "nosuchbench", "readseq"])
            .unwrap();
        let names: Vec<_> = reports.iter().map(|r| r.workload).collect();
        assert_eq!(names, vec![Workload::FillSeq, Workload::ReadSeq]);
    }

    #[test]
    fn oversized_entry_count_is_rejected_before_running() {
        let mut cfg = BenchConfig::in_memory(0, 8);
        cfg.num = (crate::config::MAX_NUM as usize).saturating_add(1);
        let mut harness = Harness::new(cfg);
        if harness.config.num as u64 > crate::config::MAX_NUM {
            let err = harness.run(&["fillseq"]).unwrap_err();
            assert!(err.to_string().contains("too large"));
            assert!(harness.run_workload(Workload::FillRandom).is_err());
        }
    }

    #[test]
    fn seeded_harness_is_repeatable() {
        let mut cfg = BenchConfig::in_memory(300, 8);
        cfg.seed = Some(99);

        let a = Harness::new(cfg.clone())
            .run_workload(Workload::ReadSeq)
            .unwrap();
        let b = Harness::new(cfg).run_workload(Workload::ReadSeq).unwrap();
        assert_eq!(a.ops, b.ops);
    }
}
