//! Experiment results.
//!
//! A [`ResultsRecorder`] samples every agent's savings once per control-loop
//! step across several runs of the same scenario, and produces the results
//! dump:
//!
//! ```json
//! {"results":[{"name":"dp","results":[41.5,39.0],"maxOverTime":[...],"minOverTime":[...]}]}
//! ```
//!
//! `results` holds the mean savings of each run; `maxOverTime` and
//! `minOverTime` hold, for each elapsed second, the highest and lowest
//! savings seen at that second over all runs.

use crate::authority::Standing;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// Marks a second in which no sample was taken.
pub const NO_SAMPLE: f64 = -1.0;

/// One agent's entry in the results dump.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentResults {
    pub name: String,
    /// Mean savings per run, in run order.
    pub results: Vec<f64>,
    pub max_over_time: Vec<f64>,
    pub min_over_time: Vec<f64>,
}

/// The serialized results document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsDump {
    pub results: Vec<AgentResults>,
}

#[derive(Debug, Clone)]
struct Accumulator {
    run_total: f64,
    run_means: Vec<f64>,
    max_over_time: Vec<f64>,
    min_over_time: Vec<f64>,
}

impl Accumulator {
    fn new(seconds: usize) -> Self {
        Self {
            run_total: 0.0,
            run_means: Vec::new(),
            max_over_time: vec![NO_SAMPLE; seconds],
            min_over_time: vec![NO_SAMPLE; seconds],
        }
    }
}

/// Collects per-agent savings over repeated runs.
#[derive(Debug, Clone)]
pub struct ResultsRecorder {
    seconds: usize,
    steps: u64,
    agents: BTreeMap<String, Accumulator>,
}

impl ResultsRecorder {
    /// `run_seconds` is the length of one run; it sizes the over-time
    /// series.
    pub fn new(run_seconds: f64) -> Self {
        Self {
            seconds: run_seconds.max(0.0).ceil() as usize,
            steps: 0,
            agents: BTreeMap::new(),
        }
    }

    /// Steps recorded in the current run.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Records one step of the current run, `elapsed` seconds in.
    pub fn record_step(&mut self, elapsed: f64, standings: &[Standing]) {
        self.steps += 1;
        let second = elapsed.max(0.0).floor() as usize;
        for row in standings {
            let acc = self
                .agents
                .entry(row.name.clone())
                .or_insert_with(|| Accumulator::new(self.seconds));
            acc.run_total += row.total_savings;

            if second < acc.max_over_time.len() {
                let savings = row.total_savings;
                let max = &mut acc.max_over_time[second];
                *max = if *max == NO_SAMPLE { savings } else { max.max(savings) };
                let min = &mut acc.min_over_time[second];
                *min = if *min == NO_SAMPLE { savings } else { min.min(savings) };
            }
        }
    }

    /// Closes the current run, storing each agent's mean savings per step.
    pub fn end_run(&mut self) {
        let steps = self.steps.max(1) as f64;
        for acc in self.agents.values_mut() {
            acc.run_means.push(acc.run_total / steps);
            acc.run_total = 0.0;
        }
        info!(
            steps = self.steps,
            agents = self.agents.len(),
            "run recorded"
        );
        self.steps = 0;
    }

    pub fn results(&self) -> ResultsDump {
        ResultsDump {
            results: self
                .agents
                .iter()
                .map(|(name, acc)| AgentResults {
                    name: name.clone(),
                    results: acc.run_means.clone(),
                    max_over_time: acc.max_over_time.clone(),
                    min_over_time: acc.min_over_time.clone(),
                })
                .collect(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.results())?)
    }

    /// Writes the results dump to `path`, creating parent directories.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, self.to_json()?)?;
        info!(path = %path.display(), "results saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authority::AgentId;

    fn standing(name: &str, savings: f64) -> Standing {
        Standing {
            rank: 1,
            agent: AgentId(0),
            name: name.into(),
            item_count: 0,
            total_size: 0.0,
            total_savings: savings,
            fill_percent: 0.0,
        }
    }

    #[test]
    fn test_run_means() {
        let mut rec = ResultsRecorder::new(3.0);
        rec.record_step(0.0, &[standing("dp", 2.0)]);
        rec.record_step(0.5, &[standing("dp", 4.0)]);
        rec.end_run();
        rec.record_step(0.0, &[standing("dp", 10.0)]);
        rec.end_run();

        let dump = rec.results();
        assert_eq!(dump.results.len(), 1);
        assert_eq!(dump.results[0].results, vec![3.0, 10.0]);
    }

    #[test]
    fn test_over_time_extremes() {
        let mut rec = ResultsRecorder::new(2.5);
        rec.record_step(0.2, &[standing("ga", 1.0)]);
        rec.record_step(0.7, &[standing("ga", 5.0)]);
        rec.record_step(2.1, &[standing("ga", 7.0)]);
        rec.record_step(9.0, &[standing("ga", 99.0)]);
        rec.end_run();

        let ga = &rec.results().results[0];
        assert_eq!(ga.max_over_time, vec![5.0, NO_SAMPLE, 7.0]);
        assert_eq!(ga.min_over_time, vec![1.0, NO_SAMPLE, 7.0]);
    }

    #[test]
    fn test_json_shape() {
        let mut rec = ResultsRecorder::new(1.0);
        rec.record_step(0.0, &[standing("b", 1.0), standing("a", 2.0)]);
        rec.end_run();

        let json = rec.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let entries = value["results"].as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["name"], "a");
        assert!(entries[0]["maxOverTime"].is_array());
        assert!(entries[0]["minOverTime"].is_array());
        assert_eq!(entries[1]["results"][0], 1.0);
    }

    #[test]
    fn test_write_to_creates_directories() {
        let dir = std::env::temp_dir().join(format!("shoptimise-report-{}", std::process::id()));
        let path = dir.join("runs").join("results.json");
        let mut rec = ResultsRecorder::new(1.0);
        rec.record_step(0.0, &[standing("dp", 1.0)]);
        rec.end_run();
        rec.write_to(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let dump: ResultsDump = serde_json::from_str(&text).unwrap();
        assert_eq!(dump, rec.results());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
