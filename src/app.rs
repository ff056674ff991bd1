use std::path::{Path, PathBuf};

use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::info;

use crate::config::Config;
use crate::engine::dictionary::DictionaryRegistry;
use crate::error::{Result, SampleError};
use crate::job::Job;
use crate::output::write_artifact;
use crate::pipeline::{RunReport, SamplingPipeline, read_text};

/// Outcome of one run: the pipeline report plus every artifact written.
#[derive(Debug)]
pub struct RunOutcome {
    pub job: Job,
    pub report: RunReport,
    pub artifacts: Vec<PathBuf>,
}

pub struct App {
    pub config: Config,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    fn rng(&self) -> SmallRng {
        match self.config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        }
    }

    /// Executes the job in `task` against the corpus in `database`, writing
    /// one artifact per policy into the configured output directory.
    pub fn run(&self, database: &Path, task: &Path) -> Result<RunOutcome> {
        if !database.is_file() {
            return Err(SampleError::CorpusNotFound(database.to_path_buf()));
        }
        let job = Job::load(task)?;
        info!("Executing task: {}", job.name);

        let corpus = read_text(database).map_err(|source| SampleError::Read {
            path: database.to_path_buf(),
            source,
        })?;
        let dictionaries = DictionaryRegistry::new(&self.config.comment_prefix);
        let output_dir = self.config.output_path();

        let mut artifacts = Vec::new();
        let report = SamplingPipeline::new(&job, &dictionaries, self.rng()).run(
            &corpus,
            |policy, sample| {
                artifacts.push(write_artifact(&output_dir, &job, policy, &sample.candidates)?);
                Ok(())
            },
        )?;

        let short = report
            .samples
            .iter()
            .filter(|s| s.shortfall().is_some())
            .count();
        info!(
            "Finished task {}: {} policies sampled, {short} short of {}",
            job.name,
            report.samples.len(),
            job.sample_size
        );

        Ok(RunOutcome {
            job,
            report,
            artifacts,
        })
    }
}
