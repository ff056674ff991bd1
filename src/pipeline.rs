use std::borrow::Cow;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, info, warn};

use crate::engine::compliance::PolicyEvaluator;
use crate::engine::dictionary::DictionaryRegistry;
use crate::engine::filter::CharFilter;
use crate::error::Result;
use crate::job::{Job, Policy};

/// Splits on CRLF, LF or a lone CR. A trailing terminator yields a final
/// empty line, and empty input yields one empty line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = text;
    while let Some(i) = rest.find(['\r', '\n']) {
        lines.push(&rest[..i]);
        let width = if rest[i..].starts_with("\r\n") { 2 } else { 1 };
        rest = &rest[i + width..];
    }
    lines.push(rest);
    lines
}

/// Reads a text file, replacing invalid UTF-8 sequences with U+FFFD.
pub fn read_text(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(match String::from_utf8_lossy(&bytes) {
        Cow::Borrowed(text) => text.to_string(),
        Cow::Owned(text) => {
            warn!("{} is not valid UTF-8, invalid bytes replaced", path.display());
            text
        }
    })
}

pub fn load_candidates(corpus: &str) -> Vec<String> {
    split_lines(corpus)
        .into_iter()
        .map(|line| line.trim().to_string())
        .collect()
}

/// Keeps the first occurrence of each value. Returns the survivors and the
/// number removed.
pub fn deduplicate(candidates: Vec<String>) -> (Vec<String>, usize) {
    let keep: Vec<bool> = {
        let mut seen = HashSet::with_capacity(candidates.len());
        candidates.iter().map(|c| seen.insert(c.as_str())).collect()
    };
    let before = candidates.len();
    let kept: Vec<String> = candidates
        .into_iter()
        .zip(keep)
        .filter_map(|(c, keep)| keep.then_some(c))
        .collect();
    let removed = before - kept.len();
    (kept, removed)
}

pub fn cull(candidates: Vec<String>, filter: &CharFilter) -> (Vec<String>, usize) {
    let before = candidates.len();
    let kept: Vec<String> = candidates.into_iter().filter(|c| filter.admits(c)).collect();
    let removed = before - kept.len();
    (kept, removed)
}

/// First `size` compliant candidates in `working` order.
pub fn sample(working: &[String], evaluator: &PolicyEvaluator<'_>, size: usize) -> PolicySample {
    let compliant: Vec<&String> = working.iter().filter(|c| evaluator.complies(c)).collect();
    PolicySample {
        policy: evaluator.policy().name.clone(),
        requested: size,
        available: compliant.len(),
        candidates: compliant.into_iter().take(size).cloned().collect(),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PolicySample {
    pub policy: String,
    pub requested: usize,
    /// Compliant candidates in the working sequence, before truncation.
    pub available: usize,
    pub candidates: Vec<String>,
}

impl PolicySample {
    /// How many short of the requested size this sample fell, if any.
    pub fn shortfall(&self) -> Option<usize> {
        let missing = self.requested.saturating_sub(self.candidates.len());
        (missing > 0).then_some(missing)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunReport {
    pub loaded: usize,
    pub duplicates_removed: Option<usize>,
    pub non_ascii_removed: Option<usize>,
    pub non_printable_removed: Option<usize>,
    /// Candidates left after every enabled transform stage.
    pub working: usize,
    pub samples: Vec<PolicySample>,
}

/// Runs one job over an in-memory corpus.
///
/// All randomness comes from one stream: the initial shuffle first, then
/// one reshuffle per policy in job order. Per-policy reshuffles act on the
/// shared working sequence, so with `randomize_each_sample` set every
/// policy sees an ordering shaped by the draws of the policies before it.
pub struct SamplingPipeline<'a, R: Rng> {
    job: &'a Job,
    dictionaries: &'a DictionaryRegistry,
    rng: R,
}

impl<'a, R: Rng> SamplingPipeline<'a, R> {
    pub fn new(job: &'a Job, dictionaries: &'a DictionaryRegistry, rng: R) -> Self {
        Self {
            job,
            dictionaries,
            rng,
        }
    }

    /// Load, shuffle, dedup and cull stages, in that order.
    pub fn prepare(&mut self, corpus: &str, report: &mut RunReport) -> Vec<String> {
        let mut working = load_candidates(corpus);
        report.loaded = working.len();
        info!("Loaded {} candidates", working.len());

        if self.job.randomize_initial {
            debug!("Shuffling candidates");
            working.shuffle(&mut self.rng);
        }

        if self.job.deduplicate {
            info!("Removing duplicate candidates...");
            let (kept, removed) = deduplicate(working);
            info!("Removed {removed} candidates");
            report.duplicates_removed = Some(removed);
            working = kept;
        }

        if self.job.cull_non_ascii {
            info!("Removing candidates containing non-ASCII characters...");
            let (kept, removed) = cull(working, &CharFilter::ASCII);
            info!("Removed {removed} candidates");
            report.non_ascii_removed = Some(removed);
            working = kept;
        }

        if self.job.cull_non_printable {
            info!("Removing candidates containing non-printable ASCII characters...");
            let (kept, removed) = cull(working, &CharFilter::PRINTABLE_ASCII);
            info!("Removed {removed} candidates");
            report.non_printable_removed = Some(removed);
            working = kept;
        }

        report.working = working.len();
        working
    }

    /// Runs every stage and hands each policy's sample to `emit` as soon as
    /// it is drawn. Dictionaries for all policies are built before any
    /// sampling starts, so a missing word list aborts before output.
    pub fn run<F>(&mut self, corpus: &str, mut emit: F) -> Result<RunReport>
    where
        F: FnMut(&Policy, &PolicySample) -> Result<()>,
    {
        let job = self.job;
        let dictionaries = self.dictionaries;
        let evaluators = job
            .policies
            .iter()
            .map(|policy| PolicyEvaluator::new(policy, dictionaries))
            .collect::<Result<Vec<_>>>()?;

        let mut report = RunReport::default();
        let mut working = self.prepare(corpus, &mut report);

        for evaluator in &evaluators {
            let policy = evaluator.policy();
            info!("Filtering on policy {}...", policy.name);

            if job.randomize_each_sample {
                working.shuffle(&mut self.rng);
            }

            let sample = sample(&working, evaluator, job.sample_size);
            if let Some(missing) = sample.shortfall() {
                warn!(
                    "Not enough compliant candidates to sample {} for policy {}, sampling {} ({missing} short)",
                    sample.requested,
                    policy.name,
                    sample.candidates.len()
                );
            }

            emit(policy, &sample)?;
            report.samples.push(sample);
        }

        Ok(report)
    }
}
