use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Result, SampleError};
use crate::output::artifact_name;

/// Thresholds a candidate must meet to be sampled under a named policy.
///
/// Older job files spell these keys in PascalCase (`Length`, `Uppers`,
/// `Repetitions`, ...); both spellings are accepted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(default, alias = "Length")]
    pub min_length: usize,
    #[serde(default, alias = "Uppers")]
    pub min_uppers: usize,
    #[serde(default, alias = "Lowers")]
    pub min_lowers: usize,
    #[serde(default, alias = "Digits")]
    pub min_digits: usize,
    #[serde(default, alias = "Others")]
    pub min_others: usize,
    #[serde(default, alias = "Classes")]
    pub min_classes: usize,
    #[serde(default, alias = "Words")]
    pub min_words: usize,
    /// `None` leaves repeated runs unbounded. Negative values in a job file mean the same.
    #[serde(default, alias = "Repetitions", deserialize_with = "deserialize_bound")]
    pub max_repetition: Option<usize>,
    #[serde(default, alias = "Consecutives", deserialize_with = "deserialize_bound")]
    pub max_consecutive: Option<usize>,
    #[serde(default, alias = "Dictionary")]
    pub dictionary: Option<PathBuf>,
}

impl Policy {
    /// A policy with no constraints.
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }
}

fn deserialize_bound<'de, D>(deserializer: D) -> std::result::Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<i64> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|n| usize::try_from(n).ok()))
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Plain,
    Json,
    Coq,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Plain => "txt",
            OutputFormat::Json => "json",
            OutputFormat::Coq => "v",
        }
    }
}

/// One sampling request: transform flags, sample size and the ordered policies.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(alias = "sample", alias = "Sample")]
    pub sample_size: usize,
    #[serde(default, alias = "Output")]
    pub output: OutputFormat,
    #[serde(default, alias = "CullNonAscii")]
    pub cull_non_ascii: bool,
    #[serde(default, alias = "CullNonPrintable")]
    pub cull_non_printable: bool,
    #[serde(default, alias = "Deduplicate")]
    pub deduplicate: bool,
    #[serde(default, alias = "RandomizeInitial")]
    pub randomize_initial: bool,
    #[serde(default, alias = "RandomizeEachSample")]
    pub randomize_each_sample: bool,
    #[serde(default, alias = "Policies")]
    pub policies: Vec<Policy>,
}

impl Job {
    pub fn parse(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Reads and validates a job file. Relative dictionary paths are
    /// resolved against the job file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(SampleError::JobNotFound(path.to_path_buf()));
        }
        let bytes = fs::read(path).map_err(|source| SampleError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut job = serde_json::from_slice::<Self>(&bytes).map_err(|source| SampleError::MalformedJob {
            path: path.to_path_buf(),
            source,
        })?;
        job.validate()?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        for policy in &mut job.policies {
            if let Some(dictionary) = policy.dictionary.as_mut() {
                if dictionary.is_relative() {
                    *dictionary = base.join(&*dictionary);
                }
            }
        }
        Ok(job)
    }

    /// Rejects a zero sample size, an empty policy list, unnamed policies
    /// and policies whose artifacts would land on the same file.
    pub fn validate(&self) -> Result<()> {
        if self.sample_size == 0 {
            return Err(SampleError::InvalidJob(format!(
                "job '{}' has a sample size of 0",
                self.name
            )));
        }
        if self.policies.is_empty() {
            return Err(SampleError::InvalidJob(format!(
                "job '{}' has no policies",
                self.name
            )));
        }
        if let Some(policy) = self.policies.iter().find(|p| p.name.trim().is_empty()) {
            return Err(SampleError::InvalidJob(format!(
                "job '{}' has a policy without a name ({policy:?})",
                self.name
            )));
        }

        let mut claimed: HashMap<String, &str> = HashMap::new();
        for policy in &self.policies {
            let artifact = artifact_name(self, policy);
            if let Some(first) = claimed.insert(artifact.clone(), &policy.name) {
                return Err(SampleError::InvalidJob(format!(
                    "policies '{first}' and '{}' would both write {artifact}",
                    policy.name
                )));
            }
        }
        Ok(())
    }
}
