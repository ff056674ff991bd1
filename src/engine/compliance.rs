use std::sync::Arc;

use crate::engine::dictionary::{Dictionary, DictionaryRegistry, fold_case};
use crate::engine::metrics::{
    count_by_class, count_words, is_letter, longest_adjacent_run, longest_repeated_run,
};
use crate::error::Result;
use crate::job::Policy;

/// A policy paired with its resolved dictionary, ready to test candidates.
///
/// Resolving the dictionary up front means a missing word list fails the
/// policy before any candidate is examined, and `complies` stays total.
pub struct PolicyEvaluator<'a> {
    policy: &'a Policy,
    dictionary: Option<Arc<Dictionary>>,
}

impl<'a> PolicyEvaluator<'a> {
    pub fn new(policy: &'a Policy, registry: &DictionaryRegistry) -> Result<Self> {
        let dictionary = match &policy.dictionary {
            Some(path) => Some(registry.get_or_load(path)?),
            None => None,
        };
        Ok(Self { policy, dictionary })
    }

    pub fn policy(&self) -> &Policy {
        self.policy
    }

    pub fn complies(&self, candidate: &str) -> bool {
        complies(candidate, self.policy, self.dictionary.as_deref())
    }
}

/// True when `candidate` meets every threshold of `policy`. The dictionary
/// check only runs when `dictionary` is given.
pub fn complies(candidate: &str, policy: &Policy, dictionary: Option<&Dictionary>) -> bool {
    let counts = count_by_class(candidate);
    if counts.lower < policy.min_lowers
        || counts.upper < policy.min_uppers
        || counts.digit < policy.min_digits
        || counts.other < policy.min_others
        || counts.diversity() < policy.min_classes
    {
        return false;
    }

    if candidate.chars().count() < policy.min_length {
        return false;
    }

    if count_words(candidate) < policy.min_words {
        return false;
    }

    if let Some(max) = policy.max_repetition {
        if longest_repeated_run(candidate) > max {
            return false;
        }
    }

    if let Some(max) = policy.max_consecutive {
        if longest_adjacent_run(candidate) > max {
            return false;
        }
    }

    match dictionary {
        Some(dictionary) => !matches_dictionary(candidate, dictionary),
        None => true,
    }
}

/// Letters of `candidate` only, case-folded.
pub fn letter_residue(candidate: &str) -> String {
    let letters: String = candidate.chars().filter(|&ch| is_letter(ch)).collect();
    fold_case(&letters)
}

fn matches_dictionary(candidate: &str, dictionary: &Dictionary) -> bool {
    let residue = letter_residue(candidate);
    !residue.is_empty() && dictionary.contains(&residue)
}
