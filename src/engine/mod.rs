pub mod compliance;
pub mod dictionary;
pub mod filter;
pub mod metrics;
pub mod trie;

pub use compliance::{PolicyEvaluator, complies};
pub use dictionary::{Dictionary, DictionaryRegistry};
pub use trie::Trie;
