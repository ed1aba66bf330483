//! anchorcore recovers topic-word distributions from a word cooccurrence matrix using anchor words.
//!
//! Each topic is identified by an anchor: a word, or a small set of words, assumed to occur
//! (almost) only in that topic. Every vocabulary word is expressed as a convex combination of the
//! anchor vectors, and Bayes' rule turns those coefficients into one distribution over the
//! vocabulary per topic.
//!
//! The [entrypoints::recover] function runs the whole pipeline from a configuration file, while
//! [routines::recovery::TopicRecovery] works directly on in-memory data.

pub mod entrypoints;
pub mod error;

pub mod routines {
    pub mod basis;
    pub mod data;
    pub mod logger;
    pub mod math;
    pub mod output;
    pub mod recovery;
    pub mod settings;
    pub mod solver;
    pub mod sort;
    pub mod summary;
}

pub mod structs {
    pub mod alpha;
    pub mod anchors;
    pub mod topics;
    pub mod vocabulary;
}

pub mod prelude {
    pub use crate::entrypoints::{recover, recover_with_cancel};
    pub use crate::error::{AnchorError, Result};
    pub use crate::routines::basis::{build_basis, Basis};
    pub use crate::routines::recovery::{recover_topics, Recovery, RecoveryStats, TopicRecovery};
    pub use crate::routines::solver::{solve_alpha, Solution, SolveStatus, SolverConfig};
    pub use crate::routines::summary::{topic_summary_indices, topic_summary_tokens};
    pub use crate::routines::*;
    pub use crate::structs::alpha::Alpha;
    pub use crate::structs::anchors::{Anchor, AnchorSet};
    pub use crate::structs::topics::{AnchorTopic, TopicMatrix, TopicSummary};
    pub use crate::structs::vocabulary::Vocabulary;
}
