// Abstracta: topic bucketing for research-abstract corpora
//
// This is the library root. Each module corresponds to one stage of the
// analysis pipeline, from raw files to the rendered topic grid.

pub mod bucket;
pub mod config;
pub mod corpus;
pub mod output;
pub mod pipeline;
pub mod preprocess;
pub mod topics;
