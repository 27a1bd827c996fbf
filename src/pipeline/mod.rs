// Pipelines: the end-to-end analysis run.

pub mod analyze;
