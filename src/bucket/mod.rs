// Topic bucketing: dominant-topic grouping and sample matrix assembly.

pub mod bucketer;
pub mod matrix;

pub use bucketer::{bucket, SampledDocument, TopicBuckets};
pub use matrix::SampleMatrix;
