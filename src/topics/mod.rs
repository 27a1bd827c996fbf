// Topic modeling: the model trait, the Gibbs-sampled LDA behind it, and
// readable topic summaries.

pub mod lda;
pub mod summary;
pub mod traits;
