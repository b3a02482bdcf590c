pub mod chunker;
pub mod learner;
pub mod pipeline;
pub mod role;
pub mod splitter;
pub mod transfer;
