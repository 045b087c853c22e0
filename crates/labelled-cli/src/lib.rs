//! Library side of the `labelled` CLI: logging setup and the load pipeline.

pub mod logging;
pub mod pipeline;
