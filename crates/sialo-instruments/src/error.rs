use thiserror::Error;

#[derive(Debug, Error)]
pub enum InstrumentError {
    #[error("{0}")]
    StepIncomplete(String),

    #[error("unknown step: {0}")]
    UnknownStep(usize),

    #[error("guided mode only allows going back; use next to advance past step {current}")]
    ForwardJump { current: usize, target: usize },
}
