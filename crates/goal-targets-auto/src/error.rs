use crate::sequencer::AutoState;

/// Sensor read failures and implausible readings.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SensorError {
    #[error("{sensor} read failed: {reason}")]
    Fault {
        sensor: &'static str,
        reason: String,
    },
    #[error("{sensor} reading {value} is outside the plausible range")]
    Implausible { sensor: &'static str, value: f64 },
}

/// Errors that abort the autonomous period.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SequenceError {
    #[error(transparent)]
    Sensor(#[from] SensorError),
    #[error("{state} did not complete within {cycles} cycles")]
    BudgetExhausted { state: AutoState, cycles: u32 },
}
