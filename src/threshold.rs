//! Pure threshold evaluation for the edge-triggered detector.
//!
//! The detector must fire exactly once per status transition:
//!
//! ```text
//! value <= threshold, previously NORMAL -> Normal        (no event)
//! value >  threshold, previously NORMAL -> RaisesAlert   (emit NORMAL -> ALERT)
//! value >  threshold, previously ALERT  -> StillAlerting (no event, prevents alert storms)
//! value <= threshold, previously ALERT  -> ClearsAlert   (emit ALERT -> NORMAL)
//! ```
//!
//! Keeping this decision as a pure function makes the exactly-once property
//! testable without channels or timers.

use crate::ReadingStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdEvaluation {
    /// Below the threshold and previously NORMAL.
    Normal,
    /// Above the threshold while already in ALERT.
    StillAlerting,
    /// Crossed from NORMAL to ALERT.
    RaisesAlert,
    /// Dropped from ALERT back to NORMAL.
    ClearsAlert,
}

impl ThresholdEvaluation {
    pub fn evaluate(value: i64, threshold: i64, previous: ReadingStatus) -> ThresholdEvaluation {
        // the threshold itself is still a normal reading
        let exceeded = value > threshold;

        match (previous, exceeded) {
            (ReadingStatus::Normal, false) => ThresholdEvaluation::Normal,
            (ReadingStatus::Normal, true) => ThresholdEvaluation::RaisesAlert,
            (ReadingStatus::Alert, true) => ThresholdEvaluation::StillAlerting,
            (ReadingStatus::Alert, false) => ThresholdEvaluation::ClearsAlert,
        }
    }

    /// The status the cache should hold after this evaluation.
    pub fn status(self) -> ReadingStatus {
        match self {
            ThresholdEvaluation::Normal | ThresholdEvaluation::ClearsAlert => ReadingStatus::Normal,
            ThresholdEvaluation::StillAlerting | ThresholdEvaluation::RaisesAlert => {
                ReadingStatus::Alert
            }
        }
    }

    /// Whether this evaluation flips the status and must emit a transition event.
    pub fn is_transition(self) -> bool {
        matches!(
            self,
            ThresholdEvaluation::RaisesAlert | ThresholdEvaluation::ClearsAlert
        )
    }
}
