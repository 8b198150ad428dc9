//! Control command whitelist.
//!
//! The device accepts a fixed, closed set of tokens on its control topic.
//! Anything outside this set is rejected before it reaches the transport.

use std::fmt;
use std::str::FromStr;

/// One of the tokens the device accepts on the control topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    On,
    Off,
    Test,
    RelayOn,
    RelayOff,
    Servo0,
    Servo90,
    Servo180,
    LedGreen,
    LedRed,
    LedOff,
    BuzzerOn,
    BuzzerOff,
    AlertMode,
    NormalMode,
    ServoWithFan,
}

impl ControlCommand {
    /// Every accepted token, in the order the device documents them.
    pub const ALL: [ControlCommand; 16] = [
        ControlCommand::On,
        ControlCommand::Off,
        ControlCommand::Test,
        ControlCommand::RelayOn,
        ControlCommand::RelayOff,
        ControlCommand::Servo0,
        ControlCommand::Servo90,
        ControlCommand::Servo180,
        ControlCommand::LedGreen,
        ControlCommand::LedRed,
        ControlCommand::LedOff,
        ControlCommand::BuzzerOn,
        ControlCommand::BuzzerOff,
        ControlCommand::AlertMode,
        ControlCommand::NormalMode,
        ControlCommand::ServoWithFan,
    ];

    /// The wire token published on the control topic.
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlCommand::On => "ON",
            ControlCommand::Off => "OFF",
            ControlCommand::Test => "TEST",
            ControlCommand::RelayOn => "RELAY_ON",
            ControlCommand::RelayOff => "RELAY_OFF",
            ControlCommand::Servo0 => "SERVO_0",
            ControlCommand::Servo90 => "SERVO_90",
            ControlCommand::Servo180 => "SERVO_180",
            ControlCommand::LedGreen => "LED_GREEN",
            ControlCommand::LedRed => "LED_RED",
            ControlCommand::LedOff => "LED_OFF",
            ControlCommand::BuzzerOn => "BUZZER_ON",
            ControlCommand::BuzzerOff => "BUZZER_OFF",
            ControlCommand::AlertMode => "ALERT_MODE",
            ControlCommand::NormalMode => "NORMAL_MODE",
            ControlCommand::ServoWithFan => "SERVO_WITH_FAN",
        }
    }

    fn allowed_list() -> String {
        Self::ALL
            .iter()
            .map(ControlCommand::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for ControlCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ControlCommand {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|command| command.as_str() == s)
            .ok_or_else(|| CommandError::Invalid(s.to_string()))
    }
}

/// Errors from the outbound command channel
#[derive(Debug)]
pub enum CommandError {
    /// The token is not in the whitelist
    Invalid(String),

    /// The transport refused the publish
    Publish(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Invalid(given) => write!(
                f,
                "invalid command {given:?}, valid commands: {}",
                ControlCommand::allowed_list()
            ),
            CommandError::Publish(msg) => {
                write!(f, "failed to publish control command: {msg}")
            }
        }
    }
}

impl std::error::Error for CommandError {}
