//! Generator settings
//!
//! # Design
//! [Settings] is the serializable form of [Parameters]: plain values with the power-on defaults.
//! Ranges are validated on conversion. Settings are not persisted.
use serde::{Deserialize, Serialize};

use crate::{Duty, Error, Frequency, Parameters, Shape};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Waveform shape.
    pub shape: Shape,
    /// Frequency setting in units of 100 Hz.
    pub frequency: u8,
    /// Square wave duty cycle in percent.
    pub duty: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Parameters::default().into()
    }
}

impl From<Parameters> for Settings {
    fn from(parameters: Parameters) -> Self {
        Self {
            shape: parameters.shape,
            frequency: parameters.frequency.value(),
            duty: parameters.duty.value(),
        }
    }
}

impl TryFrom<Settings> for Parameters {
    type Error = Error;

    fn try_from(settings: Settings) -> Result<Self, Error> {
        Ok(Self {
            shape: settings.shape,
            frequency: Frequency::try_from(settings.frequency)?,
            duty: Duty::try_from(settings.duty)?,
        })
    }
}
