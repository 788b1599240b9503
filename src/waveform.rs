use heapless::Vec;
use serde::{Deserialize, Serialize};

use crate::{
    design_parameters::{AMPLITUDE_MILLIVOLTS, RAMP_STEP_MILLIVOLTS, SAMPLES_PER_PERIOD},
    Error, Frequency,
};

/// Waveform shapes.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::EnumIter,
    strum::AsRefStr,
)]
pub enum Shape {
    Sine,
    Triangle,
    Sawtooth,
    /// Generated from the timer compare edge alone. Does not use the sample table.
    #[default]
    Square,
}

impl Shape {
    /// Map a raw shape code (6 to 9) to a shape. Unknown codes select [Shape::Sine].
    pub fn from_code(code: u8) -> Self {
        match code {
            6 => Self::Sine,
            7 => Self::Triangle,
            8 => Self::Sawtooth,
            9 => Self::Square,
            _ => Self::Sine,
        }
    }
}

/// One waveform period of output voltages in millivolts.
pub type SampleTable = Vec<u16, SAMPLES_PER_PERIOD>;

/// The number of samples per period at the given frequency setting. Never zero.
#[inline]
pub fn table_length(frequency: Frequency) -> usize {
    (SAMPLES_PER_PERIOD / frequency.value() as usize).max(1)
}

fn sine(length: usize) -> impl Iterator<Item = u16> {
    let amplitude = AMPLITUDE_MILLIVOLTS as i64;
    (0..length).map(move |i| {
        // Full turn is 1 << 32
        let phase = (((i as u64) << 32) / length as u64) as u32 as i32;
        let (_, sin) = idsp::cossin(phase);
        // Round to nearest, sin is Q31
        let offset = (amplitude * sin as i64 + (1 << 30)) >> 31;
        (amplitude + offset) as u16
    })
}

fn sawtooth(length: usize, step: u16) -> impl Iterator<Item = u16> {
    (0..length).scan(0u16, move |value, _| {
        let sample = *value;
        *value = value.wrapping_add(step);
        Some(sample)
    })
}

fn triangle(length: usize, step: u16) -> impl Iterator<Item = u16> {
    let half = length / 2;
    (0..length).scan(0u16, move |value, i| {
        let sample = *value;
        *value = if i < half {
            value.wrapping_add(step)
        } else {
            value.wrapping_sub(step)
        };
        Some(sample)
    })
}

/// Synthesize one period of a waveform.
///
/// # Note
/// Ramps are not clamped. Voltages beyond the supply rail saturate in [crate::encode].
///
/// # Args
/// * `shape` - The waveform shape. [Shape::Square] receives the sine table.
/// * `frequency` - The frequency setting. Determines the table length.
///
/// # Returns
/// A table of [table_length] samples.
pub fn build(shape: Shape, frequency: Frequency) -> Result<SampleTable, Error> {
    let length = table_length(frequency);
    let step = RAMP_STEP_MILLIVOLTS * frequency.value() as u16;
    match shape {
        Shape::Sawtooth => collect(sawtooth(length, step)),
        Shape::Triangle => collect(triangle(length, 2 * step)),
        Shape::Sine | Shape::Square => collect(sine(length)),
    }
}

fn collect(samples: impl Iterator<Item = u16>) -> Result<SampleTable, Error> {
    let mut table = SampleTable::new();
    for sample in samples {
        table.push(sample).map_err(|_| Error::Capacity)?;
    }
    Ok(table)
}
