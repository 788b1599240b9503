#![cfg_attr(not(test), no_std)]
//! Keypad controlled function generator.
//!
//! The control path builds a complete [RenderState] (parameters, timer configuration and sample
//! table) and publishes it in one step. The sample timer interrupt only ever reads the latest
//! published state, advances its [PlaybackCursor] and writes one DAC word per event.

pub mod design_parameters;
pub mod settings;

mod codec;
pub use codec::*;
mod control;
pub use control::*;
mod output;
pub use output::*;
mod state;
pub use state::*;
mod timing;
pub use timing::*;
mod waveform;
pub use waveform::*;

#[cfg(target_os = "none")]
pub mod hardware;

#[cfg(test)]
pub mod testing;

#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Frequency setting {0} out of range")]
    Frequency(u8),
    #[error("Duty cycle {0}% out of range")]
    Duty(u8),
    #[error("Sample table capacity exceeded")]
    Capacity,
}
