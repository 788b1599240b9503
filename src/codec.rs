//! Voltage to DAC transfer code conversion.
use mcp4922::{u12, Command};

use crate::design_parameters::{DAC_SCALE, SUPPLY_MILLIVOLTS};

/// Convert a target output voltage into an MCP4922 write-and-update word.
///
/// The voltage is scaled by [DAC_SCALE] to compensate the output stage and saturated to the
/// supply rail. Out-of-range inputs are never rejected.
///
/// # Args
/// * `millivolts` - Target output voltage.
///
/// # Returns
/// The 16-bit word to transmit: the command header over the 12-bit DAC code.
#[inline]
pub fn encode(millivolts: u32) -> u16 {
    // Truncation toward zero, saturating at u32::MAX.
    let scaled = (millivolts as f32 * DAC_SCALE) as u32;
    let code = scaled.min(SUPPLY_MILLIVOLTS as u32) as u16;
    Command::write(u12::new(code & Command::DATA_MASK)).raw_value()
}
