use core::ops::RangeInclusive;
use fugit::MillisDurationU32;

/// The counting frequency of the sample timer in Hertz.
pub const TIMER_FREQUENCY: u32 = 20_000_000;

/// Output frequency per unit of the frequency setting. A setting of 3 generates a 300 Hz
/// waveform.
pub const FREQUENCY_UNIT: u32 = 100;

/// The valid frequency settings.
pub const FREQUENCY_RANGE: RangeInclusive<u8> = 1..=5;

/// The number of samples in one period at a frequency setting of 1. Higher settings divide this
/// down.
pub const SAMPLES_PER_PERIOD: usize = 116;

/// Added to every timer period. Keeps the reload value clear of zero for any frequency setting.
pub const PERIOD_GUARD_TICKS: u32 = 100;

/// The high level of the square wave and the peak-to-peak swing of the sine, in millivolts.
pub const PEAK_MILLIVOLTS: u16 = 3000;

/// The low level of every waveform in millivolts.
pub const LOW_MILLIVOLTS: u16 = 0;

/// Sine amplitude and mid-rail bias in millivolts.
pub const AMPLITUDE_MILLIVOLTS: u16 = PEAK_MILLIVOLTS / 2;

/// DAC supply and reference voltage in millivolts. DAC codes are millivolts.
pub const SUPPLY_MILLIVOLTS: u16 = 3300;

/// Calibration of the output stage following the DAC.
pub const DAC_SCALE: f32 = 1.245;

/// Ramp increment per sample per unit of frequency setting, in millivolts.
pub const RAMP_STEP_MILLIVOLTS: u16 = 26;

/// The valid duty cycles in percent.
pub const DUTY_RANGE: RangeInclusive<u8> = 10..=90;

/// Duty cycle change per key press in percent.
pub const DUTY_STEP: u8 = 10;

/// Power-on and reset duty cycle in percent.
pub const DUTY_DEFAULT: u8 = 50;

/// The time the keypad must be quiet after a release before the key is acted upon.
pub const DEBOUNCE: MillisDurationU32 = MillisDurationU32::millis(10);
