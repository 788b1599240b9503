//! Sample clock
//!
//! # Design
//! One hardware timer paces the output. Its reload value spans one full waveform period and
//! raises the period-elapsed event. A single compare channel raises the compare-match event:
//! * Square: the compare value sits at the duty-cycle edge and never moves.
//! * Table shapes: the compare value starts one sample interval into the period and is advanced
//!   by one sample interval on every match, so the table is played out evenly over the period.
use crate::{
    design_parameters::{FREQUENCY_UNIT, PERIOD_GUARD_TICKS, TIMER_FREQUENCY},
    table_length, Duty, Frequency, Shape,
};

/// Events raised by the sample timer. Both share one interrupt.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TimerEvent {
    /// The counter reached the reload value and restarted.
    PeriodElapsed,
    /// The counter matched the compare value.
    CompareMatch,
}

/// The hardware timer driving sample output.
pub trait SampleTimer {
    /// Write the reload value. Preloaded: takes effect on the next update event.
    fn set_period(&mut self, ticks: u32);

    /// Write the compare value. Takes effect immediately.
    fn set_compare(&mut self, ticks: u32);

    /// Generate an update event: commit the preloaded period, restart the counter and raise
    /// [TimerEvent::PeriodElapsed].
    fn latch(&mut self);

    /// The pending event. A pending period-elapsed event is reported before a compare match.
    fn pending(&self) -> Option<TimerEvent>;

    /// Clear a pending event.
    fn clear(&mut self, event: TimerEvent);
}

/// Timer reload and compare values for one set of parameters.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TimerConfig {
    /// Timer ticks per waveform period.
    pub period_ticks: u32,
    /// Ticks from period start to the first compare match.
    pub compare_ticks: u32,
}

impl TimerConfig {
    /// Compute the timer configuration.
    ///
    /// # Args
    /// * `frequency` - The frequency setting.
    /// * `duty` - The duty cycle. Only used for [Shape::Square].
    /// * `shape` - The waveform shape.
    pub fn new(frequency: Frequency, duty: Duty, shape: Shape) -> Self {
        let period_ticks = TIMER_FREQUENCY
            / (frequency.value() as u32 * FREQUENCY_UNIT)
            + PERIOD_GUARD_TICKS;

        let compare_ticks = match shape {
            Shape::Square => period_ticks * duty.value() as u32 / 100 - 1,
            // Re-derived by the output handler on every period.
            _ => period_ticks / table_length(frequency) as u32,
        };

        Self {
            period_ticks,
            compare_ticks,
        }
    }

    /// Ticks between two samples of a table with `length` entries.
    #[inline]
    pub fn sample_interval(&self, length: usize) -> u32 {
        self.period_ticks / length as u32
    }

    /// Program the timer.
    ///
    /// # Note
    /// A single update event commits period and compare together. This must be called with the
    /// timer interrupt masked so that the output handler never runs between the writes.
    pub fn apply<T: SampleTimer>(&self, timer: &mut T) {
        timer.set_period(self.period_ticks);
        timer.set_compare(self.compare_ticks);
        timer.latch();
    }
}
