//! Recording doubles for the sample timer and the DAC.
use crate::{DacTransport, SampleTimer, TimerEvent};

/// A sample timer that records register writes. Events are raised by the test.
#[derive(Clone, Debug, Default)]
pub struct RecordingTimer {
    pub period: u32,
    pub compare: u32,
    pub latches: usize,
    pub compare_writes: usize,
    pub writes_since_latch: usize,
    pub period_elapsed: bool,
    pub compare_match: bool,
}

impl RecordingTimer {
    pub fn raise(&mut self, event: TimerEvent) {
        match event {
            TimerEvent::PeriodElapsed => self.period_elapsed = true,
            TimerEvent::CompareMatch => self.compare_match = true,
        }
    }
}

impl SampleTimer for RecordingTimer {
    fn set_period(&mut self, ticks: u32) {
        self.period = ticks;
        self.writes_since_latch += 1;
    }

    fn set_compare(&mut self, ticks: u32) {
        self.compare = ticks;
        self.compare_writes += 1;
        self.writes_since_latch += 1;
    }

    fn latch(&mut self) {
        self.latches += 1;
        self.writes_since_latch = 0;
        // Configuration writes are not output handler compare writes.
        self.compare_writes = 0;
        self.period_elapsed = true;
    }

    fn pending(&self) -> Option<TimerEvent> {
        if self.period_elapsed {
            Some(TimerEvent::PeriodElapsed)
        } else if self.compare_match {
            Some(TimerEvent::CompareMatch)
        } else {
            None
        }
    }

    fn clear(&mut self, event: TimerEvent) {
        match event {
            TimerEvent::PeriodElapsed => self.period_elapsed = false,
            TimerEvent::CompareMatch => self.compare_match = false,
        }
    }
}

/// Collects transmitted DAC words.
#[derive(Clone, Debug, Default)]
pub struct RecordingDac {
    pub words: Vec<u16>,
}

impl DacTransport for RecordingDac {
    fn transmit(&mut self, word: u16) {
        self.words.push(word);
    }
}
