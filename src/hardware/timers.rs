//! The sampling timer paces the DAC output.
use super::hal;

use crate::{SampleTimer, TimerEvent};

/// TIM2 as the sample clock. Compare channel 1 marks the samples.
pub struct SamplingTimer {
    timer: hal::timer::Timer<hal::stm32::TIM2>,
}

impl SamplingTimer {
    /// Construct the sampling timer.
    ///
    /// # Note
    /// The tick frequency must already be configured. The timer is left paused.
    pub fn new(mut timer: hal::timer::Timer<hal::stm32::TIM2>) -> Self {
        timer.pause();

        let regs = unsafe { &*hal::stm32::TIM2::ptr() };
        // Buffer the reload value so that it is only committed by an update event.
        regs.cr1.modify(|_, w| w.arpe().set_bit());

        Self { timer }
    }

    /// Enable the period-elapsed and compare-match interrupts.
    pub fn listen(&mut self) {
        let regs = unsafe { &*hal::stm32::TIM2::ptr() };
        regs.dier.modify(|_, w| w.uie().set_bit().cc1ie().set_bit());
    }

    /// Start the timer.
    pub fn start(&mut self) {
        self.timer.reset_counter();
        self.timer.resume();
    }
}

impl SampleTimer for SamplingTimer {
    fn set_period(&mut self, ticks: u32) {
        let regs = unsafe { &*hal::stm32::TIM2::ptr() };
        regs.arr.write(|w| w.arr().bits(ticks));
    }

    fn set_compare(&mut self, ticks: u32) {
        let regs = unsafe { &*hal::stm32::TIM2::ptr() };
        regs.ccr[0].write(|w| w.ccr().bits(ticks));
    }

    fn latch(&mut self) {
        let regs = unsafe { &*hal::stm32::TIM2::ptr() };
        regs.egr.write(|w| w.ug().set_bit());
    }

    fn pending(&self) -> Option<TimerEvent> {
        let regs = unsafe { &*hal::stm32::TIM2::ptr() };
        let sr = regs.sr.read();
        if sr.uif().bit_is_set() {
            Some(TimerEvent::PeriodElapsed)
        } else if sr.cc1if().bit_is_set() {
            Some(TimerEvent::CompareMatch)
        } else {
            None
        }
    }

    fn clear(&mut self, event: TimerEvent) {
        let regs = unsafe { &*hal::stm32::TIM2::ptr() };
        // Flags are cleared by writing zero. Writing one has no effect.
        match event {
            TimerEvent::PeriodElapsed => {
                regs.sr.write(|w| unsafe { w.bits(!0) }.uif().clear_bit())
            }
            TimerEvent::CompareMatch => {
                regs.sr.write(|w| unsafe { w.bits(!0) }.cc1if().clear_bit())
            }
        }
    }
}
