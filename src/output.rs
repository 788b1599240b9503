//! Interrupt driven sample output
use embedded_hal_1::spi::SpiBus;

use crate::{
    design_parameters::{LOW_MILLIVOLTS, PEAK_MILLIVOLTS},
    encode, RenderState, SampleTimer, Shape, TimerEvent,
};

/// Fire-and-forget DAC word transmission.
pub trait DacTransport {
    fn transmit(&mut self, word: u16);
}

impl<B: SpiBus<u16>> DacTransport for mcp4922::Mcp4922<B> {
    #[inline]
    fn transmit(&mut self, word: u16) {
        // Nothing is read back from the DAC.
        self.send(mcp4922::Command::new_with_raw_value(word)).ok();
    }
}

/// Playback position within the published sample table.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PlaybackCursor {
    pub index: usize,
    pub millivolts: u16,
    /// The compare value of the next sample.
    pub compare: u32,
    /// Epoch of the render state this cursor belongs to.
    pub epoch: u32,
}

/// Sample timer interrupt handler. Sole owner of the [PlaybackCursor].
#[derive(Clone, Debug, Default)]
pub struct OutputHandler {
    cursor: PlaybackCursor,
}

impl OutputHandler {
    pub fn cursor(&self) -> &PlaybackCursor {
        &self.cursor
    }

    /// Service one timer event and write the resulting voltage to the DAC.
    ///
    /// # Note
    /// The DAC is written on every entry, including period-elapsed entries.
    ///
    /// # Args
    /// * `render` - The currently published render state.
    /// * `timer` - The sample timer raising the event.
    /// * `dac` - The DAC transport.
    pub fn on_interrupt<T: SampleTimer, D: DacTransport>(
        &mut self,
        render: &RenderState,
        timer: &mut T,
        dac: &mut D,
    ) {
        let cursor = &mut self.cursor;
        let table = render.table();
        let square = render.parameters().shape == Shape::Square;
        let interval = render.timing().sample_interval(table.len());

        // A newly published state restarts playback. The publication also latched the timer,
        // so a period-elapsed event is pending as well.
        if cursor.epoch != render.epoch() {
            *cursor = PlaybackCursor {
                epoch: render.epoch(),
                ..Default::default()
            };
        }

        match timer.pending() {
            Some(TimerEvent::PeriodElapsed) => {
                cursor.index = 0;
                cursor.millivolts = LOW_MILLIVOLTS;
                if !square {
                    cursor.compare = interval;
                    timer.set_compare(cursor.compare);
                }
                timer.clear(TimerEvent::PeriodElapsed);
            }
            Some(TimerEvent::CompareMatch) => {
                cursor.millivolts = if square {
                    PEAK_MILLIVOLTS
                } else {
                    // The period-elapsed event restarts the index before the table is exhausted.
                    table[cursor.index]
                };
                cursor.index += 1;
                if !square {
                    cursor.compare += interval;
                    timer.set_compare(cursor.compare);
                }
                timer.clear(TimerEvent::CompareMatch);
            }
            None => {}
        }

        dac.transmit(encode(cursor.millivolts as u32));
    }
}
