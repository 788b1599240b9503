use core::cell::RefCell;

use critical_section::Mutex;

use crate::{
    build,
    design_parameters::{DUTY_DEFAULT, DUTY_RANGE, DUTY_STEP, FREQUENCY_RANGE},
    DacTransport, Error, OutputHandler, SampleTable, SampleTimer, Shape, TimerConfig, TimerEvent,
};

/// Frequency setting. The output frequency is the setting times
/// [crate::design_parameters::FREQUENCY_UNIT] Hz.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Frequency(u8);

impl Frequency {
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl Default for Frequency {
    fn default() -> Self {
        Self(*FREQUENCY_RANGE.start())
    }
}

impl TryFrom<u8> for Frequency {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Error> {
        if FREQUENCY_RANGE.contains(&value) {
            Ok(Self(value))
        } else {
            Err(Error::Frequency(value))
        }
    }
}

/// Square wave duty cycle in percent.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Duty(u8);

impl Duty {
    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn reset(self) -> Self {
        Self::default()
    }

    /// One step lower, saturating.
    pub fn decrease(self) -> Self {
        Self(self.0.saturating_sub(DUTY_STEP).max(*DUTY_RANGE.start()))
    }

    /// One step higher, saturating.
    pub fn increase(self) -> Self {
        Self(self.0.saturating_add(DUTY_STEP).min(*DUTY_RANGE.end()))
    }
}

impl Default for Duty {
    fn default() -> Self {
        Self(DUTY_DEFAULT)
    }
}

impl TryFrom<u8> for Duty {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Error> {
        if DUTY_RANGE.contains(&value) {
            Ok(Self(value))
        } else {
            Err(Error::Duty(value))
        }
    }
}

/// User selectable waveform parameters.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Parameters {
    pub shape: Shape,
    pub frequency: Frequency,
    /// Always stored. Only affects [Shape::Square].
    pub duty: Duty,
}

/// Everything the output interrupt needs to render the waveform.
///
/// A render state is built completely by [RenderState::new] and never modified afterwards.
/// Parameters, timer configuration and sample table therefore always belong together and the
/// table is never empty.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderState {
    parameters: Parameters,
    timing: TimerConfig,
    table: SampleTable,
    epoch: u32,
}

impl RenderState {
    /// Derive timer configuration and sample table from the parameters.
    pub fn new(parameters: Parameters, epoch: u32) -> Result<Self, Error> {
        let Parameters {
            shape,
            frequency,
            duty,
        } = parameters;
        Ok(Self {
            parameters,
            timing: TimerConfig::new(frequency, duty, shape),
            table: build(shape, frequency)?,
            epoch,
        })
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn timing(&self) -> &TimerConfig {
        &self.timing
    }

    pub fn table(&self) -> &SampleTable {
        &self.table
    }

    /// Publication counter. Distinguishes successive states with equal parameters.
    pub fn epoch(&self) -> u32 {
        self.epoch
    }

    /// Publish this state: program the timer and replace the current state.
    ///
    /// A compare match still pending from the previous state is discarded. The latch leaves a
    /// period-elapsed event pending, which starts the new state from its baseline.
    ///
    /// # Note
    /// Must be called with the sample timer interrupt masked.
    ///
    /// # Returns
    /// The previous state. Release it after the interrupt is unmasked.
    pub fn commit<T: SampleTimer>(self, current: &mut RenderState, timer: &mut T) -> RenderState {
        self.timing.apply(timer);
        timer.clear(TimerEvent::CompareMatch);
        core::mem::replace(current, self)
    }
}

/// Render state and sample timer behind a critical section.
///
/// This is the portable counterpart of the firmware's RTIC shared resources: [Shared::publish]
/// is called from the control path, [Shared::service] from the timer interrupt.
pub struct Shared<T> {
    inner: Mutex<RefCell<(RenderState, T)>>,
}

impl<T: SampleTimer> Shared<T> {
    /// Take ownership of the timer and publish the initial state.
    pub fn new(render: RenderState, mut timer: T) -> Self {
        render.timing().apply(&mut timer);
        Self {
            inner: Mutex::new(RefCell::new((render, timer))),
        }
    }

    /// Publish a new render state.
    ///
    /// # Returns
    /// The previous state. It is released by the caller outside the critical section.
    pub fn publish(&self, next: RenderState) -> RenderState {
        critical_section::with(|cs| {
            let (render, timer) = &mut *self.inner.borrow_ref_mut(cs);
            next.commit(render, timer)
        })
    }

    /// Handle a pending timer event.
    pub fn service<D: DacTransport>(&self, handler: &mut OutputHandler, dac: &mut D) {
        critical_section::with(|cs| {
            let (render, timer) = &mut *self.inner.borrow_ref_mut(cs);
            handler.on_interrupt(render, timer, dac);
        })
    }

    /// Access the current state and the timer.
    pub fn lock<R>(&self, f: impl FnOnce(&RenderState, &mut T) -> R) -> R {
        critical_section::with(|cs| {
            let (render, timer) = &mut *self.inner.borrow_ref_mut(cs);
            f(render, timer)
        })
    }
}
