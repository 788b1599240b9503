//! Key driven parameter changes
use keypad::Key;
use log::{debug, info};

use crate::{design_parameters::FREQUENCY_UNIT, Error, Frequency, Parameters, RenderState, Shape};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DutyStep {
    Reset,
    Decrease,
    Increase,
}

/// A validated parameter change request.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    Frequency(Frequency),
    Shape(Shape),
    Duty(DutyStep),
}

impl Intent {
    /// Map a key to its intent. Letter keys have none.
    pub fn from_key(key: Key) -> Option<Self> {
        let code = key.code();
        match key {
            Key::One | Key::Two | Key::Three | Key::Four | Key::Five => {
                Frequency::try_from(code).ok().map(Self::Frequency)
            }
            Key::Six | Key::Seven | Key::Eight | Key::Nine => {
                Some(Self::Shape(Shape::from_code(code)))
            }
            Key::Zero => Some(Self::Duty(DutyStep::Reset)),
            Key::Star => Some(Self::Duty(DutyStep::Decrease)),
            Key::Hash => Some(Self::Duty(DutyStep::Increase)),
            Key::A | Key::B | Key::C | Key::D => None,
        }
    }
}

/// The control path. Owns the parameters and produces render states for publication.
#[derive(Clone, Debug)]
pub struct Controller {
    parameters: Parameters,
    epoch: u32,
}

impl Controller {
    pub fn new(parameters: Parameters) -> Self {
        Self {
            parameters,
            epoch: 0,
        }
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// The render state for the current parameters.
    pub fn render(&self) -> Result<RenderState, Error> {
        RenderState::new(self.parameters, self.epoch)
    }

    /// Apply an intent.
    ///
    /// Timing and sample table are always rebuilt together with the changed parameter. The new
    /// parameters are adopted only once the render state is complete.
    ///
    /// # Returns
    /// The render state to publish.
    pub fn handle(&mut self, intent: Intent) -> Result<RenderState, Error> {
        let mut parameters = self.parameters;
        match intent {
            Intent::Frequency(frequency) => parameters.frequency = frequency,
            Intent::Shape(shape) => parameters.shape = shape,
            Intent::Duty(step) => {
                parameters.duty = match step {
                    DutyStep::Reset => parameters.duty.reset(),
                    DutyStep::Decrease => parameters.duty.decrease(),
                    DutyStep::Increase => parameters.duty.increase(),
                }
            }
        }

        let epoch = self.epoch.wrapping_add(1);
        let render = RenderState::new(parameters, epoch)?;
        debug!("Timing: {:?}", render.timing());

        self.parameters = parameters;
        self.epoch = epoch;
        info!(
            "{} {} Hz, {}% duty",
            parameters.shape.as_ref(),
            parameters.frequency.value() as u32 * FREQUENCY_UNIT,
            parameters.duty.value()
        );
        Ok(render)
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(Parameters::default())
    }
}
