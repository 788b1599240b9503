//! Keypad controlled function generator.
//!
//! Keys 1 to 5 select the output frequency in steps of 100 Hz, keys 6 to 9 select sine, triangle,
//! sawtooth and square waveforms. Key 0 resets the square wave duty cycle to 50 %, `*` and `#`
//! decrease and increase it in steps of 10 %.
//!
//! The waveform is generated sample by sample from the TIM2 interrupt and written to an MCP4922
//! DAC over SPI1.
#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]

#[cfg(not(target_os = "none"))]
fn main() {
    let s = funcgen::settings::Settings::default();
    let json: heapless::String<128> = serde_json_core::to_string(&s).unwrap();
    println!("{}", json);
}

#[cfg(target_os = "none")]
#[rtic::app(device = funcgen::hardware::hal::stm32, peripherals = true, dispatchers=[DCMI])]
mod app {
    use fugit::ExtU32;
    use rtic_monotonics::Monotonic;

    use funcgen::{
        design_parameters::DEBOUNCE,
        hardware::{self, Dac, Keypad, SamplingTimer, Systick},
        settings::Settings,
        Controller, Intent, OutputHandler, Parameters, RenderState,
    };
    use keypad::Debouncer;

    #[shared]
    struct Shared {
        render: RenderState,
        timer: SamplingTimer,
    }

    #[local]
    struct Local {
        output: OutputHandler,
        dac: Dac,
        keypad: Keypad,
        debouncer: Debouncer,
        controller: Controller,
    }

    #[init]
    fn init(c: init::Context) -> (Shared, Local) {
        let mut devices = hardware::setup::setup(c.core, c.device);

        let parameters = Parameters::try_from(Settings::default()).unwrap();
        let controller = Controller::new(parameters);
        let render = controller.render().unwrap();

        render.timing().apply(&mut devices.timer);
        devices.timer.listen();
        devices.timer.start();
        log::info!("Output: {:?}", parameters);

        keys::spawn().unwrap();

        (
            Shared {
                render,
                timer: devices.timer,
            },
            Local {
                output: OutputHandler::default(),
                dac: devices.dac,
                keypad: devices.keypad,
                debouncer: Debouncer::new(DEBOUNCE),
                controller,
            },
        )
    }

    #[task(priority = 1, shared=[render, timer], local=[keypad, debouncer, controller])]
    async fn keys(mut c: keys::Context) {
        loop {
            let key = c.local.keypad.poll_key().unwrap_or_else(|e| {
                log::warn!("Keypad: {}", e);
                None
            });

            if let Some(key) = c.local.debouncer.update(Systick::now(), key) {
                match Intent::from_key(key) {
                    Some(intent) => {
                        // Without a table there is nothing to output.
                        let next = c.local.controller.handle(intent).unwrap();
                        let previous = (&mut c.shared.render, &mut c.shared.timer)
                            .lock(|render, timer| next.commit(render, timer));
                        drop(previous);
                    }
                    None => log::debug!("Ignoring key {:?}", key),
                }
            }

            Systick::delay(1.millis()).await;
        }
    }

    #[task(binds = TIM2, priority = 2, shared=[render, timer], local=[output, dac])]
    fn sample(mut c: sample::Context) {
        let output = c.local.output;
        let dac = c.local.dac;
        (&mut c.shared.render, &mut c.shared.timer)
            .lock(|render, timer| output.on_interrupt(render, timer, dac));
    }
}
