//! Function generator hardware configuration
use core::sync::atomic::{AtomicBool, Ordering};

use embedded_hal_compat::ForwardCompat;
use stm32h7xx_hal::{self as hal, gpio::Speed, prelude::*};

use super::{ColumnPin, Dac, DacSpi, Keypad, RowPin, SamplingTimer, Systick};
use crate::design_parameters;

/// SPI clock of the DAC link.
const DAC_SCK: u32 = 10_000_000;

pub struct Devices {
    /// Sample timer, paused and configured for [design_parameters::TIMER_FREQUENCY].
    pub timer: SamplingTimer,
    pub dac: Dac,
    pub keypad: Keypad,
}

/// Configure the hardware for operation.
///
/// # Args
/// * `core` - The cortex-m peripherals.
/// * `device` - The microcontroller peripherals to be configured.
///
/// # Returns
/// The devices in an idle state. Interrupts are not yet enabled.
pub fn setup(
    core: stm32h7xx_hal::stm32::CorePeripherals,
    device: stm32h7xx_hal::stm32::Peripherals,
) -> Devices {
    // RTT logging
    {
        // Keep the debug link alive while idle tasks sleep.
        device.DBGMCU.cr.modify(|_, w| w.dbgsleep_d1().set_bit());

        let channels = rtt_target::rtt_init_default!();
        // Note(unsafe): Instead of a critical section the closure takes a try-lock. The sample
        // interrupt is never delayed by logging, a message that finds the channel busy is dropped.
        unsafe {
            rtt_target::set_print_channel_cs(
                channels.up.0,
                &((|arg, f| {
                    static BUSY: AtomicBool = AtomicBool::new(false);
                    if BUSY
                        .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
                        .is_ok()
                    {
                        f(arg);
                        BUSY.store(false, Ordering::Release);
                    }
                }) as rtt_target::CriticalSectionFunc),
            );
        }

        static LOGGER: rtt_logger::RTTLogger =
            rtt_logger::RTTLogger::new(log::LevelFilter::Info);
        log::set_logger(&LOGGER)
            .map(|()| log::set_max_level(log::LevelFilter::Trace))
            .unwrap();
        log::info!("Starting");
    }

    let pwr = device.PWR.constrain();
    let vos = pwr.freeze();

    // Select the PLL for SPI1.
    device
        .RCC
        .d2ccip1r
        .modify(|_, w| w.spi123sel().pll2_p());

    let rcc = device.RCC.constrain();
    let ccdr = rcc
        .sysclk(400.MHz())
        .hclk(200.MHz())
        .pll2_p_ck(100.MHz())
        .freeze(vos, &device.SYSCFG);

    Systick::start(core.SYST, ccdr.clocks.sysclk().to_Hz());

    let gpioa = device.GPIOA.split(ccdr.peripheral.GPIOA);
    let gpiob = device.GPIOB.split(ccdr.peripheral.GPIOB);
    let gpioc = device.GPIOC.split(ccdr.peripheral.GPIOC);

    let timer = {
        // The tick frequency is set below, the 1 kHz setting here is a don't-care.
        let mut timer2 =
            device
                .TIM2
                .timer(1.kHz(), ccdr.peripheral.TIM2, &ccdr.clocks);

        timer2.pause();
        timer2.set_tick_freq(design_parameters::TIMER_FREQUENCY.Hz());

        SamplingTimer::new(timer2)
    };

    let dac = {
        let sck = gpioa.pa5.into_alternate().speed(Speed::VeryHigh);
        let mosi = gpioa.pa7.into_alternate().speed(Speed::VeryHigh);
        let nss = gpioa.pa4.into_alternate().speed(Speed::VeryHigh);

        // The MCP4922 latches the word on the rising chip select edge.
        let config = hal::spi::Config::new(hal::spi::MODE_0)
            .hardware_cs(hal::spi::HardwareCS {
                mode: hal::spi::HardwareCSMode::WordTransaction,
                assertion_delay: 0.0,
                polarity: hal::spi::Polarity::IdleHigh,
            })
            .communication_mode(hal::spi::CommunicationMode::Transmitter);

        let spi: DacSpi = device.SPI1.spi(
            (sck, hal::spi::NoMiso, mosi, nss),
            config,
            DAC_SCK.Hz(),
            ccdr.peripheral.SPI1,
            &ccdr.clocks,
        );

        Dac::new(spi.forward())
    };

    let keypad = {
        let rows: [RowPin; 4] = [
            gpioc.pc4.into_pull_down_input().erase().forward(),
            gpioc.pc5.into_pull_down_input().erase().forward(),
            gpioc.pc6.into_pull_down_input().erase().forward(),
            gpioc.pc7.into_pull_down_input().erase().forward(),
        ];
        let cols: [ColumnPin; 4] = [
            gpiob.pb4.into_push_pull_output().erase().forward(),
            gpiob.pb5.into_push_pull_output().erase().forward(),
            gpiob.pb6.into_push_pull_output().erase().forward(),
            gpiob.pb7.into_push_pull_output().erase().forward(),
        ];

        Keypad::new(rows, cols).unwrap()
    };

    log::info!("Setup complete");

    Devices { timer, dac, keypad }
}
