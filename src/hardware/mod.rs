//! Hardware setup of the function generator
pub use stm32h7xx_hal as hal;

use embedded_hal_compat::{
    markers::{ForwardInputPin, ForwardOutputPin},
    Forward,
};

pub mod setup;
mod timers;

pub use timers::SamplingTimer;

rtic_monotonics::systick_monotonic!(Systick, 1_000);

/// Keypad row input.
pub type RowPin = Forward<hal::gpio::ErasedPin<hal::gpio::Input>, ForwardInputPin>;

/// Keypad column output.
pub type ColumnPin = Forward<hal::gpio::ErasedPin<hal::gpio::Output>, ForwardOutputPin>;

pub type Keypad = keypad::Keypad<RowPin, ColumnPin>;

/// SPI1 with 16-bit frames and hardware chip select.
pub type DacSpi = hal::spi::Spi<hal::stm32::SPI1, hal::spi::Enabled, u16>;

/// The output DAC. Every word is a complete write-and-update command.
pub type Dac = mcp4922::Mcp4922<Forward<DacSpi>>;

#[inline(never)]
#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    use core::{
        fmt::Write,
        sync::atomic::{AtomicBool, Ordering},
    };
    use cortex_m::asm;
    use rtt_target::{ChannelMode, UpChannel};

    // Stops the sample interrupt. The DAC holds its last output.
    cortex_m::interrupt::disable();

    // A panic while reporting a panic stops here.
    static PANICKED: AtomicBool = AtomicBool::new(false);
    while PANICKED.load(Ordering::Relaxed) {
        asm::bkpt();
    }
    PANICKED.store(true, Ordering::Relaxed);

    if let Some(mut channel) = unsafe { UpChannel::conjure(0) } {
        channel.set_mode(ChannelMode::BlockIfFull);
        writeln!(channel, "{}", info).ok();
    }

    asm::udf();
}

#[cortex_m_rt::exception]
unsafe fn HardFault(ef: &cortex_m_rt::ExceptionFrame) -> ! {
    panic!("HardFault at {:#?}", ef);
}

#[cortex_m_rt::exception]
unsafe fn DefaultHandler(irqn: i16) {
    panic!("Unhandled exception (IRQn = {})", irqn);
}
