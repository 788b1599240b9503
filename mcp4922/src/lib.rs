#![no_std]

pub use arbitrary_int::u12;
use bitbybit::{bitenum, bitfield};
use embedded_hal::spi::{self, SpiBus};

#[bitenum(u1, exhaustive = true)]
#[derive(PartialEq, Debug)]
pub enum Channel {
    A = 0,
    B = 1,
}

/// A single 16-bit write command.
///
/// The DAC latches the data word into the selected channel when chip select is
/// released, so every command is a combined write and update.
#[bitfield(u16, default = 0x3000)]
#[derive(Debug, PartialEq)]
pub struct Command {
    #[bits(0..=11, rw)]
    data: u12,
    /// Output enabled. Clearing this shuts the channel down.
    #[bit(12, rw)]
    active: bool,
    /// Unity gain. Clearing this doubles the output span.
    #[bit(13, rw)]
    unity_gain: bool,
    #[bit(14, rw)]
    buffered: bool,
    #[bits(15..=15, rw)]
    channel: Channel,
}

impl Command {
    /// Header bits of an active, unity gain, unbuffered channel A write.
    pub const HEADER: u16 = 0x3000;

    /// The 12-bit data field.
    pub const DATA_MASK: u16 = 0x0fff;

    /// Channel A write of `code` with the default header.
    pub fn write(code: u12) -> Self {
        Self::DEFAULT.with_data(code)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("SPI")]
    Bus(spi::ErrorKind),
}

impl<E: spi::Error> From<E> for Error {
    fn from(value: E) -> Self {
        Self::Bus(value.kind())
    }
}

#[derive(Clone, Debug)]
pub struct Mcp4922<B> {
    bus: B,
}

impl<B: SpiBus<u16>> Mcp4922<B> {
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    /// Send a raw command word.
    pub fn send(&mut self, command: Command) -> Result<(), Error> {
        Ok(self.bus.write(&[command.raw_value()])?)
    }
}
