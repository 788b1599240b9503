//! 4x4 matrix keypad
//!
//! # Design
//! Rows are inputs with pull-downs, columns are push-pull outputs. With all columns driven high,
//! any pressed key pulls its row high, which makes the idle check a single read of the rows.
//! Locating the key drives one column at a time.
//!
//! Key presses are reported by the [Debouncer] only once the key has been released and the
//! contacts have been quiet for a settle time.
#![no_std]

use embedded_hal::digital::{self, InputPin, OutputPin};
use num_enum::{IntoPrimitive, TryFromPrimitive};

mod debounce;
pub use debounce::*;

/// Keypad key codes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum Key {
    Zero = 0,
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
    Six = 6,
    Seven = 7,
    Eight = 8,
    Nine = 9,
    Star = 10,
    Hash = 11,
    A = 12,
    B = 13,
    C = 14,
    D = 15,
}

impl Key {
    pub fn code(self) -> u8 {
        self.into()
    }
}

/// Key at each (row, column) position.
pub const LAYOUT: [[Key; 4]; 4] = [
    [Key::One, Key::Two, Key::Three, Key::A],
    [Key::Four, Key::Five, Key::Six, Key::B],
    [Key::Seven, Key::Eight, Key::Nine, Key::C],
    [Key::Star, Key::Zero, Key::Hash, Key::D],
];

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("GPIO")]
    Pin(digital::ErrorKind),
}

fn pin<E: digital::Error>(e: E) -> Error {
    Error::Pin(e.kind())
}

pub struct Keypad<R, C> {
    rows: [R; 4],
    cols: [C; 4],
}

impl<R: InputPin, C: OutputPin> Keypad<R, C> {
    /// Construct the keypad and drive all columns high.
    pub fn new(rows: [R; 4], cols: [C; 4]) -> Result<Self, Error> {
        let mut keypad = Self { rows, cols };
        keypad.columns_high()?;
        Ok(keypad)
    }

    fn columns_high(&mut self) -> Result<(), Error> {
        for col in self.cols.iter_mut() {
            col.set_high().map_err(pin)?;
        }
        Ok(())
    }

    fn columns_low(&mut self) -> Result<(), Error> {
        for col in self.cols.iter_mut() {
            col.set_low().map_err(pin)?;
        }
        Ok(())
    }

    /// Bitmask of the rows currently reading high.
    fn rows(&mut self) -> Result<u8, Error> {
        let mut mask = 0;
        for (i, row) in self.rows.iter_mut().enumerate() {
            if row.is_high().map_err(pin)? {
                mask |= 1 << i;
            }
        }
        Ok(mask)
    }

    fn scan(&mut self) -> Result<Option<Key>, Error> {
        self.columns_low()?;
        for col in 0..self.cols.len() {
            self.cols[col].set_high().map_err(pin)?;
            let rows = self.rows()?;
            self.cols[col].set_low().map_err(pin)?;
            // Two rows in one column can not be told apart from a chord.
            if rows.count_ones() == 1 {
                return Ok(Some(LAYOUT[rows.trailing_zeros() as usize][col]));
            }
        }
        Ok(None)
    }

    /// Return the key currently held down, if any.
    ///
    /// Non-blocking. All columns are driven high again on return.
    pub fn poll_key(&mut self) -> Result<Option<Key>, Error> {
        if self.rows()? == 0 {
            return Ok(None);
        }
        let key = self.scan();
        self.columns_high()?;
        key
    }
}
