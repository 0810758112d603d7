#![cfg_attr(not(test), no_std)]

pub mod bcd;
pub mod config;
pub mod meter;
pub mod millis;
pub mod rtc;
pub mod shared;
pub mod tick;
pub mod time;

#[cfg(target_arch = "avr")]
pub mod board;

#[cfg(test)]
mod test_i2c;
