//! atmega328p (Arduino Uno) implementation of the meter seam.

pub mod meters;
