//! In-memory I2C device for host tests.

use std::collections::VecDeque;
use std::vec::Vec;

use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transfer {
    Write { address: u8, bytes: Vec<u8> },
    Read { address: u8, len: usize },
}

/// Records every transaction. Each transaction takes the next entry of
/// `nacks` (success once the script runs out); a successful read fills its
/// buffer from `registers`.
#[derive(Default)]
pub struct FakeI2c {
    pub transactions: Vec<Vec<Transfer>>,
    pub nacks: VecDeque<Option<NoAcknowledgeSource>>,
    pub registers: VecDeque<u8>,
}

impl FakeI2c {
    pub fn with_registers(registers: &[u8]) -> Self {
        FakeI2c {
            registers: registers.iter().copied().collect(),
            ..Default::default()
        }
    }
}

impl ErrorType for FakeI2c {
    type Error = ErrorKind;
}

impl I2c for FakeI2c {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let nack = self.nacks.pop_front().flatten();
        let mut transfers = Vec::new();

        for operation in operations.iter_mut() {
            match operation {
                Operation::Write(bytes) => transfers.push(Transfer::Write {
                    address,
                    bytes: bytes.to_vec(),
                }),
                Operation::Read(buffer) => {
                    transfers.push(Transfer::Read {
                        address,
                        len: buffer.len(),
                    });
                    if nack.is_none() {
                        for byte in buffer.iter_mut() {
                            *byte = self.registers.pop_front().unwrap_or(0);
                        }
                    }
                }
            }
        }
        self.transactions.push(transfers);

        match nack {
            Some(source) => Err(ErrorKind::NoAcknowledge(source)),
            None => Ok(()),
        }
    }
}
