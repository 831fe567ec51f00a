use std::io;

use thiserror::Error;

/// Why an instruction could not be executed.
///
/// Every variant is terminal for the current step; machine state is left as
/// it was before the instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ExecError {
    /// The word matches no known instruction pattern.
    #[error("unimplemented instruction {opcode:#06x}")]
    Unimplemented { opcode: u16 },
    /// A call would exceed the fixed call stack capacity.
    #[error("call stack overflow, {depth} return addresses already stored")]
    StackOverflow { depth: usize },
    /// A return was executed with no return address stored.
    #[error("return with an empty call stack")]
    StackUnderflow,
    /// A memory access fell outside the addressable range.
    #[error("memory access out of range at {address:#06x}")]
    AddressOutOfRange { address: usize },
}

/// Why a machine could not be set up.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("program of {size} bytes does not fit in the {available} bytes after {start:#05x}")]
    ProgramTooLarge {
        size: usize,
        start: u16,
        available: usize,
    },
    #[error("font table at {base:#05x} does not fit in memory")]
    FontOutOfRange { base: u16 },
    #[error("could not read program")]
    Io(#[from] io::Error),
}
