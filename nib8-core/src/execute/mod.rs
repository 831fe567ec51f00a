//! Instruction handlers and the dispatcher that selects between them.
//!
//! Each handler is a state transition over a [`Machine`]: it reads and writes
//! registers, memory and timers, talks to the collaborators in
//! [`Peripherals`], and reports whether the caller should move the program
//! counter on.

pub(crate) mod arithmetic;
pub(crate) mod control;
pub(crate) mod devices;
pub(crate) mod memory;

use crate::{decode, ExecError, Framebuffer, Instruction, Keypad, Machine, RandomSource};

/// What the caller does with the program counter after a handler returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Move on by one instruction width.
    Advance,
    /// The handler already placed the program counter.
    AlreadySet,
}

/// Devices an instruction may touch besides the machine itself.
pub struct Peripherals<'a> {
    pub framebuffer: &'a mut dyn Framebuffer,
    pub keypad: &'a mut dyn Keypad,
    pub rng: &'a mut dyn RandomSource,
}

pub type Handler =
    fn(&mut Machine, &mut Peripherals<'_>, Instruction) -> Result<Status, ExecError>;

/// Decodes `word` and runs exactly one handler for it.
///
/// The program counter is expected to point at `word`. On `Advance` the
/// caller moves it on by [`INSTRUCTION_WIDTH`](crate::INSTRUCTION_WIDTH);
/// on `AlreadySet` it is left alone.
pub fn execute(
    machine: &mut Machine,
    peripherals: &mut Peripherals<'_>,
    word: u16,
) -> Result<Status, ExecError> {
    let instruction = Instruction(word);
    let handler = decode(instruction).ok_or(ExecError::Unimplemented { opcode: word })?;

    log::trace!(
        "{:#05x}: {:04X} I={:#05x} V={:02X?}",
        machine.program_counter,
        word,
        machine.index_register,
        (0..16).map(|i| machine.register(i)).collect::<Vec<_>>()
    );

    handler(machine, peripherals, instruction)
}
