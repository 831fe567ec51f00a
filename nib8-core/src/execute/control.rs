use nib8_macros::opcode;

use super::{Peripherals, Status};
use crate::{ExecError, Machine, INSTRUCTION_WIDTH};

pub(super) fn skip_if(machine: &mut Machine, condition: bool) -> Result<Status, ExecError> {
    if condition {
        machine.skip();
        Ok(Status::AlreadySet)
    } else {
        Ok(Status::Advance)
    }
}

#[opcode]
pub(crate) fn ret(machine: &mut Machine, _io: &mut Peripherals<'_>) -> Result<Status, ExecError> {
    let call_site = machine.stack.pop()?;
    log::debug!("return to {:#05x}", call_site);
    machine.program_counter = call_site.wrapping_add(INSTRUCTION_WIDTH);
    Ok(Status::AlreadySet)
}

#[opcode]
pub(crate) fn jump(
    machine: &mut Machine,
    _io: &mut Peripherals<'_>,
    #[nnn] address: u16,
) -> Result<Status, ExecError> {
    machine.program_counter = address;
    Ok(Status::AlreadySet)
}

#[opcode]
pub(crate) fn call(
    machine: &mut Machine,
    _io: &mut Peripherals<'_>,
    #[nnn] address: u16,
) -> Result<Status, ExecError> {
    machine.stack.push(machine.program_counter)?;
    log::debug!(
        "call {:#05x} from {:#05x}, depth {}",
        address,
        machine.program_counter,
        machine.stack.depth()
    );
    machine.program_counter = address;
    Ok(Status::AlreadySet)
}

/// Bnnn. Despite the name this loads the index register, not the program counter.
#[opcode]
pub(crate) fn jump_offset(
    machine: &mut Machine,
    _io: &mut Peripherals<'_>,
    #[nnn] address: u16,
) -> Result<Status, ExecError> {
    machine.index_register = address + machine.register(0x0) as u16;
    Ok(Status::Advance)
}

#[opcode]
pub(crate) fn skip_equal_immediate(
    machine: &mut Machine,
    _io: &mut Peripherals<'_>,
    #[x] vx: u8,
    #[kk] value: u8,
) -> Result<Status, ExecError> {
    let condition = machine.register(vx) == value;
    skip_if(machine, condition)
}

#[opcode]
pub(crate) fn skip_not_equal_immediate(
    machine: &mut Machine,
    _io: &mut Peripherals<'_>,
    #[x] vx: u8,
    #[kk] value: u8,
) -> Result<Status, ExecError> {
    let condition = machine.register(vx) != value;
    skip_if(machine, condition)
}

#[opcode]
pub(crate) fn skip_equal(
    machine: &mut Machine,
    _io: &mut Peripherals<'_>,
    #[x] vx: u8,
    #[y] vy: u8,
) -> Result<Status, ExecError> {
    let condition = machine.register(vx) == machine.register(vy);
    skip_if(machine, condition)
}

#[opcode]
pub(crate) fn skip_not_equal(
    machine: &mut Machine,
    _io: &mut Peripherals<'_>,
    #[x] vx: u8,
    #[y] vy: u8,
) -> Result<Status, ExecError> {
    let condition = machine.register(vx) != machine.register(vy);
    skip_if(machine, condition)
}
