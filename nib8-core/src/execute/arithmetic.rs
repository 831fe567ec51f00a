use nib8_macros::opcode;

use super::{Peripherals, Status};
use crate::{ExecError, Machine};

// Flag-producing instructions write Vx first and the flag last, so that when
// x is the flag register it ends up holding the flag.
fn write_with_flag(
    machine: &mut Machine,
    vx: u8,
    result: u8,
    flag: bool,
) -> Result<Status, ExecError> {
    *machine.register_mut(vx) = result;
    machine.set_flag(flag);
    Ok(Status::Advance)
}

#[opcode]
pub(crate) fn load_immediate(
    machine: &mut Machine,
    _io: &mut Peripherals<'_>,
    #[x] vx: u8,
    #[kk] value: u8,
) -> Result<Status, ExecError> {
    *machine.register_mut(vx) = value;
    Ok(Status::Advance)
}

#[opcode]
pub(crate) fn add_immediate(
    machine: &mut Machine,
    _io: &mut Peripherals<'_>,
    #[x] vx: u8,
    #[kk] value: u8,
) -> Result<Status, ExecError> {
    *machine.register_mut(vx) = machine.register(vx).wrapping_add(value);
    Ok(Status::Advance)
}

#[opcode]
pub(crate) fn load(
    machine: &mut Machine,
    _io: &mut Peripherals<'_>,
    #[x] vx: u8,
    #[y] vy: u8,
) -> Result<Status, ExecError> {
    *machine.register_mut(vx) = machine.register(vy);
    Ok(Status::Advance)
}

#[opcode]
pub(crate) fn or(
    machine: &mut Machine,
    _io: &mut Peripherals<'_>,
    #[x] vx: u8,
    #[y] vy: u8,
) -> Result<Status, ExecError> {
    *machine.register_mut(vx) |= machine.register(vy);
    Ok(Status::Advance)
}

#[opcode]
pub(crate) fn and(
    machine: &mut Machine,
    _io: &mut Peripherals<'_>,
    #[x] vx: u8,
    #[y] vy: u8,
) -> Result<Status, ExecError> {
    *machine.register_mut(vx) &= machine.register(vy);
    Ok(Status::Advance)
}

#[opcode]
pub(crate) fn xor(
    machine: &mut Machine,
    _io: &mut Peripherals<'_>,
    #[x] vx: u8,
    #[y] vy: u8,
) -> Result<Status, ExecError> {
    *machine.register_mut(vx) ^= machine.register(vy);
    Ok(Status::Advance)
}

#[opcode]
pub(crate) fn add_overflow(
    machine: &mut Machine,
    _io: &mut Peripherals<'_>,
    #[x] vx: u8,
    #[y] vy: u8,
) -> Result<Status, ExecError> {
    let (result, overflow) = machine.register(vx).overflowing_add(machine.register(vy));
    write_with_flag(machine, vx, result, overflow)
}

#[opcode]
pub(crate) fn sub_overflow(
    machine: &mut Machine,
    _io: &mut Peripherals<'_>,
    #[x] vx: u8,
    #[y] vy: u8,
) -> Result<Status, ExecError> {
    let (result, borrow) = machine.register(vx).overflowing_sub(machine.register(vy));
    write_with_flag(machine, vx, result, !borrow)
}

#[opcode]
pub(crate) fn subn_overflow(
    machine: &mut Machine,
    _io: &mut Peripherals<'_>,
    #[x] vx: u8,
    #[y] vy: u8,
) -> Result<Status, ExecError> {
    let (result, borrow) = machine.register(vy).overflowing_sub(machine.register(vx));
    write_with_flag(machine, vx, result, !borrow)
}

#[opcode]
pub(crate) fn shr(
    machine: &mut Machine,
    _io: &mut Peripherals<'_>,
    #[x] vx: u8,
) -> Result<Status, ExecError> {
    let value = machine.register(vx);
    write_with_flag(machine, vx, value >> 1, value & 0x01 != 0)
}

#[opcode]
pub(crate) fn shl(
    machine: &mut Machine,
    _io: &mut Peripherals<'_>,
    #[x] vx: u8,
) -> Result<Status, ExecError> {
    let value = machine.register(vx);
    write_with_flag(machine, vx, value << 1, value & 0x80 != 0)
}

#[opcode]
pub(crate) fn random(
    machine: &mut Machine,
    io: &mut Peripherals<'_>,
    #[x] vx: u8,
    #[kk] mask: u8,
) -> Result<Status, ExecError> {
    *machine.register_mut(vx) = io.rng.random_byte() & mask;
    Ok(Status::Advance)
}
