use nib8_macros::opcode;

use super::{Peripherals, Status};
use crate::{ExecError, Machine};

#[opcode]
pub(crate) fn set_index(
    machine: &mut Machine,
    _io: &mut Peripherals<'_>,
    #[nnn] address: u16,
) -> Result<Status, ExecError> {
    machine.index_register = address;
    Ok(Status::Advance)
}

#[opcode]
pub(crate) fn add_index(
    machine: &mut Machine,
    _io: &mut Peripherals<'_>,
    #[x] vx: u8,
) -> Result<Status, ExecError> {
    machine.index_register = machine
        .index_register
        .wrapping_add(machine.register(vx) as u16);
    Ok(Status::Advance)
}

/// Fx29. Values above 0xF have no glyph and leave I untouched.
#[opcode]
pub(crate) fn get_font(
    machine: &mut Machine,
    _io: &mut Peripherals<'_>,
    #[x] vx: u8,
) -> Result<Status, ExecError> {
    if let Some(address) = machine.font_address(machine.register(vx)) {
        machine.index_register = address;
    }
    Ok(Status::Advance)
}

/// Fx33. Ones, tens, hundreds, in that order from I.
#[opcode]
pub(crate) fn load_bcd(
    machine: &mut Machine,
    _io: &mut Peripherals<'_>,
    #[x] vx: u8,
) -> Result<Status, ExecError> {
    let value = machine.register(vx);
    let address = machine.index_register as usize;
    machine.slice(address, 3)?;

    machine.write(address, value % 10)?;
    machine.write(address + 1, value / 10 % 10)?;
    machine.write(address + 2, value / 100)?;
    Ok(Status::Advance)
}

#[opcode]
pub(crate) fn store_register(
    machine: &mut Machine,
    _io: &mut Peripherals<'_>,
    #[x] vx: u8,
) -> Result<Status, ExecError> {
    let value = machine.register(vx);
    machine.write(machine.index_register as usize, value)?;
    Ok(Status::Advance)
}

#[opcode]
pub(crate) fn load_register(
    machine: &mut Machine,
    _io: &mut Peripherals<'_>,
    #[x] vx: u8,
) -> Result<Status, ExecError> {
    *machine.register_mut(vx) = machine.read(machine.index_register as usize)?;
    Ok(Status::Advance)
}
