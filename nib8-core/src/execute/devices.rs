use nib8_macros::opcode;

use super::{control::skip_if, Peripherals, Status};
use crate::{ExecError, Machine};

#[opcode]
pub(crate) fn clear_display(
    _machine: &mut Machine,
    io: &mut Peripherals<'_>,
) -> Result<Status, ExecError> {
    io.framebuffer.clear();
    Ok(Status::Advance)
}

/// Dxyn. Draws the `n` rows stored at I with their corner at (Vx, Vy) and
/// sets VF when any lit pixel was turned off.
#[opcode]
pub(crate) fn draw_sprite(
    machine: &mut Machine,
    io: &mut Peripherals<'_>,
    #[x] vx: u8,
    #[y] vy: u8,
    #[n] height: usize,
) -> Result<Status, ExecError> {
    let x = machine.register(vx);
    let y = machine.register(vy);
    let rows = machine.slice(machine.index_register as usize, height)?;

    let collided = io.framebuffer.render_sprite(x, y, rows);

    machine.set_flag(collided);
    Ok(Status::Advance)
}

#[opcode]
pub(crate) fn skip_key(
    machine: &mut Machine,
    _io: &mut Peripherals<'_>,
    #[x] vx: u8,
) -> Result<Status, ExecError> {
    let condition = machine.register(vx) == machine.keyboard_state;
    skip_if(machine, condition)
}

#[opcode]
pub(crate) fn skip_not_key(
    machine: &mut Machine,
    _io: &mut Peripherals<'_>,
    #[x] vx: u8,
) -> Result<Status, ExecError> {
    let condition = machine.register(vx) != machine.keyboard_state;
    skip_if(machine, condition)
}

/// Fx0A. Only blocks when no key is held already.
#[opcode]
pub(crate) fn wait_key(
    machine: &mut Machine,
    io: &mut Peripherals<'_>,
    #[x] vx: u8,
) -> Result<Status, ExecError> {
    if machine.keyboard_state == 0 {
        machine.keyboard_state = io.keypad.blocking_read();
    }
    *machine.register_mut(vx) = machine.keyboard_state;
    Ok(Status::Advance)
}

#[opcode]
pub(crate) fn get_delay_timer(
    machine: &mut Machine,
    _io: &mut Peripherals<'_>,
    #[x] vx: u8,
) -> Result<Status, ExecError> {
    *machine.register_mut(vx) = machine.delay_timer();
    Ok(Status::Advance)
}

#[opcode]
pub(crate) fn set_delay_timer(
    machine: &mut Machine,
    _io: &mut Peripherals<'_>,
    #[x] vx: u8,
) -> Result<Status, ExecError> {
    machine.set_delay_timer(machine.register(vx));
    Ok(Status::Advance)
}

#[opcode]
pub(crate) fn set_sound_timer(
    machine: &mut Machine,
    _io: &mut Peripherals<'_>,
    #[x] vx: u8,
) -> Result<Status, ExecError> {
    machine.set_sound_timer(machine.register(vx));
    Ok(Status::Advance)
}

#[cfg(test)]
mod tests {
    use super::super::testing::Rig;
    use super::*;
    use crate::{MEMORY_SIZE, SCREEN_WIDTH};

    fn sprite_rig() -> Rig {
        let mut rig = Rig::with_registers(&[(0x1, 4), (0x2, 6)]);
        rig.machine.index_register = 0x300;
        rig.machine.ram[0x300..0x302].copy_from_slice(&[0b1100_0000, 0b0011_0000]);
        rig
    }

    #[test]
    fn clear_display_blanks_the_screen() {
        let mut rig = sprite_rig();
        rig.run(0xD122).unwrap();
        assert!(rig.screen.lit_pixels() > 0);

        assert_eq!(rig.run(0x00E0), Ok(Status::Advance));
        assert_eq!(rig.screen.lit_pixels(), 0);
    }

    #[test]
    fn sprite_comes_from_memory_at_index() {
        let mut rig = sprite_rig();
        assert_eq!(rig.run(0xD122), Ok(Status::Advance));
        assert_eq!(rig.machine.register(0xF), 0);
        assert!(rig.screen.pixel(4, 6));
        assert!(rig.screen.pixel(5, 6));
        assert!(rig.screen.pixel(6, 7));
        assert!(rig.screen.pixel(7, 7));
        assert_eq!(rig.screen.lit_pixels(), 4);
    }

    #[test]
    fn second_draw_erases_and_collides() {
        let mut rig = sprite_rig();
        rig.run(0xD122).unwrap();
        assert_eq!(rig.run(0xD122), Ok(Status::Advance));
        assert_eq!(rig.machine.register(0xF), 1);
        assert_eq!(rig.screen.lit_pixels(), 0);
    }

    #[test]
    fn height_comes_from_the_low_nibble() {
        let mut rig = sprite_rig();
        rig.run(0xD121).unwrap();
        assert_eq!(rig.screen.lit_pixels(), 2);
    }

    #[test]
    fn sprite_past_memory_fails() {
        let mut rig = sprite_rig();
        rig.machine.index_register = (MEMORY_SIZE - 1) as u16;
        assert_eq!(
            rig.run(0xD122),
            Err(ExecError::AddressOutOfRange {
                address: MEMORY_SIZE
            })
        );
        assert_eq!(rig.screen.lit_pixels(), 0);
    }

    #[test]
    fn sprite_at_right_edge_is_clipped() {
        let mut rig = sprite_rig();
        *rig.machine.register_mut(0x1) = (SCREEN_WIDTH - 1) as u8;
        rig.run(0xD121).unwrap();
        assert_eq!(rig.screen.lit_pixels(), 1);
    }

    #[test]
    fn key_skips_compare_against_keyboard_state() {
        let mut rig = Rig::with_registers(&[(0x3, 0x7)]);
        rig.machine.press_key(0x7);
        assert_eq!(rig.run(0xE39E), Ok(Status::AlreadySet));
        assert_eq!(rig.machine.program_counter, 0x204);
        assert_eq!(rig.run(0xE3A1), Ok(Status::Advance));
        assert_eq!(rig.machine.program_counter, 0x204);

        rig.machine.release_key();
        assert_eq!(rig.run(0xE39E), Ok(Status::Advance));
        assert_eq!(rig.run(0xE3A1), Ok(Status::AlreadySet));
        assert_eq!(rig.machine.program_counter, 0x208);
    }

    #[test]
    fn wait_key_blocks_only_without_a_held_key() {
        let mut rig = Rig::default();
        rig.keys.keys.push_back(0xB);
        assert_eq!(rig.run(0xF40A), Ok(Status::Advance));
        assert_eq!(rig.machine.register(0x4), 0xB);
        assert_eq!(rig.machine.keyboard_state, 0xB);
        assert_eq!(rig.keys.reads, 1);

        assert_eq!(rig.run(0xF50A), Ok(Status::Advance));
        assert_eq!(rig.machine.register(0x5), 0xB);
        assert_eq!(rig.keys.reads, 1);
    }

    #[test]
    fn timers_round_trip_through_registers() {
        let mut rig = Rig::with_registers(&[(0x6, 42), (0x7, 9)]);
        assert_eq!(rig.run(0xF615), Ok(Status::Advance));
        assert_eq!(rig.run(0xF718), Ok(Status::Advance));
        assert_eq!(rig.machine.delay_timer(), 42);
        assert_eq!(rig.machine.sound_timer(), 9);

        rig.machine.tick_timers();
        assert_eq!(rig.run(0xF807), Ok(Status::Advance));
        assert_eq!(rig.machine.register(0x8), 41);
    }
}
