use std::fmt;

use crate::execute::{arithmetic, control, devices, memory, Handler};

/// A fetched 16-bit instruction word.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Instruction(pub u16);

impl Instruction {
    /// Bits 12-15, the primary dispatch key.
    pub fn opcode(self) -> u8 {
        (self.0 >> 12) as u8
    }

    /// Bits 8-11, usually the destination register.
    pub fn x(self) -> u8 {
        ((self.0 >> 8) & 0xF) as u8
    }

    /// Bits 4-7, usually the source register.
    pub fn y(self) -> u8 {
        ((self.0 >> 4) & 0xF) as u8
    }

    /// Bits 0-3.
    pub fn n(self) -> u8 {
        (self.0 & 0xF) as u8
    }

    /// Bits 0-7, an immediate byte.
    pub fn kk(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    /// Bits 0-11, an immediate address.
    pub fn nnn(self) -> u16 {
        self.0 & 0xFFF
    }

    pub fn nibbles(self) -> [u8; 4] {
        [self.opcode(), self.x(), self.y(), self.n()]
    }
}

impl fmt::Debug for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Instruction({:04X})", self.0)
    }
}

/// Selects the handler for `instruction`, or `None` when the word matches
/// no known pattern.
pub fn decode(instruction: Instruction) -> Option<Handler> {
    let handler: Handler = match instruction.nibbles() {
        //clear display
        [0x0, 0x0, 0xE, 0x0] => devices::clear_display,
        //return
        [0x0, 0x0, 0xE, 0xE] => control::ret,
        //jump to address
        [0x1, _, _, _] => control::jump,
        //call subroutine
        [0x2, _, _, _] => control::call,
        //skip if Vx == kk
        [0x3, _, _, _] => control::skip_equal_immediate,
        //skip if Vx != kk
        [0x4, _, _, _] => control::skip_not_equal_immediate,
        //skip if Vx == Vy
        [0x5, _, _, 0x0] => control::skip_equal,
        //Vx = kk
        [0x6, _, _, _] => arithmetic::load_immediate,
        //Vx += kk
        [0x7, _, _, _] => arithmetic::add_immediate,
        //Vx = Vy
        [0x8, _, _, 0x0] => arithmetic::load,
        //Vx |= Vy
        [0x8, _, _, 0x1] => arithmetic::or,
        //Vx &= Vy
        [0x8, _, _, 0x2] => arithmetic::and,
        //Vx ^= Vy
        [0x8, _, _, 0x3] => arithmetic::xor,
        //Vx += Vy
        [0x8, _, _, 0x4] => arithmetic::add_overflow,
        //Vx -= Vy
        [0x8, _, _, 0x5] => arithmetic::sub_overflow,
        //Vx >>= 1
        [0x8, _, _, 0x6] => arithmetic::shr,
        //Vx = Vy - Vx
        [0x8, _, _, 0x7] => arithmetic::subn_overflow,
        //Vx <<= 1
        [0x8, _, _, 0xE] => arithmetic::shl,
        //skip if Vx != Vy
        [0x9, _, _, 0x0] => control::skip_not_equal,
        //I = nnn
        [0xA, _, _, _] => memory::set_index,
        //I = nnn + V0
        [0xB, _, _, _] => control::jump_offset,
        //Vx = rand() & kk
        [0xC, _, _, _] => arithmetic::random,
        //display sprite
        [0xD, _, _, _] => devices::draw_sprite,
        //skip if key == Vx
        [0xE, _, 0x9, 0xE] => devices::skip_key,
        //skip if key != Vx
        [0xE, _, 0xA, 0x1] => devices::skip_not_key,
        //Vx = delay timer
        [0xF, _, 0x0, 0x7] => devices::get_delay_timer,
        //Vx = wait for key
        [0xF, _, 0x0, 0xA] => devices::wait_key,
        //delay timer = Vx
        [0xF, _, 0x1, 0x5] => devices::set_delay_timer,
        //sound timer = Vx
        [0xF, _, 0x1, 0x8] => devices::set_sound_timer,
        //I += Vx
        [0xF, _, 0x1, 0xE] => memory::add_index,
        //I = glyph address of Vx
        [0xF, _, 0x2, 0x9] => memory::get_font,
        //decimal digits of Vx at I
        [0xF, _, 0x3, 0x3] => memory::load_bcd,
        //memory[I] = Vx
        [0xF, _, 0x5, 0x5] => memory::store_register,
        //Vx = memory[I]
        [0xF, _, 0x6, 0x5] => memory::load_register,
        _ => return None,
    };
    Some(handler)
}
