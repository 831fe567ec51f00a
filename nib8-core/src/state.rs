use crate::{
    font::{FONT, GLYPH_SIZE},
    ExecError, LoadError,
};

pub const MEMORY_SIZE: usize = 4096;
pub const STACK_DEPTH: usize = 16;
pub const FLAG_REGISTER: u8 = 0xF;
/// Bytes per instruction word.
pub const INSTRUCTION_WIDTH: u16 = 2;

const DEFAULT_FONT_BASE: u16 = 0x050;
const DEFAULT_PROGRAM_START: u16 = 0x200;

/// Fixed-capacity stack of return addresses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallStack {
    slots: [u16; STACK_DEPTH],
    depth: usize,
}

impl CallStack {
    pub fn push(&mut self, address: u16) -> Result<(), ExecError> {
        let slot = self
            .slots
            .get_mut(self.depth)
            .ok_or(ExecError::StackOverflow { depth: self.depth })?;
        *slot = address;
        self.depth += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16, ExecError> {
        if self.depth == 0 {
            return Err(ExecError::StackUnderflow);
        }
        self.depth -= 1;
        Ok(self.slots[self.depth])
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_empty(&self) -> bool {
        self.depth == 0
    }
}

/// Complete architectural state of the console.
///
/// Register 15 doubles as the carry/borrow/collision flag. It is stored as a
/// separate field and only reachable as a register through [`Machine::register`]
/// and [`Machine::register_mut`].
#[derive(Debug, Clone)]
pub struct Machine {
    data_registers: [u8; 15],
    flag: u8,
    pub index_register: u16,
    pub program_counter: u16,
    pub stack: CallStack,
    pub ram: [u8; MEMORY_SIZE],
    delay_timer: u8,
    sound_timer: u8,
    /// Currently pressed key, 0 when none.
    pub keyboard_state: u8,
    font_base: u16,
}

impl Default for Machine {
    fn default() -> Self {
        let mut ram = [0; MEMORY_SIZE];
        let font_start = DEFAULT_FONT_BASE as usize;
        ram[font_start..font_start + FONT.len()].copy_from_slice(&FONT);

        Self {
            data_registers: [0; 15],
            flag: 0,
            index_register: 0,
            program_counter: DEFAULT_PROGRAM_START,
            stack: CallStack::default(),
            ram,
            delay_timer: 0,
            sound_timer: 0,
            keyboard_state: 0,
            font_base: DEFAULT_FONT_BASE,
        }
    }
}

impl Machine {
    /// Creates a machine with the built-in font installed at `font_base`.
    pub fn with_font_base(font_base: u16) -> Result<Self, LoadError> {
        let start = font_base as usize;
        let end = start + FONT.len();
        if end > MEMORY_SIZE {
            return Err(LoadError::FontOutOfRange { base: font_base });
        }

        let mut ram = [0; MEMORY_SIZE];
        ram[start..end].copy_from_slice(&FONT);

        Ok(Self {
            ram,
            font_base,
            ..Self::default()
        })
    }

    /// Copies a cartridge image to `start` and points the program counter at it.
    pub fn load_program(&mut self, start: u16, program: &[u8]) -> Result<(), LoadError> {
        let offset = start as usize;
        let available = MEMORY_SIZE.saturating_sub(offset);
        if program.len() > available {
            return Err(LoadError::ProgramTooLarge {
                size: program.len(),
                start,
                available,
            });
        }

        self.ram[offset..offset + program.len()].copy_from_slice(program);
        self.program_counter = start;
        log::debug!("loaded {} bytes at {start:#05x}", program.len());
        Ok(())
    }

    pub fn register(&self, register_index: u8) -> u8 {
        match register_index & 0xF {
            FLAG_REGISTER => self.flag,
            index => self.data_registers[index as usize],
        }
    }

    pub fn register_mut(&mut self, register_index: u8) -> &mut u8 {
        match register_index & 0xF {
            FLAG_REGISTER => &mut self.flag,
            index => &mut self.data_registers[index as usize],
        }
    }

    pub fn set_flag(&mut self, flag: bool) {
        self.flag = flag as u8;
    }

    pub fn flag(&self) -> u8 {
        self.flag
    }

    pub fn read(&self, address: usize) -> Result<u8, ExecError> {
        self.ram
            .get(address)
            .copied()
            .ok_or(ExecError::AddressOutOfRange { address })
    }

    pub fn write(&mut self, address: usize, value: u8) -> Result<(), ExecError> {
        let cell = self
            .ram
            .get_mut(address)
            .ok_or(ExecError::AddressOutOfRange { address })?;
        *cell = value;
        Ok(())
    }

    /// Borrows `len` bytes starting at `address`, failing on the first byte
    /// that lies outside memory.
    pub fn slice(&self, address: usize, len: usize) -> Result<&[u8], ExecError> {
        if address + len > MEMORY_SIZE {
            return Err(ExecError::AddressOutOfRange {
                address: address.max(MEMORY_SIZE),
            });
        }
        Ok(&self.ram[address..address + len])
    }

    /// Reads the big-endian instruction word at the program counter.
    pub fn fetch(&self) -> Result<u16, ExecError> {
        let bytes = self.slice(self.program_counter as usize, INSTRUCTION_WIDTH as usize)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    pub fn advance(&mut self) {
        self.program_counter = self.program_counter.wrapping_add(INSTRUCTION_WIDTH);
    }

    /// Steps over the current and the next instruction.
    pub fn skip(&mut self) {
        self.program_counter = self.program_counter.wrapping_add(2 * INSTRUCTION_WIDTH);
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer
    }

    pub fn set_delay_timer(&mut self, value: u8) {
        self.delay_timer = value;
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer
    }

    pub fn set_sound_timer(&mut self, value: u8) {
        self.sound_timer = value;
    }

    /// Lowers both timers by one, stopping at zero.
    pub fn tick_timers(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }

    pub fn press_key(&mut self, key: u8) {
        self.keyboard_state = key;
    }

    pub fn release_key(&mut self) {
        self.keyboard_state = 0;
    }

    pub fn font_base(&self) -> u16 {
        self.font_base
    }

    /// Address of the sprite for hexadecimal digit `glyph`, if there is one.
    pub fn font_address(&self, glyph: u8) -> Option<u16> {
        (glyph <= 0xF).then(|| self.font_base + GLYPH_SIZE * glyph as u16)
    }
}
