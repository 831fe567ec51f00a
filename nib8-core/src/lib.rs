mod beeper;
mod config;
mod decode;
mod display;
mod error;
pub mod execute;
mod font;
mod interpreter;
mod keypad;
mod random;
mod state;

pub use beeper::Beeper;
pub use config::{Config, UnknownPolicy};
pub use decode::{decode, Instruction};
pub use display::{Framebuffer, PixelGrid, SCREEN_HEIGHT, SCREEN_WIDTH};
pub use error::{ExecError, LoadError};
pub use execute::{execute, Handler, Peripherals, Status};
pub use font::{FONT, GLYPH_SIZE};
pub use interpreter::Interpreter;
pub use keypad::Keypad;
pub use random::RandomSource;
pub use state::{
    CallStack, Machine, FLAG_REGISTER, INSTRUCTION_WIDTH, MEMORY_SIZE, STACK_DEPTH,
};
