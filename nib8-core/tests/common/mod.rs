use std::collections::VecDeque;

use nib8_core::{execute, ExecError, Keypad, Machine, Peripherals, PixelGrid, Status};
use rand::rngs::mock::StepRng;

#[derive(Default)]
pub struct QueuedKeys(pub VecDeque<u8>);

impl Keypad for QueuedKeys {
    fn blocking_read(&mut self) -> u8 {
        self.0.pop_front().unwrap_or(0)
    }
}

pub struct Console {
    pub machine: Machine,
    pub screen: PixelGrid,
    pub keys: QueuedKeys,
    pub rng: StepRng,
}

impl Default for Console {
    fn default() -> Self {
        Self {
            machine: Machine::default(),
            screen: PixelGrid::default(),
            keys: QueuedKeys::default(),
            rng: StepRng::new(0, 1),
        }
    }
}

impl Console {
    pub fn execute(&mut self, word: u16) -> Result<Status, ExecError> {
        let mut peripherals = Peripherals {
            framebuffer: &mut self.screen,
            keypad: &mut self.keys,
            rng: &mut self.rng,
        };
        execute(&mut self.machine, &mut peripherals, word)
    }

    /// Runs the word the way a fetch loop would, applying `Advance`.
    pub fn cycle(&mut self, word: u16) -> Result<Status, ExecError> {
        let status = self.execute(word)?;
        if status == Status::Advance {
            self.machine.advance();
        }
        Ok(status)
    }
}
