use std::{
    collections::VecDeque,
    io::{self, BufRead, Write},
};

use nib8_core::{Beeper, Keypad};

/// Keypad fed from a list of keys given up front, falling back to reading
/// hexadecimal digits from stdin once the list runs out.
pub struct ScriptedKeypad {
    keys: VecDeque<u8>,
}

impl ScriptedKeypad {
    pub fn new(keys: impl IntoIterator<Item = u8>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }

    fn read_stdin() -> u8 {
        let stdin = io::stdin();
        let mut line = String::new();
        loop {
            print!("key (1-F)> ");
            if let Err(error) = io::stdout().flush() {
                log::debug!("flushing the key prompt failed: {error}");
            }

            line.clear();
            match stdin.lock().read_line(&mut line) {
                Ok(0) | Err(_) => {
                    log::warn!("stdin closed while waiting for a key, reporting no key");
                    return 0;
                }
                Ok(_) => {}
            }
            match parse_key(line.trim()) {
                Ok(key) => return key,
                Err(message) => eprintln!("{message}"),
            }
        }
    }
}

impl Keypad for ScriptedKeypad {
    fn blocking_read(&mut self) -> u8 {
        let key = self.keys.pop_front().unwrap_or_else(Self::read_stdin);
        log::debug!("key {key:X} pressed");
        key
    }
}

/// Parses a single hexadecimal key, `1` to `F`.
///
/// Key 0 is refused: a keyboard state of 0 reads as no key held.
pub fn parse_key(text: &str) -> Result<u8, String> {
    match u8::from_str_radix(text, 16) {
        Ok(0) => Err("key 0 cannot be pressed, it reads as no key held".to_string()),
        Ok(key) if key <= 0xF => Ok(key),
        _ => Err(format!("`{text}` is not a key, expected 1-F")),
    }
}

/// Beeper that reports sound on and off in the log.
#[derive(Default)]
pub struct LogBeeper {
    playing: bool,
}

impl Beeper for LogBeeper {
    fn play(&mut self) {
        if !self.playing {
            log::info!("beep on");
            self.playing = true;
        }
    }

    fn pause(&mut self) {
        if self.playing {
            log::info!("beep off");
            self.playing = false;
        }
    }
}
