use std::{
    fs,
    path::Path,
    thread,
    time::{Duration, Instant},
};

use rand::{rngs::StdRng, SeedableRng};

use crate::{
    execute, Beeper, Config, ExecError, Framebuffer, Instruction, Keypad, LoadError, Machine,
    Peripherals, Status, UnknownPolicy,
};

struct Timer {
    interval: Duration,
    last_tick: Instant,
}

impl Timer {
    fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_tick: Instant::now(),
        }
    }

    fn tick(&mut self) -> bool {
        if self.last_tick.elapsed() >= self.interval {
            self.last_tick += self.interval;
            true
        } else {
            false
        }
    }
}

fn is_wait_key(instruction: Instruction) -> bool {
    instruction.opcode() == 0xF && instruction.kk() == 0x0A
}

/// Fetch loop that wires a [`Machine`] to its devices.
pub struct Interpreter<F: Framebuffer, K: Keypad, B: Beeper> {
    pub machine: Machine,
    pub framebuffer: F,
    pub keypad: K,
    pub beeper: B,
    config: Config,
    rng: StdRng,
}

impl<F: Framebuffer, K: Keypad, B: Beeper> Interpreter<F, K, B> {
    pub fn new(config: Config, framebuffer: F, keypad: K, beeper: B) -> Result<Self, LoadError> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            machine: Machine::with_font_base(config.font_base)?,
            framebuffer,
            keypad,
            beeper,
            config,
            rng,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), LoadError> {
        let program = fs::read(path)?;
        self.load(&program)
    }

    /// Resets the machine and installs `program` at the configured start.
    pub fn load(&mut self, program: &[u8]) -> Result<(), LoadError> {
        self.machine = Machine::with_font_base(self.config.font_base)?;
        self.machine.load_program(self.config.program_start, program)?;
        self.framebuffer.clear();
        log::info!(
            "loaded {} byte program at {:#05x}",
            program.len(),
            self.config.program_start
        );
        Ok(())
    }

    /// Executes one instruction and moves the program counter on.
    ///
    /// A key read by a wait stays held for exactly one following
    /// instruction, so a key skip right after the wait sees it and the next
    /// wait blocks for a fresh key.
    pub fn step(&mut self) -> Result<Status, ExecError> {
        let word = self.machine.fetch()?;
        let waits_for_key = is_wait_key(Instruction(word));
        if waits_for_key {
            self.machine.release_key();
        }

        let mut peripherals = Peripherals {
            framebuffer: &mut self.framebuffer,
            keypad: &mut self.keypad,
            rng: &mut self.rng,
        };

        let status = match execute(&mut self.machine, &mut peripherals, word) {
            Err(ExecError::Unimplemented { opcode })
                if self.config.on_unknown == UnknownPolicy::Skip =>
            {
                log::warn!(
                    "skipping unimplemented instruction {:04X} at {:#05x}",
                    opcode,
                    self.machine.program_counter
                );
                Status::Advance
            }
            result => result?,
        };

        if !waits_for_key {
            self.machine.release_key();
        }
        if status == Status::Advance {
            self.machine.advance();
        }
        Ok(status)
    }

    /// One timer period: lowers both timers and keeps the beeper in step
    /// with the sound timer.
    pub fn tick(&mut self) {
        self.machine.tick_timers();
        if self.machine.sound_timer() > 0 {
            self.beeper.play();
        } else {
            self.beeper.pause();
        }
    }

    /// Runs until an instruction fails or `max_cycles` instructions have
    /// executed, returning how many did.
    pub fn run(&mut self, max_cycles: Option<u64>) -> Result<u64, ExecError> {
        let cpu_frame_time =
            Duration::from_secs_f64(1. / self.config.max_clock_speed.max(1) as f64);
        let mut next_cpu_frame = Instant::now() + cpu_frame_time;
        let mut timer = Timer::new(Duration::from_secs_f64(
            1. / self.config.timer_hz.max(1) as f64,
        ));

        let mut cycles = 0;
        while max_cycles.map_or(true, |max| cycles < max) {
            if let Err(error) = self.step() {
                log::error!(
                    "halted at {:#05x} after {cycles} instructions: {error}",
                    self.machine.program_counter
                );
                return Err(error);
            }
            cycles += 1;

            if timer.tick() {
                self.tick();
            }

            if self.config.throttle {
                let now = Instant::now();
                if next_cpu_frame > now {
                    thread::sleep(next_cpu_frame - now);
                }
                next_cpu_frame += cpu_frame_time;
            }
        }
        Ok(cycles)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::PixelGrid;

    #[derive(Default)]
    struct ScriptedKeys {
        keys: VecDeque<u8>,
        reads: usize,
    }

    impl Keypad for ScriptedKeys {
        fn blocking_read(&mut self) -> u8 {
            self.reads += 1;
            self.keys.pop_front().unwrap_or(0)
        }
    }

    #[derive(Default)]
    struct CountingBeeper {
        playing: bool,
        plays: usize,
    }

    impl Beeper for CountingBeeper {
        fn play(&mut self) {
            self.playing = true;
            self.plays += 1;
        }

        fn pause(&mut self) {
            self.playing = false;
        }
    }

    fn interpreter(config: Config) -> Interpreter<PixelGrid, ScriptedKeys, CountingBeeper> {
        Interpreter::new(
            config,
            PixelGrid::default(),
            ScriptedKeys::default(),
            CountingBeeper::default(),
        )
        .unwrap()
    }

    fn unthrottled() -> Config {
        Config {
            throttle: false,
            seed: Some(1),
            ..Config::default()
        }
    }

    #[test]
    fn step_advances_past_plain_instructions() {
        let mut interpreter = interpreter(unthrottled());
        interpreter
            .load(&[0x6A, 0x07, 0x3A, 0x07, 0x6B, 0x01, 0x6C, 0x02])
            .unwrap();

        assert_eq!(interpreter.step(), Ok(Status::Advance));
        assert_eq!(interpreter.machine.program_counter, 0x202);
        assert_eq!(interpreter.step(), Ok(Status::AlreadySet));
        assert_eq!(interpreter.machine.program_counter, 0x206);
        interpreter.step().unwrap();
        assert_eq!(interpreter.machine.register(0xB), 0);
        assert_eq!(interpreter.machine.register(0xC), 2);
    }

    #[test]
    fn subroutine_round_trip() {
        let mut interpreter = interpreter(unthrottled());
        // 0x200: call 0x206; 0x202: V1 = 2; 0x204: jump 0x204; 0x206: V0 = 1; return
        interpreter
            .load(&[0x22, 0x06, 0x61, 0x02, 0x12, 0x04, 0x60, 0x01, 0x00, 0xEE])
            .unwrap();
        assert_eq!(interpreter.run(Some(5)), Ok(5));
        assert_eq!(interpreter.machine.register(0x0), 1);
        assert_eq!(interpreter.machine.register(0x1), 2);
        assert_eq!(interpreter.machine.program_counter, 0x204);
    }

    #[test]
    fn consecutive_waits_read_fresh_keys() {
        let mut interpreter = interpreter(unthrottled());
        interpreter.keypad.keys.extend([0x1, 0x2]);
        interpreter.load(&[0xF0, 0x0A, 0xF1, 0x0A]).unwrap();

        assert_eq!(interpreter.run(Some(2)), Ok(2));
        assert_eq!(interpreter.machine.register(0x0), 0x1);
        assert_eq!(interpreter.machine.register(0x1), 0x2);
        assert_eq!(interpreter.keypad.reads, 2);
    }

    #[test]
    fn waited_key_is_held_for_the_next_instruction_only() {
        let mut interpreter = interpreter(unthrottled());
        interpreter.keypad.keys.push_back(0x7);
        // 0x200: V0 = key; 0x202: skip if V0 held; 0x204: V1 = 1;
        // 0x206: skip if V0 held; 0x208: V2 = 1
        interpreter
            .load(&[0xF0, 0x0A, 0xE0, 0x9E, 0x61, 0x01, 0xE0, 0x9E, 0x62, 0x01])
            .unwrap();

        assert_eq!(interpreter.step(), Ok(Status::Advance));
        assert_eq!(interpreter.machine.keyboard_state, 0x7);
        assert_eq!(interpreter.step(), Ok(Status::AlreadySet));
        assert_eq!(interpreter.machine.keyboard_state, 0);
        assert_eq!(interpreter.machine.program_counter, 0x206);
        assert_eq!(interpreter.step(), Ok(Status::Advance));
        interpreter.step().unwrap();
        assert_eq!(interpreter.machine.register(0x1), 0);
        assert_eq!(interpreter.machine.register(0x2), 1);
    }

    #[test]
    fn unknown_instruction_halts_by_default() {
        let mut interpreter = interpreter(unthrottled());
        interpreter.load(&[0x60, 0x01, 0xFF, 0xFF]).unwrap();
        assert_eq!(
            interpreter.run(Some(10)),
            Err(ExecError::Unimplemented { opcode: 0xFFFF })
        );
        assert_eq!(interpreter.machine.program_counter, 0x202);
    }

    #[test]
    fn unknown_instruction_can_be_skipped() {
        let mut interpreter = interpreter(Config {
            on_unknown: UnknownPolicy::Skip,
            ..unthrottled()
        });
        interpreter.load(&[0xFF, 0xFF, 0x60, 0x09]).unwrap();
        assert_eq!(interpreter.run(Some(2)), Ok(2));
        assert_eq!(interpreter.machine.register(0x0), 9);
    }

    #[test]
    fn tick_drives_timers_and_beeper() {
        let mut interpreter = interpreter(unthrottled());
        interpreter.machine.set_sound_timer(2);
        interpreter.machine.set_delay_timer(1);

        interpreter.tick();
        assert!(interpreter.beeper.playing);
        assert_eq!(interpreter.machine.delay_timer(), 0);

        interpreter.tick();
        assert!(!interpreter.beeper.playing);
        assert_eq!(interpreter.beeper.plays, 1);
    }

    #[test]
    fn load_resets_previous_state() {
        let mut interpreter = interpreter(unthrottled());
        interpreter.load(&[0x60, 0x01]).unwrap();
        interpreter.step().unwrap();
        interpreter.load(&[0x00, 0xE0]).unwrap();
        assert_eq!(interpreter.machine.register(0x0), 0);
        assert_eq!(interpreter.machine.program_counter, 0x200);
    }

    #[test]
    fn seeded_runs_are_repeatable() {
        let program = [0xC0, 0xFF, 0xC1, 0xFF, 0xC2, 0xFF];
        let mut first = interpreter(unthrottled());
        let mut second = interpreter(unthrottled());
        first.load(&program).unwrap();
        second.load(&program).unwrap();
        first.run(Some(3)).unwrap();
        second.run(Some(3)).unwrap();
        for register in 0..3 {
            assert_eq!(
                first.machine.register(register),
                second.machine.register(register)
            );
        }
    }
}
