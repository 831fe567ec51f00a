/// What the interpreter does when it meets an instruction it does not know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(rename_all = "lowercase")
)]
pub enum UnknownPolicy {
    /// Stop and report the error.
    #[default]
    Halt,
    /// Log a warning and continue with the next instruction.
    Skip,
}

/// Interpreter settings.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize, serde::Serialize),
    serde(default)
)]
pub struct Config {
    /// Instructions per second when throttled.
    pub max_clock_speed: u32,
    /// Timer decrements per second.
    pub timer_hz: u32,
    pub throttle: bool,
    /// Load address of the program, and the initial program counter.
    pub program_start: u16,
    /// Where the built-in font is installed.
    pub font_base: u16,
    /// Seed for the random instruction; `None` seeds from entropy.
    pub seed: Option<u64>,
    pub on_unknown: UnknownPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_clock_speed: 700,
            timer_hz: 60,
            throttle: true,
            program_start: 0x200,
            font_base: 0x050,
            seed: None,
            on_unknown: UnknownPolicy::Halt,
        }
    }
}
