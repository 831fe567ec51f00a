/// Hexadecimal keypad input.
pub trait Keypad {
    /// Blocks until a key is pressed and returns its value.
    fn blocking_read(&mut self) -> u8;
}
