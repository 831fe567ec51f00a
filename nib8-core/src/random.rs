use rand::RngCore;

/// Source of the bytes consumed by the random instruction.
pub trait RandomSource {
    fn random_byte(&mut self) -> u8;
}

impl<R: RngCore + ?Sized> RandomSource for R {
    fn random_byte(&mut self) -> u8 {
        self.next_u32().to_le_bytes()[0]
    }
}
