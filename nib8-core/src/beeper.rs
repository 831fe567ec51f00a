/// Sound output driven by the sound timer.
pub trait Beeper {
    fn play(&mut self);
    fn pause(&mut self);
}
