/// xorshift32 PRNG for render-time jitter.
///
/// Visual jitter does not need cryptographic quality, just cheap
/// per-frame variety with a deterministic seed for tests.
#[derive(Debug, Clone)]
pub struct XorShift32 {
    state: u32,
}

impl Default for XorShift32 {
    fn default() -> Self {
        Self::new(0x12345678)
    }
}

impl XorShift32 {
    pub fn new(seed: u32) -> Self {
        // xorshift gets stuck at zero
        let state = if seed == 0 { 0x12345678 } else { seed };
        Self { state }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 17;
        self.state ^= self.state << 5;
        self.state
    }

    /// Uniform value in [0, 1].
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u32() & 0x00FF_FFFF) as f32 / 16_777_215.0
    }

    /// Uniform integer in [min, max], both bounds inclusive.
    pub fn int_in(&mut self, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }
        min + self.next_u32() % (max - min + 1)
    }

    /// Uniform value in [min, max].
    pub fn range_f32(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }
}
