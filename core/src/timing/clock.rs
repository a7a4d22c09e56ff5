use super::command::FastCommand;
use crate::constants::ORBIT_BCR;
use crate::constants::ORBIT_LAST;

/// Running `(bx, orbit)` pair, advanced one unit per BX with reset overrides.
/// Unlike a value derived purely from the global BX index, a BCR/OCR
/// perturbs the free-running counter, so drift accumulates exactly as it
/// would on real hardware if reset spacing doesn't line up with `OrbitLast`.
#[derive(Debug, Clone, Copy)]
pub struct BxClock {
    pub bx: u32,
    pub orbit: u32,
}

impl BxClock {
    /// State for the first processed BX, before any reset override is applied.
    pub fn new(bx_start: u32) -> Self {
        Self {
            bx: bx_start,
            orbit: 0,
        }
    }

    /// Default per-BX advance: `bx += 1`, rolling into `orbit` at `OrbitLast`.
    pub fn advance(&mut self) {
        self.bx += 1;
        if self.bx >= ORBIT_LAST {
            self.bx = 0;
            self.orbit += 1;
        }
    }

    /// Apply a reset override for the command scheduled at this BX. Must be
    /// called after `advance()` for every BX except the very first.
    pub fn apply_reset(&mut self, cmd: FastCommand) {
        match cmd {
            FastCommand::Bcr => self.bx = ORBIT_BCR,
            FastCommand::Ocr => self.orbit = 0,
            FastCommand::BcrOcr => {
                self.bx = ORBIT_BCR;
                self.orbit = 0;
            }
            _ => {}
        }
    }

    /// Advance and apply the reset for BX index `i` (0-based within the run).
    /// `i == 0` never advances: the clock starts at its initial value.
    pub fn step(&mut self, i: u32, cmd: FastCommand) {
        if i > 0 {
            self.advance();
        }
        self.apply_reset(cmd);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_advance_rolls_orbit_at_orbit_last() {
        let mut clk = BxClock::new(0);
        for i in 1..ORBIT_LAST {
            clk.step(i, FastCommand::Idle);
        }
        assert_eq!(clk.bx, ORBIT_LAST - 1);
        assert_eq!(clk.orbit, 0);
        clk.step(ORBIT_LAST, FastCommand::Idle);
        assert_eq!(clk.bx, 0);
        assert_eq!(clk.orbit, 1);
    }

    #[test]
    fn bcr_overrides_bx_only() {
        let mut clk = BxClock::new(0);
        clk.orbit = 2;
        clk.step(1, FastCommand::Bcr);
        assert_eq!(clk.bx, ORBIT_BCR);
        assert_eq!(clk.orbit, 2);
    }

    #[test]
    fn bcr_ocr_resets_both() {
        let mut clk = BxClock::new(0);
        clk.orbit = 5;
        clk.step(1, FastCommand::BcrOcr);
        assert_eq!(clk.bx, ORBIT_BCR);
        assert_eq!(clk.orbit, 0);
    }

    #[test]
    fn first_bx_uses_start_value_before_any_advance() {
        let mut clk = BxClock::new(100);
        clk.step(0, FastCommand::Idle);
        assert_eq!(clk.bx, 100);
        assert_eq!(clk.orbit, 0);
    }
}
