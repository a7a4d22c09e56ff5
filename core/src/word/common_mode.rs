//! Common-mode word construction.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::header::base_header_bits;

/// `[00 | 0000000000 | cm0(10) | cm1(10)]`, where `cm0 = cmScale + U0`,
/// `cm1 = cmScale + U1`, `cmScale = (R0 mod 16) << 6`, and `R0, U0, U1` are
/// three draws from a PRNG seeded from the event's header bits — so CM is
/// reproducibly derived from the header without the word emitter having to
/// thread any extra state between the HDR and CM slots.
pub fn build_cm(captured_bx: u32, event_counter: u32, captured_orbit: u32) -> u32 {
    let base = base_header_bits(captured_bx, event_counter, captured_orbit);
    let mut rng = StdRng::seed_from_u64(base as u64);
    let r0: u32 = rng.r#gen_range(0u32..16);
    let cm_scale = r0 << 6;
    let u0: u32 = rng.r#gen_range(0u32..64);
    let u1: u32 = rng.r#gen_range(0u32..64);
    let cm0 = (cm_scale + u0) & 0x3FF;
    let cm1 = (cm_scale + u1) & 0x3FF;
    (cm0 << 10) | cm1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_twelve_bits_always_zero() {
        for bx in 0..200 {
            let w = build_cm(bx, 1, 0);
            assert_eq!(w >> 20, 0);
        }
    }

    #[test]
    fn deterministic_from_header_bits() {
        let a = build_cm(50, 1, 0);
        let b = build_cm(50, 1, 0);
        assert_eq!(a, b);
    }
}
