//! Fast-command scheduler: turns a [`RunConfig`] into a finite, per-BX
//! sequence of [`FastCommand`]s.

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::command::FastCommand;
use crate::config::{L1AProgramEntry, L1ASpec, RunConfig};
use crate::constants::ORBIT_BCR;
use crate::constants::ORBIT_LAST;
use crate::error::ConfigError;

/// Seed for the random-mode L1A placement RNG. Fixed so runs with identical
/// inputs are bit-for-bit reproducible.
const L1A_RANDOM_SEED: u64 = 6;

/// Result of the scheduler: the fast command shown on the command channel
/// for each BX, plus an independently-tracked clock reset per BX.
///
/// These are tracked separately because a BCR/OCR scheduled on the same BX
/// as an accepted L1A still perturbs the clock, even though the command
/// channel at that BX displays `L1A`, not the reset. The two collide
/// predictably on display but never on timing.
pub struct FastCommandSchedule {
    pub commands: Vec<FastCommand>,
    clock_resets: Vec<FastCommand>,
}

impl FastCommandSchedule {
    /// The command the BX clock should apply its reset override for, which
    /// may differ from `commands[i]` (see struct docs).
    pub fn clock_command(&self, i: usize) -> FastCommand {
        self.clock_resets[i]
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Build the fast-command schedule for `config.n` BXs.
pub fn build_fast_commands(config: &RunConfig) -> Result<FastCommandSchedule, ConfigError> {
    let n = config.n as usize;
    let mut commands = vec![FastCommand::Idle; n];
    let mut clock_resets = vec![FastCommand::Idle; n];

    // Step 1: BCR placement. `missing_bcr` removes the first *periodic*
    // index, independently of whether `extra_bcr` adds 2000 — 2000 is
    // outside the periodic set and must never be the one dropped.
    if config.bcr {
        let mut bcr_idxs: BTreeSet<usize> = (0..n)
            .filter(|&i| (i as u32) % ORBIT_LAST == ORBIT_BCR)
            .collect();
        if config.missing_bcr {
            if let Some(&first) = bcr_idxs.iter().next() {
                bcr_idxs.remove(&first);
            }
        }
        if config.extra_bcr && 2000 < n {
            bcr_idxs.insert(2000);
        }
        for idx in bcr_idxs {
            commands[idx] = FastCommand::Bcr;
            clock_resets[idx] = FastCommand::Bcr;
        }
    }

    // Step 2: link resets.
    for &bx in &config.link_reset_rocd_bx {
        if (bx as usize) < n {
            commands[bx as usize] = FastCommand::LinkResetRocd;
        }
    }
    for &bx in &config.link_reset_econd_bx {
        if (bx as usize) < n {
            commands[bx as usize] = FastCommand::LinkResetEcond;
        }
    }

    // Step 3: ECR / OCR / BCR_OCR.
    if config.ecr {
        for &bx in &config.ecr_bx {
            if (bx as usize) < n {
                commands[bx as usize] = FastCommand::Ecr;
            }
        }
    }
    if config.ocr {
        for &bx in &config.ocr_bx {
            let idx = bx as usize;
            if idx < n {
                if commands[idx] == FastCommand::Bcr {
                    commands[idx] = FastCommand::BcrOcr;
                    clock_resets[idx] = FastCommand::BcrOcr;
                } else {
                    commands[idx] = FastCommand::Ocr;
                    clock_resets[idx] = FastCommand::Ocr;
                }
            }
        }
    }

    // Step 4: L1A placement.
    let l1a_bxs = schedule_l1a(config)?;
    for bx in &l1a_bxs {
        if (*bx as usize) < n {
            commands[*bx as usize] = FastCommand::L1A;
        }
    }

    // Step 5: EBR placement, excluding any L1A BX itself (L1A wins a
    // same-BX collision) and the 3 BX after any L1A.
    if config.ebr {
        let forbidden: BTreeSet<u32> = l1a_bxs
            .iter()
            .flat_map(|&bx| bx..=(bx + 3))
            .collect();
        for &bx in &config.ebr_bx {
            let idx = bx as usize;
            if idx < n && !forbidden.contains(&bx) {
                commands[idx] = FastCommand::Ebr;
            }
        }
    }

    Ok(FastCommandSchedule {
        commands,
        clock_resets,
    })
}

/// Compute the global BXs an L1A fires on.
fn schedule_l1a(config: &RunConfig) -> Result<Vec<u32>, ConfigError> {
    let n = config.n;
    let mut out = match &config.l1a {
        L1ASpec::Explicit(bxs) => bxs.iter().copied().filter(|&bx| bx < n).collect::<Vec<_>>(),
        L1ASpec::Program { entries, l1a_start } => {
            let mut rng = StdRng::seed_from_u64(L1A_RANDOM_SEED);
            let mut counter: u32 = 0;
            let mut out = Vec::new();
            for entry in entries {
                match entry {
                    L1AProgramEntry::Fixed { count, freq } => {
                        let cnt = count.unwrap_or(n);
                        for k in (counter + 1)..=(counter + cnt) {
                            let bx = k.saturating_mul(*freq);
                            if bx < n {
                                out.push(bx);
                            }
                        }
                        counter += cnt;
                    }
                    L1AProgramEntry::Random { freq } => {
                        if *l1a_start >= n {
                            continue;
                        }
                        let lambda = (n - l1a_start) as f64 / (*freq as f64);
                        let draw = sample_poisson(&mut rng, lambda) as usize;
                        let mut pool: Vec<u32> = (*l1a_start..n).collect();
                        let take = draw.min(pool.len());
                        let (chosen, _) = pool.partial_shuffle(&mut rng, take);
                        out.extend_from_slice(chosen);
                    }
                }
            }
            out
        }
    };
    out.sort_unstable();
    out.dedup();
    Ok(out)
}

/// Knuth's algorithm for sampling from a Poisson(`lambda`) distribution.
/// Adequate for the moderate event rates this scheduler deals with; a
/// dedicated `rand_distr::Poisson` was not pulled in for one call site.
fn sample_poisson(rng: &mut impl Rng, lambda: f64) -> u64 {
    if lambda <= 0.0 {
        return 0;
    }
    let l = (-lambda).exp();
    let mut k: u64 = 0;
    let mut p = 1.0;
    loop {
        k += 1;
        p *= rng.r#gen::<f64>();
        if p <= l {
            break;
        }
    }
    k - 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_by_default() {
        let config = RunConfig {
            n: 100,
            ..Default::default()
        };
        let sched = build_fast_commands(&config).unwrap();
        assert!(sched.commands.iter().all(|c| *c == FastCommand::Idle));
    }

    #[test]
    fn bcr_lands_on_orbit_boundary() {
        let config = RunConfig {
            n: 4000,
            bcr: true,
            ..Default::default()
        };
        let sched = build_fast_commands(&config).unwrap();
        for (i, cmd) in sched.commands.iter().enumerate() {
            if (i as u32) % ORBIT_LAST == ORBIT_BCR {
                assert_eq!(*cmd, FastCommand::Bcr, "at {i}");
            }
        }
    }

    #[test]
    fn explicit_l1a_lands_exactly() {
        let config = RunConfig {
            n: 200,
            l1a: L1ASpec::Explicit(vec![50]),
            ..Default::default()
        };
        let sched = build_fast_commands(&config).unwrap();
        assert_eq!(sched.commands[50], FastCommand::L1A);
    }

    #[test]
    fn ebr_within_three_bx_after_l1a_is_suppressed() {
        let config = RunConfig {
            n: 200,
            l1a: L1ASpec::Explicit(vec![50]),
            ebr: true,
            ebr_bx: vec![51, 52, 53, 60],
            ..Default::default()
        };
        let sched = build_fast_commands(&config).unwrap();
        assert_eq!(sched.commands[50], FastCommand::L1A);
        assert_ne!(sched.commands[51], FastCommand::Ebr);
        assert_ne!(sched.commands[52], FastCommand::Ebr);
        assert_ne!(sched.commands[53], FastCommand::Ebr);
        assert_eq!(sched.commands[60], FastCommand::Ebr);
    }

    #[test]
    fn ebr_on_same_bx_as_l1a_is_suppressed() {
        let config = RunConfig {
            n: 200,
            l1a: L1ASpec::Explicit(vec![50]),
            ebr: true,
            ebr_bx: vec![50],
            ..Default::default()
        };
        let sched = build_fast_commands(&config).unwrap();
        assert_eq!(sched.commands[50], FastCommand::L1A);
    }

    #[test]
    fn missing_bcr_drops_first_periodic_index_not_the_extra_one() {
        let config = RunConfig {
            n: 4000,
            bcr: true,
            extra_bcr: true,
            missing_bcr: true,
            ..Default::default()
        };
        let sched = build_fast_commands(&config).unwrap();
        assert_eq!(sched.commands[2000], FastCommand::Bcr);
        assert_ne!(sched.commands[ORBIT_BCR as usize], FastCommand::Bcr);
    }

    #[test]
    fn bcr_ocr_coalesce() {
        let config = RunConfig {
            n: 4000,
            bcr: true,
            ocr: true,
            ocr_bx: vec![ORBIT_BCR, ORBIT_BCR * 2 - 50],
            ..Default::default()
        };
        let sched = build_fast_commands(&config).unwrap();
        assert_eq!(sched.commands[ORBIT_BCR as usize], FastCommand::BcrOcr);
    }
}
