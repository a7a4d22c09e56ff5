//! The `RocEmulator` orchestrator: owns every piece of run state and drives
//! the single-threaded BX loop.

use crate::config::RunConfig;
use crate::constants::{FASTCMD_INTERNAL_LATENCY, NELINKS};
use crate::error::RocError;
use crate::output::OutputAssembler;
use crate::queue::EventQueue;
use crate::timing::clock::BxClock;
use crate::timing::command::{FastCommand, Word};
use crate::timing::scheduler::{build_fast_commands, FastCommandSchedule};
use crate::word::WordEmitter;

use super::payload::PayloadSource;

pub struct RocEmulator {
    config: RunConfig,
    clock: BxClock,
    queue: EventQueue,
    schedule: FastCommandSchedule,
    emitter: WordEmitter,
    /// Run length, extended past `config.n` as needed to drain the queue:
    /// `total_len = max(n, last_pending_event.end_bx + 1)`.
    extended_len: u32,
}

impl RocEmulator {
    pub fn new(config: RunConfig) -> Result<Self, RocError> {
        let config = config.validate();
        let schedule = build_fast_commands(&config)?;
        let clock = BxClock::new(config.bx_start);
        let extended_len = config.n;
        Ok(Self {
            config,
            clock,
            queue: EventQueue::new(),
            schedule,
            emitter: WordEmitter::new(),
            extended_len,
        })
    }

    fn display_command(&self, i: u32) -> FastCommand {
        self.schedule
            .commands
            .get(i as usize)
            .copied()
            .unwrap_or(FastCommand::Idle)
    }

    fn clock_command(&self, i: u32) -> FastCommand {
        if (i as usize) < self.schedule.len() {
            self.schedule.clock_command(i as usize)
        } else {
            FastCommand::Idle
        }
    }

    fn extend_to(&mut self, new_len: u32) {
        if new_len > self.extended_len {
            self.extended_len = new_len;
        }
    }

    /// Run the full emulation to completion, querying `payload` for every
    /// channel word an accepted readout needs. Consumes `self`: a
    /// `RocEmulator` is good for exactly one run.
    pub fn run(mut self, payload: &mut dyn PayloadSource) -> OutputAssembler {
        let mut assembler = OutputAssembler::new();
        if self.config.include_framing {
            assembler.push_framing_start(self.config.idle_word);
            assembler.push_framing_resets(self.config.idle_word);
        }

        let mut raw_commands: Vec<FastCommand> = Vec::new();
        let mut links_by_bx: Vec<[Word; NELINKS]> = Vec::new();

        let mut i: u32 = 0;
        loop {
            if i >= self.extended_len {
                break;
            }

            let display_cmd = self.display_command(i);
            let clock_cmd = self.clock_command(i);
            self.clock.step(i, clock_cmd);

            match display_cmd {
                FastCommand::L1A => {
                    let end_bx =
                        self.queue
                            .accept_l1a(self.clock.bx, self.clock.orbit, i, self.config.delay);
                    self.extend_to(end_bx + 1);
                }
                FastCommand::Ecr => self.queue.apply_ecr(),
                FastCommand::Ebr => self.queue.apply_ebr(),
                FastCommand::LinkResetRocd => self.emitter.trigger_link_reset_rocd(),
                _ => {}
            }

            let words = self
                .emitter
                .emit(i, self.clock.bx, &mut self.queue, payload, &self.config);

            // A LinkResetROCD window can postpone a readout past its
            // nominal `end_bx`; keep the loop alive one more BX at a time for
            // as long as anything remains queued, rather than trusting the
            // precomputed `end_bx` to anticipate that delay.
            if !self.queue.is_empty() {
                self.extend_to(i + 2);
            }

            raw_commands.push(display_cmd);
            links_by_bx.push(words);

            i += 1;
        }

        let total_len = raw_commands.len() as u32;
        for (k, words) in links_by_bx.into_iter().enumerate() {
            let displayed = if total_len == 0 {
                FastCommand::Idle
            } else {
                let src = (k as u32 + FASTCMD_INTERNAL_LATENCY) % total_len;
                raw_commands[src as usize]
            };
            assembler.push_data(self.config.bx_start + k as u32, words, displayed);
        }

        if self.config.include_framing {
            assembler.push_framing_finish();
        }

        assembler
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::L1ASpec;

    struct ZeroPayload;
    impl PayloadSource for ZeroPayload {
        fn word(&mut self, _event_index: u64, _link: usize, _channel: u8) -> u32 {
            0
        }
    }

    #[test]
    fn s1_idle_stream_with_bc0_marker() {
        let config = RunConfig {
            n: 100,
            include_framing: false,
            ..Default::default()
        };
        let emu = RocEmulator::new(config).unwrap();
        let assembler = emu.run(&mut ZeroPayload);
        assert_eq!(assembler.rows.len(), 100);
    }

    #[test]
    fn s2_single_l1a_produces_one_readout() {
        let config = RunConfig {
            n: 200,
            delay: 7,
            l1a: L1ASpec::Explicit(vec![50]),
            include_framing: false,
            ..Default::default()
        };
        let emu = RocEmulator::new(config).unwrap();
        let assembler = emu.run(&mut ZeroPayload);
        let rows: Vec<_> = assembler.data_rows().collect();
        assert_eq!(rows.len(), 200);

        let hdr = rows[57].links[0];
        assert_eq!(hdr >> 28, 0xF);
        assert_eq!((hdr >> 16) & 0xFFF, 50);
        assert_eq!((hdr >> 10) & 0x3F, 1);
        assert_eq!((hdr >> 7) & 0x7, 0);
    }

    #[test]
    fn s3_back_to_back_l1as_abut() {
        let config = RunConfig {
            n: 300,
            delay: 7,
            l1a: L1ASpec::Explicit(vec![50, 60]),
            include_framing: false,
            ..Default::default()
        };
        let emu = RocEmulator::new(config).unwrap();
        let assembler = emu.run(&mut ZeroPayload);
        let rows: Vec<_> = assembler.data_rows().collect();
        let second_hdr = rows[98].links[0];
        assert_eq!((second_hdr >> 16) & 0xFFF, 60);
    }
}
