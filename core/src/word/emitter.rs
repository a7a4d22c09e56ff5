//! Word emitter: the per-BX decision of what goes out on all twelve links,
//! combining the link-reset idle countdown, the event queue, and the
//! payload source boundary.

use crate::config::RunConfig;
use crate::constants::{IDLE_TRAILER, LINK_RESET_ROCD_IDLE_BX, NELINKS};
use crate::core::payload::PayloadSource;
use crate::queue::EventQueue;
use crate::timing::command::{Word, WordSlot};

use super::common_mode::build_cm;
use super::crc::LinkHistory;
use super::header::build_header;

pub struct WordEmitter {
    link_history: [LinkHistory; NELINKS],
    link_reset_rocd_remaining: u32,
}

impl WordEmitter {
    pub fn new() -> Self {
        Self {
            link_history: std::array::from_fn(|_| LinkHistory::new()),
            link_reset_rocd_remaining: 0,
        }
    }

    /// Arm the LinkResetROCD idle countdown: for the following
    /// `LINK_RESET_ROCD_IDLE_BX` BX, idles are emitted on every link
    /// regardless of queue contents, and queue consumption is paused.
    pub fn trigger_link_reset_rocd(&mut self) {
        self.link_reset_rocd_remaining = LINK_RESET_ROCD_IDLE_BX;
    }

    /// Resolve the word for every link at BX `i` (global BX `current_bx`
    /// after clock update), consuming from `queue` and `payload` as needed.
    pub fn emit(
        &mut self,
        i: u32,
        current_bx: u32,
        queue: &mut EventQueue,
        payload: &mut dyn PayloadSource,
        config: &RunConfig,
    ) -> [Word; NELINKS] {
        if self.link_reset_rocd_remaining > 0 {
            self.link_reset_rocd_remaining -= 1;
            return self.push_and_fill(config.idle_word);
        }

        // `end_bx` is the *nominal* end computed at accept time for spacing
        // and run-length-extension purposes; it is not a hard cutoff here.
        // A LinkResetROCD idle window can suppress consumption past it,
        // since a postponed readout still finishes once the reset window
        // clears. Once an event has started, keep draining it until its
        // word cursor naturally reaches `NWORDS`.
        let in_window = queue
            .head()
            .map(|h| h.word_cursor > 0 || i >= h.start_bx)
            .unwrap_or(false);

        if in_window {
            let head = *queue.head().expect("checked above");
            let slot = WordSlot::layout()[head.word_cursor as usize];

            let mut words = [0u32; NELINKS];
            match slot {
                WordSlot::Hdr => {
                    let w = build_header(
                        head.captured_bx,
                        queue.event_counter,
                        head.captured_orbit,
                        config.ham_err_rate,
                    );
                    words = [w; NELINKS];
                }
                WordSlot::Cm => {
                    let w = build_cm(head.captured_bx, queue.event_counter, head.captured_orbit);
                    words = [w; NELINKS];
                }
                WordSlot::Channel(ch) => {
                    for (link, slot) in words.iter_mut().enumerate() {
                        *slot = payload.word(head.source_event_index, link, ch);
                    }
                }
                WordSlot::Crc => {
                    for (link, slot) in words.iter_mut().enumerate() {
                        *slot = self.link_history[link].crc();
                    }
                }
                WordSlot::Idle => {
                    words = [IDLE_TRAILER; NELINKS];
                }
            }

            for (link, &w) in words.iter().enumerate() {
                self.link_history[link].push(w);
            }
            queue.consume_head_word();
            return words;
        }

        let idle = if current_bx == 0 {
            config.idle_word_bc0
        } else {
            config.idle_word
        };
        self.push_and_fill(idle)
    }

    fn push_and_fill(&mut self, word: Word) -> [Word; NELINKS] {
        for history in &mut self.link_history {
            history.push(word);
        }
        [word; NELINKS]
    }
}

impl Default for WordEmitter {
    fn default() -> Self {
        Self::new()
    }
}
