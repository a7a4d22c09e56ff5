//! Scenario-level tests exercising the emulator end to end.

use roc_core::config::{L1ASpec, RunConfig};
use roc_core::constants::{FASTCMD_INTERNAL_LATENCY, IDLEWORD, IDLEWORD_BC0, ORBIT_LAST};
use roc_core::core::{PayloadSource, RocEmulator};
use roc_core::timing::FastCommand;
use roc_payloads::ZeroPayloadSource;

fn run(config: RunConfig) -> Vec<roc_core::output::DataRow> {
    let emu = RocEmulator::new(config).unwrap();
    let assembler = emu.run(&mut ZeroPayloadSource::new());
    assembler.data_rows().cloned().collect()
}

#[test]
fn s1_idle_stream_has_bc0_marker_only_at_bx_zero() {
    let config = RunConfig {
        n: 100,
        include_framing: false,
        ..Default::default()
    };
    let rows = run(config);
    assert_eq!(rows.len(), 100);
    for row in &rows {
        let expected = if row.clk_n == 0 { IDLEWORD_BC0 } else { IDLEWORD };
        assert!(row.links.iter().all(|&w| w == expected), "row {}", row.clk_n);
    }
}

#[test]
fn s4_bcr_lands_on_every_orbit_boundary() {
    let config = RunConfig {
        n: 4000,
        bcr: true,
        include_framing: false,
        ..Default::default()
    };
    let rows = run(config);
    for row in &rows {
        if row.clk_n % ORBIT_LAST == ORBIT_LAST - 50 {
            assert_eq!(row.command, FastCommand::Bcr);
        }
    }
}

#[test]
fn s5_ecr_resets_event_counter_for_subsequent_l1a() {
    let config = RunConfig {
        n: 500,
        delay: 7,
        ecr: true,
        ecr_bx: vec![100],
        l1a: L1ASpec::Explicit(vec![50, 150]),
        include_framing: false,
        ..Default::default()
    };
    let rows = run(config);
    let first_header = rows[57].links[0];
    let second_header = rows[157].links[0];
    assert_eq!((first_header >> 10) & 0x3F, 1);
    assert_eq!((second_header >> 10) & 0x3F, 1);
}

#[test]
fn s6_link_reset_rocd_holds_idle_for_400_bx_and_postpones_queue() {
    let config = RunConfig {
        n: 500,
        delay: 7,
        link_reset_rocd_bx: vec![200],
        l1a: L1ASpec::Explicit(vec![195]),
        include_framing: false,
        ..Default::default()
    };
    let rows = run(config);
    for row in &rows[200..600] {
        assert!(row.links.iter().all(|&w| w == IDLEWORD || w == IDLEWORD_BC0));
    }
}

#[test]
fn invariant_fast_command_channel_rotates_left_by_seven() {
    let config = RunConfig {
        n: 50,
        ecr: true,
        ecr_bx: vec![10],
        include_framing: false,
        ..Default::default()
    };
    let emu = RocEmulator::new(config).unwrap();
    let assembler = emu.run(&mut ZeroPayloadSource::new());
    let rows: Vec<_> = assembler.data_rows().collect();
    // Position 10 - 7 = 3 should show what was originally scheduled at 10 (ECR).
    assert_eq!(rows[3].command, FastCommand::Ecr);
    let _ = FASTCMD_INTERNAL_LATENCY;
}

struct CountingPayload {
    calls: u32,
}

impl PayloadSource for CountingPayload {
    fn word(&mut self, _event_index: u64, _link: usize, _channel: u8) -> u32 {
        self.calls += 1;
        self.calls
    }
}

#[test]
fn every_channel_lookup_is_queried_once_per_link() {
    let config = RunConfig {
        n: 200,
        delay: 7,
        l1a: L1ASpec::Explicit(vec![50]),
        include_framing: false,
        ..Default::default()
    };
    let emu = RocEmulator::new(config).unwrap();
    let mut payload = CountingPayload { calls: 0 };
    emu.run(&mut payload);
    assert_eq!(payload.calls, 37 * 12);
}
