mod cli;
mod config_file;
mod csv_writer;

use std::path::PathBuf;

use clap::Parser;

use roc_core::config::{L1AProgramEntry, L1ASpec, RunConfig};
use roc_core::core::RocEmulator;
use roc_payloads::provider::EventSelection;
use roc_payloads::registry;
use roc_payloads::ProviderArgs;

use cli::Cli;
use config_file::FileConfig;

fn main() {
    let cli = Cli::parse();

    let file_config = match &cli.config {
        Some(path) => match FileConfig::load(path) {
            Ok(fc) => fc,
            Err(e) => {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        },
        None => FileConfig::default(),
    };

    let config = build_run_config(&cli, &file_config);

    let payload_mode = cli
        .payload_mode
        .clone()
        .or_else(|| file_config.payload_mode.clone())
        .unwrap_or_else(|| "zero".to_string());

    let physics_table = cli.physics_table.clone().or_else(|| file_config.physics_table.clone());
    let event_numbers = if !cli.event_numbers.is_empty() {
        cli.event_numbers.clone()
    } else {
        file_config.event_numbers.clone()
    };

    let provider_args = ProviderArgs {
        table_path: physics_table,
        event_selection: if event_numbers.is_empty() {
            EventSelection::Random
        } else {
            EventSelection::Explicit(event_numbers)
        },
    };

    let entry = match registry::find(&payload_mode) {
        Some(entry) => entry,
        None => {
            eprintln!(
                "error: unknown payload mode '{payload_mode}'. Available: {}",
                registry::all()
                    .iter()
                    .map(|e| e.name)
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            std::process::exit(1);
        }
    };

    let mut payload = match (entry.create)(&provider_args) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    let n = config.n;
    let delay = config.delay;
    let bcr_reset_bx = roc_core::constants::ORBIT_BCR;
    let idle_word = config.idle_word;
    let idle_word_bc0 = config.idle_word_bc0;

    let emulator = match RocEmulator::new(config) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    let assembler = emulator.run(payload.as_mut());

    let comment_lines = vec![
        format!("N={n}"),
        format!("delay={delay}"),
        format!("bcrResetBX={bcr_reset_bx}"),
        format!("idleWord=0x{idle_word:08X} idleWordBc0=0x{idle_word_bc0:08X}"),
        format!(
            "fastCmdInternalLatency={}",
            roc_core::constants::FASTCMD_INTERNAL_LATENCY
        ),
    ];
    let text = csv_writer::render(&assembler, &comment_lines);

    let output_path = cli.output.clone().unwrap_or_else(|| default_output_path(n, delay));
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                eprintln!("error: failed to create output directory {}: {e}", parent.display());
                std::process::exit(1);
            }
        }
    }
    if let Err(e) = std::fs::write(&output_path, text) {
        eprintln!("error: failed to write {}: {e}", output_path.display());
        std::process::exit(1);
    }

    println!("wrote {}", output_path.display());
}

fn default_output_path(n: u32, delay: u32) -> PathBuf {
    PathBuf::from("rocData").join(format!("roc_N{n}_delay{delay}.csv"))
}

fn build_run_config(cli: &Cli, file: &FileConfig) -> RunConfig {
    let defaults = RunConfig::default();

    let l1a_bx = if !cli.l1a_bx.is_empty() {
        cli.l1a_bx.clone()
    } else {
        file.l1a_bx.clone()
    };
    let l1a_program_raw = if !cli.l1a_program.is_empty() {
        cli.l1a_program.clone()
    } else {
        file.l1a_program.clone()
    };
    let l1a_start = cli.l1a_start.or(file.l1a_start).unwrap_or(0);

    let l1a = if !l1a_bx.is_empty() {
        L1ASpec::Explicit(l1a_bx)
    } else if !l1a_program_raw.is_empty() {
        let entries = l1a_program_raw
            .iter()
            .filter_map(|s| parse_l1a_program_entry(s))
            .collect::<Vec<_>>();
        L1ASpec::Program { entries, l1a_start }
    } else {
        L1ASpec::default()
    };

    let config = RunConfig {
        n: cli.n.or(file.n).unwrap_or(defaults.n),
        bx_start: cli.bx_start.or(file.bx_start).unwrap_or(defaults.bx_start),
        delay: cli.delay.or(file.delay).unwrap_or(defaults.delay),

        bcr: cli.bcr || file.bcr,
        missing_bcr: cli.missing_bcr || file.missing_bcr,
        extra_bcr: cli.extra_bcr || file.extra_bcr,

        ecr: cli.ecr || file.ecr,
        ecr_bx: merge_list(&cli.ecr_bx, &file.ecr_bx),

        ocr: cli.ocr || file.ocr,
        ocr_bx: merge_list(&cli.ocr_bx, &file.ocr_bx),

        ebr: cli.ebr || file.ebr,
        ebr_bx: merge_list(&cli.ebr_bx, &file.ebr_bx),

        link_reset_rocd_bx: merge_list(&cli.link_reset_rocd_bx, &file.link_reset_rocd_bx),
        link_reset_econd_bx: merge_list(&cli.link_reset_econd_bx, &file.link_reset_econd_bx),

        l1a,

        ham_err_rate: cli.ham_err_rate.or(file.ham_err_rate).unwrap_or(defaults.ham_err_rate),

        idle_word: defaults.idle_word,
        idle_word_bc0: defaults.idle_word_bc0,

        include_framing: !(cli.no_framing || file.no_framing),
    };

    config.validate()
}

fn merge_list(cli_list: &[u32], file_list: &[u32]) -> Vec<u32> {
    if !cli_list.is_empty() {
        cli_list.to_vec()
    } else {
        file_list.to_vec()
    }
}

/// Fallback L1A frequency for a program entry whose frequency can't be parsed.
const DEFAULT_L1A_FREQ: u32 = 53;

/// Parse one `--l1a-program` entry: `fixed:<count|*>:<freq>` or `random:<freq>`.
/// A malformed entry is reported and dropped rather than aborting the run.
fn parse_l1a_program_entry(raw: &str) -> Option<L1AProgramEntry> {
    let parts: Vec<&str> = raw.split(':').collect();
    match parts.as_slice() {
        ["fixed", count, freq] => {
            let count = if *count == "*" {
                None
            } else {
                match count.parse::<u32>() {
                    Ok(c) => Some(c),
                    Err(_) => {
                        eprintln!("warning: bad count in l1a-program entry '{raw}', dropping entry");
                        return None;
                    }
                }
            };
            let freq = freq.parse::<u32>().unwrap_or_else(|_| {
                eprintln!(
                    "warning: bad freq in l1a-program entry '{raw}', falling back to {DEFAULT_L1A_FREQ}"
                );
                DEFAULT_L1A_FREQ
            });
            Some(L1AProgramEntry::Fixed { count, freq })
        }
        ["random", freq] => {
            let freq = freq.parse::<u32>().unwrap_or_else(|_| {
                eprintln!(
                    "warning: bad freq in l1a-program entry '{raw}', falling back to {DEFAULT_L1A_FREQ}"
                );
                DEFAULT_L1A_FREQ
            });
            Some(L1AProgramEntry::Random { freq })
        }
        _ => {
            eprintln!(
                "warning: unrecognized l1a-program entry '{raw}' (expected fixed:<count|*>:<freq> or random:<freq>), dropping entry"
            );
            None
        }
    }
}
