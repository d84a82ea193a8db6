// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use anyhow::{Context, Result};
use midirec::config::{default_config_path, default_control_names_path, default_log_path};
use midirec::midi::{list_inputs, list_outputs, print_destinations, print_sources, resolve_device, DeviceInfo};
use midirec::ui::{check_device_roles, App, UiState};
use midirec::{Handled, Recorder, RecorderConfig, YamlControlNameStore};
use std::env;
use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{info, Level};

fn print_usage() {
    println!("MIDIREC - MIDI Recorder");
    println!();
    println!("Usage: midirec [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --list-sources            List available MIDI sources (inputs)");
    println!("  --list-destinations       List available MIDI destinations (outputs)");
    println!("  --record <ID|N> [FLAGS]   Record from source ID or index N, export CSV on exit");
    println!("      --include-clock       Also record clock and stop messages");
    println!("      --name <STEM>         Download name (default midirec-YYYY-MM-DD)");
    println!("      --out <DIR>           Output directory for the CSV");
    println!("      --duration <SECS>     Stop after SECS seconds (default: Ctrl+C)");
    println!("  --tui [ID|N]              Run the terminal UI");
    println!("  -v, --verbose             Debug logging");
    println!("  --help                    Show this help message");
}

/// Options for a headless recording
#[derive(Debug, Default)]
struct RecordOptions {
    include_clock: bool,
    name: Option<String>,
    out: Option<PathBuf>,
    duration: Option<Duration>,
}

fn parse_record_options(args: &[String]) -> Result<RecordOptions> {
    let mut options = RecordOptions::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--include-clock" => options.include_clock = true,
            "--name" => {
                let value = iter.next().context("--name requires a value")?;
                options.name = Some(value.clone());
            }
            "--out" => {
                let value = iter.next().context("--out requires a directory")?;
                options.out = Some(PathBuf::from(value));
            }
            "--duration" => {
                let value = iter.next().context("--duration requires seconds")?;
                let secs: f64 = value
                    .parse()
                    .map_err(|_| anyhow::anyhow!("Invalid duration: {}", value))?;
                options.duration = Some(Duration::from_secs_f64(secs.max(0.0)));
            }
            "-v" | "--verbose" => {}
            other => anyhow::bail!("Unknown record option: {}", other),
        }
    }
    Ok(options)
}

fn init_stderr_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

/// The terminal UI owns the screen, so logs go to a file
fn init_file_logging(verbose: bool) -> Result<PathBuf> {
    let path = default_log_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let file = File::create(&path).with_context(|| format!("Failed to open {}", path.display()))?;
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(path)
}

fn find_input(key: &str) -> Result<DeviceInfo> {
    let inputs = list_inputs();
    resolve_device(&inputs, key).ok_or_else(|| {
        anyhow::anyhow!(
            "No MIDI source matches '{}'. Use --list-sources to see available sources",
            key
        )
    })
}

fn open_recorder() -> Recorder<YamlControlNameStore> {
    let config_path = default_config_path();
    let config = RecorderConfig::load_or_default(&config_path);
    let store = YamlControlNameStore::new(default_control_names_path());
    Recorder::new(config, Some(config_path), store)
}

fn record(source: &str, options: RecordOptions) -> Result<()> {
    let device = find_input(source)?;
    let mut recorder = open_recorder();

    recorder.override_include_transport(options.include_clock);
    if let Some(name) = options.name {
        recorder.set_download_name(name);
    }
    if let Some(out) = options.out {
        recorder.set_output_dir(out);
    }

    println!("Connecting to MIDI source {}...", device.name);
    recorder.select_recording_input(&device)?;

    println!("Recording (press Ctrl+C to stop)...");
    println!();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start runtime")?;

    runtime.block_on(async {
        let deadline = async {
            match options.duration {
                Some(duration) => tokio::time::sleep(duration).await,
                None => std::future::pending::<()>().await,
            }
        };
        tokio::pin!(deadline);
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                handled = recorder.next() => match handled {
                    Some(Handled::Recorded { address }) => {
                        if let Some(event) = recorder.session().buffer().latest() {
                            println!(
                                "{:>8} {:<10} {:<24} {}",
                                event.ticks(),
                                event.position_label(),
                                recorder.session().registry().label_for(&address),
                                event.text()
                            );
                        }
                    }
                    Some(_) => {}
                    None => break,
                },
                _ = &mut ctrl_c => break,
                _ = &mut deadline => break,
            }
        }
    });

    println!();
    println!(
        "Recorded {} messages, final position {}",
        recorder.session().buffer().len(),
        recorder.session().position()
    );
    let path = recorder.export().context("Failed to export CSV")?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn run_tui(source: Option<&str>) -> Result<()> {
    let mut recorder = open_recorder();
    let mut state = UiState {
        inputs: list_inputs(),
        outputs: list_outputs(),
        display_limit: recorder.config().recording.display_limit,
        ..UiState::default()
    };

    let key = source
        .map(str::to_string)
        .or_else(|| recorder.config().devices.recording_input.clone());
    if let Some(key) = key {
        match resolve_device(&state.inputs, &key) {
            Some(device) => match recorder.select_recording_input(&device) {
                Ok(()) => state.set_status(format!("Recording from {}", device.name)),
                Err(e) => state.set_status(format!("Cannot open {}: {}", device.name, e)),
            },
            None => state.set_status(format!("MIDI source '{}' not found, press i to pick one", key)),
        }
    }

    check_device_roles(&recorder, &mut state);

    let mut app = App::new().context("Failed to set up terminal")?;
    app.run(&mut recorder, &mut state)?;
    info!("Terminal UI closed");
    Ok(())
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let verbose = args.iter().any(|a| a == "-v" || a == "--verbose");

    if args.len() < 2 {
        println!("MIDIREC - MIDI Recorder");
        println!("Run with --help for usage information");
        return Ok(());
    }

    match args[1].as_str() {
        "--list-sources" => {
            print_sources();
        }
        "--list-destinations" => {
            print_destinations();
        }
        "--record" => {
            if args.len() < 3 {
                eprintln!("Error: --record requires a source id or number");
                eprintln!("Use --list-sources to see available sources");
                std::process::exit(1);
            }
            init_stderr_logging(verbose);
            let options = parse_record_options(&args[3..])?;
            record(&args[2], options)?;
        }
        "--tui" => {
            let log_path = init_file_logging(verbose)?;
            let source = args
                .get(2)
                .map(String::as_str)
                .filter(|a| !a.starts_with('-'));
            run_tui(source)?;
            println!("Log written to {}", log_path.display());
        }
        "--help" | "-h" => {
            print_usage();
        }
        _ => {
            eprintln!("Unknown option: {}", args[1]);
            print_usage();
            std::process::exit(1);
        }
    }

    Ok(())
}
