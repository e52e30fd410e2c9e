use clap::Parser;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, unbounded};

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use p25_config::{TrunkConfig, toml_config};
use p25_core::{Timestamp, debug};
use p25_entities::{DemodWorker, LoggingSetter, LoggingWorker, RxCtl, RxMessage, WorkerPool};

/// Silence on the control channel longer than this is reported to the controller as a timeout
const RX_TIMEOUT: Duration = Duration::from_millis(1000);

/// Load configuration file
fn load_config_from_toml(cfg_path: &str) -> TrunkConfig {
    match toml_config::from_file(cfg_path) {
        Ok(c) => c,
        Err(e) => {
            println!("Failed to load configuration from {}: {}", cfg_path, e);
            std::process::exit(1);
        }
    }
}

/// Build the controller, with a logging worker pool when a receiver section is configured
fn build_controller(cfg: &TrunkConfig) -> RxCtl {
    let mut rxctl = RxCtl::new(cfg, Some(Box::new(LoggingSetter::default())), Timestamp::now());
    if let Some(rx) = &cfg.receiver {
        let workers = (0..rx.workers)
            .map(|i| Box::new(LoggingWorker::new(format!("worker{}", i))) as Box<dyn DemodWorker>)
            .collect();
        rxctl.attach_workers(WorkerPool::new(workers), rx.input_rate);
        eprintln!(" -> {} demod workers at {} sps", rx.workers, rx.input_rate);
    }
    rxctl
}

/// Reads capture lines and forwards them to the controller until EOF or shutdown
fn spawn_reader(input: Box<dyn Read + Send>, tx: Sender<RxMessage>, running: Arc<AtomicBool>) -> std::io::Result<thread::JoinHandle<()>> {
    thread::Builder::new().name("capture-reader".to_string()).spawn(move || {
        for (lineno, line) in BufReader::new(input).lines().enumerate() {
            if !running.load(Ordering::SeqCst) {
                break;
            }
            let msg = match line {
                Ok(line) => match RxMessage::parse_line(&line) {
                    Ok(Some(msg)) => msg,
                    Ok(None) => continue,
                    Err(e) => RxMessage::TransportError(format!("line {}: {}", lineno + 1, e)),
                },
                Err(e) => {
                    tracing::error!("capture read failed: {}", e);
                    break;
                }
            };
            if tx.send(msg).is_err() {
                break;
            }
        }
        tracing::info!("capture reader done");
    })
}

fn run_controller(rxctl: &mut RxCtl, rx: Receiver<RxMessage>, running: &AtomicBool) {
    while running.load(Ordering::SeqCst) {
        let msg = match rx.recv_timeout(RX_TIMEOUT) {
            Ok(msg) => msg,
            Err(RecvTimeoutError::Timeout) => RxMessage::Timeout,
            Err(RecvTimeoutError::Disconnected) => break,
        };
        rxctl.process_message(msg, Timestamp::now());
    }
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "P25 trunking receiver",
    long_about = "Follows P25 trunked systems from a capture of control channel words, using the provided TOML configuration file"
)]
struct Args {
    /// Config file (required)
    #[arg(help = "TOML config with networks, timing and receiver parameters")]
    config: String,

    /// Capture file, stdin when omitted
    #[arg(short = 'i', long = "input", help = "Capture with one '<nac-hex> <kind> <hex>' or 'cmd <command>' per line")]
    input: Option<String>,
}

fn main() {
    eprintln!("[+] P25 trunking receiver");

    let args = Args::parse();
    let cfg = load_config_from_toml(&args.config);
    let _log_guard = debug::setup_logging_default(cfg.debug_log.clone());

    let input: Box<dyn Read + Send> = match &args.input {
        Some(path) => match File::open(path) {
            Ok(f) => Box::new(f),
            Err(e) => {
                println!("Failed to open capture {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => Box::new(std::io::stdin()),
    };

    let mut rxctl = build_controller(&cfg);

    // Set up Ctrl+C handler for graceful shutdown
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    }) {
        tracing::warn!("failed to set Ctrl+C handler: {}", e);
    }

    let (tx, rx) = unbounded();
    let reader = match spawn_reader(input, tx, running.clone()) {
        Ok(handle) => handle,
        Err(e) => {
            println!("Failed to start capture reader: {}", e);
            std::process::exit(1);
        }
    };

    run_controller(&mut rxctl, rx, &running);

    // Stdin may still block the reader; only wait for it when it finished on its own
    if reader.is_finished() {
        let _ = reader.join();
    }
    println!("{}", rxctl);
}
