//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `jots_core` linkage and storage bootstrap from a terminal.
//! - Keep output deterministic for quick local sanity checks.
//!
//! Reads the same `JOTS_*` environment variables as any other host.

use jots_core::{init_logging, JotSession, JotsConfig, StaticPermissionRequester};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("jots_core ping={}", jots_core::ping());
    println!("jots_core version={}", jots_core::core_version());

    let config = match JotsConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("config error: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(log_dir) = config.log_dir.as_deref().and_then(|dir| dir.to_str()) {
        if let Err(err) = init_logging(config.log_level, log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let mut requester = StaticPermissionRequester::unavailable("terminal host");
    match JotSession::open(&config, &mut requester) {
        Ok(session) => {
            let store = session.store();
            println!(
                "jots_core notes={} next_id={} db={}",
                store.len(),
                store.id_tracker(),
                config.db_path.display()
            );
            log::info!("event=cli_smoke module=cli status=ok count={}", store.len());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("jots_core session failed: {err}");
            ExitCode::FAILURE
        }
    }
}
