use std::process::ExitCode;

use anyhow::Context;
use tabletop::{
    config::AppConfig,
    logging::{init_logging, LoggingConfig},
    RenderError,
};

/// Status for a window or GPU bring-up failure (-1 as seen by the shell).
const INIT_FAILURE_STATUS: u8 = 255;
const FAILURE_STATUS: u8 = 1;

fn run() -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    log::info!(
        "starting {}x{} '{}' (assets in {})",
        config.window.width,
        config.window.height,
        config.window.title,
        config.asset_dir.display()
    );
    tabletop::app::run(config).context("tabletop viewer stopped")
}

/// Bring-up failures exit with [`INIT_FAILURE_STATUS`]; any other fatal
/// error with 1.
fn exit_status_for(error: &anyhow::Error) -> u8 {
    match error.downcast_ref::<RenderError>() {
        Some(e) if e.is_initialization_failure() => INIT_FAILURE_STATUS,
        _ => FAILURE_STATUS,
    }
}

fn main() -> ExitCode {
    init_logging(LoggingConfig::default());

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::from(exit_status_for(&e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_failures_exit_with_255() {
        let err = anyhow::Error::new(RenderError::NoSurfaceFormat).context("tabletop viewer stopped");
        assert_eq!(exit_status_for(&err), 255);
    }

    #[test]
    fn test_other_failures_exit_with_1() {
        let shader = RenderError::ShaderCompile {
            name: "scene".into(),
            message: "bad token".into(),
        };
        let err = anyhow::Error::new(shader).context("tabletop viewer stopped");
        assert_eq!(exit_status_for(&err), 1);
        assert_eq!(exit_status_for(&anyhow::anyhow!("unrelated")), 1);
    }
}
