//! Process-level lifecycle events shared by every front end.

use tracing::{error, info, warn};

use crate::errors::PipewatchError;

pub fn log_app_startup(command: &str) {
    info!(
        event = "core.app.startup_completed",
        version = env!("CARGO_PKG_VERSION"),
        command = command
    );
}

pub fn log_app_shutdown(command: &str, success: bool) {
    info!(
        event = "core.app.shutdown_started",
        command = command,
        success = success
    );
}

/// User errors (bad flags, missing files) are warnings; everything else
/// is logged at error level.
pub fn log_app_error(err: &dyn PipewatchError) {
    if err.is_user_error() {
        warn!(
            event = "core.app.user_error",
            error = %err,
            error_code = err.error_code()
        );
    } else {
        error!(
            event = "core.app.error_occurred",
            error = %err,
            error_code = err.error_code()
        );
    }
}
