/*
 * Responsibility
 * - tokio runtime 起動
 * - bootstrap logging (starting up / unhandled exception / shut down complete)
 * - app::run() の呼び出し（ロジックは置かない）
 */
use std::process::ExitCode;

use calc_api::app;

#[tokio::main]
async fn main() -> ExitCode {
    app::init_tracing();
    tracing::info!("starting up");

    // Reported once, through tracing.
    let code = match app::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = ?err, "unhandled exception");
            ExitCode::FAILURE
        }
    };

    tracing::info!("shut down complete");
    code
}
