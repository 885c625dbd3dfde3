use crate::infra::open_store;
use leave_desk::config::AppConfig;
use leave_desk::error::AppError;
use leave_desk::gateway::rpc::handle_line;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info};

/// Read one JSON-RPC message per line from stdin and answer on stdout until EOF.
pub(crate) async fn run(config: &AppConfig) -> Result<(), AppError> {
    let store = open_store(config);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    info!("leave desk tools listening on stdio");

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let Some(response) = handle_line(&store, &line) else {
            continue;
        };

        let encoded = match serde_json::to_string(&response) {
            Ok(encoded) => encoded,
            Err(err) => {
                error!(error = %err, "failed to encode rpc response");
                continue;
            }
        };
        stdout.write_all(encoded.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }

    info!("stdin closed, shutting down");
    Ok(())
}
