//! Line-delimited JSON transport.
//!
//! Events are handled strictly in order; the commands each one produced are
//! written out before the next line is read.

use condition_reminders_shared::EngineCommand;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

use super::host_events::HostEventHandler;

/// Serve the bridge until the input closes.
pub async fn serve<R, W>(
    handler: &HostEventHandler,
    input: R,
    mut output: W,
    mut commands: mpsc::UnboundedReceiver<EngineCommand>,
) -> std::io::Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = BufReader::new(input).lines();

    while let Some(line) = lines.next_line().await? {
        handler.handle_line(&line).await;
        flush_commands(&mut commands, &mut output).await?;
    }

    flush_commands(&mut commands, &mut output).await?;
    tracing::debug!("Bridge input closed");
    Ok(())
}

async fn flush_commands<W>(
    commands: &mut mpsc::UnboundedReceiver<EngineCommand>,
    output: &mut W,
) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Ok(command) = commands.try_recv() {
        let mut line = serde_json::to_vec(&command).map_err(std::io::Error::other)?;
        line.push(b'\n');
        output.write_all(&line).await?;
    }
    output.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::TestHarness;
    use serde_json::Value;

    #[tokio::test]
    async fn test_serve_writes_one_command_per_line() {
        let mut harness = TestHarness::new();
        let commands = harness.take_commands();
        let handler = harness.handler();

        let input = concat!(
            r#"{"type": "Ready", "userId": "gm", "isGm": true}"#,
            "\n",
            r#"{"type": "FormAction", "action": "create"}"#,
            "\n",
            "garbage\n",
        );
        let mut output: Vec<u8> = Vec::new();

        serve(&handler, input.as_bytes(), &mut output, commands)
            .await
            .unwrap();

        let lines: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["type"], "ConditionList");
        assert_eq!(lines[1]["type"], "Error");
    }
}
