//! `history` and `watch`.

use tb_bridge::TelemetryBridge;
use tb_domain::{HistoryRange, Identifier};
use tokio::sync::mpsc;

pub async fn history(
    bridge: &TelemetryBridge,
    id: Identifier,
    range: HistoryRange,
) -> anyhow::Result<()> {
    let object = bridge.get(&id).await?;
    if !bridge.supports_request(&object) {
        anyhow::bail!("{id} has no telemetry");
    }
    for sample in bridge.request(&object, range).await {
        println!("{}", serde_json::to_string(&sample)?);
    }
    Ok(())
}

/// Print live samples as JSON lines until `count` is reached or Ctrl-C.
pub async fn watch(bridge: &TelemetryBridge, id: Identifier, count: Option<usize>) -> anyhow::Result<()> {
    let object = bridge.get(&id).await?;
    let (tx, mut rx) = mpsc::unbounded_channel();
    let subscription = bridge.subscribe(&object, move |sample| {
        let _ = tx.send(sample);
    })?;

    let mut printed = 0usize;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            sample = rx.recv() => {
                let Some(sample) = sample else { break };
                println!("{}", serde_json::to_string(&sample)?);
                printed += 1;
                if count.is_some_and(|n| printed >= n) {
                    break;
                }
            }
        }
    }

    subscription.unsubscribe();
    Ok(())
}
