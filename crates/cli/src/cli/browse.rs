//! `tree`, `resolve` and `images`.

use tb_bridge::TelemetryBridge;
use tb_domain::Identifier;

/// Print the tree under `start`, depth-first in child order.
pub async fn tree(bridge: &TelemetryBridge, start: Identifier, max_depth: usize) -> anyhow::Result<()> {
    let mut stack = vec![(start, 0usize)];
    while let Some((id, depth)) = stack.pop() {
        let indent = "  ".repeat(depth);
        let object = match bridge.get(&id).await {
            Ok(object) => object,
            Err(e) => {
                println!("{indent}{} (unresolved: {e})", id.key);
                continue;
            }
        };
        println!("{indent}{} [{}] ({})", object.name, object.object_type, id.key);

        if depth >= max_depth || !bridge.applies_to(&object) {
            continue;
        }
        let children = bridge.load(&object).await;
        stack.extend(children.into_iter().rev().map(|c| (c, depth + 1)));
    }
    Ok(())
}

pub async fn resolve(bridge: &TelemetryBridge, id: Identifier) -> anyhow::Result<()> {
    let object = bridge.get(&id).await?;
    println!("{}", serde_json::to_string_pretty(&object)?);
    Ok(())
}

pub async fn images(bridge: &TelemetryBridge) -> anyhow::Result<()> {
    let images = bridge.gallery_images().await;
    if images.is_empty() {
        println!("No images.");
    }
    for image in images {
        println!("{}\t{}", image.name, image.url);
    }
    Ok(())
}
