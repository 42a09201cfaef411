//! Single-slot holder for the last successfully loaded command schema.

use std::sync::Arc;

use parking_lot::RwLock;
use tb_domain::command::CommandSchema;

/// Owned by whoever builds the engine and shared with it; the only
/// mutation is wholesale replacement.
#[derive(Debug, Default)]
pub struct SchemaCache {
    slot: RwLock<Option<Arc<CommandSchema>>>,
}

impl SchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<Arc<CommandSchema>> {
        self.slot.read().clone()
    }

    /// Replace the cached schema and return the new shared copy.
    pub fn replace(&self, schema: CommandSchema) -> Arc<CommandSchema> {
        let schema = Arc::new(schema);
        *self.slot.write() = Some(schema.clone());
        schema
    }

}
