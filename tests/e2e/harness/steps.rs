use super::assertions::Assertion;
use attn_core::StoreKind;

/// All possible actions in a test scenario
#[derive(Debug)]
pub enum ScenarioStep {
    // Tree edits
    WriteFile {
        path: String,
        content: Vec<u8>,
    },
    RemoveFile {
        path: String,
    },
    WriteStore {
        dir: String,
        kind: StoreKind,
        content: String,
    },

    // Synchronizer operations
    Sync {
        dir: String,
    },
    SyncAll,
    Refresh {
        dir: String,
    },
    Cleanup {
        dir: String,
    },

    // Assertions (can be interspersed)
    Assert {
        assertion: Assertion,
    },
}
