// ── Mower domain model ──
//
// Canonical types built from the vendor's wire models. Consumers (the
// CLI and any embedding host) depend on these, never on raw JSON.

pub mod features;
pub mod identity;
pub mod snapshot;
pub mod state;
pub mod status;

// ── Re-exports ──────────────────────────────────────────────────────

pub use features::SupportedFeatures;
pub use identity::MowerIdentity;
pub use snapshot::{Location, MowerSnapshot};
pub use state::MowerState;
pub use status::MowerStatus;
