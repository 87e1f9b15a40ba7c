// Collaborator implementations

pub mod dry_run;
pub mod http;
pub mod notifier;

pub use dry_run::{AssumeLoaded, DryRunLinkTrigger};
pub use http::{HttpAssetProbe, HttpLinkTrigger};
pub use notifier::TracingNotifier;
