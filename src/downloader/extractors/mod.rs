// Media resolvers - turn a classified URL into a MediaResult
//
// One resolver per platform behind the MediaResolver trait. The orchestrator
// dispatches by platform and guarantees a result: failures degrade to a
// placeholder image instead of reaching the caller.

mod coin;
mod instagram;
mod orchestrator;
mod traits;

pub use coin::{Coin, FixedCoin, SequenceCoin, SystemCoin};
pub use instagram::{parse_post_url, InstagramResolver};
pub use orchestrator::ResolverOrchestrator;
pub use traits::{
    MediaResolver, PostRef, PostSubtype, ResolverConfig, DEFAULT_CAROUSEL_PROBABILITY,
    DEFAULT_LATENCY_MS, DEFAULT_PLACEHOLDER_BASE, SAMPLE_VIDEO_URL,
};
