pub mod commonality;
pub mod ids;
pub mod normalizer;
pub mod resolver;
pub mod schema;
pub mod similarity;

pub use commonality::{CommonalityEstimate, CommonalityWarning, NameCommonalityChecker};
pub use ids::IdSequence;
pub use normalizer::{lowercase_preserving_offsets, NameNormalizer};
pub use resolver::{EntityResolver, ResolverConfig, TextResolution};
pub use schema::{Entity, EntityType, ExtractionMethod, RawMention, ResolutionSummary, RoleMention};
pub use similarity::name_similarity;
