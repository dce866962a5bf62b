//! Processing engines used by the pipeline stages

pub mod priority_resolver;

pub use priority_resolver::{
    CanonicalGroup, Classification, NormalizationRule, PriorityResolver, RankedEntry,
    ResolvedPlaylist, ResolverOptions, ResolverReport, TitleRank,
};
