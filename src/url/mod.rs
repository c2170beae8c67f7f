//! URL handling module for Sitescribe
//!
//! This module decides which URLs belong to the crawled site and turns the
//! raw hrefs found on a page into canonical page URLs.
//!
//! - [`DomainScope`]: the seed host and its `www.` alias
//! - [`LinkNormalizer`]: resolution, filtering and canonicalization of hrefs

mod domain;
mod normalize;

pub use domain::{site_host, DomainScope};
pub use normalize::{
    canonicalize, has_binary_extension, LinkNormalizer, LinkOutcome, LinkRejection,
    NormalizedLinks, RejectionReason, SkipReason,
};
