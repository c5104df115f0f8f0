//! Claims enrichment.
//!
//! Every authenticated request is re-enriched from the caller's User actor:
//! one `tenants` claim per membership, plus role claims for the tenant the
//! request is scoped to. Results are never cached, so a membership granted a
//! moment ago is visible on the next request.

mod pipeline;
mod principal;
mod transform;

pub use pipeline::{ClaimsEnricher, EnrichmentError};
pub use principal::{claim_types, Claim, EnrichedPrincipal, Principal, RequestIdentity};
pub use transform::enrich;
