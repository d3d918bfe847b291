//! # ampli-pcr
//!
//! Exact-match PCR product prediction. Every primer (and, depending on its
//! role, its reverse complement) is searched in every template; binding
//! sites are paired into products, keeping only the smallest product a
//! reverse site can close, optionally capped by a maximum length.
//!
//! ```rust
//! use ampli_core::models::{Amplicon, Template, TemplateStore};
//! use ampli_pcr::{PcrOptions, Primer, PrimerSet, simulate_pcr_sorted};
//!
//! let templates = TemplateStore::try_from(vec![Template::new("seq1", "TTTTAAACCCGGGTTTT")]).unwrap();
//! let primers = PrimerSet::new(vec![Primer::forward("AAA"), Primer::reverse("CCC")]).unwrap();
//! let options = PcrOptions::default().with_max_product_length(1000);
//!
//! let (amplicons, _summary) = simulate_pcr_sorted(&templates, &primers, &options).unwrap();
//! assert_eq!(amplicons, vec![Amplicon::new("seq1", 7, 10, "AAA", "CCC")]);
//! ```
pub mod aggregator;
pub mod calculator;
pub mod consts;
pub mod errors;
pub mod models;
pub mod orchestrator;
pub mod primers;
pub mod scanner;

// re-exports
pub use self::aggregator::{AggregatedSites, SiteAggregator, site_channels};
pub use self::calculator::{CalculationStats, calculate_amplicons, for_each_amplicon};
pub use self::errors::PcrError;
pub use self::models::{MaxProductLength, PrimingSite, Strand};
pub use self::orchestrator::{
    CancelToken, PcrOptions, PcrSummary, TemplateState, default_concurrency, simulate_pcr,
    simulate_pcr_sorted,
};
pub use self::primers::{Primer, PrimerRole, PrimerSet, read_primers, reverse_complement};
pub use self::scanner::{SiteScanner, scan_sites};
