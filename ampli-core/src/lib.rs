//! # ampli-core
//!
//! Shared building blocks for the `ampli` toolkit: the in-memory template
//! store, the amplicon record, FASTA loading and the gzip-aware readers and
//! writers used at the I/O boundary.
//!
//! ```rust
//! use ampli_core::fasta::read_templates;
//!
//! let fasta = ">chr1\nACGTACGT\n>chr2\nTTTT\n";
//! let store = read_templates(fasta.as_bytes(), "inline").unwrap();
//!
//! assert_eq!(store.len(), 2);
//! assert_eq!(store.get("chr2").unwrap().sequence, "TTTT");
//! ```
pub mod errors;
pub mod fasta;
pub mod io;
pub mod models;
pub mod utils;
