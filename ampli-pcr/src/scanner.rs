use std::sync::Arc;

use crate::models::{PrimingSite, Strand};

///
/// Iterator over the exact, non-overlapping occurrences of one query in one
/// template, in ascending position order.
///
/// Each search resumes at the end of the previous match. Positions are
/// reported in whole-template coordinates (see [`PrimingSite`] for how
/// forward and reverse positions differ).
///
pub struct SiteScanner<'a> {
    template: &'a str,
    query: Arc<str>,
    strand: Strand,
    offset: usize,
    done: bool,
}

impl<'a> SiteScanner<'a> {
    pub fn new(template: &'a str, query: Arc<str>, strand: Strand) -> Self {
        // an empty query would match everywhere without advancing
        let done = query.is_empty();
        SiteScanner {
            template,
            query,
            strand,
            offset: 0,
            done,
        }
    }
}

impl Iterator for SiteScanner<'_> {
    type Item = PrimingSite;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let query_len = self.query.len();
        let remaining = &self.template[self.offset..];

        let found = match remaining.len() < query_len {
            true => None,
            false => remaining.find(&*self.query),
        };

        let Some(idx) = found else {
            self.done = true;
            return None;
        };

        let position = match self.strand {
            Strand::Forward => self.offset + idx + query_len,
            Strand::Reverse => self.offset + idx,
        };
        self.offset += idx + query_len;

        Some(PrimingSite::new(Arc::clone(&self.query), position, self.strand))
    }
}

/// Collect every site of `query` in `template`.
pub fn scan_sites(template: &str, query: &str, strand: Strand) -> Vec<PrimingSite> {
    SiteScanner::new(template, Arc::from(query), strand).collect()
}
