use crossbeam_channel::{Receiver, Select, Sender, bounded};

use crate::models::{PrimingSite, Strand};

///
/// Sending halves of one template's site channels. Each scanner gets a clone
/// of the sender for its strand; the aggregator only finishes once every
/// clone has been dropped.
///
#[derive(Clone)]
pub struct SiteSenders {
    pub forward: Sender<PrimingSite>,
    pub reverse: Sender<PrimingSite>,
}

impl SiteSenders {
    pub fn for_strand(&self, strand: Strand) -> &Sender<PrimingSite> {
        match strand {
            Strand::Forward => &self.forward,
            Strand::Reverse => &self.reverse,
        }
    }
}

///
/// Sites of one template, split by strand and sorted by position.
///
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AggregatedSites {
    pub forward: Vec<PrimingSite>,
    pub reverse: Vec<PrimingSite>,
}

impl AggregatedSites {
    pub fn from_unsorted(mut forward: Vec<PrimingSite>, mut reverse: Vec<PrimingSite>) -> Self {
        forward.sort_unstable();
        reverse.sort_unstable();
        AggregatedSites { forward, reverse }
    }

    /// A product needs at least one site on each strand.
    pub fn is_calculable(&self) -> bool {
        !self.forward.is_empty() && !self.reverse.is_empty()
    }
}

///
/// Receiving side of one template's site channels.
///
pub struct SiteAggregator {
    forward: Receiver<PrimingSite>,
    reverse: Receiver<PrimingSite>,
}

///
/// Create the bounded forward/reverse channel pair for one template.
///
/// A capacity of zero is raised to one.
///
pub fn site_channels(capacity: usize) -> (SiteSenders, SiteAggregator) {
    let capacity = capacity.max(1);
    let (forward_tx, forward_rx) = bounded(capacity);
    let (reverse_tx, reverse_rx) = bounded(capacity);

    (
        SiteSenders {
            forward: forward_tx,
            reverse: reverse_tx,
        },
        SiteAggregator {
            forward: forward_rx,
            reverse: reverse_rx,
        },
    )
}

impl SiteAggregator {
    ///
    /// Drain both channels until every sender is gone, then sort.
    ///
    /// This blocks until all scanners of the template have finished, so the
    /// result is never a partial view.
    ///
    pub fn collect(self) -> AggregatedSites {
        let mut forward = Vec::new();
        let mut reverse = Vec::new();

        let mut sel = Select::new();
        let forward_idx = sel.recv(&self.forward);
        // any other ready operation is on the reverse channel
        let _ = sel.recv(&self.reverse);
        let mut open = 2;

        while open > 0 {
            let oper = sel.select();
            let idx = oper.index();

            let (rx, sites) = if idx == forward_idx {
                (&self.forward, &mut forward)
            } else {
                (&self.reverse, &mut reverse)
            };

            match oper.recv(rx) {
                Ok(site) => sites.push(site),
                Err(_) => {
                    sel.remove(idx);
                    open -= 1;
                }
            }
        }

        AggregatedSites::from_unsorted(forward, reverse)
    }
}
