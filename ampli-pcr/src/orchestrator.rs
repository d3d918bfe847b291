use std::convert::Infallible;
use std::fmt::{self, Display};
use std::ops::ControlFlow;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, Scope, ScopedJoinHandle};

use crossbeam_channel::{Receiver, Sender, bounded};
use indicatif::ProgressBar;
use log::{debug, info, trace};

use ampli_core::models::{Amplicon, Template, TemplateStore};

use crate::aggregator::{AggregatedSites, SiteSenders, site_channels};
use crate::calculator::{CalculationStats, for_each_amplicon};
use crate::consts::DEFAULT_CHANNEL_CAPACITY;
use crate::errors::PcrError;
use crate::models::MaxProductLength;
use crate::primers::{PrimerSet, ScanTarget};
use crate::scanner::SiteScanner;

///
/// Cooperative cancellation flag shared by every worker of a run.
///
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Number of templates processed at once unless told otherwise: one per core.
pub fn default_concurrency() -> usize {
    thread::available_parallelism()
        .map(|c| c.into())
        .unwrap_or(1)
}

#[derive(Debug, Clone)]
pub struct PcrOptions {
    pub max_product_length: MaxProductLength,
    /// Capacity of every bounded channel in the pipeline
    pub channel_capacity: usize,
    /// Templates processed at once, [`default_concurrency`] by default.
    /// `None` starts one unit per template.
    pub max_concurrent_templates: Option<usize>,
    pub cancel: CancelToken,
    /// Advanced once per finished template
    pub progress: Option<ProgressBar>,
}

impl Default for PcrOptions {
    fn default() -> Self {
        PcrOptions {
            max_product_length: MaxProductLength::UNLIMITED,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            max_concurrent_templates: Some(default_concurrency()),
            cancel: CancelToken::new(),
            progress: None,
        }
    }
}

impl PcrOptions {
    pub fn with_max_product_length(mut self, raw: usize) -> Self {
        self.max_product_length = MaxProductLength::from_raw(raw);
        self
    }
}

/// Lifecycle of one template inside a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateState {
    Dispatched,
    Scanning,
    Aggregated,
    Calculating,
    Done,
}

impl Display for TemplateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self {
            TemplateState::Dispatched => "dispatched",
            TemplateState::Scanning => "scanning",
            TemplateState::Aggregated => "aggregated",
            TemplateState::Calculating => "calculating",
            TemplateState::Done => "done",
        };
        write!(f, "{}", state)
    }
}

/// What happened to one template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateReport {
    pub name: String,
    pub forward_sites: usize,
    pub reverse_sites: usize,
    pub stats: CalculationStats,
}

/// Totals over a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PcrSummary {
    pub templates: usize,
    pub forward_sites: usize,
    pub reverse_sites: usize,
    /// Products delivered to the sink
    pub amplicons: usize,
    pub too_long: usize,
    pub superseded: usize,
}

impl PcrSummary {
    fn add(&mut self, report: &TemplateReport) {
        self.templates += 1;
        self.forward_sites += report.forward_sites;
        self.reverse_sites += report.reverse_sites;
        self.too_long += report.stats.too_long;
        self.superseded += report.stats.superseded;
    }
}

///
/// Predict every PCR product of `primers` on `templates`.
///
/// Templates are taken off a queue by coordination units, as many as
/// `max_concurrent_templates` allows (never more than there are templates). A unit runs one scanner
/// thread per (primer, strand) and waits for all of them before pairing
/// sites. Products of all templates meet in one bounded channel that is
/// drained on the calling thread into `sink`, in arrival order: products of
/// one template keep their position order, but templates interleave.
///
/// # Errors
/// - `PcrError::NoPrimers` or `PcrError::NoTemplates` before any thread starts
/// - `PcrError::Sink` if `sink` fails; the remaining work is cancelled
/// - `PcrError::Cancelled` if `options.cancel` was triggered
/// - `PcrError::WorkerPanicked` or `PcrError::Spawn` if a worker thread fails
pub fn simulate_pcr<F, E>(
    templates: &TemplateStore,
    primers: &PrimerSet,
    options: &PcrOptions,
    mut sink: F,
) -> Result<PcrSummary, PcrError>
where
    F: FnMut(Amplicon) -> Result<(), E>,
    E: Display,
{
    if primers.is_empty() {
        return Err(PcrError::NoPrimers);
    }
    if templates.is_empty() {
        return Err(PcrError::NoTemplates);
    }

    let targets = primers.scan_targets();
    let capacity = options.channel_capacity.max(1);
    let units = options
        .max_concurrent_templates
        .unwrap_or(templates.len())
        .clamp(1, templates.len());

    info!(
        "Simulating PCR with {} primer(s) on {} template(s), max product length {}",
        primers.len(),
        templates.len(),
        options.max_product_length
    );

    // every template is queued up front, the units pull from here
    let (job_tx, job_rx) = bounded::<&Template>(templates.len());
    for template in templates {
        // cannot fail, the queue holds every template
        let _ = job_tx.send(template);
    }
    drop(job_tx);

    let (result_tx, result_rx) = bounded::<Amplicon>(capacity);

    let (delivered, sink_error, outcomes) = thread::scope(|scope| {
        let mut handles = Vec::with_capacity(units);
        let mut spawn_error = None;

        for unit in 0..units {
            let jobs = job_rx.clone();
            let results = result_tx.clone();
            let targets = targets.as_slice();

            let spawned = thread::Builder::new()
                .name(format!("pcr-unit-{}", unit))
                .spawn_scoped(scope, move || {
                    run_unit(jobs, targets, options, capacity, results)
                });

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    options.cancel.cancel();
                    spawn_error = Some(PcrError::Spawn(e));
                    break;
                }
            }
        }

        // the units hold the only remaining senders; the loop below ends
        // once every unit has finished
        drop(result_tx);

        let mut delivered = 0;
        let mut sink_error = None;
        for amplicon in result_rx.iter() {
            if sink_error.is_some() {
                continue;
            }
            match sink(amplicon) {
                Ok(()) => delivered += 1,
                Err(e) => {
                    sink_error = Some(e.to_string());
                    options.cancel.cancel();
                }
            }
        }

        let mut outcomes: Vec<Result<Vec<TemplateReport>, PcrError>> = handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|_| Err(PcrError::WorkerPanicked("template unit".to_string())))
            })
            .collect();
        if let Some(err) = spawn_error {
            outcomes.push(Err(err));
        }

        (delivered, sink_error, outcomes)
    });

    if let Some(err) = sink_error {
        return Err(PcrError::Sink(err));
    }

    let mut summary = PcrSummary::default();
    for outcome in outcomes {
        for report in outcome? {
            summary.add(&report);
        }
    }
    summary.amplicons = delivered;

    info!(
        "Found {} candidate PCR product(s) ({} forward / {} reverse primer sites, {} too long, {} superseded by a closer primer)",
        summary.amplicons,
        summary.forward_sites,
        summary.reverse_sites,
        summary.too_long,
        summary.superseded
    );

    Ok(summary)
}

///
/// Run the engine and collect every product, sorted by
/// (chrom, start, end, name).
///
pub fn simulate_pcr_sorted(
    templates: &TemplateStore,
    primers: &PrimerSet,
    options: &PcrOptions,
) -> Result<(Vec<Amplicon>, PcrSummary), PcrError> {
    let mut amplicons = Vec::new();
    let summary = simulate_pcr(templates, primers, options, |amplicon| {
        amplicons.push(amplicon);
        Ok::<(), Infallible>(())
    })?;
    amplicons.sort();
    Ok((amplicons, summary))
}

/// One coordination unit: takes templates off the queue until it is empty.
fn run_unit(
    jobs: Receiver<&Template>,
    targets: &[ScanTarget],
    options: &PcrOptions,
    capacity: usize,
    results: Sender<Amplicon>,
) -> Result<Vec<TemplateReport>, PcrError> {
    let mut reports = Vec::new();

    for template in jobs.iter() {
        let report = run_template(template, targets, options, capacity, &results)?;
        if let Some(bar) = &options.progress {
            bar.inc(1);
        }
        reports.push(report);
    }

    Ok(reports)
}

fn transition(template: &Template, state: TemplateState) {
    debug!("{}: {}", template.name, state);
}

fn run_template(
    template: &Template,
    targets: &[ScanTarget],
    options: &PcrOptions,
    capacity: usize,
    results: &Sender<Amplicon>,
) -> Result<TemplateReport, PcrError> {
    transition(template, TemplateState::Dispatched);

    let sites = scan_template(template, targets, &options.cancel, capacity)?;
    transition(template, TemplateState::Aggregated);

    if options.cancel.is_cancelled() {
        return Err(PcrError::Cancelled);
    }

    let mut report = TemplateReport {
        name: template.name.clone(),
        forward_sites: sites.forward.len(),
        reverse_sites: sites.reverse.len(),
        stats: CalculationStats::default(),
    };
    debug!(
        "{}: {} forward and {} reverse primer sites",
        template.name, report.forward_sites, report.reverse_sites
    );

    if sites.is_calculable() {
        transition(template, TemplateState::Calculating);
        report.stats = for_each_amplicon(
            &template.name,
            &sites.forward,
            &sites.reverse,
            options.max_product_length,
            |amplicon| match results.send(amplicon) {
                Ok(()) => ControlFlow::Continue(()),
                // the sink loop is gone, nobody will read further products
                Err(_) => ControlFlow::Break(()),
            },
        );
    }

    transition(template, TemplateState::Done);
    Ok(report)
}

///
/// Fan out one scanner per target over `template` and gather their sites.
///
/// Returns only once every scanner has finished and been joined.
///
fn scan_template(
    template: &Template,
    targets: &[ScanTarget],
    cancel: &CancelToken,
    capacity: usize,
) -> Result<AggregatedSites, PcrError> {
    let (senders, aggregator) = site_channels(capacity);

    thread::scope(|scope| {
        let mut handles = Vec::with_capacity(targets.len());
        let mut spawn_error = None;

        for target in targets {
            match spawn_scanner(scope, template, target, &senders, cancel) {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    cancel.cancel();
                    spawn_error = Some(PcrError::Spawn(e));
                    break;
                }
            }
        }

        drop(senders);
        transition(template, TemplateState::Scanning);
        let sites = aggregator.collect();

        let mut failure = spawn_error;
        for handle in handles {
            if handle.join().is_err() && failure.is_none() {
                failure = Some(PcrError::WorkerPanicked(format!(
                    "site scanner on {}",
                    template.name
                )));
            }
        }

        match failure {
            Some(err) => Err(err),
            None => Ok(sites),
        }
    })
}

fn spawn_scanner<'scope, 'env>(
    scope: &'scope Scope<'scope, 'env>,
    template: &'env Template,
    target: &'env ScanTarget,
    senders: &SiteSenders,
    cancel: &'env CancelToken,
) -> std::io::Result<ScopedJoinHandle<'scope, ()>> {
    let tx = senders.for_strand(target.strand).clone();

    thread::Builder::new()
        .name(format!("pcr-scan-{}", target.strand))
        .spawn_scoped(scope, move || {
            let query = Arc::clone(&target.query);
            let scanner = SiteScanner::new(&template.sequence, query, target.strand);
            let mut found = 0;
            for site in scanner {
                if cancel.is_cancelled() || tx.send(site).is_err() {
                    break;
                }
                found += 1;
            }
            trace!(
                "{}: {} site(s) for {} on {} strand",
                template.name, found, target.query, target.strand
            );
        })
}
