use std::collections::HashMap;
use strum_macros::Display;
use tracing::{debug, trace};

use super::processor::{DataProcessor, NullProcessor, SampleBuffer};
use super::provider::{DataProvider, FeedSeries, LatestSamples};
use crate::common::{
    report_error::{ErrCode, ReportError},
    sample::Sample,
    time::Time,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CycleState {
    Idle,
    /// Cycle started; `reported` is set once every provider has been visited
    Open { reported: bool },
}

#[derive(Debug)]
enum ProviderSlot {
    Feed(FeedSeries),
    Derived(Box<dyn DataProvider>),
}

impl ProviderSlot {
    fn provider_mut(&mut self) -> &mut dyn DataProvider {
        match self {
            Self::Feed(feed) => feed,
            Self::Derived(provider) => provider.as_mut(),
        }
    }
}

/// Registry of providers driven through one processor per reporting cycle.
///
/// Feeds report first, then derived providers in registration order. Every
/// sample a provider emits is forwarded to the processor in emission order and
/// recorded in the cycle's `LatestSamples`, so a derived provider can read what
/// any feed, or a derived provider registered before it, published in the same
/// cycle.
#[derive(Debug)]
pub struct ReportingSession {
    slots: Vec<ProviderSlot>,
    index: HashMap<String, usize>,
    latest: LatestSamples,
    state: CycleState,
    cycles: u64,
}

impl Default for ReportingSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportingSession {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            index: HashMap::new(),
            latest: LatestSamples::new(),
            state: CycleState::Idle,
            cycles: 0,
        }
    }

    /// Register a raw series the driver feeds through [`Self::feed`].
    ///
    /// Feeds report before every derived provider, whenever they are registered.
    pub fn register_feed(&mut self, name: impl Into<String>) -> Result<(), ReportError> {
        self.insert(ProviderSlot::Feed(FeedSeries::new(name)))
    }

    pub fn register(&mut self, provider: Box<dyn DataProvider>) -> Result<(), ReportError> {
        self.insert(ProviderSlot::Derived(provider))
    }

    fn insert(&mut self, mut slot: ProviderSlot) -> Result<(), ReportError> {
        let name = slot.provider_mut().name().to_string();
        if self.index.contains_key(&name) {
            return Err(ReportError::new(
                format!("a provider already publishes {}", name),
                ErrCode::DuplicateOutput,
            ));
        }
        // feeds stay ahead of every derived provider so they report first
        let position = match slot {
            ProviderSlot::Feed(_) => self
                .slots
                .iter()
                .take_while(|s| matches!(s, ProviderSlot::Feed(_)))
                .count(),
            ProviderSlot::Derived(_) => self.slots.len(),
        };
        for idx in self.index.values_mut() {
            if *idx >= position {
                *idx += 1;
            }
        }

        debug!(provider = %name, position, "registered provider");
        self.index.insert(name, position);
        self.slots.insert(position, slot);
        Ok(())
    }

    /// Queue a raw sample on the feed series named by `sample.source_name()`.
    pub fn feed(&mut self, sample: Sample) -> Result<(), ReportError> {
        let slot = self
            .index
            .get(sample.source_name())
            .and_then(|&idx| self.slots.get_mut(idx));
        match slot {
            Some(ProviderSlot::Feed(feed)) => {
                feed.push(sample.time(), sample.y());
                Ok(())
            }
            _ => Err(ReportError::new(
                format!("no feed series named {:?}", sample.source_name()),
                ErrCode::UnknownSource,
            )),
        }
    }

    pub fn has_provider(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Provider names in reporting order: feeds, then derived providers.
    pub fn provider_names(&self) -> Vec<String> {
        let mut names: Vec<(usize, &String)> = self.index.iter().map(|(k, v)| (*v, k)).collect();
        names.sort_unstable();
        names.into_iter().map(|(_, name)| name.clone()).collect()
    }

    pub fn state(&self) -> CycleState {
        self.state
    }

    /// Number of cycles collected so far.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn start_reporting_cycle(
        &mut self,
        time: Time,
        processor: &mut dyn DataProcessor,
    ) -> Result<(), ReportError> {
        if let CycleState::Open { .. } = self.state {
            return Err(ReportError::new(
                format!("cannot start cycle at {}: previous cycle not collected", time),
                ErrCode::CycleAlreadyOpen,
            ));
        }

        debug!(%time, cycle = self.cycles, "starting reporting cycle");
        self.latest.reset(time);
        processor.start_reporting_cycle(time);
        self.state = CycleState::Open { reported: false };
        Ok(())
    }

    /// Visit every provider once, in registration order.
    pub fn report_all(&mut self, processor: &mut dyn DataProcessor) -> Result<(), ReportError> {
        match self.state {
            CycleState::Idle => {
                return Err(ReportError::new("no open cycle to report", ErrCode::NoOpenCycle))
            }
            CycleState::Open { reported: true } => {
                return Err(ReportError::new(
                    "providers already reported this cycle",
                    ErrCode::CycleAlreadyReported,
                ))
            }
            CycleState::Open { reported: false } => {}
        }

        let mut buffer = SampleBuffer::new();
        for slot in self.slots.iter_mut() {
            let provider = slot.provider_mut();
            provider.report(&self.latest, &mut buffer);
            for sample in buffer.drain() {
                trace!(
                    provider = provider.name(),
                    series = sample.source_name(),
                    y = sample.y(),
                    "routing sample"
                );
                self.latest.record(&sample);
                processor.receive_data(sample);
            }
        }

        self.state = CycleState::Open { reported: true };
        Ok(())
    }

    pub fn collect_reports(&mut self, processor: &mut dyn DataProcessor) -> Result<(), ReportError> {
        if self.state == CycleState::Idle {
            return Err(ReportError::new("no open cycle to collect", ErrCode::NoOpenCycle));
        }

        processor.collect_reports();
        self.state = CycleState::Idle;
        self.cycles += 1;
        debug!(cycle = self.cycles, published = self.latest.len(), "collected reporting cycle");
        Ok(())
    }

    /// Start, report and collect one cycle.
    pub fn run_cycle(
        &mut self,
        time: Time,
        processor: &mut dyn DataProcessor,
    ) -> Result<(), ReportError> {
        self.start_reporting_cycle(time, processor)?;
        self.report_all(processor)?;
        self.collect_reports(processor)
    }

    /// Run a cycle whose output goes nowhere; estimators still advance.
    pub fn advance(&mut self, time: Time) -> Result<(), ReportError> {
        self.run_cycle(time, &mut NullProcessor)
    }
}
