pub mod banner;
pub mod probe;
pub mod results;

use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::network::{parse_cidr, AddressRange};
pub use banner::{Banner, BannerParser, OffsetBannerParser, KEX_BLOB_RANGE};
pub use probe::{ProbeOutcome, Prober, TcpProber, READ_BUFFER_SIZE};
pub use results::{ScanReport, ScanResult, ScanSummary};

pub const DEFAULT_PORT: u16 = 22;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(50);
pub const DEFAULT_CONCURRENCY: usize = 50;

#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub port: u16,
    /// Bounds the connect and the read separately.
    pub timeout: Duration,
    /// Maximum probes in flight at once.
    pub concurrency: usize,
    /// Return results in address order instead of completion order.
    pub ordered: bool,
    pub progress: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            timeout: DEFAULT_TIMEOUT,
            concurrency: DEFAULT_CONCURRENCY,
            ordered: false,
            progress: false,
        }
    }
}

impl ScanConfig {
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn ordered(mut self, ordered: bool) -> Self {
        self.ordered = ordered;
        self
    }

    pub fn progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }
}

/// Sweeps an address range, probing every host and keeping the ones that
/// answer with a usable banner.
///
/// Per-address failures never abort a sweep. They are logged, counted in
/// the [`ScanSummary`], and the address is left out of the results.
pub struct Scanner {
    config: ScanConfig,
    prober: Arc<dyn Prober>,
    parser: Arc<dyn BannerParser>,
}

impl Scanner {
    pub fn new(config: ScanConfig) -> Self {
        let prober = Arc::new(TcpProber::new(config.port, config.timeout));
        Self {
            config,
            prober,
            parser: Arc::new(OffsetBannerParser),
        }
    }

    pub fn with_prober(mut self, prober: Arc<dyn Prober>) -> Self {
        self.prober = prober;
        self
    }

    pub fn with_parser(mut self, parser: Arc<dyn BannerParser>) -> Self {
        self.parser = parser;
        self
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Parses `target` and sweeps it. An invalid block is the only error,
    /// and it is returned before any probe is sent.
    pub async fn scan(&self, target: &str) -> Result<ScanReport> {
        let range = parse_cidr(target)?;
        Ok(self.run(&range).await)
    }

    pub async fn run(&self, range: &AddressRange) -> ScanReport {
        let concurrency = self.config.concurrency.max(1);
        info!(
            target = %range,
            hosts = range.len(),
            port = self.config.port,
            concurrency,
            timeout_ms = self.config.timeout.as_millis() as u64,
            "starting sweep"
        );

        let pb = self.progress_bar(range.len());
        let start_time = chrono::Utc::now();

        let prober = &*self.prober;
        let mut outcomes = stream::iter(range.iter().enumerate())
            .map(|(index, addr)| async move { (index, addr, prober.probe(addr).await) })
            .buffer_unordered(concurrency);

        let mut summary = ScanSummary::default();
        let mut collected: Vec<(usize, ScanResult)> = Vec::new();

        while let Some((index, addr, outcome)) = outcomes.next().await {
            pb.inc(1);
            if let Some(result) = self.settle(addr, outcome, &mut summary) {
                collected.push((index, result));
            }
        }

        if self.config.ordered {
            collected.sort_unstable_by_key(|(index, _)| *index);
        }

        pb.finish_and_clear();
        let end_time = chrono::Utc::now();

        info!(
            attempted = summary.attempted,
            found = collected.len(),
            timeouts = summary.timeouts,
            no_data = summary.no_data,
            connection_errors = summary.connection_errors,
            malformed = summary.malformed,
            "sweep complete"
        );

        ScanReport {
            target: range.to_string(),
            port: self.config.port,
            start_time,
            end_time,
            summary,
            results: collected.into_iter().map(|(_, result)| result).collect(),
        }
    }

    /// Folds one probe's outcome into the summary, returning a result only
    /// for hosts whose banner parsed.
    fn settle(&self, addr: Ipv4Addr, outcome: ProbeOutcome, summary: &mut ScanSummary) -> Option<ScanResult> {
        summary.attempted += 1;

        let raw = match outcome {
            ProbeOutcome::Success(raw) => raw,
            ProbeOutcome::Timeout => {
                summary.timeouts += 1;
                debug!(address = %addr, "timeout");
                return None;
            }
            ProbeOutcome::NoData => {
                summary.no_data += 1;
                debug!(address = %addr, "connected but no data");
                return None;
            }
            ProbeOutcome::ConnectionError(e) => {
                summary.connection_errors += 1;
                warn!(address = %addr, error = %e, "connection error");
                return None;
            }
        };

        summary.responded += 1;
        match self.parser.parse(&raw) {
            Ok(banner) => {
                debug!(address = %addr, version = %banner.protocol_version, "banner captured");
                Some(ScanResult {
                    address: addr,
                    protocol_version: banner.protocol_version,
                    kex_method_blob: banner.kex_method_blob,
                })
            }
            Err(e) => {
                summary.malformed += 1;
                debug!(address = %addr, error = %e, "unusable banner");
                None
            }
        }
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        if !self.config.progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(len);
        match ProgressStyle::default_bar()
            .template("⟦{spinner:.bright_magenta}⟧ [{elapsed_precise}] ⟨{bar:40.bright_green/bright_black}⟩ {pos}/{len} hosts probed ({eta})")
        {
            Ok(style) => pb.set_style(style.progress_chars("█▉▊▋▌▍▎▏ ")),
            Err(e) => debug!(error = %e, "falling back to default progress style"),
        }
        pb
    }
}
