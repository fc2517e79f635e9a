use navplot_core::{ReportConfig, ReportingSession, Sample, SeriesAggregator, Time, TradingCalendar};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::error::Error;
use std::fs::File;
use std::io::Read;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Deserialize)]
struct CsvRecord {
    time: String,
    source: String,
    value: f64,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        let program = args.first().map_or("navplot_cli", String::as_str);
        eprintln!("usage: {} <samples.csv> <config.json>", program);
        std::process::exit(2);
    }

    let config = ReportConfig::load(&args[2])?;
    let cycles = read_samples(File::open(&args[1])?)?;
    info!(cycles = cycles.len(), path = %args[1], "loaded samples");

    let aggregator = replay(&config, cycles)?;
    info!(
        cycles = aggregator.cycles(),
        labels = aggregator.labels().len(),
        dropped = aggregator.dropped_samples(),
        "aggregation completed"
    );
    println!("{}", aggregator.snapshot().to_json()?);
    Ok(())
}

/// Group the CSV rows by timestamp; each group becomes one reporting cycle.
fn read_samples<R: Read>(reader: R) -> Result<BTreeMap<Time, Vec<Sample>>, Box<dyn Error>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut cycles: BTreeMap<Time, Vec<Sample>> = BTreeMap::new();

    for result in rdr.deserialize() {
        let record: CsvRecord = result?;
        let time = Time::from_str(record.time.trim())?;
        cycles
            .entry(time)
            .or_default()
            .push(Sample::new(record.source.trim(), time, record.value));
    }

    Ok(cycles)
}

/// Run one cycle per timestamp, in time order, through the configured session.
fn replay(
    config: &ReportConfig,
    cycles: BTreeMap<Time, Vec<Sample>>,
) -> Result<SeriesAggregator, Box<dyn Error>> {
    let (mut session, mut aggregator) = config.build(&TradingCalendar::default())?;

    for (time, samples) in cycles {
        for sample in samples {
            register_unknown_feed(&mut session, sample.source_name());
            session.feed(sample)?;
        }
        session.run_cycle(time, &mut aggregator)?;
    }
    Ok(aggregator)
}

fn register_unknown_feed(session: &mut ReportingSession, name: &str) {
    if session.has_provider(name) {
        return;
    }
    warn!(series = name, "series not declared in config, registering it as a feed");
    if let Err(e) = session.register_feed(name) {
        warn!(series = name, error = %e, "cannot register feed");
    }
}
