// src/aggregate.rs - per-file folding of classified events into series

use indexmap::IndexMap;
use std::io::BufRead;

use crate::classify::{classify, LogEvent, Schema};
use crate::error::ProcessingError;
use crate::render::{ChartRenderer, Curve, CWND_CHART};

/// Ordered samples collected for one connection within one file.
///
/// `times` and `cwnd_sizes` are index-aligned (the i-th cwnd sample was
/// taken at the i-th data-event timestamp). `throughputs` follows ack
/// order and is indexed independently.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectionSeries {
    pub times: Vec<f64>,
    pub cwnd_sizes: Vec<f64>,
    pub throughputs: Vec<f64>,
}

/// Everything collected from one log file, keyed by connection.
///
/// Keys keep first-seen order so chart legends follow file order. The
/// aggregate lives for exactly one file: created empty, filled line by
/// line, consumed once by the rendering step, then dropped.
#[derive(Debug, Default)]
pub struct FileAggregate {
    connections: IndexMap<String, ConnectionSeries>,
}

impl FileAggregate {
    pub fn new() -> Self {
        FileAggregate::default()
    }

    pub fn ingest(&mut self, event: LogEvent) {
        let series = self
            .connections
            .entry(event.connection_key().to_string())
            .or_default();
        match event {
            LogEvent::Data {
                timestamp, cwnd, ..
            } => {
                series.times.push(timestamp);
                series.cwnd_sizes.push(cwnd);
            }
            LogEvent::Ack { throughput, .. } => {
                series.throughputs.push(throughput);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&ConnectionSeries> {
        self.connections.get(key)
    }

    pub fn connections(&self) -> impl Iterator<Item = (&String, &ConnectionSeries)> {
        self.connections.iter()
    }

    /// Curves for the cwnd-over-time chart, one per connection in
    /// first-seen order. Multi-connection aggregates label each curve by
    /// its key; a lone series keeps its bare key and the renderer shows
    /// no legend for it.
    pub fn cwnd_curves(&self, schema: Schema) -> Vec<Curve> {
        self.connections
            .iter()
            .map(|(key, series)| {
                let label = match schema {
                    Schema::MultiConnection => format!("Port {}", key),
                    Schema::SingleConnection => key.clone(),
                };
                Curve::new(label, series.times.clone(), series.cwnd_sizes.clone())
            })
            .collect()
    }
}

/// Per-file runtime statistics.
#[derive(Debug, Default, Clone)]
pub struct ProcessingStats {
    pub lines_read: usize,
    pub data_events: usize,
    pub ack_events: usize,
    pub lines_skipped: usize,
    pub charts_rendered: usize,
    pub render_failures: usize,
}

impl ProcessingStats {
    pub fn merge(&mut self, other: &ProcessingStats) {
        self.lines_read += other.lines_read;
        self.data_events += other.data_events;
        self.ack_events += other.ack_events;
        self.lines_skipped += other.lines_skipped;
        self.charts_rendered += other.charts_rendered;
        self.render_failures += other.render_failures;
    }
}

/// Fold one file's lines into a [`FileAggregate`].
///
/// Lines are consumed strictly in file order; unclassifiable lines are
/// skipped and counted, never fatal. Only a read failure propagates.
pub fn aggregate_lines<R: BufRead>(
    input: R,
    schema: Schema,
    stats: &mut ProcessingStats,
) -> Result<FileAggregate, ProcessingError> {
    let mut aggregate = FileAggregate::new();

    for line in input.lines() {
        let line = line?;
        stats.lines_read += 1;

        match classify(&line, schema) {
            Some(event) => {
                match event {
                    LogEvent::Data { .. } => stats.data_events += 1,
                    LogEvent::Ack { .. } => stats.ack_events += 1,
                }
                aggregate.ingest(event);
            }
            None => stats.lines_skipped += 1,
        }
    }

    Ok(aggregate)
}

/// Process one log file end to end: aggregate, then render once.
///
/// A rendering failure is recovered here at file granularity - the error
/// and a fixed marker line go to stderr and the caller moves on to the
/// next file. There is no retry.
pub fn process_file<R: BufRead>(
    input: R,
    schema: Schema,
    renderer: &dyn ChartRenderer,
    chart_name: &str,
) -> Result<ProcessingStats, ProcessingError> {
    let mut stats = ProcessingStats::default();
    let aggregate = aggregate_lines(input, schema, &mut stats)?;

    let curves = aggregate.cwnd_curves(schema);
    match renderer.render(&CWND_CHART, &curves, chart_name) {
        Ok(()) => stats.charts_rendered += 1,
        Err(e) => {
            stats.render_failures += 1;
            eprintln!("{}", e);
            eprintln!("cwndplot: chart '{}' not rendered, continuing", chart_name);
        }
    }

    Ok(stats)
}
