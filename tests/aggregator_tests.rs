// tests/aggregator_tests.rs - folding lines into per-connection series

use std::cell::RefCell;
use std::io::Cursor;

use cwndplot::{
    aggregate_lines, process_file, ChartRenderer, ChartSpec, Curve, ProcessingStats, RenderError,
    Schema,
};

/// Test double that records every render call and fails on demand.
struct RecordingRenderer {
    calls: RefCell<Vec<(String, Vec<Curve>)>>,
    fail: bool,
}

impl RecordingRenderer {
    fn new() -> Self {
        RecordingRenderer {
            calls: RefCell::new(Vec::new()),
            fail: false,
        }
    }

    fn failing() -> Self {
        RecordingRenderer {
            calls: RefCell::new(Vec::new()),
            fail: true,
        }
    }
}

impl ChartRenderer for RecordingRenderer {
    fn render(&self, _spec: &ChartSpec, curves: &[Curve], name: &str) -> Result<(), RenderError> {
        self.calls
            .borrow_mut()
            .push((name.to_string(), curves.to_vec()));
        if self.fail {
            return Err(RenderError::EmptyChart {
                chart: name.to_string(),
            });
        }
        Ok(())
    }
}

#[test]
fn test_single_data_line_scenario() {
    let input = Cursor::new("conn1 portA [ data] 0.10 5.0\n");
    let mut stats = ProcessingStats::default();

    let aggregate = aggregate_lines(input, Schema::MultiConnection, &mut stats).unwrap();

    let series = aggregate.get("portA").expect("portA series");
    assert_eq!(series.times, vec![0.10]);
    assert_eq!(series.cwnd_sizes, vec![5.0]);
    assert!(series.throughputs.is_empty());
    assert_eq!(stats.data_events, 1);
}

#[test]
fn test_times_keep_file_order() {
    let input = Cursor::new(
        "conn1 portA [ data] 0.50 8.0\n\
         conn1 portA [ data] 0.10 5.0\n\
         conn1 portA [ data] 0.90 2.0\n",
    );
    let mut stats = ProcessingStats::default();

    let aggregate = aggregate_lines(input, Schema::MultiConnection, &mut stats).unwrap();

    // Appended in file order, never sorted.
    let series = aggregate.get("portA").unwrap();
    assert_eq!(series.times, vec![0.50, 0.10, 0.90]);
    assert_eq!(series.cwnd_sizes, vec![8.0, 5.0, 2.0]);
}

#[test]
fn test_connections_grouped_by_key() {
    let input = Cursor::new(
        "conn1 portA [ data] 0.1 1.0\n\
         conn1 portB [ data] 0.2 2.0\n\
         conn1 portA [ ack] 0.3 100.0\n\
         conn1 portB [ data] 0.4 4.0\n",
    );
    let mut stats = ProcessingStats::default();

    let aggregate = aggregate_lines(input, Schema::MultiConnection, &mut stats).unwrap();

    let a = aggregate.get("portA").unwrap();
    assert_eq!(a.times, vec![0.1]);
    assert_eq!(a.throughputs, vec![100.0]);

    let b = aggregate.get("portB").unwrap();
    assert_eq!(b.times, vec![0.2, 0.4]);
    assert_eq!(b.cwnd_sizes, vec![2.0, 4.0]);
    assert!(b.throughputs.is_empty());

    assert_eq!(stats.data_events, 3);
    assert_eq!(stats.ack_events, 1);
}

#[test]
fn test_malformed_lines_do_not_abort_the_file() {
    let input = Cursor::new(
        "conn1 portA [ data] 0.1 1.0\n\
         garbage\n\
         conn1 portA [ data] oops 2.0\n\
         conn1 portA [ rst] 0.2 3.0\n\
         conn1 portA [ data] 0.3 3.0\n",
    );
    let mut stats = ProcessingStats::default();

    let aggregate = aggregate_lines(input, Schema::MultiConnection, &mut stats).unwrap();

    let series = aggregate.get("portA").unwrap();
    assert_eq!(series.times, vec![0.1, 0.3]);
    assert_eq!(stats.lines_read, 5);
    assert_eq!(stats.lines_skipped, 3);
}

#[test]
fn test_ack_only_file_has_empty_cwnd_series() {
    let input = Cursor::new(
        "conn1 portA [ ack] 0.1 10.0\n\
         conn1 portA [ ack] 0.2 20.0\n",
    );
    let mut stats = ProcessingStats::default();

    let aggregate = aggregate_lines(input, Schema::MultiConnection, &mut stats).unwrap();

    let series = aggregate.get("portA").unwrap();
    assert!(series.times.is_empty());
    assert!(series.cwnd_sizes.is_empty());
    assert_eq!(series.throughputs, vec![10.0, 20.0]);
}

#[test]
fn test_renderer_called_once_with_labeled_curves() {
    let input = Cursor::new(
        "conn1 portB [ data] 0.1 1.0\n\
         conn1 portA [ data] 0.2 2.0\n",
    );
    let renderer = RecordingRenderer::new();

    let stats = process_file(input, Schema::MultiConnection, &renderer, "cwnd-log-x").unwrap();

    let calls = renderer.calls.borrow();
    assert_eq!(calls.len(), 1);
    let (name, curves) = &calls[0];
    assert_eq!(name, "cwnd-log-x");

    // One curve per key, in first-seen order.
    assert_eq!(curves.len(), 2);
    assert_eq!(curves[0].label, "Port portB");
    assert_eq!(curves[1].label, "Port portA");
    assert_eq!(curves[0].xs, vec![0.1]);
    assert_eq!(curves[0].ys, vec![1.0]);

    assert_eq!(stats.charts_rendered, 1);
    assert_eq!(stats.render_failures, 0);
}

#[test]
fn test_single_schema_curve_keeps_bare_key() {
    let input = Cursor::new("sender data] 0.5 6.0\n");
    let renderer = RecordingRenderer::new();

    process_file(input, Schema::SingleConnection, &renderer, "cwnd-log-y").unwrap();

    let calls = renderer.calls.borrow();
    let (_, curves) = &calls[0];
    assert_eq!(curves.len(), 1);
    assert_eq!(curves[0].label, "0");
}

#[test]
fn test_render_failure_is_recovered() {
    let input = Cursor::new("conn1 portA [ ack] 0.1 10.0\n");
    let renderer = RecordingRenderer::failing();

    let stats = process_file(input, Schema::MultiConnection, &renderer, "cwnd-log-z").unwrap();

    assert_eq!(stats.render_failures, 1);
    assert_eq!(stats.charts_rendered, 0);
    // The renderer was still handed the (empty-series) aggregate.
    assert_eq!(renderer.calls.borrow().len(), 1);
}

#[test]
fn test_empty_file_still_invokes_renderer() {
    let input = Cursor::new("");
    let renderer = RecordingRenderer::new();

    let stats = process_file(input, Schema::MultiConnection, &renderer, "cwnd-log-empty").unwrap();

    assert_eq!(stats.lines_read, 0);
    let calls = renderer.calls.borrow();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].1.is_empty());
}
