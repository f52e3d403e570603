// src/classify.rs - line classification for experiment logs

/// Positional token layout a log line follows.
///
/// The experiment logger emitted two layouts over time: one where several
/// connections are multiplexed into a single file and each line carries a
/// connection key, and an older one where a file holds exactly one
/// connection and the key column is absent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Schema {
    /// `<tag> <key> [ data] <time> <cwnd>` / `<tag> <key> [ ack] <time> <tput>`
    #[value(name = "multi")]
    MultiConnection,
    /// `<tag> data] <time> <cwnd>` / `<tag> ack] <time> <tput>`
    #[value(name = "single")]
    SingleConnection,
}

/// Key used for every event in single-connection files.
pub const DEFAULT_CONNECTION_KEY: &str = "0";

const DATA_MARKER: &str = "data]";
const ACK_MARKER: &str = "ack]";

/// One classified log line.
#[derive(Debug, Clone, PartialEq)]
pub enum LogEvent {
    Data {
        connection_key: String,
        timestamp: f64,
        cwnd: f64,
    },
    Ack {
        connection_key: String,
        timestamp: f64,
        throughput: f64,
    },
}

impl LogEvent {
    pub fn connection_key(&self) -> &str {
        match self {
            LogEvent::Data { connection_key, .. } => connection_key,
            LogEvent::Ack { connection_key, .. } => connection_key,
        }
    }
}

/// Classify one raw line under the given schema.
///
/// Tokenization is whitespace splitting, nothing else. Returns `None` for
/// lines that are too short, carry a non-numeric field, or whose event
/// marker is neither `data]` nor `ack]` - such lines are skipped, they are
/// never an error.
pub fn classify(line: &str, schema: Schema) -> Option<LogEvent> {
    let tokens: Vec<&str> = line.split_whitespace().collect();

    // Token positions per schema: (key, marker, timestamp index, value index)
    let (key, marker, ts_idx, value_idx) = match schema {
        Schema::MultiConnection => (*tokens.get(1)?, *tokens.get(3)?, 4, 5),
        Schema::SingleConnection => (DEFAULT_CONNECTION_KEY, *tokens.get(1)?, 2, 3),
    };

    if marker != DATA_MARKER && marker != ACK_MARKER {
        return None;
    }

    let timestamp: f64 = tokens.get(ts_idx)?.parse().ok()?;
    let value: f64 = tokens.get(value_idx)?.parse().ok()?;

    if marker == DATA_MARKER {
        Some(LogEvent::Data {
            connection_key: key.to_string(),
            timestamp,
            cwnd: value,
        })
    } else {
        Some(LogEvent::Ack {
            connection_key: key.to_string(),
            timestamp,
            throughput: value,
        })
    }
}
