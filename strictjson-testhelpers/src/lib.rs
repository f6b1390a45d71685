#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

use std::sync::LazyLock;
use std::time::Instant;

use serde_json::{Value, json};
use tracing_subscriber::filter::Targets;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

static START_TIME: LazyLock<Instant> = LazyLock::new(Instant::now);

struct Uptime;

impl FormatTime for Uptime {
    fn format_time(&self, w: &mut Writer<'_>) -> core::fmt::Result {
        let elapsed = START_TIME.elapsed();
        write!(w, "{:4}.{:03}s", elapsed.as_secs(), elapsed.subsec_millis())
    }
}

static SUBSCRIBER_INIT: LazyLock<()> = LazyLock::new(|| {
    let _ = *START_TIME;

    let filter = std::env::var("STRICTJSON_LOG")
        .ok()
        .and_then(|s| s.parse::<Targets>().ok())
        .unwrap_or_else(|| {
            Targets::new()
                .with_target("strictjson", tracing::Level::TRACE)
                .with_default(tracing::Level::WARN)
        });

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_test_writer()
                .with_timer(Uptime)
                .with_target(false)
                .with_level(true)
                .with_file(true)
                .with_line_number(true)
                .compact(),
        )
        .with(filter)
        .try_init()
        .ok();
});

/// Install the test tracing subscriber.
///
/// Safe to call from every test: the subscriber is set up once per process.
pub fn setup() {
    #[allow(clippy::let_unit_value)]
    let _ = *SUBSCRIBER_INIT;
}

/// A JSON array of `count` users, each with a nested address.
///
/// User `i` is named `User {i}`, is `20 + i % 50` years old and lives at
/// `{i} Fake St.`, zip code `i * 7 % 100000` padded to five digits.
pub fn user_list_json(count: usize) -> String {
    let users: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "name": format!("User {i}"),
                "age": 20 + i % 50,
                "address": {
                    "street": format!("{i} Fake St."),
                    "zip_code": format!("{:05}", i * 7 % 100_000),
                },
            })
        })
        .collect();
    Value::Array(users).to_string()
}
