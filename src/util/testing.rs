//! Shared helpers for unit and integration tests.

use std::sync::Once;

use tracing::{debug, info};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::domain::{LineItem, Tree};

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    // RUST_LOG wins; otherwise trace our own crate only
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("budgetree=trace"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter),
    );

    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// Assert two amounts agree up to floating-point noise.
#[track_caller]
pub fn assert_close(actual: f64, expected: f64) {
    let tolerance = 1e-9 * expected.abs().max(1.0);
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected}, got {actual}"
    );
}

/// Three-level tree: `company` > (`ops` > `rent`, `power`), `payroll`.
pub fn three_level_tree() -> Tree {
    Tree::new(vec![LineItem::group(
        "company",
        "Company",
        1000.0,
        vec![
            LineItem::group(
                "ops",
                "Operations",
                400.0,
                vec![
                    LineItem::leaf("rent", "Rent", 300.0),
                    LineItem::leaf("power", "Power", 100.0),
                ],
            ),
            LineItem::leaf("payroll", "Payroll", 600.0),
        ],
    )])
    .expect("fixture ids are unique")
}
