// src/main.rs
//! Sentra Lab Test Reporter
//!
//! Demo run: records a simulated browser session and a few test results,
//! then writes one report per test to the configured output directory.

use anyhow::Result;
use sentra_lab_reporter::client::WindowEvent;
use sentra_lab_reporter::observability::init_tracing;
use sentra_lab_reporter::recording::SnapshotRecord;
use sentra_lab_reporter::utils::config::DEFAULT_CONFIG_FILE;
use sentra_lab_reporter::{
    RecorderRegistry, RecordingClientBuilder, ReporterConfig, SessionKey,
    TestLifecycleRecorder, TestOutcome,
};
use tracing::{error, info};

const NAVIGATION_TEST: &str = "org.example.demo.NavigationTest#opensHomePage";
const LOGIN_TEST: &str = "org.example.demo.LoginTest#rejectsBadPassword";

fn main() -> Result<()> {
    ReporterConfig::write_default_file(DEFAULT_CONFIG_FILE)?;
    let config = ReporterConfig::load()?;
    init_tracing(&config.logging)?;

    info!("Starting Sentra Lab Test Reporter v{}", env!("CARGO_PKG_VERSION"));

    let registry = RecorderRegistry::new(config);
    let lifecycle = TestLifecycleRecorder::from_config(&registry);

    // Browser session for the navigation test
    lifecycle.execution_started(NAVIGATION_TEST);
    let client = RecordingClientBuilder::new(&registry, NAVIGATION_TEST)
        .add_window_action_recording()
        .build();

    let window = WindowEvent::new("main");
    client.fire_window_opened(&window);
    client.fire_window_content_changed(
        &window
            .clone()
            .with_pages(Some("about:blank".into()), Some("https://example.org/".into())),
    );

    let key = SessionKey::parse(NAVIGATION_TEST);
    registry.obtain_recorder(key.as_str()).add_record(
        SnapshotRecord::new(
            key.method_name(),
            key.class_name(),
            "<html><body><h1>Example Domain</h1></body></html>",
        )
        .with_message("Home page loaded"),
    );
    client.fire_window_closed(&window);
    lifecycle.execution_finished(NAVIGATION_TEST, &TestOutcome::Passed);

    // A failing test without a browser session
    lifecycle.execution_started(LOGIN_TEST);
    lifecycle.execution_finished(
        LOGIN_TEST,
        &TestOutcome::Failed("expected error banner, none shown".into()),
    );

    let mut failures = 0;
    for (key, outcome) in registry.save_all() {
        match outcome {
            Ok(path) => println!("{key} -> {}", path.display()),
            Err(e) => {
                error!("{}: {}", key, e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} report(s) could not be written");
    }
    info!("Reports written");
    Ok(())
}
