use std::sync::OnceLock;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::core::config::TelemetrySettings;

static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

pub(crate) fn init(telemetry: &TelemetrySettings) -> anyhow::Result<()> {
    if !telemetry.prometheus_enabled || PROM_HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    let _ = PROM_HANDLE.set(handle);
    Ok(())
}

pub(crate) fn render() -> Option<String> {
    PROM_HANDLE.get().map(|handle| handle.render())
}

/// Counts a domain action such as `retake_enroll` or `grade_create`.
pub(crate) fn record_action(action: &'static str, outcome: &'static str) {
    metrics::counter!("records_actions_total", "action" => action, "outcome" => outcome)
        .increment(1);
}
