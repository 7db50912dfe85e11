use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry};
use std::sync::OnceLock;

pub static PROMETHEUS_REGISTRY: OnceLock<Registry> = OnceLock::new();
pub static DEVIS_CREATED_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static FACTURES_CONVERTED_TOTAL: OnceLock<IntCounter> = OnceLock::new();

pub fn init_metrics() {
    let registry = Registry::new();

    let devis_counter = IntCounterVec::new(
        Opts::new(
            "devis_created_total",
            "Total quotes created by prestation type",
        ),
        &["type_prestation"],
    )
    .expect("Failed to create devis_created_total metric");

    let factures_counter = IntCounter::new(
        "factures_converted_total",
        "Total quotes converted to invoices",
    )
    .expect("Failed to create factures_converted_total metric");

    registry
        .register(Box::new(devis_counter.clone()))
        .expect("Failed to register devis_created_total");
    registry
        .register(Box::new(factures_counter.clone()))
        .expect("Failed to register factures_converted_total");

    PROMETHEUS_REGISTRY
        .set(registry)
        .expect("Failed to set prometheus registry");
    DEVIS_CREATED_TOTAL
        .set(devis_counter)
        .expect("Failed to set devis_created_total");
    FACTURES_CONVERTED_TOTAL
        .set(factures_counter)
        .expect("Failed to set factures_converted_total");
}

pub fn get_metrics() -> String {
    let Some(registry) = PROMETHEUS_REGISTRY.get() else {
        return "# Metrics not initialized\n".to_string();
    };

    let encoder = prometheus::TextEncoder::new();
    let metric_families = registry.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).ok();
    String::from_utf8(buffer).unwrap_or_default()
}

pub fn record_devis_created(type_prestation: &str) {
    if let Some(counter) = DEVIS_CREATED_TOTAL.get() {
        counter.with_label_values(&[type_prestation]).inc();
    }
}

pub fn record_facture_converted() {
    if let Some(counter) = FACTURES_CONVERTED_TOTAL.get() {
        counter.inc();
    }
}
