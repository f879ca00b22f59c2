// ABOUTME: OpenTelemetry instruments for dispatched items behind the `otel` feature
// ABOUTME: Compiles to no-ops when the feature is disabled
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

use crate::types::ProviderId;

#[cfg(feature = "otel")]
mod instruments {
    use std::sync::OnceLock;

    use opentelemetry::global;
    use opentelemetry::metrics::{Counter, Histogram};

    pub struct Instruments {
        pub items: Counter<u64>,
        pub failures: Counter<u64>,
        pub duration_ms: Histogram<u64>,
    }

    pub fn get() -> &'static Instruments {
        static INSTRUMENTS: OnceLock<Instruments> = OnceLock::new();
        INSTRUMENTS.get_or_init(|| {
            let meter = global::meter("playground");
            Instruments {
                items: meter
                    .u64_counter("playground.dispatch.items")
                    .with_description("Selections dispatched to a provider")
                    .build(),
                failures: meter
                    .u64_counter("playground.dispatch.failures")
                    .with_description("Selections that settled as failures")
                    .build(),
                duration_ms: meter
                    .u64_histogram("playground.dispatch.duration_ms")
                    .with_description("Wall-clock time per dispatched selection")
                    .build(),
            }
        })
    }
}

/// Record one settled selection
#[cfg(feature = "otel")]
pub fn record_item(provider: ProviderId, success: bool, duration_ms: u64) {
    use opentelemetry::KeyValue;

    let attrs = [KeyValue::new("provider", provider.as_str())];
    let instruments = instruments::get();
    instruments.items.add(1, &attrs);
    instruments.duration_ms.record(duration_ms, &attrs);
    if !success {
        instruments.failures.add(1, &attrs);
    }
}

/// Record one settled selection
#[cfg(not(feature = "otel"))]
pub fn record_item(provider: ProviderId, success: bool, duration_ms: u64) {
    let _ = (provider, success, duration_ms);
}
