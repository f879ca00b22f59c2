// ABOUTME: Result aggregation seam turning settled dispatch items into an orchestration result
// ABOUTME: Passes items through in order and summarizes successes versus failures
//
// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 dravr.ai

use crate::dispatch::ResultItem;

/// Ordered results of one orchestration, one item per input selection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrchestrationResult {
    items: Vec<ResultItem>,
}

impl OrchestrationResult {
    /// Items in input-selection order
    pub fn items(&self) -> &[ResultItem] {
        &self.items
    }

    /// Take ownership of the items
    pub fn into_items(self) -> Vec<ResultItem> {
        self.items
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether there are no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of items that produced text
    pub fn succeeded(&self) -> usize {
        self.items.iter().filter(|i| i.outcome.is_success()).count()
    }

    /// Human-readable summary line
    pub fn summary(&self) -> String {
        let total = self.len();
        let succeeded = self.succeeded();
        let failed = total - succeeded;
        format!("{succeeded} succeeded, {failed} failed out of {total} selections")
    }
}

/// Normalize settled items into the orchestration result
///
/// Identity today; redaction or truncation of outputs belongs here.
pub fn aggregate(items: Vec<ResultItem>) -> OrchestrationResult {
    OrchestrationResult { items }
}
