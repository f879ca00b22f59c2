// ABOUTME: Library root re-exporting server modules for integration testing
// ABOUTME: Enables tests/ to access router, state, auth, and handler modules
//
// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 dravr.ai

pub mod auth;
pub mod health;
pub mod models;
pub mod orchestrate;
pub mod providers;
pub mod router;
pub mod state;
pub mod studio_types;
