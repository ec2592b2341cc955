//! UI-facing bindings over `portfolio_core`.

pub mod api;
