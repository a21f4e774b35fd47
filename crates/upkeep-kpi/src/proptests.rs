//! Property-based tests for the KPI formulas and aggregation.
