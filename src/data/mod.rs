/// Data layer: loading, cleaning, the table registry and the query interface.
///
/// Architecture:
/// ```text
///  survey workbook (.xlsx)        classification table (.xlsx / .csv)
///        │                                  │
///        ▼                                  ▼
///   ┌──────────┐                      ┌──────────┐
///   │  loader   │  4 × RawSheet        │  loader   │  IndustryReference
///   └──────────┘                      └──────────┘
///        │                                  │
///        ▼                                  │
///   ┌──────────┐  scope → project → suppress → rename → derive → sort
///   │  clean    │◄─────────────────────────┘ (sector join)
///   └──────────┘
///        │  4 × CleanedTable
///        ▼
///   ┌──────────┐
///   │ registry  │  read-only, shared via Arc
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  question (+ segment value) → ranked answers
///   └──────────┘
/// ```

pub mod clean;
pub mod filter;
pub mod loader;
pub mod model;
pub mod questions;
pub mod reference;
pub mod registry;

#[cfg(test)]
pub(crate) mod fixtures;
