//! relexec - a pull-based query execution core for a single-node
//! relational store
//!
//! - `tuple`: Field / Type / Schema / Tuple model and the text format
//! - `storage`: the page-source boundary and an in-memory implementation
//! - `executor`: the operator protocol, Scan, Filter, Join and Aggregate
//! - `observability`: JSON-lines logging, events and counters
//! - `cli`: config loading and the `relexec` command

pub mod cli;
pub mod executor;
pub mod observability;
pub mod storage;
pub mod tuple;
