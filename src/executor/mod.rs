//! Query executor for relexec
//!
//! Pull-based operator trees over the tuple model:
//!
//! - `Scan` bridges storage pages into a tuple stream
//! - `Filter` keeps tuples matching a `Predicate`
//! - `Join` is a resumable nested-loop join on a `JoinPredicate`
//! - `Aggregate` computes MIN/MAX/SUM/AVG/COUNT, optionally grouped
//!
//! # Execution model
//!
//! Single-threaded, synchronous, pull-driven. A tree is opened once,
//! drained through `has_next`/`next`, and closed. The only suspension
//! point is the page fetch inside `Scan`.
//!
//! # Invariants
//!
//! - One transaction id per tree, passed to every page fetch
//! - Storage errors propagate unchanged and are never retried
//! - No error is swallowed

mod aggregate;
mod errors;
mod filter;
mod join;
mod operator;
mod predicate;
mod scan;
mod tuple_iter;

pub use aggregate::{
    aggregate_column_name, aggregate_schema, new_aggregator, Aggregate, AggregateOp,
    AggregateSpec, Aggregator, IntegerAggregator, TextAggregator,
};
pub use errors::{ExecError, ExecResult};
pub use filter::Filter;
pub use join::Join;
pub use operator::{collect, drain, Cursor, OpState, Operator};
pub use predicate::{CompareOp, JoinPredicate, Predicate};
pub use scan::Scan;
pub use tuple_iter::TupleIterator;
