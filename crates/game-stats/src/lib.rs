//! Query and aggregation engine over engine-annotated chess games.
//!
//! Games flow through one pipeline: [`filter`] selects them, [`aggregate`]
//! groups them, [`metrics`] reduces them, and [`ranking`] orders the result.
//! [`StatsEngine`] wires the stages together for each query.

pub mod aggregate;
pub mod config;
pub mod criteria;
pub mod engine;
pub mod error;
pub mod filter;
pub mod metrics;
pub mod query;
pub mod ranking;
pub mod table;

pub use aggregate::{aggregate_by_opening, GroupRecord, OpeningAggregate, OpeningGrouping};
pub use config::ReportConfig;
pub use criteria::{Criteria, EloRange, EloSubject, OpeningScope, ValueSet};
pub use engine::{GamesByResult, StatsEngine};
pub use error::StatsError;
pub use filter::filter_games;
pub use metrics::{EloBucket, PlyPoint, PlySeries, Record};
pub use query::Query;
pub use ranking::{leaders, rank, MetricKey, RankOptions, Ranked};
pub use table::{Cell, Table};
