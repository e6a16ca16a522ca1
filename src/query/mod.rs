//! Declarative pattern matching, aggregation and the named query operations

mod aggregate;
mod binding;
mod facade;
mod matcher;
mod pattern;

pub use aggregate::{Aggregator, CountedRow, SortOrder};
pub use binding::{Binding, BindingSet};
pub use facade::{
    ProjectContributors, Queries, QueryError, QueryResult, LABEL_PROJECT, LABEL_USER, PROP_NAME,
    PROP_USERNAME, TYPE_CONTRIBUTES_TO, TYPE_OWNED_BY,
};
pub use matcher::{distinct, exclude_equal, Matcher};
pub use pattern::{Direction, NodeConstraint, Pattern, RelStep};
