pub mod collect;
pub mod query;

pub use collect::{
    Attempt, CollectError, CollectProgress, CollectSummary, NullProgress, RetryBudget,
    collect_draws,
};
pub use query::{
    DateRange, FrequencyReport, LastDraw, QueryError, get_frequency, get_last_draw,
};
