pub mod clock;
pub mod deal_aggregator;
