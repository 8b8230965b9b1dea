pub mod games;
pub mod match_notifier;
