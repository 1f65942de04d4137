pub mod monitor;
pub mod queue;
pub mod task;
pub mod worker;
