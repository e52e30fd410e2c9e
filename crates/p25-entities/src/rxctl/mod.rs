pub mod rx_ctl;
pub mod rx_msg;
pub mod scheduler;
pub mod tuning;
pub mod worker;
