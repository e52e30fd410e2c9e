pub mod decoder;
pub mod network_state;
