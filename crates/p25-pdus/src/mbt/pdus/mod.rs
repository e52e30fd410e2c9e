pub mod mbt_grants;
pub mod mbt_status;
