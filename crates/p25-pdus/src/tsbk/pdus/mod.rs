pub mod broadcasts;
pub mod data_grants;
pub mod iden_up;
pub mod motorola;
pub mod opaque;
pub mod registration;
pub mod responses;
pub mod unit_control;
pub mod voice_grants;
