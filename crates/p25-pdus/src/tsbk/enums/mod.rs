pub mod mfid;
pub mod mot_opcode;
pub mod registration_response;
pub mod tsbk_opcode;
