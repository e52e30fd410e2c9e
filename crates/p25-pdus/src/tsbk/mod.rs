pub mod enums;
pub mod fields;
pub mod pdus;
pub mod tsbk_header;

use core::fmt;

use p25_core::{BitBuffer, PduParseErr};

use enums::mfid::Mfid;
use enums::mot_opcode::MotOpcode;
use enums::tsbk_opcode::TsbkOpcode;
use pdus::broadcasts::*;
use pdus::data_grants::*;
use pdus::iden_up::*;
use pdus::motorola::*;
use pdus::opaque::OpaqueBody;
use pdus::registration::*;
use pdus::responses::*;
use pdus::unit_control::*;
use pdus::voice_grants::*;
use tsbk_header::TsbkHeader;

/// Harris reuses the IDEN_UP_TDMA opcode for its call sign broadcast
pub const HARRIS_CALL_SIGN_OPCODE: u8 = 0x33;

/// A decoded TSBK body, one variant per message type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TsbkPdu {
    GrpVChGrant(GrpVChGrant),
    GrpVChGrantUpdt(GrpVChGrantUpdt),
    GrpVChGrantUpdtExp(GrpVChGrantUpdtExp),
    UuVChGrant(UuVChGrant),
    UuAnsReq(UuAnsReq),
    UuVChGrantUpdt(UuVChGrant),
    TeleIntChGrant(TeleIntChGrant),
    TeleIntChGrantUpdt(TeleIntChGrant),
    TeleIntAnsReq(TeleIntAnsReq),
    IndDataChGrant(IndDataChGrant),
    GrpDataChGrant(GrpDataChGrant),
    GrpDataChAnn(GrpDataChAnn),
    GrpDataChAnnExp(GrpDataChAnnExp),
    SnDataChGrant(SnDataChGrant),
    SnDataPageReq(SnDataPageReq),
    SnDataChAnnExp(SnDataChAnnExp),
    StsUpdt(StsUpdt),
    StsQ(UnitCommand),
    MsgUpdt(MsgUpdt),
    RadMonCmd(RadMonCmd),
    RadMonEnhCmd(OpaqueBody),
    CallAlrt(UnitCommand),
    AckRspFne(AckRspFne),
    QueRsp(ServiceResponse),
    ExtFnctCmd(ExtFnctCmd),
    DenyRsp(ServiceResponse),
    GrpAffRsp(GrpAffRsp),
    SccbExp(SccbExp),
    GrpAffQ(UnitCommand),
    LocRegRsp(LocRegRsp),
    URegRsp(URegRsp),
    URegCmd(UnitCommand),
    AuthCmd(FullUnitId),
    UDeRegAck(FullUnitId),
    SyncBcst(SyncBcst),
    AuthDmd(OpaqueBody),
    AuthFneResp(AuthFneResp),
    IdenUpTdma(IdenUpTdma),
    IdenUpVu(IdenUpVu),
    TimeDateAnn(TimeDateAnn),
    RoamAddrCmd(OpaqueBody),
    RoamAddrUpdt(OpaqueBody),
    SysSrvBcst(SysSrvBcst),
    Sccb(Sccb),
    RfssStsBcst(RfssStsBcst),
    NetStsBcst(NetStsBcst),
    AdjStsBcst(AdjStsBcst),
    IdenUp(IdenUp),
    PParmUpdt(PParmUpdt),

    MotGrgAddCmd(MotGrgCmd),
    MotGrgDelCmd(MotGrgCmd),
    MotGrgCnGrant(MotGrgCnGrant),
    MotGrgCnGrantUpdt(MotGrgCnGrantUpdt),
    MotExtFnctCmd(MotExtFnctCmd),
    MotSysBcst(MotSysBcst),
    MotQueRsp(ServiceResponse),
    MotDenyRsp(MotDenyRsp),
    MotAckRspFne(MotAckRspFne),
    MotScnMrk(MotScnMrk),
    MotEmrAlrm(MotEmrAlrm),
    MotBsiGrant(CallSignBcst),
    MotAdptPwrCntrl(MotAdptPwrCntrl),
    /// Decoded for display only, never installed into the band plan
    MotIdenUpTdma(IdenUpTdma),
    MotSystemEvent(MotSystemEvent),
    MotAdjStsBcst(MotAdjStsBcst),

    HarrisCallSign(CallSignBcst),

    /// Manufacturer/opcode combination without a known layout
    Unknown(OpaqueBody),
}

impl TsbkPdu {
    /// Parse the body of a TSBK whose header was already consumed
    pub fn from_bitbuf(hdr: &TsbkHeader, buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        match Mfid::try_from(hdr.mfid as u64) {
            Ok(Mfid::Standard) => match TsbkOpcode::try_from(hdr.opcode as u64) {
                Ok(op) => Self::parse_standard(op, buffer),
                Err(_) => Ok(TsbkPdu::Unknown(OpaqueBody::from_bitbuf(buffer)?)),
            },
            Ok(Mfid::Motorola) => match MotOpcode::try_from(hdr.opcode as u64) {
                Ok(op) => Self::parse_motorola(op, buffer),
                Err(_) => Ok(TsbkPdu::Unknown(OpaqueBody::from_bitbuf(buffer)?)),
            },
            Ok(Mfid::Harris) if hdr.opcode == HARRIS_CALL_SIGN_OPCODE => {
                Ok(TsbkPdu::HarrisCallSign(CallSignBcst::from_bitbuf(buffer, CallSignBcst::HARRIS_CHAR_BASE)?))
            }
            _ => Ok(TsbkPdu::Unknown(OpaqueBody::from_bitbuf(buffer)?)),
        }
    }

    fn parse_standard(op: TsbkOpcode, buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        Ok(match op {
            TsbkOpcode::GrpVChGrant => TsbkPdu::GrpVChGrant(GrpVChGrant::from_bitbuf(buffer)?),
            TsbkOpcode::GrpVChGrantUpdt => TsbkPdu::GrpVChGrantUpdt(GrpVChGrantUpdt::from_bitbuf(buffer)?),
            TsbkOpcode::GrpVChGrantUpdtExp => TsbkPdu::GrpVChGrantUpdtExp(GrpVChGrantUpdtExp::from_bitbuf(buffer)?),
            TsbkOpcode::UuVChGrant => TsbkPdu::UuVChGrant(UuVChGrant::from_bitbuf(buffer)?),
            TsbkOpcode::UuAnsReq => TsbkPdu::UuAnsReq(UuAnsReq::from_bitbuf(buffer)?),
            TsbkOpcode::UuVChGrantUpdt => TsbkPdu::UuVChGrantUpdt(UuVChGrant::from_bitbuf(buffer)?),
            TsbkOpcode::TeleIntChGrant => TsbkPdu::TeleIntChGrant(TeleIntChGrant::from_bitbuf(buffer)?),
            TsbkOpcode::TeleIntChGrantUpdt => TsbkPdu::TeleIntChGrantUpdt(TeleIntChGrant::from_bitbuf(buffer)?),
            TsbkOpcode::TeleIntAnsReq => TsbkPdu::TeleIntAnsReq(TeleIntAnsReq::from_bitbuf(buffer)?),
            TsbkOpcode::IndDataChGrant => TsbkPdu::IndDataChGrant(IndDataChGrant::from_bitbuf(buffer)?),
            TsbkOpcode::GrpDataChGrant => TsbkPdu::GrpDataChGrant(GrpDataChGrant::from_bitbuf(buffer)?),
            TsbkOpcode::GrpDataChAnn => TsbkPdu::GrpDataChAnn(GrpDataChAnn::from_bitbuf(buffer)?),
            TsbkOpcode::GrpDataChAnnExp => TsbkPdu::GrpDataChAnnExp(GrpDataChAnnExp::from_bitbuf(buffer)?),
            TsbkOpcode::SnDataChGrant => TsbkPdu::SnDataChGrant(SnDataChGrant::from_bitbuf(buffer)?),
            TsbkOpcode::SnDataPageReq => TsbkPdu::SnDataPageReq(SnDataPageReq::from_bitbuf(buffer)?),
            TsbkOpcode::SnDataChAnnExp => TsbkPdu::SnDataChAnnExp(SnDataChAnnExp::from_bitbuf(buffer)?),
            TsbkOpcode::StsUpdt => TsbkPdu::StsUpdt(StsUpdt::from_bitbuf(buffer)?),
            TsbkOpcode::StsQ => TsbkPdu::StsQ(UnitCommand::from_bitbuf(buffer)?),
            TsbkOpcode::MsgUpdt => TsbkPdu::MsgUpdt(MsgUpdt::from_bitbuf(buffer)?),
            TsbkOpcode::RadMonCmd => TsbkPdu::RadMonCmd(RadMonCmd::from_bitbuf(buffer)?),
            TsbkOpcode::RadMonEnhCmd => TsbkPdu::RadMonEnhCmd(OpaqueBody::from_bitbuf(buffer)?),
            TsbkOpcode::CallAlrt => TsbkPdu::CallAlrt(UnitCommand::from_bitbuf(buffer)?),
            TsbkOpcode::AckRspFne => TsbkPdu::AckRspFne(AckRspFne::from_bitbuf(buffer)?),
            TsbkOpcode::QueRsp => TsbkPdu::QueRsp(ServiceResponse::from_bitbuf(buffer)?),
            TsbkOpcode::ExtFnctCmd => TsbkPdu::ExtFnctCmd(ExtFnctCmd::from_bitbuf(buffer)?),
            TsbkOpcode::DenyRsp => TsbkPdu::DenyRsp(ServiceResponse::from_bitbuf(buffer)?),
            TsbkOpcode::GrpAffRsp => TsbkPdu::GrpAffRsp(GrpAffRsp::from_bitbuf(buffer)?),
            TsbkOpcode::SccbExp => TsbkPdu::SccbExp(SccbExp::from_bitbuf(buffer)?),
            TsbkOpcode::GrpAffQ => TsbkPdu::GrpAffQ(UnitCommand::from_bitbuf(buffer)?),
            TsbkOpcode::LocRegRsp => TsbkPdu::LocRegRsp(LocRegRsp::from_bitbuf(buffer)?),
            TsbkOpcode::URegRsp => TsbkPdu::URegRsp(URegRsp::from_bitbuf(buffer)?),
            TsbkOpcode::URegCmd => TsbkPdu::URegCmd(UnitCommand::from_bitbuf(buffer)?),
            TsbkOpcode::AuthCmd => TsbkPdu::AuthCmd(FullUnitId::from_bitbuf(buffer)?),
            TsbkOpcode::UDeRegAck => TsbkPdu::UDeRegAck(FullUnitId::from_bitbuf(buffer)?),
            TsbkOpcode::SyncBcst => TsbkPdu::SyncBcst(SyncBcst::from_bitbuf(buffer)?),
            TsbkOpcode::AuthDmd => TsbkPdu::AuthDmd(OpaqueBody::from_bitbuf(buffer)?),
            TsbkOpcode::AuthFneResp => TsbkPdu::AuthFneResp(AuthFneResp::from_bitbuf(buffer)?),
            TsbkOpcode::IdenUpTdma => TsbkPdu::IdenUpTdma(IdenUpTdma::from_bitbuf(buffer)?),
            TsbkOpcode::IdenUpVu => TsbkPdu::IdenUpVu(IdenUpVu::from_bitbuf(buffer)?),
            TsbkOpcode::TimeDateAnn => TsbkPdu::TimeDateAnn(TimeDateAnn::from_bitbuf(buffer)?),
            TsbkOpcode::RoamAddrCmd => TsbkPdu::RoamAddrCmd(OpaqueBody::from_bitbuf(buffer)?),
            TsbkOpcode::RoamAddrUpdt => TsbkPdu::RoamAddrUpdt(OpaqueBody::from_bitbuf(buffer)?),
            TsbkOpcode::SysSrvBcst => TsbkPdu::SysSrvBcst(SysSrvBcst::from_bitbuf(buffer)?),
            TsbkOpcode::Sccb => TsbkPdu::Sccb(Sccb::from_bitbuf(buffer)?),
            TsbkOpcode::RfssStsBcst => TsbkPdu::RfssStsBcst(RfssStsBcst::from_bitbuf(buffer)?),
            TsbkOpcode::NetStsBcst => TsbkPdu::NetStsBcst(NetStsBcst::from_bitbuf(buffer)?),
            TsbkOpcode::AdjStsBcst => TsbkPdu::AdjStsBcst(AdjStsBcst::from_bitbuf(buffer)?),
            TsbkOpcode::IdenUp => TsbkPdu::IdenUp(IdenUp::from_bitbuf(buffer)?),
            TsbkOpcode::PParmUpdt => TsbkPdu::PParmUpdt(PParmUpdt::from_bitbuf(buffer)?),
        })
    }

    fn parse_motorola(op: MotOpcode, buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        Ok(match op {
            MotOpcode::GrgAddCmd => TsbkPdu::MotGrgAddCmd(MotGrgCmd::from_bitbuf(buffer)?),
            MotOpcode::GrgDelCmd => TsbkPdu::MotGrgDelCmd(MotGrgCmd::from_bitbuf(buffer)?),
            MotOpcode::GrgCnGrant => TsbkPdu::MotGrgCnGrant(MotGrgCnGrant::from_bitbuf(buffer)?),
            MotOpcode::GrgCnGrantUpdt => TsbkPdu::MotGrgCnGrantUpdt(MotGrgCnGrantUpdt::from_bitbuf(buffer)?),
            MotOpcode::ExtFnctCmd => TsbkPdu::MotExtFnctCmd(MotExtFnctCmd::from_bitbuf(buffer)?),
            MotOpcode::SysBcst => TsbkPdu::MotSysBcst(MotSysBcst::from_bitbuf(buffer)?),
            MotOpcode::QueRsp => TsbkPdu::MotQueRsp(ServiceResponse::from_bitbuf(buffer)?),
            MotOpcode::DenyRsp => TsbkPdu::MotDenyRsp(MotDenyRsp::from_bitbuf(buffer)?),
            MotOpcode::AckRspFne => TsbkPdu::MotAckRspFne(MotAckRspFne::from_bitbuf(buffer)?),
            MotOpcode::ScnMrk => TsbkPdu::MotScnMrk(MotScnMrk::from_bitbuf(buffer)?),
            MotOpcode::EmrAlrm => TsbkPdu::MotEmrAlrm(MotEmrAlrm::from_bitbuf(buffer)?),
            MotOpcode::BsiGrant => TsbkPdu::MotBsiGrant(CallSignBcst::from_bitbuf(buffer, CallSignBcst::MOT_CHAR_BASE)?),
            MotOpcode::AdptPwrCntrl => TsbkPdu::MotAdptPwrCntrl(MotAdptPwrCntrl::from_bitbuf(buffer)?),
            MotOpcode::IdenUpTdma => TsbkPdu::MotIdenUpTdma(IdenUpTdma::from_bitbuf(buffer)?),
            MotOpcode::SystemEvent => TsbkPdu::MotSystemEvent(MotSystemEvent::from_bitbuf(buffer)?),
            MotOpcode::AdjStsBcst => TsbkPdu::MotAdjStsBcst(MotAdjStsBcst::from_bitbuf(buffer)?),
        })
    }

    /// Short message name as used in logs
    pub fn name(&self) -> &'static str {
        match self {
            TsbkPdu::GrpVChGrant(_) => "GRP_V_CH_GRANT",
            TsbkPdu::GrpVChGrantUpdt(_) => "GRP_V_CH_GRANT_UPDT",
            TsbkPdu::GrpVChGrantUpdtExp(_) => "GRP_V_CH_GRANT_UPDT_EXP",
            TsbkPdu::UuVChGrant(_) => "UU_V_CH_GRANT",
            TsbkPdu::UuAnsReq(_) => "UU_ANS_REQ",
            TsbkPdu::UuVChGrantUpdt(_) => "UU_V_CH_GRANT_UPDT",
            TsbkPdu::TeleIntChGrant(_) => "TELE_INT_CH_GRANT",
            TsbkPdu::TeleIntChGrantUpdt(_) => "TELE_INT_CH_GRANT_UPDT",
            TsbkPdu::TeleIntAnsReq(_) => "TELE_INT_ANS_REQ",
            TsbkPdu::IndDataChGrant(_) => "IND_DATA_CH_GRANT",
            TsbkPdu::GrpDataChGrant(_) => "GRP_DATA_CH_GRANT",
            TsbkPdu::GrpDataChAnn(_) => "GRP_DATA_CH_ANN",
            TsbkPdu::GrpDataChAnnExp(_) => "GRP_DATA_CH_ANN_EXP",
            TsbkPdu::SnDataChGrant(_) => "SN_DATA_CH_GRANT",
            TsbkPdu::SnDataPageReq(_) => "SN_DATA_PAGE_REQ",
            TsbkPdu::SnDataChAnnExp(_) => "SN_DATA_CH_ANN_EXP",
            TsbkPdu::StsUpdt(_) => "STS_UPDT",
            TsbkPdu::StsQ(_) => "STS_Q",
            TsbkPdu::MsgUpdt(_) => "MSG_UPDT",
            TsbkPdu::RadMonCmd(_) => "RAD_MON_CMD",
            TsbkPdu::RadMonEnhCmd(_) => "RAD_MON_ENH_CMD",
            TsbkPdu::CallAlrt(_) => "CALL_ALRT",
            TsbkPdu::AckRspFne(_) => "ACK_RSP_FNE",
            TsbkPdu::QueRsp(_) => "QUE_RSP",
            TsbkPdu::ExtFnctCmd(_) => "EXT_FNCT_CMD",
            TsbkPdu::DenyRsp(_) => "DENY_RSP",
            TsbkPdu::GrpAffRsp(_) => "GRP_AFF_RSP",
            TsbkPdu::SccbExp(_) => "SCCB_EXP",
            TsbkPdu::GrpAffQ(_) => "GRP_AFF_Q",
            TsbkPdu::LocRegRsp(_) => "LOC_REG_RSP",
            TsbkPdu::URegRsp(_) => "U_REG_RSP",
            TsbkPdu::URegCmd(_) => "U_REG_CMD",
            TsbkPdu::AuthCmd(_) => "AUTH_CMD",
            TsbkPdu::UDeRegAck(_) => "U_DE_REG_ACK",
            TsbkPdu::SyncBcst(_) => "SYNC_BCST",
            TsbkPdu::AuthDmd(_) => "AUTH_DMD",
            TsbkPdu::AuthFneResp(_) => "AUTH_FNE_RESP",
            TsbkPdu::IdenUpTdma(_) => "IDEN_UP_TDMA",
            TsbkPdu::IdenUpVu(_) => "IDEN_UP_VU",
            TsbkPdu::TimeDateAnn(_) => "TIME_DATE_ANN",
            TsbkPdu::RoamAddrCmd(_) => "ROAM_ADDR_CMD",
            TsbkPdu::RoamAddrUpdt(_) => "ROAM_ADDR_UPDT",
            TsbkPdu::SysSrvBcst(_) => "SYS_SRV_BCST",
            TsbkPdu::Sccb(_) => "SCCB",
            TsbkPdu::RfssStsBcst(_) => "RFSS_STS_BCST",
            TsbkPdu::NetStsBcst(_) => "NET_STS_BCST",
            TsbkPdu::AdjStsBcst(_) => "ADJ_STS_BCST",
            TsbkPdu::IdenUp(_) => "IDEN_UP",
            TsbkPdu::PParmUpdt(_) => "P_PARM_UPDT",
            TsbkPdu::MotGrgAddCmd(_) => "MOT_GRG_ADD_CMD",
            TsbkPdu::MotGrgDelCmd(_) => "MOT_GRG_DEL_CMD",
            TsbkPdu::MotGrgCnGrant(_) => "MOT_GRG_CN_GRANT",
            TsbkPdu::MotGrgCnGrantUpdt(_) => "MOT_GRG_CN_GRANT_UPDT",
            TsbkPdu::MotExtFnctCmd(_) => "MOT_EXT_FNCT_CMD",
            TsbkPdu::MotSysBcst(_) => "MOT_SYS_BCST",
            TsbkPdu::MotQueRsp(_) => "MOT_QUE_RSP",
            TsbkPdu::MotDenyRsp(_) => "MOT_DENY_RSP",
            TsbkPdu::MotAckRspFne(_) => "MOT_ACK_RSP_FNE",
            TsbkPdu::MotScnMrk(_) => "MOT_SCN_MRK",
            TsbkPdu::MotEmrAlrm(_) => "MOT_EMR_ALRM",
            TsbkPdu::MotBsiGrant(_) => "MOT_BSI_GRANT",
            TsbkPdu::MotAdptPwrCntrl(_) => "MOT_ADPT_PWR_CNTRL",
            TsbkPdu::MotIdenUpTdma(_) => "MOT_IDEN_UP_TDMA",
            TsbkPdu::MotSystemEvent(_) => "MOT_SYSTEM_EVENT",
            TsbkPdu::MotAdjStsBcst(_) => "MOT_ADJ_STS_BCST_SHRT_EXP",
            TsbkPdu::HarrisCallSign(_) => "HARRIS_CALL_SIGN",
            TsbkPdu::Unknown(_) => "UNKNOWN",
        }
    }
}

impl fmt::Display for TsbkPdu {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TsbkPdu::GrpVChGrant(p) => write!(f, "{}", p),
            TsbkPdu::GrpVChGrantUpdt(p) => write!(f, "{}", p),
            TsbkPdu::GrpVChGrantUpdtExp(p) => write!(f, "{}", p),
            TsbkPdu::UuVChGrant(p) | TsbkPdu::UuVChGrantUpdt(p) => write!(f, "{}", p),
            TsbkPdu::UuAnsReq(p) => write!(f, "{}", p),
            TsbkPdu::TeleIntChGrant(p) | TsbkPdu::TeleIntChGrantUpdt(p) => write!(f, "{}", p),
            TsbkPdu::TeleIntAnsReq(p) => write!(f, "{}", p),
            TsbkPdu::IndDataChGrant(p) => write!(f, "{}", p),
            TsbkPdu::GrpDataChGrant(p) => write!(f, "{}", p),
            TsbkPdu::GrpDataChAnn(p) => write!(f, "{}", p),
            TsbkPdu::GrpDataChAnnExp(p) => write!(f, "{}", p),
            TsbkPdu::SnDataChGrant(p) => write!(f, "{}", p),
            TsbkPdu::SnDataPageReq(p) => write!(f, "{}", p),
            TsbkPdu::SnDataChAnnExp(p) => write!(f, "{}", p),
            TsbkPdu::StsUpdt(p) => write!(f, "{}", p),
            TsbkPdu::StsQ(p) | TsbkPdu::CallAlrt(p) | TsbkPdu::GrpAffQ(p) | TsbkPdu::URegCmd(p) => write!(f, "{}", p),
            TsbkPdu::MsgUpdt(p) => write!(f, "{}", p),
            TsbkPdu::RadMonCmd(p) => write!(f, "{}", p),
            TsbkPdu::RadMonEnhCmd(p)
            | TsbkPdu::AuthDmd(p)
            | TsbkPdu::RoamAddrCmd(p)
            | TsbkPdu::RoamAddrUpdt(p)
            | TsbkPdu::Unknown(p) => write!(f, "{}", p),
            TsbkPdu::AckRspFne(p) => write!(f, "{}", p),
            TsbkPdu::QueRsp(p) | TsbkPdu::DenyRsp(p) | TsbkPdu::MotQueRsp(p) => write!(f, "{}", p),
            TsbkPdu::ExtFnctCmd(p) => write!(f, "{}", p),
            TsbkPdu::GrpAffRsp(p) => write!(f, "{}", p),
            TsbkPdu::SccbExp(p) => write!(f, "{}", p),
            TsbkPdu::LocRegRsp(p) => write!(f, "{}", p),
            TsbkPdu::URegRsp(p) => write!(f, "{}", p),
            TsbkPdu::AuthCmd(p) | TsbkPdu::UDeRegAck(p) => write!(f, "{}", p),
            TsbkPdu::SyncBcst(p) => write!(f, "{}", p),
            TsbkPdu::AuthFneResp(p) => write!(f, "{}", p),
            TsbkPdu::IdenUpTdma(p) | TsbkPdu::MotIdenUpTdma(p) => write!(f, "{}", p),
            TsbkPdu::IdenUpVu(p) => write!(f, "{}", p),
            TsbkPdu::TimeDateAnn(p) => write!(f, "{}", p),
            TsbkPdu::SysSrvBcst(p) => write!(f, "{}", p),
            TsbkPdu::Sccb(p) => write!(f, "{}", p),
            TsbkPdu::RfssStsBcst(p) => write!(f, "{}", p),
            TsbkPdu::NetStsBcst(p) => write!(f, "{}", p),
            TsbkPdu::AdjStsBcst(p) => write!(f, "{}", p),
            TsbkPdu::IdenUp(p) => write!(f, "{}", p),
            TsbkPdu::PParmUpdt(p) => write!(f, "{}", p),
            TsbkPdu::MotGrgAddCmd(p) | TsbkPdu::MotGrgDelCmd(p) => write!(f, "{}", p),
            TsbkPdu::MotGrgCnGrant(p) => write!(f, "{}", p),
            TsbkPdu::MotGrgCnGrantUpdt(p) => write!(f, "{}", p),
            TsbkPdu::MotExtFnctCmd(p) => write!(f, "{}", p),
            TsbkPdu::MotSysBcst(p) => write!(f, "{}", p),
            TsbkPdu::MotDenyRsp(p) => write!(f, "{}", p),
            TsbkPdu::MotAckRspFne(p) => write!(f, "{}", p),
            TsbkPdu::MotScnMrk(p) => write!(f, "{}", p),
            TsbkPdu::MotEmrAlrm(p) => write!(f, "{}", p),
            TsbkPdu::MotBsiGrant(p) | TsbkPdu::HarrisCallSign(p) => write!(f, "{}", p),
            TsbkPdu::MotAdptPwrCntrl(p) => write!(f, "{}", p),
            TsbkPdu::MotSystemEvent(p) => write!(f, "{}", p),
            TsbkPdu::MotAdjStsBcst(p) => write!(f, "{}", p),
        }
    }
}

/// A complete TSBK: header plus decoded body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tsbk {
    pub header: TsbkHeader,
    pub pdu: TsbkPdu,
}

impl Tsbk {
    /// Parse a 96-bit TSBK including its CRC. The CRC is not checked here.
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        let header = TsbkHeader::from_bitbuf(buffer)?;
        let pdu = TsbkPdu::from_bitbuf(&header, buffer)?;
        buffer.skip_field(16, "crc")?;
        Ok(Tsbk { header, pdu })
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, PduParseErr> {
        Self::from_bitbuf(&mut BitBuffer::from_bytes(data))
    }
}

impl fmt::Display for Tsbk {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}: {}", self.header, self.pdu.name(), self.pdu)
    }
}
