use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;
use toml::Value;

use p25_core::{Modulation, TalkgroupId};

use super::trunk_config::{CfgNetwork, CfgReceiver, CfgTiming, TrunkConfig};

/// Build `TrunkConfig` from a TOML configuration string
pub fn from_toml_str(toml_str: &str) -> Result<TrunkConfig, Box<dyn std::error::Error>> {
    let root: TomlConfigRoot = toml::from_str(toml_str)?;

    let expected_config_version = "0.1";
    if !root.config_version.eq(expected_config_version) {
        return Err(format!(
            "Unrecognized config_version: {}, expect {}",
            root.config_version, expected_config_version
        )
        .into());
    }
    if !root.extra.is_empty() {
        return Err(format!("Unrecognized top-level fields: {:?}", sorted_keys(&root.extra)).into());
    }
    if let Some(ref rx) = root.receiver {
        if !rx.extra.is_empty() {
            return Err(format!("Unrecognized fields in receiver: {:?}", sorted_keys(&rx.extra)).into());
        }
    }
    if let Some(ref timing) = root.timing {
        if !timing.extra.is_empty() {
            return Err(format!("Unrecognized fields in timing: {:?}", sorted_keys(&timing.extra)).into());
        }
    }
    for net in &root.network {
        if !net.extra.is_empty() {
            return Err(format!("Unrecognized fields in network 0x{:x}: {:?}", net.nac, sorted_keys(&net.extra)).into());
        }
    }

    let mut cfg = TrunkConfig::new(Vec::with_capacity(root.network.len()));
    cfg.debug_log = root.debug_log;
    cfg.receiver = root.receiver.map(|rx| CfgReceiver {
        input_rate: rx.input_rate,
        workers: rx.workers,
    });
    if let Some(timing) = root.timing {
        apply_timing_patch(&mut cfg.timing, timing);
    }
    for net in root.network {
        cfg.networks.push(build_network(net)?);
    }

    cfg.validate()?;
    Ok(cfg)
}

/// Build `TrunkConfig` from any reader.
pub fn from_reader<R: Read>(reader: R) -> Result<TrunkConfig, Box<dyn std::error::Error>> {
    let mut contents = String::new();
    let mut reader = BufReader::new(reader);
    reader.read_to_string(&mut contents)?;
    from_toml_str(&contents)
}

/// Build `TrunkConfig` from a file path.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<TrunkConfig, Box<dyn std::error::Error>> {
    let f = File::open(path)?;
    from_reader(BufReader::new(f))
}

/// Parse a frequency given as MHz ("851.0125") or, without a decimal point, as Hz ("851012500")
pub fn parse_frequency(s: &str) -> Option<u64> {
    let s = s.trim();
    if s.contains('.') {
        let mhz: f64 = s.parse().ok()?;
        if !mhz.is_finite() || mhz < 0.0 {
            return None;
        }
        Some((mhz * 1e6).round() as u64)
    } else {
        s.parse().ok()
    }
}

/// Parse a tab separated talkgroup tag file: `<tgid>\t<name>` per line, '#' starts a comment line
pub fn parse_tgid_tags(contents: &str) -> Result<HashMap<TalkgroupId, String>, String> {
    let mut tags = HashMap::new();
    for (lineno, line) in contents.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        let mut cols = line.splitn(2, '\t');
        let id = cols.next().unwrap_or("").trim();
        let id: TalkgroupId = id.parse().map_err(|_| format!("line {}: invalid talkgroup id '{}'", lineno + 1, id))?;
        let name = cols.next().unwrap_or("").trim().to_string();
        tags.insert(id, name);
    }
    Ok(tags)
}

/// Parse a talkgroup list file: one id per line, '#' starts a comment
pub fn parse_tgid_list(contents: &str) -> Result<BTreeSet<TalkgroupId>, String> {
    let mut ids = BTreeSet::new();
    for (lineno, line) in contents.lines().enumerate() {
        let line = line.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        let id = line.parse().map_err(|_| format!("line {}: invalid talkgroup id '{}'", lineno + 1, line))?;
        ids.insert(id);
    }
    Ok(ids)
}

fn build_network(net: NetworkDto) -> Result<CfgNetwork, Box<dyn std::error::Error>> {
    let mut cc_list = Vec::with_capacity(net.control_channel_list.len());
    for f in &net.control_channel_list {
        cc_list.push(f.to_hz().ok_or_else(|| format!("network 0x{:x}: invalid control channel {:?}", net.nac, f))?);
    }

    let mut cfg = CfgNetwork::new(net.nac, cc_list);
    if let Some(name) = net.sysname {
        cfg.sysname = name;
    }
    if let Some(offset) = net.offset {
        cfg.offset = offset;
    }
    if let Some(modulation) = net.modulation {
        cfg.modulation = modulation;
    }
    if let Some(center) = net.center_frequency {
        cfg.center_frequency = Some(center.to_hz().ok_or_else(|| format!("network 0x{:x}: invalid center_frequency {:?}", net.nac, center))?);
    }
    if let Some(list) = net.whitelist {
        cfg.whitelist = Some(list.load()?);
    }
    if let Some(list) = net.blacklist {
        cfg.blacklist = list.load()?;
    }
    if let Some(path) = net.tgid_tags_file {
        let contents = std::fs::read_to_string(&path).map_err(|e| format!("tgid_tags_file {}: {}", path, e))?;
        cfg.tgid_tags = parse_tgid_tags(&contents).map_err(|e| format!("tgid_tags_file {}: {}", path, e))?;
    }
    if let Some(tags) = net.tgid_tags {
        for (id, name) in tags {
            let id: TalkgroupId = id.parse().map_err(|_| format!("network 0x{:x}: invalid tgid_tags key '{}'", net.nac, id))?;
            cfg.tgid_tags.insert(id, name);
        }
    }
    Ok(cfg)
}

fn apply_timing_patch(dst: &mut CfgTiming, src: TimingDto) {
    let to_ms = |secs: f64| (secs * 1000.0).round() as i64;
    if let Some(v) = src.tgid_hold_time {
        dst.tgid_hold_time = to_ms(v);
    }
    if let Some(v) = src.tgid_skip_time {
        dst.tgid_skip_time = to_ms(v);
    }
    if let Some(v) = src.tsys_hold_time {
        dst.tsys_hold_time = to_ms(v);
    }
    if let Some(v) = src.p2_grace_time {
        dst.p2_grace_time = to_ms(v);
    }
    if let Some(v) = src.active_window {
        dst.active_window = to_ms(v);
    }
    if let Some(v) = src.gc_interval {
        dst.gc_interval = to_ms(v);
    }
}

fn sorted_keys(map: &HashMap<String, Value>) -> Vec<&str> {
    let mut v: Vec<&str> = map.keys().map(|s| s.as_str()).collect();
    v.sort_unstable();
    v
}

/// ----------------------- DTOs for input shape -----------------------

#[derive(Deserialize)]
struct TomlConfigRoot {
    config_version: String,
    debug_log: Option<String>,

    #[serde(default)]
    receiver: Option<ReceiverDto>,

    #[serde(default)]
    timing: Option<TimingDto>,

    #[serde(default)]
    network: Vec<NetworkDto>,

    #[serde(flatten)]
    extra: HashMap<String, Value>,
}

#[derive(Deserialize)]
struct ReceiverDto {
    input_rate: u32,
    workers: usize,

    #[serde(flatten)]
    extra: HashMap<String, Value>,
}

#[derive(Default, Deserialize)]
struct TimingDto {
    tgid_hold_time: Option<f64>,
    tgid_skip_time: Option<f64>,
    tsys_hold_time: Option<f64>,
    p2_grace_time: Option<f64>,
    active_window: Option<f64>,
    gc_interval: Option<f64>,

    #[serde(flatten)]
    extra: HashMap<String, Value>,
}

#[derive(Deserialize)]
struct NetworkDto {
    nac: u16,
    sysname: Option<String>,
    control_channel_list: Vec<FreqDto>,
    offset: Option<i64>,
    modulation: Option<Modulation>,
    center_frequency: Option<FreqDto>,
    whitelist: Option<TgListDto>,
    blacklist: Option<TgListDto>,
    tgid_tags: Option<HashMap<String, String>>,
    tgid_tags_file: Option<String>,

    #[serde(flatten)]
    extra: HashMap<String, Value>,
}

/// Frequency as "851.0125" (MHz) / "851012500" (Hz) string, or as integer Hz
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FreqDto {
    Hz(u64),
    Text(String),
}

impl FreqDto {
    fn to_hz(&self) -> Option<u64> {
        match self {
            FreqDto::Hz(hz) => Some(*hz),
            FreqDto::Text(s) => parse_frequency(s),
        }
    }
}

/// Talkgroup list inline, or a path to a file with one id per line
#[derive(Deserialize)]
#[serde(untagged)]
enum TgListDto {
    Ids(Vec<TalkgroupId>),
    File(String),
}

impl TgListDto {
    fn load(self) -> Result<BTreeSet<TalkgroupId>, String> {
        match self {
            TgListDto::Ids(ids) => Ok(ids.into_iter().collect()),
            TgListDto::File(path) => {
                let contents = std::fs::read_to_string(&path).map_err(|e| format!("{}: {}", path, e))?;
                parse_tgid_list(&contents).map_err(|e| format!("{}: {}", path, e))
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = r#"
config_version = "0.1"
debug_log = "trunk-rx.log"

[receiver]
input_rate = 2400000
workers = 4

[timing]
tgid_hold_time = 2.5

[[network]]
nac = 0x293
sysname = "County"
control_channel_list = ["851.0125", "851512500"]
modulation = "c4fm"
center_frequency = "851.5"
whitelist = [1082, 5]
blacklist = [4]
tgid_tags = { 1082 = "FVFD Ops 2" }

[[network]]
nac = 0x1a4
control_channel_list = [852012500]
"#;

    #[test]
    fn test_parse_example() {
        let cfg = from_toml_str(EXAMPLE).unwrap();
        assert_eq!(cfg.debug_log.as_deref(), Some("trunk-rx.log"));
        assert_eq!(cfg.receiver.as_ref().unwrap().workers, 4);
        assert_eq!(cfg.timing.tgid_hold_time, 2500);
        assert_eq!(cfg.timing.tsys_hold_time, 3000);
        assert_eq!(cfg.networks.len(), 2);

        let net = &cfg.networks[0];
        assert_eq!(net.nac, 0x293);
        assert_eq!(net.sysname, "County");
        assert_eq!(net.cc_list, vec![851_012_500, 851_512_500]);
        assert_eq!(net.modulation, Modulation::C4fm);
        assert_eq!(net.center_frequency, Some(851_500_000));
        assert_eq!(net.whitelist.as_ref().unwrap().len(), 2);
        assert!(net.blacklist.contains(&4));
        assert_eq!(net.tgid_tags.get(&1082).map(String::as_str), Some("FVFD Ops 2"));

        let net = &cfg.networks[1];
        assert_eq!(net.sysname, "1a4");
        assert_eq!(net.modulation, Modulation::Cqpsk);
        assert_eq!(net.cc_list, vec![852_012_500]);
    }

    #[test]
    fn test_duplicate_nac_is_fatal() {
        let toml = r#"
config_version = "0.1"
[[network]]
nac = 0x293
control_channel_list = ["851.0125"]
[[network]]
nac = 0x293
control_channel_list = ["852.0125"]
"#;
        let err = from_toml_str(toml).unwrap_err();
        assert!(err.to_string().contains("duplicate nac"));
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let toml = r#"
config_version = "0.1"
[[network]]
nac = 0x293
control_channel_list = ["851.0125"]
bogus = 1
"#;
        assert!(from_toml_str(toml).unwrap_err().to_string().contains("bogus"));

        let toml = "config_version = \"0.1\"\nfoo = 1\n";
        assert!(from_toml_str(toml).unwrap_err().to_string().contains("foo"));
    }

    #[test]
    fn test_wrong_version_rejected() {
        assert!(from_toml_str("config_version = \"0.5\"\n").is_err());
    }

    #[test]
    fn test_parse_frequency() {
        assert_eq!(parse_frequency("851.0125"), Some(851_012_500));
        assert_eq!(parse_frequency("851012500"), Some(851_012_500));
        assert_eq!(parse_frequency(" 460.5 "), Some(460_500_000));
        assert_eq!(parse_frequency("abc"), None);
    }

    #[test]
    fn test_parse_tag_and_list_files() {
        let tags = parse_tgid_tags("# id\tname\n1082\tFVFD Ops 2\n5\tDispatch\n\n").unwrap();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[&5], "Dispatch");
        assert!(parse_tgid_tags("x\ty\n").is_err());

        let ids = parse_tgid_list("1\n2 # comment\n\n3\n").unwrap();
        assert_eq!(ids.into_iter().collect::<Vec<_>>(), vec![1, 2, 3]);
    }
}
