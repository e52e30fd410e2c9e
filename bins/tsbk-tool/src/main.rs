use clap::Parser;

use p25_core::BitBuffer;
use p25_entities::rxctl::rx_msg::parse_hex;
use p25_pdus::mbt::Mbt;
use p25_pdus::mbt::mbt_header::mbt_header_crc_ok;
use p25_pdus::tsbk::Tsbk;
use p25_pdus::tsbk::tsbk_header::tsbk_crc_ok;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "P25 trunking message decoder",
    long_about = "Decodes a single TSBK or MBT given as a hex string"
)]
struct Args {
    /// Message format
    #[arg(help = "Format: [ tsbk | mbt ]")]
    format: String,

    /// Raw message to decode
    #[arg(help = "Message bytes as hex, CRC included (12 bytes for a TSBK, 24 for an MBT)")]
    hex: String,
}

fn main() {
    eprintln!("[+] P25 trunking message decoder");

    let args = Args::parse();

    let data = match parse_hex(&args.hex) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    println!("raw: {}", BitBuffer::from_bytes(&data).dump_bin());

    let (decoded, crc_ok) = match args.format.to_lowercase().as_str() {
        "tsbk" => (Tsbk::from_bytes(&data).map(|t| t.to_string()), tsbk_crc_ok(&data)),
        "mbt" => (Mbt::from_bytes(&data).map(|m| m.to_string()), mbt_header_crc_ok(&data)),
        _ => {
            eprintln!("Error: Unsupported format '{}'. Use: tsbk, mbt", args.format);
            std::process::exit(1);
        }
    };

    println!("crc: {}", if crc_ok { "ok" } else { "MISMATCH" });
    match decoded {
        Ok(text) => println!("{}", text),
        Err(e) => {
            eprintln!("Error: failed to parse: {:?}", e);
            std::process::exit(1);
        }
    }
}
