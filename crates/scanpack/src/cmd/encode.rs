use bytes::BytesMut;
use scanpack_codec::{compress, encode_compact, DualChannelScan};

use crate::cmd::{read_json, EncodeArgs};
use crate::exit::{scan_error, CliResult, SUCCESS};
use crate::output::write_output;

pub fn run(args: EncodeArgs) -> CliResult<i32> {
    let scan: DualChannelScan = read_json(&args.input)?;
    let wire = encode_scan(&scan)?;

    tracing::info!(
        beams = scan.beam_count(),
        bytes = wire.len(),
        input = %args.input.display(),
        "encoded scan"
    );
    write_output(args.output.as_deref(), &wire)?;
    Ok(SUCCESS)
}

fn encode_scan(scan: &DualChannelScan) -> CliResult<BytesMut> {
    let compact = compress(scan).map_err(|err| scan_error("compress failed", err))?;
    let mut wire = BytesMut::new();
    encode_compact(&compact, &mut wire).map_err(|err| scan_error("encode failed", err))?;
    Ok(wire)
}
