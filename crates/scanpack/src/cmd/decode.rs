use scanpack_codec::{decode_compact, DualChannelScan, ScanCodec, ScanProperties};

use crate::cmd::{read_input, read_properties, DecodeArgs};
use crate::exit::{scan_error, CliResult, SUCCESS};
use crate::output::{write_json, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let wire = read_input(&args.input)?;
    let properties = read_properties(&args.properties)?;
    let codec = ScanCodec::new(args.codec_config());

    let scan = decode_scan(&codec, &wire, &properties)?;
    tracing::info!(
        beams = scan.beam_count(),
        bytes = wire.len(),
        frame_id = %properties.frame_id,
        "decoded scan"
    );

    let pretty = matches!(format, OutputFormat::Table | OutputFormat::Pretty);
    write_json(args.output.as_deref(), &scan, pretty)?;
    Ok(SUCCESS)
}

fn decode_scan(
    codec: &ScanCodec,
    wire: &[u8],
    properties: &ScanProperties,
) -> CliResult<DualChannelScan> {
    let compact =
        decode_compact(wire, properties).map_err(|err| scan_error("decode failed", err))?;
    codec
        .decompress(&compact, properties)
        .map_err(|err| scan_error("decompress failed", err))
}
