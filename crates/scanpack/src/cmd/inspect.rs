use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

use scanpack_codec::{classify, decode_compact, BeamState, CompactScan, ScanCodec};

use crate::cmd::{read_input, read_properties, InspectArgs};
use crate::exit::{json_error, scan_error, CliResult, SUCCESS};
use crate::output::OutputFormat;

#[derive(Debug, Serialize)]
struct InspectOutput {
    stamp_ns: u64,
    beams: usize,
    valid: usize,
    self_filtered: usize,
    invalid: usize,
    intensities: bool,
    max_range_mm: u16,
    wire_bytes: usize,
    float_bytes: usize,
}

pub fn run(args: InspectArgs, format: OutputFormat) -> CliResult<i32> {
    let wire = read_input(&args.input)?;
    let properties = read_properties(&args.properties)?;
    let codec = ScanCodec::default();

    let compact =
        decode_compact(&wire, &properties).map_err(|err| scan_error("decode failed", err))?;
    // Rejects properties the codec could not decompress with.
    codec
        .decompress(&compact, &properties)
        .map_err(|err| scan_error("decompress failed", err))?;

    let out = summarize(&compact, codec.max_range_mm(properties.range_max), wire.len());
    print_inspect(&out, format)?;
    Ok(SUCCESS)
}

fn summarize(compact: &CompactScan, max_range_mm: u16, wire_bytes: usize) -> InspectOutput {
    let (mut valid, mut self_filtered, mut invalid) = (0, 0, 0);
    for &value in &compact.encoded_ranges {
        match classify(value, max_range_mm) {
            BeamState::Valid => valid += 1,
            BeamState::SelfFiltered => self_filtered += 1,
            BeamState::Invalid => invalid += 1,
        }
    }

    let beams = compact.beam_count();
    let intensities = compact.encoded_intensities.is_some();
    // Two f32 range channels plus an optional f32 intensity channel.
    let float_bytes = beams * 4 * if intensities { 3 } else { 2 };

    InspectOutput {
        stamp_ns: compact.stamp.as_nanos(),
        beams,
        valid,
        self_filtered,
        invalid,
        intensities,
        max_range_mm,
        wire_bytes,
        float_bytes,
    }
}

fn print_inspect(out: &InspectOutput, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => {
            let text = serde_json::to_string(out)
                .map_err(|err| json_error("failed serializing output", err))?;
            println!("{text}");
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["STATE", "BEAMS"]);
            for (state, count) in [
                (BeamState::Valid, out.valid),
                (BeamState::SelfFiltered, out.self_filtered),
                (BeamState::Invalid, out.invalid),
            ] {
                table.add_row(vec![state.name().to_string(), count.to_string()]);
            }
            println!("{table}");
            println!(
                "beams={} max_range_mm={} intensities={} wire_bytes={} float_bytes={}",
                out.beams, out.max_range_mm, out.intensities, out.wire_bytes, out.float_bytes
            );
        }
        OutputFormat::Pretty => {
            println!(
                "beams={} valid={} self-filtered={} invalid={} intensities={} bytes={} (float {})",
                out.beams,
                out.valid,
                out.self_filtered,
                out.invalid,
                out.intensities,
                out.wire_bytes,
                out.float_bytes
            );
        }
    }
    Ok(())
}
