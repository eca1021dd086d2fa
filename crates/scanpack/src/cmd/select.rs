use scanpack_codec::{Channel, DualChannelScan};

use crate::cmd::{read_json, SelectArgs};
use crate::exit::{scan_error, CliResult, SUCCESS};
use crate::output::{write_json, OutputFormat};

pub fn run(args: SelectArgs, format: OutputFormat) -> CliResult<i32> {
    let channel: Channel = args
        .channel
        .parse()
        .map_err(|err| scan_error(&format!("unknown channel {:?}", args.channel), err))?;
    let scan: DualChannelScan = read_json(&args.input)?;

    let single = scan
        .select(channel)
        .map_err(|err| scan_error("select failed", err))?;
    tracing::debug!(%channel, beams = single.ranges.len(), "selected channel");

    let pretty = matches!(format, OutputFormat::Table | OutputFormat::Pretty);
    write_json(args.output.as_deref(), &single, pretty)?;
    Ok(SUCCESS)
}
