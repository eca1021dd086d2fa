use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("scanpack {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: scanpack");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "target: {}",
        option_env!("SCANPACK_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!("git_hash: {}", option_env!("GIT_HASH").unwrap_or("unknown"));
    println!(
        "wire: range_scale={} intensity_scale={} intensity_clip={} invalid={:#06x}",
        scanpack_codec::DEFAULT_RANGE_SCALE,
        scanpack_codec::DEFAULT_INTENSITY_SCALE,
        scanpack_codec::DEFAULT_INTENSITY_CLIP,
        scanpack_codec::INVALID
    );

    Ok(SUCCESS)
}
