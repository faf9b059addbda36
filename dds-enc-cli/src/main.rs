//! dds-enc CLI - Command-line interface
//!
//! Encodes a single image into a DXT-compressed DDS file:
//!
//! ```text
//! dds-enc <input.png> (dxt1|dxt2|dxt3|dxt4|dxt5) <output.dds>
//! ```

mod error;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::process;

use clap::error::ErrorKind;
use clap::Parser;
use dds_enc::dds::{DdsEncoder, DdsError, DxtFormat};
use dds_enc::logging::{init_logging, LoggingConfig};
use dds_enc::Raster;
use error::CliError;
use tracing::info;

pub(crate) const USAGE: &str = "dds-enc <input.png> (dxt1|dxt2|dxt3|dxt4|dxt5) <output.dds>";

#[derive(Parser, Debug)]
#[command(
    name = "dds-enc",
    version,
    about = "Encode an image as a DXT-compressed DDS texture",
    override_usage = USAGE
)]
struct Args {
    /// Input image (PNG or any other format the decoder understands)
    input: PathBuf,

    /// Compression format: dxt1, dxt2, dxt3, dxt4 or dxt5 (case-insensitive)
    format: String,

    /// Output DDS file
    output: PathBuf,

    /// Compress each tile row on all cores
    #[arg(long)]
    parallel: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Also write log output to this file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                let _ = e.print();
                process::exit(0)
            }
            _ => CliError::Usage(e.render().to_string()).exit(),
        },
    };

    if let Err(e) = run(args) {
        e.exit();
    }
}

fn run(args: Args) -> Result<(), CliError> {
    // Validate the format before touching any file, log file included
    let format: DxtFormat = args.format.parse().map_err(CliError::UnknownFormat)?;

    let mut logging = LoggingConfig::new().with_verbosity(args.verbose);
    if let Some(path) = &args.log_file {
        logging = logging.with_log_file(path);
    }
    let _guard = init_logging(&logging).map_err(CliError::LoggingInit)?;

    info!(
        input = %args.input.display(),
        output = %args.output.display(),
        format = %format,
        "Encoding"
    );

    let raster = Raster::open(&args.input).map_err(CliError::Decode)?;

    let file = File::create(&args.output).map_err(|error| CliError::OutputOpen {
        path: args.output.clone(),
        error,
    })?;
    let mut writer = BufWriter::new(file);

    let encoder = DdsEncoder::new(format).with_parallel(args.parallel);
    let summary = encoder
        .write_container(&mut writer, &raster)
        .map_err(|error| CliError::Encode {
            path: args.output.clone(),
            error,
        })?;

    writer.flush().map_err(|e| CliError::Encode {
        path: args.output.clone(),
        error: DdsError::Io(e),
    })?;

    info!(output = %args.output.display(), "{}", summary);
    Ok(())
}
