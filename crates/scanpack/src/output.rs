use std::io::{IsTerminal, Write};
use std::path::Path;

use clap::ValueEnum;
use serde::Serialize;

use crate::exit::{io_error, json_error, CliResult};

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// Write `data` to `path`, or to stdout when no path is given.
pub fn write_output(path: Option<&Path>, data: &[u8]) -> CliResult<()> {
    match path {
        Some(path) => std::fs::write(path, data)
            .map_err(|err| io_error(&format!("failed writing {}", path.display()), err)),
        None => {
            let mut out = std::io::stdout().lock();
            out.write_all(data)
                .and_then(|()| out.flush())
                .map_err(|err| io_error("failed writing stdout", err))
        }
    }
}

/// Serialize `value` as JSON to `path` or stdout.
pub fn write_json<T: Serialize>(path: Option<&Path>, value: &T, pretty: bool) -> CliResult<()> {
    let mut text = if pretty {
        serde_json::to_vec_pretty(value)
    } else {
        serde_json::to_vec(value)
    }
    .map_err(|err| json_error("failed serializing output", err))?;
    text.push(b'\n');
    write_output(path, &text)
}
