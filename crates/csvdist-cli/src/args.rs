//! Command-line arguments (clap derive)

use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "csvdist")]
#[command(about = "Append driving distance and duration columns to a CSV of origin/destination pairs")]
#[command(version)]
pub struct Cli {
    /// Input CSV file (first row is the header)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Header of the column holding the origin
    #[arg(long = "origin-header", value_name = "NAME")]
    pub origin_header: String,

    /// Header of the column holding the destination
    #[arg(long = "destination-header", value_name = "NAME")]
    pub destination_header: String,

    /// Output CSV file (default: overwrite the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Enable debug logging (includes per-row lookup failures)
    #[arg(long)]
    pub debug: bool,

    /// Config file path (default: ./csvdist.toml or ~/.config/csvdist/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Two-letter short flags clap cannot express as `short`
const SHORT_ALIASES: &[(&str, &str)] = &[
    ("-oh", "--origin-header"),
    ("-dh", "--destination-header"),
];

/// Rewrite `-oh`/`-dh` (also `-oh=value`) to their long forms.
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut out = Vec::new();
    let mut rest_is_positional = false;
    for arg in args {
        if rest_is_positional {
            out.push(arg);
            continue;
        }
        if arg == "--" {
            rest_is_positional = true;
            out.push(arg);
            continue;
        }
        out.push(expand_alias(arg));
    }
    out
}

fn expand_alias(arg: OsString) -> OsString {
    let Some(s) = arg.to_str() else {
        return arg;
    };
    for (short, long) in SHORT_ALIASES {
        if s == *short {
            return OsString::from(*long);
        }
        if let Some(value) = s.strip_prefix(short).and_then(|v| v.strip_prefix('=')) {
            return OsString::from(format!("{long}={value}"));
        }
    }
    arg
}
