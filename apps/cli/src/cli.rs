//! Command line interface

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use devcycle_core::ClassGuid;

use crate::shell::Target;

#[derive(Parser, Debug)]
#[command(name = "devcycle")]
#[command(version)]
#[command(about = "Detect headphone endpoints and cycle audio devices")]
#[command(long_about = "Detect headphone endpoints and cycle audio devices

Lists devices of the audio class, reports whether a headphone-like output is
active, and disables then re-enables devices whose description or instance id
matches the configured vendor.

EXAMPLES:
    devcycle list                      List audio-class devices with their index
    devcycle detect                    Report headphones, then list devices
    devcycle refresh-vendor            Cycle every vendor-matching device
    devcycle disable --index 2         Disable the device shown at index 2
    devcycle enable 'HDAUDIO\\FUNC_01&VEN_10EC&DEV_0295&SUBSYS_10280A2E&REV_1000\\4&1B2A3C4D&0&0001'
    devcycle watch                     Re-check for headphones until Ctrl-C

FILES:
    <config dir>/devcycle/config.json  Optional settings (see `devcycle config`)")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Read settings from this file instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Device class to enumerate, in registry GUID form
    #[arg(long, global = true, value_name = "GUID")]
    pub class: Option<ClassGuid>,

    /// Emit JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Debug logging on stderr
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only warnings and errors on stderr
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List present devices of the configured class
    List,

    /// Report whether a headphone-like render endpoint is active, then list devices
    Detect,

    /// Disable and re-enable every vendor-matching device
    RefreshVendor,

    /// Disable and re-enable one device
    Refresh(TargetArgs),

    /// Enable one device
    Enable(TargetArgs),

    /// Disable one device
    Disable(TargetArgs),

    /// Poll for headphones until interrupted
    Watch {
        /// Poll interval in milliseconds (overrides the config file)
        #[arg(long, value_name = "MS", value_parser = clap::value_parser!(u64).range(1..))]
        interval_ms: Option<u64>,
    },

    /// Print the effective configuration and where it was loaded from
    Config,
}

#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Position in the output of `devcycle list`
    #[arg(long, conflicts_with = "instance_id")]
    pub index: Option<usize>,

    /// Device instance id, matched exactly
    #[arg(required_unless_present = "index")]
    pub instance_id: Option<String>,
}

impl TargetArgs {
    pub fn target(&self) -> Target {
        match (&self.index, &self.instance_id) {
            (Some(index), _) => Target::Index(*index),
            (None, Some(id)) => Target::InstanceId(id.clone()),
            // clap requires one of the two
            (None, None) => Target::InstanceId(String::new()),
        }
    }
}
