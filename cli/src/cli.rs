use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "panelizer",
    about = "Prepare board orders for the panelizer.",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(
        visible_alias = "xml",
        about = "Create a panelizer.xml from a .dif export of the order spreadsheet"
    )]
    MakeXml(MakeXmlArgs),

    #[command(
        visible_alias = "rename",
        about = "Rename board archives and their sketches as listed in a panelizer.xml"
    )]
    RenameAll(RenameAllArgs),
}

#[derive(Debug, clap::Args)]
#[command(after_help = "\
The descriptor is written as panelizer.xml into the folder holding the .dif file.
Nothing is written if the export is malformed.

\x1b[1m\x1b[4mExamples:\x1b[0m
  panelizer make-xml -f orders/week10/orders.dif
  RUST_LOG=debug panelizer xml --from orders.dif")]
pub struct MakeXmlArgs {
    /// Path to the .dif export
    #[arg(short = 'f', long = "from", value_name = "DIF")]
    pub from: PathBuf,

    /// Suppress output
    #[arg(short = 'q', long)]
    pub quiet: bool,
}

#[derive(Debug, clap::Args)]
pub struct RenameAllArgs {
    /// Path to the panelizer.xml descriptor
    #[arg(short = 'f', long = "from", value_name = "XML")]
    pub from: PathBuf,

    /// Suffix of the sketch entry inside each archive
    #[arg(long, value_name = "EXT", default_value = panelizer_format::repack::DEFAULT_INNER_SUFFIX)]
    pub suffix: String,

    /// Suppress output (quiet mode)
    #[arg(short = 'q', long)]
    pub quiet: bool,
}
