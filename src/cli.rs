use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "pdf-preview",
    about = "Merge, split, rotate and compress PDFs, then preview and save the result",
    long_about = "Runs one PDF operation, opens a preview session on its output, \
                  walks every part and saves them (optionally with page images)."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory that receives the produced parts
    #[arg(short, long, global = true, default_value = ".")]
    pub out: PathBuf,

    /// Render scale for page previews (default: 1.5)
    #[arg(long, global = true)]
    pub scale: Option<f32>,

    /// Also save every page of every part as a PNG image
    #[arg(long, global = true)]
    pub images: bool,

    /// Output machine-readable JSON to stdout
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose logging (sets RUST_LOG=debug if not already set)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Merge several PDFs into one
    Merge {
        /// PDF files to merge, in order
        #[arg(required = true, num_args = 2..)]
        inputs: Vec<PathBuf>,
    },

    /// Split a PDF into two parts after the given page
    Split {
        /// PDF file to split
        input: PathBuf,

        /// Last page of the first part
        #[arg(long)]
        at: u32,
    },

    /// Set the rotation of every page
    Rotate {
        /// PDF file to rotate
        input: PathBuf,

        /// Rotation in degrees, a multiple of 90
        #[arg(long, allow_hyphen_values = true, default_value_t = 90)]
        angle: i32,
    },

    /// Recompress a PDF
    Compress {
        /// PDF file to compress
        input: PathBuf,
    },

    /// Rearrange pages (e.g. "3,1-2")
    Reorder {
        /// PDF file to reorder
        input: PathBuf,

        /// New page order
        #[arg(long)]
        order: String,
    },

    /// Delete pages (e.g. "2,5-7")
    Delete {
        /// PDF file to edit
        input: PathBuf,

        /// Pages to remove
        #[arg(long)]
        pages: String,
    },
}
