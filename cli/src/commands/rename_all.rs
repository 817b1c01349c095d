use std::io::IsTerminal;

use panelizer_format::{BoardOutcome, PanelizerDescriptor, Repackager};

use crate::cli::RenameAllArgs;
use crate::error::{Error, Result};
use crate::util::board_progress_bar;

pub fn run(args: RenameAllArgs) -> Result<()> {
    let descriptor =
        PanelizerDescriptor::open(&args.from).map_err(|source| Error::OpenDescriptor {
            path: args.from.clone(),
            source,
        })?;

    let repackager = Repackager::for_descriptor(&descriptor)
        .map_err(|source| Error::Repack { source })?
        .with_inner_suffix(args.suffix);

    let show_progress = !args.quiet && std::io::stdout().is_terminal();
    let progress = if show_progress {
        Some(board_progress_bar(descriptor.boards.len()))
    } else {
        None
    };

    tracing::debug!(
        descriptor = %args.from.display(),
        folder = %repackager.output_folder().display(),
        boards = descriptor.boards.len(),
        "renaming boards"
    );

    let report = repackager.repack_all_with(&descriptor.boards, |board| {
        if let BoardOutcome::Renamed { to, .. } = &board.outcome {
            tracing::debug!(from = %board.original_name, to = %to.display(), "renamed");
        }
        if let Some(pb) = &progress {
            pb.set_message(board.name.clone());
            pb.inc(1);
        }
    });

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    for (board, error) in report.failures() {
        eprintln!("FAILED: {} ({}): {}", board.name, board.original_name, error);
        let mut source = std::error::Error::source(error);
        while let Some(cause) = source {
            eprintln!("  caused by: {}", cause);
            source = cause.source();
        }
    }

    if !args.quiet {
        println!(
            "Renamed {} of {} boards in {}",
            report.renamed(),
            report.boards.len(),
            repackager.output_folder().display()
        );
    }

    if report.failed() > 0 {
        eprintln!("WARNING: {} boards could not be renamed", report.failed());
        std::process::exit(1);
    }

    Ok(())
}
