use std::path::PathBuf;

use miette::Diagnostic;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum Error {
    #[error("File `{}` is not a .dif file", .path.display())]
    #[diagnostic(help("Export the order spreadsheet as DIF (Data Interchange Format)"))]
    NotDif { path: PathBuf },

    #[error("Cannot create panelizer descriptor")]
    Emit {
        #[source]
        source: panelizer_format::EmitError,
    },

    #[error("Cannot open descriptor `{}`", .path.display())]
    #[diagnostic(help("Is this a panelizer.xml written by `panelizer make-xml`?"))]
    OpenDescriptor {
        path: PathBuf,
        #[source]
        source: panelizer_format::DescriptorError,
    },

    #[error("Cannot rename archives")]
    Repack {
        #[source]
        source: panelizer_format::RepackError,
    },
}
