//! The `panelizer.xml` descriptor.

use std::collections::HashMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use quick_xml::escape::escape;
use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::board::BoardEntry;
use crate::layout::{Layout, Millimetres, INSCRIPTION_HEIGHT};

/// Name of the folder holding pre-named product boards, two levels above an order folder.
pub const PRODUCTS_FOLDER: &str = "products";

/// `strftime` format of the file name prefix.
pub const PREFIX_FORMAT: &str = "%Y.%m.%d";

const ROOT: &[u8] = b"panelizer";
const PATHS: &[u8] = b"paths";
const PATH: &[u8] = b"path";
const BOARDS: &[u8] = b"boards";
const BOARD: &[u8] = b"board";

#[derive(Debug, thiserror::Error)]
pub enum DescriptorError {
    #[error("Failed to read descriptor. Path: '{}'", .1.display())]
    ReadFailed(#[source] io::Error, PathBuf),

    #[error("Malformed XML.")]
    Xml(#[from] quick_xml::Error),

    #[error("Malformed XML attribute.")]
    Attribute(#[from] AttrError),

    #[error("Root element is '{0}', expected 'panelizer'.")]
    UnexpectedRoot(String),

    #[error("Expected exactly one 'boards' element, found {0}.")]
    BoardsCount(usize),

    #[error("Invalid value for '{attribute}' on '{element}': '{value}'")]
    InvalidAttribute {
        element: &'static str,
        attribute: &'static str,
        value: String,
    },
}

/// Everything the panelizer needs to lay out one order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelizerDescriptor {
    pub layout: Layout,
    pub output_folder: PathBuf,
    pub prefix: String,
    pub paths: Vec<PathBuf>,
    pub boards: Vec<BoardEntry>,
}

/// `folder/../../products`, computed lexically.
pub fn products_path(folder: &Path) -> PathBuf {
    let up = |p: &Path| p.parent().map(Path::to_path_buf).unwrap_or_else(|| p.to_path_buf());
    up(&up(folder)).join(PRODUCTS_FOLDER)
}

pub fn date_prefix(date: NaiveDate) -> String {
    date.format(PREFIX_FORMAT).to_string()
}

impl PanelizerDescriptor {
    /// Descriptor with the default layout, searching `output_folder` and its products folder.
    pub fn new<P: Into<PathBuf>>(
        output_folder: P,
        date: NaiveDate,
        boards: Vec<BoardEntry>,
    ) -> PanelizerDescriptor {
        let output_folder = output_folder.into();
        let paths = vec![output_folder.clone(), products_path(&output_folder)];

        PanelizerDescriptor {
            layout: Layout::default(),
            output_folder,
            prefix: date_prefix(date),
            paths,
            boards,
        }
    }

    pub fn write_xml<W: Write>(&self, mut w: W) -> io::Result<()> {
        let layout = &self.layout;
        writeln!(
            w,
            r#"<panelizer width="{}" height="{}" spacing="{}" border="{}" outputFolder="{}" prefix="{}">"#,
            layout.width,
            layout.height,
            layout.spacing,
            layout.border,
            escape(&*self.output_folder.to_string_lossy()),
            escape(self.prefix.as_str()),
        )?;

        writeln!(w, "<paths>")?;
        for path in &self.paths {
            writeln!(w, "<path>{}</path>", escape(&*path.to_string_lossy()))?;
        }
        writeln!(w, "</paths>")?;

        writeln!(w, "<boards>")?;
        for board in &self.boards {
            writeln!(
                w,
                r#"<board name="{}" requiredCount="{}" maxOptionalCount="{}" inscription="{}" inscriptionHeight="{}" originalName="{}" />"#,
                escape(board.name.as_str()),
                board.required_count,
                board.max_optional_count,
                escape(board.inscription.as_str()),
                INSCRIPTION_HEIGHT,
                escape(board.original_name.as_str()),
            )?;
        }
        writeln!(w, "</boards>")?;
        writeln!(w, "</panelizer>")?;

        Ok(())
    }

    pub fn to_xml(&self) -> String {
        let mut buf = Vec::new();
        self.write_xml(&mut buf)
            .expect("writing to a Vec<u8> cannot fail");
        String::from_utf8(buf).expect("descriptor XML is built from UTF-8 strings")
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<PanelizerDescriptor, DescriptorError> {
        let path = path.as_ref();
        let xml = std::fs::read_to_string(path)
            .map_err(|e| DescriptorError::ReadFailed(e, path.to_path_buf()))?;
        Self::parse(&xml)
    }

    /// Read a descriptor back.
    ///
    /// `path` and `board` elements are collected wherever they appear below the
    /// root; there must be exactly one `boards` element. Missing text
    /// attributes read as empty strings, missing numbers as zero. `path` text is
    /// kept exactly as written, surrounding whitespace included.
    pub fn parse(xml: &str) -> Result<PanelizerDescriptor, DescriptorError> {
        let mut reader = Reader::from_str(xml);

        let mut root_seen = false;
        let mut layout = Layout::default();
        let mut output_folder = PathBuf::new();
        let mut prefix = String::new();
        let mut paths = vec![];
        let mut boards = vec![];
        let mut boards_count = 0;
        let mut current_path: Option<String> = None;

        loop {
            let (element, is_empty) = match reader.read_event()? {
                Event::Start(e) => (e, false),
                Event::Empty(e) => (e, true),
                Event::Text(text) => {
                    if let Some(path) = current_path.as_mut() {
                        path.push_str(&text.unescape()?);
                    }
                    continue;
                }
                Event::End(e) => {
                    if e.name().as_ref() == PATH {
                        if let Some(path) = current_path.take() {
                            paths.push(PathBuf::from(path));
                        }
                    }
                    continue;
                }
                Event::Eof => break,
                _ => continue,
            };

            if !root_seen {
                if element.name().as_ref() != ROOT {
                    let name = String::from_utf8_lossy(element.name().as_ref()).into_owned();
                    return Err(DescriptorError::UnexpectedRoot(name));
                }
                root_seen = true;

                let mut attrs = attributes(&element)?;
                layout.width = length(&mut attrs, "panelizer", "width", layout.width)?;
                layout.height = length(&mut attrs, "panelizer", "height", layout.height)?;
                layout.spacing = length(&mut attrs, "panelizer", "spacing", layout.spacing)?;
                layout.border = length(&mut attrs, "panelizer", "border", layout.border)?;
                output_folder = PathBuf::from(attrs.remove("outputFolder").unwrap_or_default());
                prefix = attrs.remove("prefix").unwrap_or_default();
                continue;
            }

            match element.name().as_ref() {
                PATHS => {}
                PATH if is_empty => paths.push(PathBuf::new()),
                PATH => current_path = Some(String::new()),
                BOARDS => boards_count += 1,
                BOARD => boards.push(board(&element)?),
                _ => {}
            }
        }

        if !root_seen {
            return Err(DescriptorError::UnexpectedRoot(String::new()));
        }

        if boards_count != 1 {
            return Err(DescriptorError::BoardsCount(boards_count));
        }

        Ok(PanelizerDescriptor {
            layout,
            output_folder,
            prefix,
            paths,
            boards,
        })
    }
}

fn attributes(element: &BytesStart<'_>) -> Result<HashMap<String, String>, DescriptorError> {
    let mut map = HashMap::new();
    for attr in element.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        map.insert(key, value);
    }
    Ok(map)
}

fn length(
    attrs: &mut HashMap<String, String>,
    element: &'static str,
    attribute: &'static str,
    default: Millimetres,
) -> Result<Millimetres, DescriptorError> {
    match attrs.remove(attribute) {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| DescriptorError::InvalidAttribute {
                element,
                attribute,
                value,
            }),
    }
}

fn number<T: std::str::FromStr + Default>(
    attrs: &mut HashMap<String, String>,
    attribute: &'static str,
) -> Result<T, DescriptorError> {
    match attrs.remove(attribute) {
        None => Ok(T::default()),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| DescriptorError::InvalidAttribute {
                element: "board",
                attribute,
                value,
            }),
    }
}

fn board(element: &BytesStart<'_>) -> Result<BoardEntry, DescriptorError> {
    let mut attrs = attributes(element)?;

    Ok(BoardEntry {
        required_count: number(&mut attrs, "requiredCount")?,
        max_optional_count: number(&mut attrs, "maxOptionalCount")?,
        name: attrs.remove("name").unwrap_or_default(),
        inscription: attrs.remove("inscription").unwrap_or_default(),
        original_name: attrs.remove("originalName").unwrap_or_default(),
    })
}
