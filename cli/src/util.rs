use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};

/// Bar counting boards, with the board being worked on as its message.
pub fn board_progress_bar(boards: usize) -> ProgressBar {
    let pb = ProgressBar::new(boards as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  {bar:40.cyan/blue} {pos:>4}/{len:4} {wide_msg}")
            .unwrap()
            .progress_chars("━━─"),
    );
    pb
}

/// Whether `path` names a DIF export. The extension is matched without regard
/// to case, since spreadsheets on Windows save `.DIF`.
pub fn is_dif(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("dif"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dif_extension() {
        assert!(is_dif(Path::new("orders/week10.dif")));
        assert!(is_dif(Path::new("ORDERS.DIF")));
        assert!(!is_dif(Path::new("orders.csv")));
        assert!(!is_dif(Path::new("dif")));
        assert!(!is_dif(Path::new("orders.dif.bak")));
    }
}
