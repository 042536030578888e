//! Run output: filenames and the end-of-run summary
//!
//! Output files sort lexicographically in reading order because the sequence
//! number is zero padded; the page token rides along so any file can be
//! traced back to the viewer's own numbering.

use crate::harvest::Termination;

/// Composes the output filename for one persisted page
///
/// Format: `{document_id},{sequence zero-padded to 4 digits},{token}.jpeg`
pub fn page_filename(document_id: &str, sequence: u32, token: &str) -> String {
    format!("{},{:04},{}.jpeg", document_id, sequence, token)
}

/// What a finished run did
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub document_id: String,

    /// Pages persisted; equals the final ledger size
    pub pages_saved: usize,

    /// Sequence numbers consumed, including unidentifiable entries
    pub entries_seen: u32,

    pub termination: Termination,
}

impl RunSummary {
    /// Entries that consumed a sequence number without yielding a page
    pub fn unidentified(&self) -> u32 {
        self.entries_seen.saturating_sub(self.pages_saved as u32)
    }
}

/// Prints the summary to stdout in a formatted manner
pub fn print_summary(summary: &RunSummary) {
    println!("=== Harvest Summary ===\n");

    println!("Document: {}", summary.document_id);
    println!("  Pages saved: {}", summary.pages_saved);
    println!("  Entries observed: {}", summary.entries_seen);
    if summary.unidentified() > 0 {
        println!("  Unidentifiable entries: {}", summary.unidentified());
    }
    println!();

    println!("Stopped because: {}", summary.termination);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_filename_format() {
        assert_eq!(
            page_filename("rV1KAAAAcAAJ", 1, "PP7"),
            "rV1KAAAAcAAJ,0001,PP7.jpeg"
        );
        assert_eq!(
            page_filename("rV1KAAAAcAAJ", 123, "PA100"),
            "rV1KAAAAcAAJ,0123,PA100.jpeg"
        );
    }

    #[test]
    fn test_page_filename_keeps_width_past_four_digits() {
        assert_eq!(page_filename("X", 12345, "PA1"), "X,12345,PA1.jpeg");
    }

    #[test]
    fn test_unidentified_count() {
        let summary = RunSummary {
            document_id: "X".to_string(),
            pages_saved: 3,
            entries_seen: 5,
            termination: Termination::Stalled,
        };
        assert_eq!(summary.unidentified(), 2);
    }
}
