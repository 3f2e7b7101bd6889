//! Styled console output for per-file progress and the run report.

use std::path::Path;

use bytesize::ByteSize;
use console::style;

use crate::format::v1::{CryptoHeader, SIGNATURE_LEN};
use crate::stats::Stats;

/// Announces the file currently being processed.
pub fn show_processing(path: &Path) {
    println!();
    println!("{} {}", style("→").cyan(), style(format!("processing file: {}", path.display())).bold());
}

/// Reports a newly created output file.
pub fn show_created(path: &Path) {
    println!("{} created file: {}", style("✓").green(), path.display());
}

/// Reports a deleted source file.
pub fn show_deleted(path: &Path) {
    println!("{} deleted file: {}", style("✓").green(), path.display());
}

/// Reports a file that was left alone, and why.
pub fn show_skipped(path: &Path, reason: &str) {
    println!("{} skipping file: {} - {}", style("·").dim(), path.display(), reason);
}

/// Warns that a password did not match a container's signature.
pub fn show_signature_warning(path: &Path) {
    println!("{} your password didn't match the signature of the encrypted file: {}", style("!").yellow(), path.display());
    println!("  this could mean the file was tampered with, but most likely it was encrypted with a different password.");
}

/// Prints the end-of-run counters.
pub fn show_report(stats: &Stats) {
    println!();
    println!("{}", style("run summary").bold());
    println!("  files seen:    {}", stats.total());
    println!("  files created: {}", stats.created().len());
    println!("  files deleted: {}", stats.deleted().len());
    println!("  files skipped: {}", stats.skipped().len());

    if !stats.failed().is_empty() {
        println!("  {}", style(format!("files failed:  {}", stats.failed().len())).red());
        for path in stats.failed() {
            println!("    {}", path.display());
        }
    }
}

/// Prints a container's decoded header for inspection.
pub fn show_header(path: &Path, size: u64, header: &CryptoHeader) {
    println!("file: {} ({})", path.display(), ByteSize(size));
    print!("{header}");
}

/// Prints a container's raw trailing signature.
pub fn show_signature(path: &Path, signature: &[u8; SIGNATURE_LEN]) {
    println!("file: {}", path.display());
    println!("signature: {}", hex::encode(signature));
}
