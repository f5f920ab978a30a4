//! Audit log CLI command

use crate::error::ParkingResult;
use crate::storage::Storage;

/// Print the most recent audit entries, oldest first
pub fn handle_audit_command(storage: &Storage, limit: usize, verbose: bool) -> ParkingResult<()> {
    let logger = storage.audit();
    let entries = logger.read_recent(limit)?;

    if entries.is_empty() {
        println!("Audit log is empty.");
        return Ok(());
    }

    for entry in &entries {
        println!("{}", entry);
        if verbose {
            if let Some(after) = &entry.after {
                println!("  After:   {}", after);
            }
        }
    }

    println!();
    println!(
        "Showing {} of {} entries ({})",
        entries.len(),
        logger.entry_count()?,
        logger.path().display()
    );

    Ok(())
}
