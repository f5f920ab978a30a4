//! Display formatting for terminal output
//!
//! The core hands back structured records; everything that turns them
//! into text for a terminal lives here.

pub mod record;

pub use record::{
    format_entry_receipt, format_exit_receipt, format_fee_schedule, format_record_details,
    format_record_table, format_summary, format_time, Columns,
};
