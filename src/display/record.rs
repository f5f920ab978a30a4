//! Parking record display formatting
//!
//! Formats records for terminal output in table, receipt and detail views.

use chrono::{DateTime, Local, Utc};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{ParkingRecord, VehicleType};
use crate::services::fee;
use crate::services::parking::ParkingSummary;

/// Which column set a record table shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Columns {
    /// Parked vehicles: no exit time or total fee
    Active,
    /// Full history
    Full,
}

#[derive(Tabled)]
struct ActiveRow {
    #[tabled(rename = "ID")]
    id: u32,
    #[tabled(rename = "Type")]
    vehicle_type: VehicleType,
    #[tabled(rename = "VehicleNo")]
    vehicle_number: String,
    #[tabled(rename = "EntryTime")]
    entry_time: String,
    #[tabled(rename = "EntryFee")]
    entry_fee: String,
}

#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "ID")]
    id: u32,
    #[tabled(rename = "Type")]
    vehicle_type: VehicleType,
    #[tabled(rename = "VehicleNo")]
    vehicle_number: String,
    #[tabled(rename = "EntryTime")]
    entry_time: String,
    #[tabled(rename = "ExitTime")]
    exit_time: String,
    #[tabled(rename = "EntryFee")]
    entry_fee: String,
    #[tabled(rename = "TotalFee")]
    total_fee: String,
}

/// Format a timestamp in local time, or `N/A` when absent
pub fn format_time(time: Option<DateTime<Utc>>, date_format: &str) -> String {
    match time {
        Some(t) => t.with_timezone(&Local).format(date_format).to_string(),
        None => "N/A".to_string(),
    }
}

/// Format records as a table
pub fn format_record_table<'r, I>(records: I, columns: Columns, date_format: &str) -> String
where
    I: IntoIterator<Item = &'r ParkingRecord>,
{
    let records: Vec<&ParkingRecord> = records.into_iter().collect();

    if records.is_empty() {
        return match columns {
            Columns::Active => "No vehicles are currently parked.".to_string(),
            Columns::Full => "No records found.".to_string(),
        };
    }

    let mut table = match columns {
        Columns::Active => Table::new(records.iter().map(|r| ActiveRow {
            id: r.id.value(),
            vehicle_type: r.vehicle_type,
            vehicle_number: r.vehicle_number.to_string(),
            entry_time: format_time(Some(r.entry_time), date_format),
            entry_fee: r.entry_fee.to_string(),
        })),
        Columns::Full => Table::new(records.iter().map(|r| HistoryRow {
            id: r.id.value(),
            vehicle_type: r.vehicle_type,
            vehicle_number: r.vehicle_number.to_string(),
            entry_time: format_time(Some(r.entry_time), date_format),
            exit_time: format_time(r.exit_time, date_format),
            entry_fee: r.entry_fee.to_string(),
            total_fee: r.total_fee.to_string(),
        })),
    };
    table.with(Style::psql());

    format!("{}\n", table)
}

/// Format a single record's details
pub fn format_record_details(record: &ParkingRecord, date_format: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("ID:         {}\n", record.id));
    output.push_str(&format!("Type:       {}\n", record.vehicle_type));
    output.push_str(&format!("Vehicle No: {}\n", record.vehicle_number));
    output.push_str(&format!(
        "Entry Time: {}\n",
        format_time(Some(record.entry_time), date_format)
    ));
    output.push_str(&format!(
        "Exit Time:  {}\n",
        format_time(record.exit_time, date_format)
    ));
    output.push_str(&format!("Entry Fee:  {}\n", record.entry_fee));
    output.push_str(&format!("Total Fee:  {}\n", record.total_fee));
    output.push_str(&format!("Status:     {}\n", record.status()));

    output
}

/// Confirmation printed after an entry is registered
pub fn format_entry_receipt(record: &ParkingRecord, date_format: &str) -> String {
    let mut output = String::from("Entry registered successfully.\n");
    output.push_str(&format!("Ticket ID:  {}\n", record.id));
    output.push_str(&format!(
        "Vehicle:    {} ({})\n",
        record.vehicle_number, record.vehicle_type
    ));
    output.push_str(&format!(
        "Entry Time: {}\n",
        format_time(Some(record.entry_time), date_format)
    ));
    output.push_str(&format!("Entry Fee:  {}\n", record.entry_fee));
    output
}

/// Receipt printed after an exit is processed
pub fn format_exit_receipt(record: &ParkingRecord, date_format: &str) -> String {
    let billed = record
        .exit_time
        .map(|exit| fee::billed_hours(record.entry_time, exit))
        .unwrap_or(0);

    let mut output = String::from("Exit processed.\n");
    output.push_str(&format!("Ticket ID:    {}\n", record.id));
    output.push_str(&format!(
        "Vehicle:      {} ({})\n",
        record.vehicle_number, record.vehicle_type
    ));
    output.push_str(&format!(
        "Entry Time:   {}\n",
        format_time(Some(record.entry_time), date_format)
    ));
    output.push_str(&format!(
        "Exit Time:    {}\n",
        format_time(record.exit_time, date_format)
    ));
    output.push_str(&format!("Billed Hours: {}\n", billed));
    output.push_str(&format!("Entry Fee:    {}\n", record.entry_fee));
    output.push_str(&format!("Total Fee:    {}\n", record.total_fee));
    output
}

/// The vehicle type menu with entry fees and hourly rates
pub fn format_fee_schedule() -> String {
    let mut output = String::from("Vehicle Types:\n");
    for vehicle_type in VehicleType::ALL {
        output.push_str(&format!(
            "{}. {:<6}(Entry Fee: {}, Hourly: {})\n",
            vehicle_type.code(),
            vehicle_type,
            fee::entry_fee(vehicle_type),
            fee::hourly_rate(vehicle_type),
        ));
    }
    output
}

/// Occupancy summary
pub fn format_summary(summary: &ParkingSummary) -> String {
    format!(
        "Records:   {} / {}\nParked:    {}\nCollected: {}\n",
        summary.total_records, summary.capacity, summary.active, summary.collected
    )
}
