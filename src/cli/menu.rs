//! Interactive User/Admin menu
//!
//! Reads choices line by line from any `BufRead` and writes to any
//! `Write`. Failed operations print a one-line message and return to the
//! menu; only a failure to read input (end of input) ends the session.

use std::io::{BufRead, Write};

use crate::display::{
    format_entry_receipt, format_exit_receipt, format_fee_schedule, format_record_details,
    format_record_table, format_summary, Columns,
};
use crate::error::{ParkingError, ParkingResult};
use crate::services::{Authenticator, Clock, ParkingService};
use crate::storage::Storage;

use super::login::admin_login_with;
use super::prompt;

/// Interactive session state
pub struct Menu<'a, R, W> {
    storage: &'a mut Storage,
    clock: &'a dyn Clock,
    authenticator: &'a dyn Authenticator,
    date_format: &'a str,
    input: R,
    output: W,
    hidden_password: bool,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(
        storage: &'a mut Storage,
        clock: &'a dyn Clock,
        authenticator: &'a dyn Authenticator,
        date_format: &'a str,
        input: R,
        output: W,
    ) -> Self {
        Self {
            storage,
            clock,
            authenticator,
            date_format,
            input,
            output,
            hidden_password: false,
        }
    }

    /// Read the admin password from the terminal with echo off
    pub fn hide_password(mut self, hidden: bool) -> Self {
        self.hidden_password = hidden;
        self
    }

    /// Run the main menu until the user picks Exit
    pub fn run(&mut self) -> ParkingResult<()> {
        loop {
            writeln!(self.output)?;
            writeln!(self.output, "==============================")?;
            writeln!(self.output, "   PARKING MANAGEMENT SYSTEM")?;
            writeln!(self.output, "==============================")?;
            writeln!(self.output, "1. User")?;
            writeln!(self.output, "2. Admin")?;
            writeln!(self.output, "0. Exit")?;

            match self.read_choice()? {
                1 => self.user_menu()?,
                2 => self.admin_menu()?,
                0 => {
                    writeln!(self.output, "Goodbye.")?;
                    return Ok(());
                }
                _ => writeln!(self.output, "Invalid choice.")?,
            }
        }
    }

    fn read_choice(&mut self) -> ParkingResult<i32> {
        prompt::read_int(&mut self.input, &mut self.output, "Enter choice: ")
    }

    fn user_menu(&mut self) -> ParkingResult<()> {
        loop {
            writeln!(self.output)?;
            writeln!(self.output, "=== USER MENU ===")?;
            writeln!(self.output, "1. Register vehicle entry")?;
            writeln!(self.output, "0. Back")?;

            match self.read_choice()? {
                1 => self.register_entry()?,
                0 => return Ok(()),
                _ => writeln!(self.output, "Invalid choice.")?,
            }
        }
    }

    fn admin_menu(&mut self) -> ParkingResult<()> {
        writeln!(self.output)?;
        writeln!(self.output, "--- Admin Login ---")?;
        match admin_login_with(
            self.authenticator,
            &mut self.input,
            &mut self.output,
            self.hidden_password,
        ) {
            Ok(()) => writeln!(self.output, "Login successful.")?,
            Err(ParkingError::Auth(message)) => {
                writeln!(self.output, "{}.", message.trim_end_matches('.'))?;
                return Ok(());
            }
            Err(e) => return Err(e),
        }

        loop {
            writeln!(self.output)?;
            writeln!(self.output, "=== ADMIN MENU ===")?;
            writeln!(self.output, "1. View currently parked vehicles")?;
            writeln!(self.output, "2. Exit a vehicle (set exit time + fee)")?;
            writeln!(self.output, "3. View all records (history)")?;
            writeln!(self.output, "4. Search vehicle by number")?;
            writeln!(self.output, "5. Occupancy summary")?;
            writeln!(self.output, "0. Logout")?;

            match self.read_choice()? {
                1 => self.list_parked()?,
                2 => self.exit_vehicle()?,
                3 => self.list_history()?,
                4 => self.search_vehicle()?,
                5 => self.show_summary()?,
                0 => return Ok(()),
                _ => writeln!(self.output, "Invalid choice.")?,
            }
        }
    }

    fn service(&mut self) -> ParkingService<'_> {
        ParkingService::new(&mut *self.storage, self.clock)
    }

    fn register_entry(&mut self) -> ParkingResult<()> {
        if self.storage.records.is_full() {
            let capacity = self.storage.records.capacity();
            writeln!(self.output, "{}", ParkingError::CapacityExceeded { capacity })?;
            return Ok(());
        }

        writeln!(self.output)?;
        writeln!(self.output, "--- Vehicle Entry Registration ---")?;
        write!(self.output, "{}", format_fee_schedule())?;

        let code = prompt::read_int(
            &mut self.input,
            &mut self.output,
            "Select vehicle type (1-4): ",
        )?;
        let number = prompt::read_line(
            &mut self.input,
            &mut self.output,
            "Enter vehicle number (e.g., BA-12-PA-1234): ",
        )?;

        let result = self.service().register_code(code, &number);
        match result {
            Ok(record) => {
                writeln!(self.output)?;
                write!(self.output, "{}", format_entry_receipt(&record, self.date_format))?;
            }
            Err(e) => writeln!(self.output, "{}", e)?,
        }
        self.report_audit_warnings()
    }

    fn list_parked(&mut self) -> ParkingResult<()> {
        writeln!(self.output)?;
        writeln!(self.output, "--- Currently Parked Vehicles ---")?;
        let date_format = self.date_format;
        let table =
            format_record_table(self.service().list_active(), Columns::Active, date_format);
        writeln!(self.output, "{}", table.trim_end())?;
        Ok(())
    }

    fn exit_vehicle(&mut self) -> ParkingResult<()> {
        writeln!(self.output)?;
        writeln!(self.output, "--- Vehicle Exit ---")?;
        let number = prompt::read_line(
            &mut self.input,
            &mut self.output,
            "Enter vehicle number to exit: ",
        )?;

        let result = self.service().exit(&number);
        match result {
            Ok(record) => {
                writeln!(self.output)?;
                write!(self.output, "{}", format_exit_receipt(&record, self.date_format))?;
            }
            Err(e) => writeln!(self.output, "{}", e)?,
        }
        self.report_audit_warnings()
    }

    fn list_history(&mut self) -> ParkingResult<()> {
        writeln!(self.output)?;
        writeln!(self.output, "--- All Records (History) ---")?;
        let date_format = self.date_format;
        let table =
            format_record_table(self.service().list_all(), Columns::Full, date_format);
        writeln!(self.output, "{}", table.trim_end())?;
        Ok(())
    }

    fn search_vehicle(&mut self) -> ParkingResult<()> {
        writeln!(self.output)?;
        writeln!(self.output, "--- Search Vehicle ---")?;
        let number = prompt::read_line(
            &mut self.input,
            &mut self.output,
            "Enter vehicle number to search: ",
        )?;

        let found = self.service().search_by_vehicle_number(&number);
        if found.is_empty() {
            writeln!(self.output, "No record found for this vehicle number.")?;
        }
        for record in &found {
            writeln!(self.output)?;
            writeln!(self.output, "Record Found:")?;
            write!(self.output, "{}", format_record_details(record, self.date_format))?;
        }
        Ok(())
    }

    fn report_audit_warnings(&mut self) -> ParkingResult<()> {
        for warning in self.storage.take_audit_warnings() {
            writeln!(self.output, "Warning: {}", warning)?;
        }
        Ok(())
    }

    fn show_summary(&mut self) -> ParkingResult<()> {
        let summary = self.service().summary();
        writeln!(self.output)?;
        write!(self.output, "{}", format_summary(&summary))?;
        Ok(())
    }
}
