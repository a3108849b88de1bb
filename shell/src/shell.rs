//! The interactive menu loop.
//!
//! The shell is a two-state machine: `MainMenu` reads one selector line and
//! dispatches to an operation, `Exit` ends the loop. Operations prompt for
//! their fields one line at a time and stop at the first field that fails
//! validation. Nothing an operator types can end the session except choosing
//! Exit or closing the input stream.

use std::io::{self, BufRead, Write};

use tracing::{debug, error, info, warn};

use clinic_config::ClinicConfig;
use clinic_contracts::{
    date::parse_date,
    error::{ClinicError, ClinicResult},
};
use clinic_core::{
    handlers::{self, HandlerOptions, Outcome},
    save_from, RecordStore, SnapshotStore,
};

const MENU: &str = "\
Hospital Management System
1. Register Patient
2. Schedule Appointment
3. Update EHR
4. Manage Billing
5. Manage Inventory
6. Manage Staff
7. Save Data
8. Exit
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    MainMenu,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    RegisterPatient,
    ScheduleAppointment,
    UpdateEhr,
    ManageBilling,
    ManageInventory,
    ManageStaff,
    SaveData,
    Exit,
}

impl Command {
    fn from_selector(line: &str) -> Option<Self> {
        match line.trim().parse::<u32>().ok()? {
            1 => Some(Command::RegisterPatient),
            2 => Some(Command::ScheduleAppointment),
            3 => Some(Command::UpdateEhr),
            4 => Some(Command::ManageBilling),
            5 => Some(Command::ManageInventory),
            6 => Some(Command::ManageStaff),
            7 => Some(Command::SaveData),
            8 => Some(Command::Exit),
            _ => None,
        }
    }
}

/// Line-oriented prompt/response over any reader and writer.
struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    /// Print `label` and read one line without its line ending.
    ///
    /// End of input is reported as `UnexpectedEof`. A line that is not valid
    /// UTF-8 is consumed in full and reported as `InvalidData`.
    fn prompt(&mut self, label: &str) -> io::Result<String> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut raw = Vec::new();
        if self.input.read_until(b'\n', &mut raw)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        while matches!(raw.last(), Some(b'\n' | b'\r')) {
            raw.pop();
        }
        String::from_utf8(raw).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    fn say(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{}", message)
    }
}

/// The interactive session: owns the store and the snapshot backend.
pub struct Shell {
    store: RecordStore,
    snapshots: Box<dyn SnapshotStore>,
    options: HandlerOptions,
    currency_symbol: String,
}

impl Shell {
    pub fn new(
        store: RecordStore,
        snapshots: Box<dyn SnapshotStore>,
        config: &ClinicConfig,
    ) -> Self {
        Self {
            store,
            snapshots,
            options: config.handler_options(),
            currency_symbol: config.currency_symbol.clone(),
        }
    }

    #[cfg(test)]
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Run the menu until Exit is chosen or the input ends.
    ///
    /// Only terminal I/O failures are returned as errors.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, output: W) -> io::Result<()> {
        let mut console = Console { input, output };
        let mut state = State::MainMenu;

        while state == State::MainMenu {
            state = match self.step(&mut console) {
                Ok(next) => next,
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    info!("input closed; leaving the menu");
                    State::Exit
                }
                Err(e) => return Err(e),
            };
        }

        console.output.flush()
    }

    fn step<R: BufRead, W: Write>(&mut self, c: &mut Console<R, W>) -> io::Result<State> {
        write!(c.output, "{}", MENU)?;
        let line = match c.prompt("Enter your choice: ") {
            Ok(line) => line,
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                debug!(error = %e, "unreadable menu selector");
                c.say("Invalid choice.")?;
                return Ok(State::MainMenu);
            }
            Err(e) => return Err(e),
        };

        let Some(command) = Command::from_selector(&line) else {
            debug!(selector = %line, "unrecognised menu selector");
            c.say("Invalid choice.")?;
            return Ok(State::MainMenu);
        };

        debug!(?command, "menu command selected");
        let result = match command {
            Command::RegisterPatient => self.register_patient(c),
            Command::ScheduleAppointment => self.schedule_appointment(c),
            Command::UpdateEhr => self.update_ehr(c),
            Command::ManageBilling => self.manage_billing(c),
            Command::ManageInventory => self.manage_inventory(c),
            Command::ManageStaff => self.manage_staff(c),
            Command::SaveData => self.save(c),
            Command::Exit => {
                c.say("Exiting...")?;
                return Ok(State::Exit);
            }
        };

        match result {
            Ok(()) => Ok(State::MainMenu),
            // Handlers only run once every field is read, so nothing was stored.
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                warn!(?command, error = %e, "operation rejected: unreadable input");
                c.say("Invalid input: text must be valid UTF-8.")?;
                Ok(State::MainMenu)
            }
            Err(e) => Err(e),
        }
    }

    // ── Operations ────────────────────────────────────────────────────────────

    fn register_patient<R: BufRead, W: Write>(&mut self, c: &mut Console<R, W>) -> io::Result<()> {
        let id = c.prompt("Enter patient ID: ")?;
        let name = c.prompt("Enter patient name: ")?;
        let contact_info = c.prompt("Enter patient contact info: ")?;

        let result = handlers::register_patient(
            &mut self.store,
            self.options,
            handlers::RegisterPatient {
                id: &id,
                name: &name,
                contact_info: &contact_info,
            },
        );
        self.report(c, result)
    }

    fn schedule_appointment<R: BufRead, W: Write>(
        &mut self,
        c: &mut Console<R, W>,
    ) -> io::Result<()> {
        let Some(patient_id) = self.prompt_patient(c)? else {
            return Ok(());
        };
        let Some(date) = self.prompt_date(c, "Enter appointment date (yyyy-MM-dd): ")? else {
            return Ok(());
        };
        let doctor = c.prompt("Enter doctor's name: ")?;
        let reason = c.prompt("Enter reason for appointment: ")?;

        let result = handlers::schedule_appointment(
            &mut self.store,
            handlers::ScheduleAppointment {
                patient_id: &patient_id,
                date: &date,
                doctor: &doctor,
                reason: &reason,
            },
        );
        self.report(c, result)
    }

    fn update_ehr<R: BufRead, W: Write>(&mut self, c: &mut Console<R, W>) -> io::Result<()> {
        let Some(patient_id) = self.prompt_patient(c)? else {
            return Ok(());
        };
        let Some(date) = self.prompt_date(c, "Enter date of record (yyyy-MM-dd): ")? else {
            return Ok(());
        };
        let note = c.prompt("Enter record details: ")?;

        let result = handlers::update_ehr(
            &mut self.store,
            handlers::UpdateEhr {
                patient_id: &patient_id,
                date: &date,
                note: &note,
            },
        );
        self.report(c, result)
    }

    fn manage_billing<R: BufRead, W: Write>(&mut self, c: &mut Console<R, W>) -> io::Result<()> {
        let Some(patient_id) = self.prompt_patient(c)? else {
            return Ok(());
        };
        let description = c.prompt("Enter charge description: ")?;
        let amount = c.prompt("Enter charge amount: ")?;

        let result = handlers::add_charge(
            &mut self.store,
            handlers::AddCharge {
                patient_id: &patient_id,
                description: &description,
                amount: &amount,
            },
        );
        self.report(c, result)
    }

    fn manage_inventory<R: BufRead, W: Write>(&mut self, c: &mut Console<R, W>) -> io::Result<()> {
        let name = c.prompt("Enter item name: ")?;
        if name.is_empty() {
            return self.report(c, Err(ClinicError::MissingField { field: "item name" }));
        }

        let (quantity, price) = if self.store.find_inventory_by_name(&name).is_some() {
            (c.prompt("Enter new quantity: ")?, None)
        } else {
            let quantity = c.prompt("Enter quantity: ")?;
            if let Err(e) = handlers::parse_quantity(&quantity) {
                return self.report(c, Err(e));
            }
            (quantity, Some(c.prompt("Enter price: ")?))
        };

        let result = handlers::manage_inventory(
            &mut self.store,
            handlers::ManageInventory {
                name: &name,
                quantity: &quantity,
                price: price.as_deref(),
            },
        );
        self.report(c, result)
    }

    fn manage_staff<R: BufRead, W: Write>(&mut self, c: &mut Console<R, W>) -> io::Result<()> {
        let id = c.prompt("Enter staff ID: ")?;
        let name = c.prompt("Enter staff name: ")?;
        let role = c.prompt("Enter staff role: ")?;

        let result = handlers::register_staff(
            &mut self.store,
            self.options,
            handlers::RegisterStaff {
                id: &id,
                name: &name,
                role: &role,
            },
        );
        self.report(c, result)
    }

    fn save<R: BufRead, W: Write>(&mut self, c: &mut Console<R, W>) -> io::Result<()> {
        match save_from(&self.store, self.snapshots.as_ref()) {
            Ok(_) => c.say("Data saved successfully."),
            Err(e) => c.say(&format!("Failed to save data: {}", e)),
        }
    }

    // ── Prompt helpers ────────────────────────────────────────────────────────

    /// Ask for a patient id; report and return `None` if it has no records.
    fn prompt_patient<R: BufRead, W: Write>(
        &self,
        c: &mut Console<R, W>,
    ) -> io::Result<Option<String>> {
        let patient_id = c.prompt("Enter patient ID: ")?;
        match handlers::require_patient(&self.store, &patient_id) {
            Ok(()) => Ok(Some(patient_id)),
            Err(e) => self.report(c, Err(e)).map(|()| None),
        }
    }

    /// Ask for a date; report and return `None` if it does not parse.
    fn prompt_date<R: BufRead, W: Write>(
        &self,
        c: &mut Console<R, W>,
        label: &str,
    ) -> io::Result<Option<String>> {
        let date = c.prompt(label)?;
        match parse_date(&date) {
            Ok(_) => Ok(Some(date)),
            Err(e) => self.report(c, Err(e)).map(|()| None),
        }
    }

    fn report<R: BufRead, W: Write>(
        &self,
        c: &mut Console<R, W>,
        result: ClinicResult<Outcome>,
    ) -> io::Result<()> {
        match result {
            Ok(outcome) => c.say(&outcome.render(&self.currency_symbol)),
            Err(e) => {
                if e.is_validation() {
                    warn!(error = %e, "operation rejected");
                } else {
                    error!(error = %e, "operation failed");
                }
                c.say(&failure_message(&e))
            }
        }
    }
}

/// The operator-facing text for a rejected operation.
fn failure_message(e: &ClinicError) -> String {
    match e {
        ClinicError::PatientNotFound { .. } => "Patient not found.".to_string(),
        ClinicError::InvalidDate { .. } => "Invalid date format.".to_string(),
        ClinicError::InvalidAmount { input, reason } => {
            format!("Invalid amount '{}': {}.", input, reason)
        }
        ClinicError::InvalidQuantity { input } => {
            format!("Invalid quantity '{}': enter a whole number.", input)
        }
        other => format!("Error: {}.", other),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
