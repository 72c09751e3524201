use std::io::{self, Write};

use chrono::{NaiveDate, NaiveTime};
use tracing::{debug, info};

use crate::handlers::prompt::Prompter;
use crate::service::datetime::{self, format_date, format_time};
use crate::service::registry::UserRegistry;

const MENU: &[&str] = &[
    "",
    "Welcome to Appointment Management System! What would you like to do?",
    "• [a] Add new user",
    "• [d] Delete an existing user",
    "• [l] List existing users",
    "• [s] Schedule an appointment",
    "• [c] Cancel an appointment",
    "• [f] Check for appointment on certain date and time",
    "• [p] Retrieve purpose of an appointment",
    "• [r] Reschedule an existing appointment",
    "• [x] Exit the system",
];

const PROMPT_CHOICE: &str = "Enter choice: ";
const PROMPT_USERNAME: &str = "Enter username: ";
const PROMPT_DATE: &str = "Enter date (YYYY-MM-DD): ";
const PROMPT_START: &str = "Enter start time (H:MM AM/PM): ";
const PROMPT_END: &str = "Enter end time (H:MM AM/PM): ";
const PROMPT_PURPOSE: &str = "Enter purpose: ";
const PROMPT_CHECK_DATE: &str = "Enter date: ";
const PROMPT_CHECK_TIME: &str = "Enter start time: ";
const PROMPT_OLD_DATE: &str = "Enter current date (YYYY-MM-DD): ";
const PROMPT_OLD_START: &str = "Enter current start time (H:MM AM/PM): ";
const PROMPT_NEW_DATE: &str = "Enter new date (YYYY-MM-DD): ";
const PROMPT_NEW_START: &str = "Enter new start time (H:MM AM/PM): ";
const PROMPT_NEW_END: &str = "Enter new end time (H:MM AM/PM): ";

const USER_ADDED: &str = "User added successfully!";
const USER_ADD_FAILED: &str = "User already exists or invalid username!";
const USER_DELETED: &str = "User deleted successfully!";
const USER_NOT_FOUND: &str = "User not found!";
const NO_USERS: &str = "No users in the system.";
const USERS_HEADER: &str = "Existing users:";
const INVALID_DATE: &str = "Invalid date format!";
const INVALID_TIME: &str = "Invalid time format!";
const INVALID_INTERVAL: &str = "Invalid time interval!";
const SCHEDULED: &str = "Appointment scheduled successfully!";
const SCHEDULE_FAILED: &str =
    "Cannot schedule appointment. Time slot may be taken or date is invalid.";
const CANCELLED: &str = "Appointment cancelled successfully!";
const NO_APPOINTMENT_AT: &str = "No appointment found at the specified time!";
const NO_APPOINTMENT: &str = "No appointment found!";
const RESCHEDULED: &str = "Appointment rescheduled successfully!";
const RESCHEDULE_FAILED: &str = "Cannot reschedule. Time slot may be taken or date is invalid.";
const INVALID_OPTION: &str = "Invalid Option";
const GOODBYE: &str = "Goodbye!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    AddUser,
    DeleteUser,
    ListUsers,
    Schedule,
    Cancel,
    Check,
    RetrievePurpose,
    Reschedule,
    Exit,
}

impl MenuChoice {
    /// Case-insensitive match on the single-letter menu code.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "a" => Some(Self::AddUser),
            "d" => Some(Self::DeleteUser),
            "l" => Some(Self::ListUsers),
            "s" => Some(Self::Schedule),
            "c" => Some(Self::Cancel),
            "f" => Some(Self::Check),
            "p" => Some(Self::RetrievePurpose),
            "r" => Some(Self::Reschedule),
            "x" => Some(Self::Exit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Text menu over a [`UserRegistry`].
///
/// Every handler reads its fields one at a time and stops at the first bad
/// one, printing a specific message. Nothing is written to the registry
/// until all fields have been read and validated.
pub struct MenuController<P, W> {
    registry: UserRegistry,
    prompter: P,
    out: W,
}

impl<P: Prompter, W: Write> MenuController<P, W> {
    pub fn new(registry: UserRegistry, prompter: P, out: W) -> Self {
        Self {
            registry,
            prompter,
            out,
        }
    }

    pub fn registry(&self) -> &UserRegistry {
        &self.registry
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Runs until the user picks exit or input runs out.
    pub fn run(&mut self) -> io::Result<()> {
        info!("session started");
        loop {
            self.display_menu()?;
            let Some(choice) = self.prompter.read_line(PROMPT_CHOICE) else {
                self.say(GOODBYE)?;
                break;
            };
            if self.dispatch(&choice)? == Flow::Exit {
                break;
            }
        }
        info!(users = self.registry.count(), "session ended");
        Ok(())
    }

    pub fn dispatch(&mut self, choice: &str) -> io::Result<Flow> {
        let Some(choice) = MenuChoice::parse(choice) else {
            self.say(INVALID_OPTION)?;
            return Ok(Flow::Continue);
        };
        debug!(?choice, "menu choice");
        match choice {
            MenuChoice::AddUser => self.handle_add_user()?,
            MenuChoice::DeleteUser => self.handle_delete_user()?,
            MenuChoice::ListUsers => self.handle_list_users()?,
            MenuChoice::Schedule => self.handle_schedule()?,
            MenuChoice::Cancel => self.handle_cancel()?,
            MenuChoice::Check => self.handle_check()?,
            MenuChoice::RetrievePurpose => self.handle_retrieve_purpose()?,
            MenuChoice::Reschedule => self.handle_reschedule()?,
            MenuChoice::Exit => {
                self.say(GOODBYE)?;
                return Ok(Flow::Exit);
            }
        }
        Ok(Flow::Continue)
    }

    fn display_menu(&mut self) -> io::Result<()> {
        for line in MENU {
            writeln!(self.out, "{}", line)?;
        }
        self.out.flush()
    }

    fn say(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "{}", message)?;
        self.out.flush()
    }

    fn ask(&mut self, prompt: &str) -> Option<String> {
        self.prompter.read_line(prompt)
    }

    /// Reads a username and checks it is registered.
    fn ask_user(&mut self) -> io::Result<Option<String>> {
        let Some(username) = self.ask(PROMPT_USERNAME) else {
            return Ok(None);
        };
        if !self.registry.exists(&username) {
            self.say(USER_NOT_FOUND)?;
            return Ok(None);
        }
        Ok(Some(username))
    }

    fn ask_date(&mut self, prompt: &str) -> io::Result<Option<NaiveDate>> {
        let Some(text) = self.ask(prompt) else {
            return Ok(None);
        };
        match datetime::parse_date(&text) {
            Ok(date) => Ok(Some(date)),
            Err(err) => {
                debug!(error = %err, "rejected date input");
                self.say(INVALID_DATE)?;
                Ok(None)
            }
        }
    }

    fn ask_time(&mut self, prompt: &str) -> io::Result<Option<NaiveTime>> {
        let Some(text) = self.ask(prompt) else {
            return Ok(None);
        };
        match datetime::parse_time(&text) {
            Ok(time) => Ok(Some(time)),
            Err(err) => {
                debug!(error = %err, "rejected time input");
                self.say(INVALID_TIME)?;
                Ok(None)
            }
        }
    }

    /// Reads start and end times and checks their order.
    fn ask_interval(
        &mut self,
        start_prompt: &str,
        end_prompt: &str,
    ) -> io::Result<Option<(NaiveTime, NaiveTime)>> {
        let Some(start) = self.ask_time(start_prompt)? else {
            return Ok(None);
        };
        let Some(end) = self.ask_time(end_prompt)? else {
            return Ok(None);
        };
        if !datetime::is_valid_interval(Some(start), Some(end)) {
            self.say(INVALID_INTERVAL)?;
            return Ok(None);
        }
        Ok(Some((start, end)))
    }

    fn handle_add_user(&mut self) -> io::Result<()> {
        let Some(username) = self.ask(PROMPT_USERNAME) else {
            return Ok(());
        };
        match self.registry.add(&username) {
            Ok(()) => self.say(USER_ADDED),
            Err(err) => {
                debug!(error = %err, "add user rejected");
                self.say(USER_ADD_FAILED)
            }
        }
    }

    fn handle_delete_user(&mut self) -> io::Result<()> {
        let Some(username) = self.ask(PROMPT_USERNAME) else {
            return Ok(());
        };
        match self.registry.delete(&username) {
            Ok(()) => self.say(USER_DELETED),
            Err(_) => self.say(USER_NOT_FOUND),
        }
    }

    fn handle_list_users(&mut self) -> io::Result<()> {
        if !self.registry.has_users() {
            return self.say(NO_USERS);
        }
        self.say(USERS_HEADER)?;
        for username in self.registry.list_usernames() {
            self.say(&format!("• {}", username))?;
        }
        Ok(())
    }

    fn handle_schedule(&mut self) -> io::Result<()> {
        let Some(username) = self.ask_user()? else {
            return Ok(());
        };
        let Some(date) = self.ask_date(PROMPT_DATE)? else {
            return Ok(());
        };
        let Some((start, end)) = self.ask_interval(PROMPT_START, PROMPT_END)? else {
            return Ok(());
        };
        let Some(purpose) = self.ask(PROMPT_PURPOSE) else {
            return Ok(());
        };

        let Some(user) = self.registry.get_mut(&username) else {
            return self.say(USER_NOT_FOUND);
        };
        match user.diary_mut().schedule(date, start, end, &purpose) {
            Ok(()) => self.say(SCHEDULED),
            Err(err) => {
                debug!(error = %err, username = %username, "schedule rejected");
                self.say(SCHEDULE_FAILED)
            }
        }
    }

    fn handle_cancel(&mut self) -> io::Result<()> {
        let Some(username) = self.ask_user()? else {
            return Ok(());
        };
        let Some(date) = self.ask_date(PROMPT_DATE)? else {
            return Ok(());
        };
        let Some(start) = self.ask_time(PROMPT_START)? else {
            return Ok(());
        };

        let cancelled = self
            .registry
            .get_mut(&username)
            .is_some_and(|user| user.diary_mut().cancel(date, start));
        if cancelled {
            self.say(CANCELLED)
        } else {
            self.say(NO_APPOINTMENT_AT)
        }
    }

    fn handle_check(&mut self) -> io::Result<()> {
        let Some(username) = self.ask_user()? else {
            return Ok(());
        };
        let Some(date) = self.ask_date(PROMPT_CHECK_DATE)? else {
            return Ok(());
        };
        let Some(time) = self.ask_time(PROMPT_CHECK_TIME)? else {
            return Ok(());
        };

        let found = self
            .registry
            .get(&username)
            .and_then(|user| user.diary().find_at(date, time))
            .map(|apt| {
                format!(
                    "Appointment found on {} between {} to {}.",
                    format_date(apt.date()),
                    format_time(apt.start()),
                    format_time(apt.end())
                )
            });
        match found {
            Some(message) => self.say(&message),
            None => self.say(NO_APPOINTMENT),
        }
    }

    fn handle_retrieve_purpose(&mut self) -> io::Result<()> {
        let Some(username) = self.ask_user()? else {
            return Ok(());
        };
        let Some(date) = self.ask_date(PROMPT_DATE)? else {
            return Ok(());
        };
        let Some(start) = self.ask_time(PROMPT_START)? else {
            return Ok(());
        };

        let purpose = self
            .registry
            .get(&username)
            .and_then(|user| user.diary().get_by_start(date, start))
            .map(|apt| apt.purpose().to_string());
        match purpose {
            Some(purpose) => self.say(&format!("Purpose: {}", purpose)),
            None => self.say(NO_APPOINTMENT_AT),
        }
    }

    fn handle_reschedule(&mut self) -> io::Result<()> {
        let Some(username) = self.ask_user()? else {
            return Ok(());
        };
        let Some(old_date) = self.ask_date(PROMPT_OLD_DATE)? else {
            return Ok(());
        };
        let Some(old_start) = self.ask_time(PROMPT_OLD_START)? else {
            return Ok(());
        };
        let exists = self
            .registry
            .get(&username)
            .is_some_and(|user| user.diary().get_by_start(old_date, old_start).is_some());
        if !exists {
            return self.say(NO_APPOINTMENT_AT);
        }

        let Some(new_date) = self.ask_date(PROMPT_NEW_DATE)? else {
            return Ok(());
        };
        let Some((new_start, new_end)) = self.ask_interval(PROMPT_NEW_START, PROMPT_NEW_END)?
        else {
            return Ok(());
        };

        let Some(user) = self.registry.get_mut(&username) else {
            return self.say(USER_NOT_FOUND);
        };
        match user
            .diary_mut()
            .reschedule(old_date, old_start, new_date, new_start, new_end)
        {
            Ok(()) => self.say(RESCHEDULED),
            Err(err) => {
                debug!(error = %err, username = %username, "reschedule rejected");
                self.say(RESCHEDULE_FAILED)
            }
        }
    }
}
