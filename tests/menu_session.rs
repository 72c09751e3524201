use std::io::{self, Cursor};
use std::sync::Arc;

use appointmentDiary::handlers::menu::MenuController;
use appointmentDiary::handlers::prompt::LinePrompter;
use appointmentDiary::service::clock::FixedClock;
use appointmentDiary::service::registry::UserRegistry;
use chrono::NaiveDate;

type SessionController = MenuController<LinePrompter<Cursor<String>, io::Sink>, Vec<u8>>;

fn finished_session(script: &str) -> SessionController {
    let clock = Arc::new(FixedClock(NaiveDate::from_ymd_opt(2026, 5, 1).unwrap()));
    let mut controller = MenuController::new(
        UserRegistry::new(clock),
        LinePrompter::new(Cursor::new(script.to_string()), io::sink()),
        Vec::new(),
    );
    controller.run().unwrap();
    controller
}

fn run_session(script: &str) -> String {
    String::from_utf8(finished_session(script).into_output()).unwrap()
}

/// Drops the menu banner so only handler messages remain.
fn messages(output: &str) -> Vec<String> {
    output
        .lines()
        .filter(|line| {
            !line.is_empty()
                && !line.starts_with("• [")
                && !line.starts_with("Welcome to Appointment Management System!")
        })
        .map(str::to_string)
        .collect()
}

#[test]
fn end_to_end_conflict_cancel_reschedule() {
    let script = "\
a\nalice\n\
s\nalice\n2026-06-01\n9:00 AM\n10:00 AM\nDentist\n\
s\nalice\n2026-06-01\n9:30 AM\n10:30 AM\nGym\n\
c\nalice\n2026-06-01\n9:00 AM\n\
s\nalice\n2026-06-01\n9:30 AM\n10:30 AM\nGym\n\
f\nalice\n2026-06-01\n10:00 am\n\
p\nalice\n2026-06-01\n9:30 AM\n\
r\nalice\n2026-06-01\n9:30 AM\n2026-06-02\n2:00 PM\n3:00 PM\n\
p\nalice\n2026-06-02\n2:00 PM\n\
x\n";
    let out = messages(&run_session(script));
    assert_eq!(
        out,
        vec![
            "User added successfully!",
            "Appointment scheduled successfully!",
            "Cannot schedule appointment. Time slot may be taken or date is invalid.",
            "Appointment cancelled successfully!",
            "Appointment scheduled successfully!",
            "Appointment found on 2026-06-01 between 9:30 AM to 10:30 AM.",
            "Purpose: Gym",
            "Appointment rescheduled successfully!",
            "Purpose: Gym",
            "Goodbye!",
        ]
    );
}

#[test]
fn failed_reschedule_leaves_original_in_place() {
    let script = "\
a\nalice\n\
s\nalice\n2026-06-01\n9:00 AM\n10:00 AM\nDentist\n\
s\nalice\n2026-06-01\n11:00 AM\n12:00 PM\nLunch\n\
r\nalice\n2026-06-01\n9:00 AM\n2026-06-01\n10:00 AM\n11:00 AM\n\
p\nalice\n2026-06-01\n9:00 AM\n\
r\nalice\n2026-06-01\n8:00 AM\n\
x\n";
    let out = messages(&run_session(script));
    assert_eq!(
        out,
        vec![
            "User added successfully!",
            "Appointment scheduled successfully!",
            "Appointment scheduled successfully!",
            "Cannot reschedule. Time slot may be taken or date is invalid.",
            "Purpose: Dentist",
            "No appointment found at the specified time!",
            "Goodbye!",
        ]
    );
}

#[test]
fn user_management_messages() {
    let script = "\
l\n\
a\nbob\n\
a\n   \n\
a\nbob\n\
a\nalice\n\
l\n\
d\ncarol\n\
d\nbob\n\
s\nbob\n\
X\n";
    let out = messages(&run_session(script));
    assert_eq!(
        out,
        vec![
            "No users in the system.",
            "User added successfully!",
            "User already exists or invalid username!",
            "User already exists or invalid username!",
            "User added successfully!",
            "Existing users:",
            "• alice",
            "• bob",
            "User not found!",
            "User deleted successfully!",
            "User not found!",
            "Goodbye!",
        ]
    );
}

#[test]
fn invalid_inputs_abort_without_changes() {
    let script = "\
zz\n\
a\nalice\n\
s\nalice\n2026-06-01\n25:00 PM\n\
s\nalice\n2026-06-01\n9:00 AM\n9:00 AM\n\
s\nalice\n2026-04-01\n9:00 AM\n10:00 AM\nPast\n\
s\nalice\n2027-01-04\n9:00 AM\n10:00 AM\nFuture\n\
c\nalice\n2026-06-01\n9:00 AM\n\
f\nalice\n2026-06-01\n9:00 AM\n\
v\n\
x\n";
    let controller = finished_session(script);
    assert!(controller.registry().get("alice").unwrap().diary().list_all().is_empty());
    let out = messages(&String::from_utf8(controller.into_output()).unwrap());
    assert_eq!(
        out,
        vec![
            "Invalid Option",
            "User added successfully!",
            "Invalid time format!",
            "Invalid time interval!",
            "Cannot schedule appointment. Time slot may be taken or date is invalid.",
            "Cannot schedule appointment. Time slot may be taken or date is invalid.",
            "No appointment found at the specified time!",
            "No appointment found!",
            "Invalid Option",
            "Goodbye!",
        ]
    );
}

#[test]
fn menu_is_shown_before_every_choice() {
    let out = run_session("q\nx\n");
    let banners = out
        .lines()
        .filter(|line| line.starts_with("Welcome to Appointment Management System!"))
        .count();
    assert_eq!(banners, 2);
    assert!(out.contains("• [x] Exit the system"));
}
