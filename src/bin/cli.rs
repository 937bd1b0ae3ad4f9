use chrono::{Local, NaiveDateTime};
use court_booking::booking::{self, BookingDuration};
use court_booking::reservation::format_date_time;
use court_booking::{
    BookingConfig, RangeWarning, ScheduleStore, WEEKLY_RESERVATION_LIMIT, load_directory,
    logger, make_backup, save_csv, save_json,
};
use std::io::{self, BufRead, Write};

const WRONG_ANSWER_BANNER: &str = "! Wrong answer !";

fn print_menu() {
    println!("{}", "-".repeat(30));
    println!("Welcome to the Tennis Court Program!");
    println!("{}", "-".repeat(30));
    println!(
        "What do you want to do:\n1) Make a reservation\n2) Cancel a reservation\n3) Print schedule\n4) Save schedule to a file\n5) Exit\nEnter: 1, 2, 3, 4 or 5"
    );
}

fn print_rules() {
    println!(
        "The court is open 24/7, but please note that:\n1) you can only have {} bookings per week\n2) Reservations can be made at least one hour in advance",
        WEEKLY_RESERVATION_LIMIT
    );
}

fn print_warnings(warnings: &[RangeWarning]) {
    for warning in warnings {
        println!("{warning}");
    }
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

struct Session<R: BufRead> {
    store: ScheduleStore,
    config: BookingConfig,
    input: R,
}

impl<R: BufRead> Session<R> {
    /// Prints `prompt` and reads one trimmed line; `None` at end of input.
    fn ask(&mut self, prompt: &str) -> Option<String> {
        println!("{prompt}");
        print!("  $ ");
        let _ = io::stdout().flush();
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_string()),
        }
    }

    fn load(&mut self) {
        let dir = self.config.data_dir.clone();
        if !dir.is_dir() {
            log::warn!("data directory {} does not exist", dir.display());
            return;
        }
        match load_directory(&mut self.store, &dir) {
            Ok(report) => {
                for path in &report.files_found {
                    println!("Found: {}", path.display());
                }
                for (path, err) in &report.failed {
                    println!("{} upload failed ({err})", path.display());
                }
            }
            Err(err) => println!("! Could not read {}: {err}", dir.display()),
        }
    }

    fn backup(&self) {
        match make_backup(&self.store, &self.config.backup_path) {
            Ok(()) => println!("Schedule backed up to {}", self.config.backup_path.display()),
            Err(err) => println!("! Backup failed: {err}"),
        }
    }

    fn run(&mut self) {
        loop {
            print_menu();
            let Some(choice) = self.ask("") else {
                break;
            };
            match choice.as_str() {
                "1" => self.make_reservation(),
                "2" => self.cancel_reservation(),
                "3" => self.print_schedule(),
                "4" => self.save_schedule(),
                "5" => break,
                _ => println!("{WRONG_ANSWER_BANNER}"),
            }
        }
        self.backup();
    }

    fn read_name(&mut self) -> Option<String> {
        let raw = self.ask("Enter your fullname:")?;
        match booking::validate_name(&raw) {
            Ok(name) => Some(name),
            Err(err) => {
                println!("! {err} !");
                None
            }
        }
    }

    fn read_booking_time(&mut self) -> Option<NaiveDateTime> {
        let raw = self.ask("Enter date as {DD.MM.YYYY HH:MM}:")?;
        match booking::parse_booking_time(&raw, now()) {
            Ok(date) => Some(date),
            Err(err) => {
                println!("! {err} !");
                None
            }
        }
    }

    fn make_reservation(&mut self) {
        let Some(name) = self.read_name() else {
            return;
        };
        print_rules();
        let Some(requested) = self.read_booking_time() else {
            return;
        };
        let availability = match booking::check_slot(&self.store, requested) {
            Ok(availability) => availability,
            Err(err) => {
                println!("! {err} !");
                return;
            }
        };

        let mut start = requested;
        if availability.start != requested {
            let prompt = format!(
                "The time you chose is unavailable, would you like to make a reservation for {} instead? (yes/no)",
                format_date_time(availability.start)
            );
            let Some(answer) = self.ask(&prompt) else {
                return;
            };
            match answer.to_lowercase().as_str() {
                "yes" => start = availability.start,
                "no" => {
                    println!("No reservation was made.");
                    return;
                }
                _ => {
                    println!("{WRONG_ANSWER_BANNER}");
                    return;
                }
            }
        }

        if self.store.too_many_reservation(&name, start) {
            println!("! You have exceeded your booking limit for this week !");
            return;
        }

        let options = BookingDuration::allowed_for(availability.tier)
            .iter()
            .enumerate()
            .map(|(idx, duration)| format!("{}){duration}", idx + 1))
            .collect::<Vec<_>>()
            .join("\n");
        let Some(answer) = self.ask(&format!("How long would you like to book court?\n{options}"))
        else {
            return;
        };
        let Some(duration) = BookingDuration::from_choice(&answer) else {
            println!("{WRONG_ANSWER_BANNER}");
            return;
        };
        match booking::book(&mut self.store, &name, start, availability.tier, duration) {
            Ok(record) => println!("Booking successful! {record}"),
            Err(err) => println!("! {err} !"),
        }
    }

    fn cancel_reservation(&mut self) {
        println!("Please note that reservations can be canceled up to one hour in advance");
        let Some(name) = self.read_name() else {
            return;
        };
        let Some(start) = self.read_booking_time() else {
            return;
        };
        if self.store.reservation_exists(&name, start).is_none() {
            println!("! There is no reservation for you on this date !");
            return;
        }
        let Some(answer) = self.ask("Are you sure? (yes/no)") else {
            return;
        };
        match answer.to_lowercase().as_str() {
            "yes" => match booking::cancel(&mut self.store, &name, start, now()) {
                Ok(_) => println!("Reservations have been cancelled!"),
                Err(err) => println!("! {err} !"),
            },
            "no" => {}
            _ => println!("{WRONG_ANSWER_BANNER}"),
        }
    }

    fn read_date_range(&mut self) -> Option<(chrono::NaiveDate, chrono::NaiveDate)> {
        let start = self.ask("Enter the start date as {DD.MM.YYYY}")?;
        let end = self.ask("Enter the end date as {DD.MM.YYYY}")?;
        match booking::parse_date_range(&start, &end) {
            Ok(range) => Some(range),
            Err(err) => {
                println!("! {err} !");
                None
            }
        }
    }

    fn print_schedule(&mut self) {
        if self.store.is_empty() {
            println!("! Schedule is empty !");
            return;
        }
        let Some((start, end)) = self.read_date_range() else {
            return;
        };
        let listing = self
            .store
            .print_schedule_output(start, end, now().date());
        print!("{listing}");
    }

    fn save_schedule(&mut self) {
        if self.store.is_empty() {
            println!("! Schedule is empty !");
            return;
        }
        let Some((start, end)) = self.read_date_range() else {
            return;
        };
        let Some(filename) = self.ask("Enter a file name:") else {
            return;
        };
        if filename.is_empty() {
            println!("{WRONG_ANSWER_BANNER}");
            return;
        }
        let Some(format) = self.ask("Save file as:\n1)csv\n2)json?") else {
            return;
        };
        let (path, result) = match format.as_str() {
            "1" => {
                let path = format!("{filename}.csv");
                let result = save_csv(&self.store, start, end, &path);
                (path, result)
            }
            "2" => {
                let path = format!("{filename}.json");
                let result = save_json(&self.store, start, end, &path);
                (path, result)
            }
            _ => {
                println!("{WRONG_ANSWER_BANNER}");
                return;
            }
        };
        match result {
            Ok(warnings) => {
                print_warnings(&warnings);
                println!("Schedule saved to {path}");
            }
            Err(err) => println!("! Could not save {path}: {err}"),
        }
    }
}

fn main() {
    let config = BookingConfig::from_env();
    logger::init(&config);

    let stdin = io::stdin();
    let mut session = Session {
        store: ScheduleStore::new(),
        config,
        input: stdin.lock(),
    };
    session.load();
    session.run();
}
