//! Session commands for editing the saved working period.
//!
//! The period lives in a JSON file between invocations. Every `set` runs one
//! reconciliation step, so typing a total after a start fills in the end
//! (and its date) the same way an interactive form would.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};
use clap::Subcommand;
use serde::Serialize;
use wp_core::{ClockTime, Field, Format, Session, reconcile};

use crate::Config;

/// Session subcommands.
#[derive(Debug, Subcommand)]
pub enum SessionAction {
    /// Show the saved period.
    Show {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Commit a typed value to one field and recompute the others.
    Set {
        /// `start`, `end` or `total`.
        field: Field,

        /// Text as typed; an empty string clears the field.
        #[arg(allow_hyphen_values = true)]
        raw: String,

        /// Current time to use when a total is entered with no endpoints.
        #[arg(long)]
        now: Option<ClockTime>,
    },

    /// Switch the total between `time` and `decimal`.
    Format { format: Format },

    /// Move the start date; the end date keeps its distance.
    Date { date: NaiveDate },

    /// Start over with an empty period.
    Reset {
        /// Date of the new period (defaults to today).
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Print the finished period, failing while any field is missing or invalid.
    Submit,
}

/// A finished period as handed on for recording.
#[derive(Debug, Serialize)]
struct Submission<'a> {
    start_date: NaiveDate,
    start_time: &'a str,
    end_date: NaiveDate,
    end_time: &'a str,
    total: &'a str,
    format: Format,
}

pub fn run<W: Write>(writer: &mut W, action: &SessionAction, config: &Config) -> Result<()> {
    let now = Local::now();
    run_at(
        writer,
        action,
        config,
        now.date_naive(),
        ClockTime::from_wall_clock(&now),
    )
}

/// Runs a session action with an explicit "today" and "now".
pub fn run_at<W: Write>(
    writer: &mut W,
    action: &SessionAction,
    config: &Config,
    today: NaiveDate,
    now: ClockTime,
) -> Result<()> {
    let path = &config.session_path;

    match action {
        SessionAction::Show { json } => {
            let session = load(path, today, config.format)?;
            if *json {
                writeln!(writer, "{}", serde_json::to_string_pretty(&session)?)?;
            } else {
                render(writer, &session)?;
            }
        }
        SessionAction::Set {
            field,
            raw,
            now: now_override,
        } => {
            let session = load(path, today, config.format)?;
            let next = reconcile(&session, *field, raw, now_override.unwrap_or(now));
            save(path, &next)?;
            render(writer, &next)?;
        }
        SessionAction::Format { format } => {
            let mut session = load(path, today, config.format)?;
            session.set_format(*format);
            save(path, &session)?;
            render(writer, &session)?;
        }
        SessionAction::Date { date } => {
            let mut session = load(path, today, config.format)?;
            session.set_start_date(*date);
            save(path, &session)?;
            render(writer, &session)?;
        }
        SessionAction::Reset { date } => {
            let session = Session::new(date.unwrap_or(today), config.format);
            save(path, &session)?;
            render(writer, &session)?;
        }
        SessionAction::Submit => {
            let session = load(path, today, config.format)?;
            submit(writer, &session)?;
        }
    }

    Ok(())
}

fn submit<W: Write>(writer: &mut W, session: &Session) -> Result<()> {
    if !session.is_submittable() {
        let blocking: Vec<String> = Field::ALL
            .iter()
            .filter_map(|&field| {
                let state = session.field(field);
                if !state.is_valid() {
                    Some(format!("{field} is invalid"))
                } else if state.is_empty() {
                    Some(format!("{field} is empty"))
                } else {
                    None
                }
            })
            .collect();
        bail!("cannot submit: {}", blocking.join(", "));
    }

    let submission = Submission {
        start_date: session.start_date,
        start_time: &session.start.value,
        end_date: session.end_date,
        end_time: &session.end.value,
        total: &session.total.value,
        format: session.format,
    };
    writeln!(writer, "{}", serde_json::to_string_pretty(&submission)?)?;
    Ok(())
}

fn render<W: Write>(writer: &mut W, session: &Session) -> Result<()> {
    for field in Field::ALL {
        let state = session.field(field);
        let shown = match (&state.rejected, state.is_empty()) {
            (Some(rejected), _) => rejected.as_str(),
            (None, true) => "--",
            (None, false) => state.value.as_str(),
        };
        let context = match field {
            Field::Start => format!("({})", session.start_date),
            Field::End => format!("({})", session.end_date),
            Field::Total => format!("[{}]", session.format),
        };
        let label = format!("{field}:");

        write!(writer, "{label:<6} {shown} {context}")?;
        if !state.is_valid() {
            write!(writer, " invalid, use {}", expected_spelling(field, session.format))?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

const fn expected_spelling(field: Field, format: Format) -> &'static str {
    match (field, format) {
        (Field::Total, Format::Decimal) => "h,mm",
        _ => "hh:mm",
    }
}

/// Loads the saved session, or a new empty one if none has been saved.
fn load(path: &Path, today: NaiveDate, format: Format) -> Result<Session> {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no saved session, starting a new one");
            Ok(Session::new(today, format))
        }
        Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
    }
}

fn save(path: &Path, session: &Session) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).context("failed to create session directory")?;
    }
    let content = serde_json::to_string_pretty(session)?;
    std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;

    struct Fixture {
        _temp: tempfile::TempDir,
        config: Config,
    }

    impl Fixture {
        fn new(format: Format) -> Self {
            let temp = tempfile::tempdir().unwrap();
            let config = Config {
                session_path: temp.path().join("nested").join("session.json"),
                format,
            };
            Self {
                _temp: temp,
                config,
            }
        }

        fn run(&self, action: &SessionAction) -> Result<String> {
            let today = NaiveDate::from_ymd_opt(2023, 4, 20).unwrap();
            let now = ClockTime::new(12, 34).unwrap();
            let mut output = Vec::new();
            run_at(&mut output, action, &self.config, today, now)?;
            Ok(String::from_utf8(output)?)
        }

        fn set(&self, field: Field, raw: &str) -> String {
            self.run(&SessionAction::Set {
                field,
                raw: raw.to_string(),
                now: None,
            })
            .unwrap()
        }
    }

    #[test]
    fn show_new_session() {
        let fixture = Fixture::new(Format::Time);
        let output = fixture.run(&SessionAction::Show { json: false }).unwrap();
        assert_snapshot!(output.trim_end(), @r"
        start: -- (2023-04-20)
        end:   -- (2023-04-20)
        total: -- [time]
        ");
    }

    #[test]
    fn total_after_start_rolls_end_into_next_day() {
        let fixture = Fixture::new(Format::Time);
        fixture.set(Field::Start, "2300");
        let output = fixture.set(Field::Total, "2:00");
        assert_snapshot!(output.trim_end(), @r"
        start: 23:00 (2023-04-20)
        end:   01:00 (2023-04-21)
        total: 02:00 [time]
        ");
    }

    #[test]
    fn malformed_value_is_flagged() {
        let fixture = Fixture::new(Format::Decimal);
        fixture.set(Field::Start, "9");
        let output = fixture.set(Field::Total, "9:30");
        assert_snapshot!(output.trim_end(), @r"
        start: 00:09 (2023-04-20)
        end:   -- (2023-04-20)
        total: 9:30 [decimal] invalid, use h,mm
        ");
    }

    #[test]
    fn total_alone_uses_now() {
        let fixture = Fixture::new(Format::Time);
        let output = fixture
            .run(&SessionAction::Set {
                field: Field::Total,
                raw: "130".to_string(),
                now: Some(ClockTime::new(8, 0).unwrap()),
            })
            .unwrap();
        assert_snapshot!(output.trim_end(), @r"
        start: 06:30 (2023-04-20)
        end:   08:00 (2023-04-20)
        total: 01:30 [time]
        ");
    }

    #[test]
    fn submit_prints_finished_period() {
        let fixture = Fixture::new(Format::Decimal);
        fixture.set(Field::Start, "1000");
        fixture.set(Field::End, "1945");
        let output = fixture.run(&SessionAction::Submit).unwrap();
        assert_snapshot!(output.trim_end(), @r#"
        {
          "start_date": "2023-04-20",
          "start_time": "10:00",
          "end_date": "2023-04-20",
          "end_time": "19:45",
          "total": "9,75",
          "format": "decimal"
        }
        "#);
    }

    #[test]
    fn submit_refuses_incomplete_period() {
        let fixture = Fixture::new(Format::Time);
        fixture.set(Field::Start, "2500");
        let err = fixture.run(&SessionAction::Submit).unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot submit: start is invalid, end is empty, total is empty"
        );
    }

    #[test]
    fn date_moves_both_anchors() {
        let fixture = Fixture::new(Format::Time);
        fixture.set(Field::Start, "22:00");
        fixture.set(Field::Total, "3:00");
        let date = NaiveDate::from_ymd_opt(2023, 5, 1).unwrap();
        let output = fixture.run(&SessionAction::Date { date }).unwrap();
        assert_snapshot!(output.trim_end(), @r"
        start: 22:00 (2023-05-01)
        end:   01:00 (2023-05-02)
        total: 03:00 [time]
        ");
    }

    #[test]
    fn reset_discards_saved_values() {
        let fixture = Fixture::new(Format::Time);
        fixture.set(Field::Start, "9");
        let date = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
        fixture
            .run(&SessionAction::Reset { date: Some(date) })
            .unwrap();

        let session = load(&fixture.config.session_path, date, Format::Time).unwrap();
        assert_eq!(session, Session::new(date, Format::Time));
    }

    #[test]
    fn format_switch_applies_to_next_total() {
        let fixture = Fixture::new(Format::Time);
        fixture.set(Field::Start, "10:00");
        fixture
            .run(&SessionAction::Format {
                format: Format::Decimal,
            })
            .unwrap();
        let output = fixture.set(Field::End, "12:15");
        assert!(output.contains("total: 2,25 [decimal]"));
    }

    #[test]
    fn load_rejects_corrupt_file() {
        let fixture = Fixture::new(Format::Time);
        let path = &fixture.config.session_path;
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "not json").unwrap();

        let err = fixture.run(&SessionAction::Show { json: false }).unwrap_err();
        assert!(err.to_string().starts_with("failed to parse"));
    }
}
