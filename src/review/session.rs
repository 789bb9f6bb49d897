use std::io::{BufRead, Write};

use log::info;
use snafu::prelude::*;

use survey_review::*;

use crate::review::{read_dataset, ConsoleSnafu, RvResult};

const HELP: &str = "\
Commands:
  reviewer <name>   set the active reviewer
  load <path>       replace the dataset
  search [text]     filter the list by name substring
  user [name]       select one respondent name
  filter <value>    All, Approved, Declined or Tentative
  open <n>          open the n-th listed respondent
  status <value>    rate the opened respondent (approved/declined/tentative)
  comment [text]    comment on the opened respondent
  summary           show the cross-reviewer summary table
  back, list        return to the list
  help, quit";

/// Runs the interactive loop: one command per line, applied to completion
/// before the next is read, one render per change notification.
pub fn run_session<R: BufRead, W: Write>(
    controller: &mut ViewController,
    mut input: R,
    mut out: W,
) -> RvResult<()> {
    writeln!(
        out,
        "{} respondents loaded. Type 'help' for the command list.",
        controller.catalog().len()
    )
    .context(ConsoleSnafu {})?;
    render(controller, &mut out).context(ConsoleSnafu {})?;

    let mut line = String::new();
    loop {
        write!(out, "> ").context(ConsoleSnafu {})?;
        out.flush().context(ConsoleSnafu {})?;
        line.clear();
        if input.read_line(&mut line).context(ConsoleSnafu {})? == 0 {
            break;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let (command, arg) = split_command(trimmed);
        if matches!(command.as_str(), "quit" | "exit") {
            break;
        }

        let event = apply_command(controller, &command, arg, &mut out).context(ConsoleSnafu {})?;
        match event {
            ViewEvent::Refreshed => render(controller, &mut out).context(ConsoleSnafu {})?,
            ViewEvent::ReviewerRequired => {
                writeln!(out, "Please enter your name before reviewing.")
                    .context(ConsoleSnafu {})?
            }
            ViewEvent::Unchanged => {}
        }
    }
    info!("run_session: session ended");
    Ok(())
}

fn split_command(line: &str) -> (String, &str) {
    match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head.to_lowercase(), rest.trim()),
        None => (line.to_lowercase(), ""),
    }
}

fn apply_command<W: Write>(
    controller: &mut ViewController,
    command: &str,
    arg: &str,
    out: &mut W,
) -> std::io::Result<ViewEvent> {
    let event = match command {
        "help" => {
            writeln!(out, "{}", HELP)?;
            ViewEvent::Unchanged
        }
        "list" | "back" => {
            controller.back();
            ViewEvent::Refreshed
        }
        "summary" => controller.open_summary(),
        "reviewer" => controller.set_reviewer(arg),
        "search" => controller.set_search(arg),
        "user" => {
            if arg.is_empty() {
                let names = controller.catalog().distinct_identities();
                writeln!(out, "Known respondents: {}", names.join(", "))?;
                controller.select_user(None)
            } else {
                controller.select_user(Some(arg))
            }
        }
        "filter" => match StatusFilter::parse(arg) {
            Some(filter) => controller.set_status_filter(filter),
            None => {
                writeln!(
                    out,
                    "Unknown filter {:?}, expected All, Approved, Declined or Tentative.",
                    arg
                )?;
                ViewEvent::Unchanged
            }
        },
        "open" => match arg.parse::<usize>() {
            Ok(n) if n >= 1 => {
                let visible = controller.visible();
                match visible.get(n - 1) {
                    Some(index) => controller.open_detail(*index),
                    None => {
                        writeln!(out, "No respondent {} in the current list.", n)?;
                        ViewEvent::Unchanged
                    }
                }
            }
            _ => {
                writeln!(out, "Usage: open <number>")?;
                ViewEvent::Unchanged
            }
        },
        "status" => match ReviewStatus::parse(arg) {
            Some(status) => {
                let event = controller.set_status(status);
                if event == ViewEvent::Unchanged {
                    writeln!(out, "Open a respondent before setting a status.")?;
                }
                event
            }
            None => {
                writeln!(
                    out,
                    "Unknown status {:?}, expected approved, declined or tentative.",
                    arg
                )?;
                ViewEvent::Unchanged
            }
        },
        "comment" => {
            let event = controller.set_comment(arg);
            if event == ViewEvent::Unchanged {
                writeln!(out, "Open a respondent before commenting.")?;
            }
            event
        }
        "load" => match read_dataset(arg, None) {
            Ok(records) => controller.load_catalog(records),
            // A failed explicit load keeps the previous catalog on screen.
            Err(e) => {
                writeln!(out, "Could not load {}: {}", arg, e)?;
                ViewEvent::Unchanged
            }
        },
        _ => {
            writeln!(
                out,
                "Unknown command {:?}. Type 'help' for the command list.",
                command
            )?;
            ViewEvent::Unchanged
        }
    };
    Ok(event)
}

fn render<W: Write>(controller: &ViewController, out: &mut W) -> std::io::Result<()> {
    match controller.view() {
        ViewState::List => render_list(controller, out),
        ViewState::Detail(_) => render_detail(controller, out),
        ViewState::Summary => {
            let table = build_summary(controller.catalog(), controller.store());
            render_summary_table(&table, out)
        }
    }
}

fn render_list<W: Write>(controller: &ViewController, out: &mut W) -> std::io::Result<()> {
    let visible = controller.visible();
    writeln!(out)?;
    writeln!(
        out,
        "-- {} of {} respondents (reviewer: {}, search: {:?}, filter: {}) --",
        visible.len(),
        controller.catalog().len(),
        if controller.reviewer().is_empty() {
            "none"
        } else {
            controller.reviewer()
        },
        controller.search_text(),
        controller.status_filter()
    )?;
    for (pos, index) in visible.iter().enumerate() {
        let respondent = match controller.catalog().get(*index) {
            Some(r) => r,
            None => continue,
        };
        let name = match respondent.identity() {
            Some(n) => n.to_string(),
            None => format!("Respondent {}", pos + 1),
        };
        write!(
            out,
            "{:>3}. [{}] {}",
            pos + 1,
            marker(controller.indicator(*index)),
            name
        )?;
        if let Some(record) = controller.own_record(*index) {
            let status = record
                .status
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".to_string());
            write!(out, "  (your rating: {})", status)?;
        }
        writeln!(out)?;
        for (question, answer) in &respondent.answers {
            writeln!(out, "       {}: {}", question, answer)?;
        }
    }
    Ok(())
}

fn render_detail<W: Write>(controller: &ViewController, out: &mut W) -> std::io::Result<()> {
    let respondent = match controller.detail() {
        Some(r) => r,
        None => return Ok(()),
    };
    let identity = respondent.identity_or_unknown();
    writeln!(out)?;
    writeln!(out, "== {} ==", respondent.identity().unwrap_or("(unnamed)"))?;
    for (question, answer) in &respondent.answers {
        writeln!(out, "  {}: {}", question, answer)?;
    }

    let own = controller.store().get(identity, controller.reviewer());
    let own_status = own.and_then(|r| r.status);
    let buttons: Vec<String> = [
        ReviewStatus::Approved,
        ReviewStatus::Declined,
        ReviewStatus::Tentative,
    ]
    .iter()
    .map(|s| {
        if own_status == Some(*s) {
            format!("[{}*]", s)
        } else {
            format!("[{}]", s)
        }
    })
    .collect();
    writeln!(out, "  status: {}", buttons.join(" "))?;
    writeln!(
        out,
        "  comment: {}",
        own.map(|r| r.comment.as_str()).unwrap_or("")
    )?;

    writeln!(out, "  All reviews:")?;
    for entry in controller.store().get_all(identity) {
        let status = entry
            .record
            .status
            .map(|s| s.to_string())
            .unwrap_or_else(|| "No status".to_string());
        writeln!(out, "    {}: {} {}", entry.reviewer, status, entry.record.comment)?;
    }
    Ok(())
}

/// Renders the summary matrix as a text table: one status and one comment
/// column per reviewer, one row per respondent in catalog order.
pub fn render_summary_table<W: Write>(table: &SummaryTable, out: &mut W) -> std::io::Result<()> {
    writeln!(out)?;
    let mut header: Vec<String> = vec!["Name".to_string()];
    for reviewer in &table.reviewers {
        header.push(format!("{} (Status)", reviewer));
        header.push(format!("{} (Comment)", reviewer));
    }
    writeln!(out, "{}", header.join(" | "))?;
    for row in &table.rows {
        let mut cells: Vec<String> = vec![row.name.clone().unwrap_or_default()];
        for cell in &row.cells {
            cells.push(cell.status.map(|s| s.to_string()).unwrap_or_default());
            cells.push(cell.comment.clone());
        }
        writeln!(out, "{}", cells.join(" | "))?;
    }
    Ok(())
}

fn marker(indicator: Indicator) -> char {
    match indicator {
        Indicator::Green => '+',
        Indicator::Red => 'x',
        Indicator::Blue => '~',
        Indicator::Neutral => ' ',
    }
}
