use colored::*;
use console::Term;

use crate::terminal::colors;

pub const TOTAL_WIDTH: usize = 64;
const REPORT_SEPARATOR: &str = "----- -----";
const PAGE_PROMPT: &str = "==>";
/// Rows kept free below a page for the prompt.
const PAGE_MARGIN: usize = 2;

pub fn print(msg: &str) {
    println!("{msg}");
}

pub fn header(msg: &str) {
    let formatted: String = format!("⟦ {} ⟧", msg);
    let msg_len: usize = formatted.chars().count();

    let dash_count: usize = TOTAL_WIDTH.saturating_sub(msg_len);
    let left: usize = dash_count / 2;
    let right: usize = dash_count - left;

    let line: ColoredString = format!(
        "{}{}{}",
        "─".repeat(left),
        formatted.to_uppercase().bright_green(),
        "─".repeat(right)
    )
    .bright_black();

    print(&format!("{}", line));
}

pub fn fat_separator() {
    let sep: ColoredString = "═".repeat(TOTAL_WIDTH).color(colors::SEPARATOR);
    print(&format!("{}", sep));
}

pub fn centerln(msg: &str) {
    let space = " ".repeat(TOTAL_WIDTH.saturating_sub(console::measure_text_width(msg)) / 2);
    print(&format!("{}{}{}", space, msg, space));
}

pub fn no_results() {
    print(&format!("{}", "nothing to probe".red().bold()));
}

/// Prints report lines, waiting for Enter after every full page when stdout
/// is a terminal.
pub fn paged(lines: &[String], no_pause: bool) -> anyhow::Result<()> {
    let term = Term::stdout();
    let height = page_height(term.is_term(), term.size().0, no_pause);

    print(REPORT_SEPARATOR);
    for (idx, line) in lines.iter().enumerate() {
        print(line);
        if should_pause(idx + 1, height) {
            term.write_str(PAGE_PROMPT)?;
            term.read_line()?;
        }
    }
    Ok(())
}

pub fn end_of_program(no_pause: bool) -> anyhow::Result<()> {
    fat_separator();
    if !no_pause {
        print("all done, press enter");
        Term::stdout().read_line()?;
    }
    Ok(())
}

/// `None` means the report is never interrupted.
fn page_height(is_term: bool, rows: u16, no_pause: bool) -> Option<usize> {
    if no_pause || !is_term {
        return None;
    }
    Some(usize::from(rows).saturating_sub(PAGE_MARGIN).max(1))
}

fn should_pause(printed: usize, height: Option<usize>) -> bool {
    height.is_some_and(|h| printed % h == 0)
}
