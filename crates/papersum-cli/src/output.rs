use std::io::Write;

use owo_colors::OwoColorize;
use papersum_core::{ModelInfo, Paper, SlotState, SummarySlot};

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print a pass/fail line with a check or cross mark.
pub fn print_check(
    w: &mut dyn Write,
    ok: bool,
    message: &str,
    color: ColorMode,
) -> std::io::Result<()> {
    match (ok, color.enabled()) {
        (true, true) => writeln!(w, "{} {}", "\u{2713}".green(), message),
        (true, false) => writeln!(w, "OK   {}", message),
        (false, true) => writeln!(w, "{} {}", "\u{2717}".red(), message.red()),
        (false, false) => writeln!(w, "FAIL {}", message),
    }
}

/// Print one search result as a numbered card. `index` is zero-based.
pub fn print_paper(
    w: &mut dyn Write,
    index: usize,
    paper: &Paper,
    color: ColorMode,
) -> std::io::Result<()> {
    let date = paper.published.format("%Y-%m-%d");
    if color.enabled() {
        writeln!(w, "[{}] {}", index, paper.title.bold())?;
        writeln!(w, "    {}", paper.authors.join(", ").cyan())?;
        writeln!(
            w,
            "    {}  {}",
            date.dimmed(),
            paper.categories.join(" ").dimmed()
        )?;
    } else {
        writeln!(w, "[{}] {}", index, paper.title)?;
        writeln!(w, "    {}", paper.authors.join(", "))?;
        writeln!(w, "    {}  {}", date, paper.categories.join(" "))?;
    }
    if let Some(url) = &paper.pdf_url {
        writeln!(w, "    {}", url)?;
    }
    Ok(())
}

/// Print a finished batch slot: header with state, then the summary or error.
pub fn print_slot(w: &mut dyn Write, slot: &SummarySlot, color: ColorMode) -> std::io::Result<()> {
    let header = format!("#{} {}", slot.position + 1, slot.title);
    match &slot.state {
        SlotState::Done(text) => {
            if color.enabled() {
                writeln!(w, "{} {}", "DONE".green().bold(), header.bold())?;
            } else {
                writeln!(w, "DONE {}", header)?;
            }
            for line in text.lines() {
                writeln!(w, "  {}", line)?;
            }
        }
        SlotState::Failed(error) => {
            if color.enabled() {
                writeln!(w, "{} {}", "FAILED".red().bold(), header.bold())?;
                writeln!(w, "  {}", error.red())?;
            } else {
                writeln!(w, "FAILED {}", header)?;
                writeln!(w, "  {}", error)?;
            }
        }
        SlotState::Pending => {
            writeln!(w, "PENDING {}", header)?;
        }
    }
    writeln!(w)?;
    Ok(())
}

/// Print the active model and the server's model lists.
pub fn print_model_info(
    w: &mut dyn Write,
    info: &ModelInfo,
    color: ColorMode,
) -> std::io::Result<()> {
    let current = info.current().display_name();
    if color.enabled() {
        writeln!(w, "Current model: {}", current.bold())?;
    } else {
        writeln!(w, "Current model: {}", current)?;
    }
    if info.available_models.is_empty() {
        writeln!(w, "Available models: (not reported)")?;
    } else {
        writeln!(w, "Available models:")?;
        for (model_type, names) in &info.available_models {
            writeln!(w, "  {}: {}", model_type, names.join(", "))?;
        }
    }
    Ok(())
}

/// Final batch tally.
pub fn print_batch_summary(
    w: &mut dyn Write,
    total: usize,
    failed: usize,
    color: ColorMode,
) -> std::io::Result<()> {
    let line = format!("{} summarized, {} failed", total - failed, failed);
    if color.enabled() && failed > 0 {
        writeln!(w, "{}", line.yellow())
    } else if color.enabled() {
        writeln!(w, "{}", line.green())
    } else {
        writeln!(w, "{}", line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn render(f: impl FnOnce(&mut dyn Write) -> std::io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn paper_card_plain() {
        let paper = Paper {
            id: "x".into(),
            title: "Attention Is All You Need".into(),
            authors: vec!["A. Vaswani".into(), "N. Shazeer".into()],
            abstract_text: String::new(),
            pdf_url: Some("http://arxiv.org/pdf/1706.03762".into()),
            published: Utc.with_ymd_and_hms(2017, 6, 12, 17, 0, 0).unwrap(),
            categories: vec!["cs.CL".into(), "cs.LG".into()],
        };
        let out = render(|w| print_paper(w, 2, &paper, ColorMode(false)));
        assert_eq!(
            out,
            "[2] Attention Is All You Need\n    A. Vaswani, N. Shazeer\n    2017-06-12  cs.CL cs.LG\n    http://arxiv.org/pdf/1706.03762\n"
        );
    }

    #[test]
    fn failed_slot_shows_error() {
        let slot = SummarySlot {
            position: 1,
            paper_id: "p".into(),
            title: "Some paper".into(),
            state: SlotState::Failed("rate limited".into()),
        };
        let out = render(|w| print_slot(w, &slot, ColorMode(false)));
        assert_eq!(out, "FAILED #2 Some paper\n  rate limited\n\n");
    }

    #[test]
    fn check_lines_plain() {
        let out = render(|w| print_check(w, false, "health", ColorMode(false)));
        assert_eq!(out, "FAIL health\n");
    }

    #[test]
    fn batch_tally() {
        let out = render(|w| print_batch_summary(w, 3, 1, ColorMode(false)));
        assert_eq!(out, "2 summarized, 1 failed\n");
    }
}
