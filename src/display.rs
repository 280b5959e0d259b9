use console::{measure_text_width, style};
use std::net::SocketAddr;

/// Print the orchestrator's answer for one turn
pub fn display_reply(reply: &str) {
    println!("\n{}", style("Response:").bold().blue());

    if looks_like_markdown(reply) {
        display_markdown(reply);
    } else {
        display_response(reply);
    }
}

fn looks_like_markdown(text: &str) -> bool {
    text.contains("```") || text.contains('*') || text.contains('`') || text.contains('#')
}

pub fn display_markdown(text: &str) {
    let skin = termimad::MadSkin::default();
    skin.print_text(text);
}

/// Display a reply in a box sized to the terminal
pub fn display_response(response: &str) {
    let term = console::Term::stdout();
    let terminal_width = term.size().1 as usize;
    let max_width = std::cmp::min(terminal_width.saturating_sub(4), 120).max(60);
    let max_line_len = max_width.saturating_sub(4);

    let wrapped_lines: Vec<String> = response
        .lines()
        .flat_map(|line| wrap_line(line, max_line_len))
        .collect();

    let content_max_len = wrapped_lines
        .iter()
        .map(|line| measure_text_width(line))
        .max()
        .unwrap_or(0);
    let box_width = std::cmp::min(max_width, content_max_len + 4);

    let top_border = "┌".to_string() + &"─".repeat(box_width - 2) + "┐";
    let bottom_border = "└".to_string() + &"─".repeat(box_width - 2) + "┘";

    println!("{}", style(&top_border).dim().blue());
    for line in wrapped_lines {
        let padding = box_width.saturating_sub(measure_text_width(&line) + 3);
        println!("│ {}{}│", style(&line).bold().white(), " ".repeat(padding));
    }
    println!("{}", style(&bottom_border).dim().blue());
}

/// Break `line` at spaces so no piece is wider than `max_len` columns.
fn wrap_line(line: &str, max_len: usize) -> Vec<String> {
    if line.is_empty() {
        return vec![String::new()];
    }
    let max_len = max_len.max(1);

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in line.split(' ') {
        let candidate_len = if current.is_empty() {
            measure_text_width(word)
        } else {
            measure_text_width(&current) + 1 + measure_text_width(word)
        };

        if candidate_len > max_len && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);

        // a single word wider than the box gets hard-split
        while measure_text_width(&current) > max_len {
            let split_at = current
                .char_indices()
                .nth(max_len)
                .map(|(i, _)| i)
                .unwrap_or(current.len());
            let rest = current.split_off(split_at);
            lines.push(std::mem::replace(&mut current, rest));
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

pub fn display_welcome() {
    println!(
        "{} {}",
        style("dchat").bold().magenta(),
        style("ask anything, or ask for a picture").dim()
    );
}

pub fn display_web_banner(addr: &SocketAddr) {
    println!(
        "{} {}",
        style("🌐 Chat page running on").bold().green(),
        style(format!("http://{}", addr)).bold().cyan()
    );
}

pub fn display_goodbye() {
    println!("{}", style("Goodbye.").dim());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_at_word_boundaries() {
        assert_eq!(
            wrap_line("the quick brown fox jumps", 10),
            vec!["the quick", "brown fox", "jumps"]
        );
    }

    #[test]
    fn hard_splits_long_words() {
        assert_eq!(wrap_line("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn keeps_blank_lines() {
        assert_eq!(wrap_line("", 10), vec![String::new()]);
    }

    #[test]
    fn markdown_detection() {
        assert!(looks_like_markdown("# Title"));
        assert!(looks_like_markdown("use `cargo`"));
        assert!(!looks_like_markdown("Image URL: https://example.com/a.png"));
    }
}
