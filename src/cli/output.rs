use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;

use crate::agent::AgentStep;

static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("valid regex"));
static ITALIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*(.*?)\*").expect("valid regex"));
static HEADER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^#{1,6}\s+").expect("valid regex"));
static CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`(.*?)`").expect("valid regex"));
static LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[(.*?)\]\(.*?\)").expect("valid regex"));

/// Removes markdown emphasis, headers, inline code and links.
pub fn strip_markdown(text: &str) -> String {
    let text = BOLD.replace_all(text, "$1");
    let text = ITALIC.replace_all(&text, "$1");
    let text = HEADER.replace_all(&text, "");
    let text = CODE.replace_all(&text, "$1");
    LINK.replace_all(&text, "$1").into_owned()
}

/// Strips markdown and highlights the `key:` part of each line.
///
/// Lines starting with `http` are left alone.
pub fn format_output(text: &str) -> String {
    strip_markdown(text)
        .lines()
        .map(|line| match line.split_once(':') {
            Some((key, rest)) if !line.trim_start().starts_with("http") => {
                format!("{}{}", style(format!("{}:", key)).cyan().bold(), rest)
            }
            _ => line.to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Terminal output for the conversation loop.
pub struct Output;

impl Output {
    pub fn starting() {
        println!("{}", style("🎬 Запуск AI Агента-Киноэксперта...").green().bold());
    }

    pub fn ready() {
        println!(
            "{}\n",
            style("✅ Агент готов! Задавайте вопросы о фильмах (или 'выход' для завершения)")
                .green()
                .bold()
        );
    }

    pub fn prompt() -> String {
        format!("{} ", style("Вы:").yellow().bold())
    }

    pub fn farewell() {
        println!("\n{}", style("👋 До встречи!").blue().bold());
    }

    pub fn init_error(msg: &str) {
        eprintln!("{}", style(format!("❌ Ошибка инициализации агента: {}", msg)).red().bold());
    }

    pub fn error(msg: &str) {
        eprintln!("{}\n", style(format!("❌ Ошибка: {}", msg)).red().bold());
    }

    /// Prints the answer with markdown stripped and keys highlighted.
    pub fn reply(text: &str) {
        println!("{}", style("── Агент ──").green().bold());
        println!("{}", format_output(text));
        println!("{}\n", style("───────────").green());
    }

    /// Prints the answer untouched.
    pub fn raw_reply(text: &str) {
        println!("\n{} {}\n", style("Агент:").green().bold(), text);
    }

    pub fn steps(steps: &[AgentStep]) {
        for step in steps {
            let marker = if step.is_error {
                style("✗").red()
            } else {
                style("→").cyan()
            };
            println!("{} {}({})", marker, style(&step.tool).bold(), step.arguments);
            println!("{}", style(&step.output).dim());
        }
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(spinner_style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_markdown() {
        let text = "### Итог\n**Heat** - *лучший* фильм, см. `tt0113277` и [IMDb](https://imdb.com/title/tt0113277)";
        assert_eq!(
            strip_markdown(text),
            "Итог\nHeat - лучший фильм, см. tt0113277 и IMDb"
        );
    }

    #[test]
    fn test_format_output_keeps_text() {
        let formatted = format_output("**Название:** Heat\nhttps://imdb.com: link\nпросто строка");
        assert_eq!(
            console::strip_ansi_codes(&formatted),
            "Название: Heat\nhttps://imdb.com: link\nпросто строка"
        );
    }
}
