use crate::messages::{ANSWER_DELIMITER, Messages};
use anyhow::{Context, Result};
use console::{Style, Term};
use passgen::{MaxLength, Version};
use rpassword::read_password;
use std::io::{self, BufRead, IsTerminal, Write};
use unicode_normalization::is_nfc;
use zeroize::Zeroizing;

pub const MIN_SAFE_PASSWORD_LENGTH: usize = 12;
pub const MIN_SAFE_COMPONENTS: usize = 2;

pub struct InputInfo {
    pub components: Vec<ComponentInfo>,
}

pub struct ComponentInfo {
    pub index: usize,
    pub byte_length: usize,
    pub char_count: usize,
}

impl InputInfo {
    pub fn from_components<S: AsRef<str>>(components: &[S]) -> Self {
        let components = components
            .iter()
            .enumerate()
            .map(|(index, component)| ComponentInfo {
                index,
                byte_length: component.as_ref().len(),
                char_count: component.as_ref().chars().count(),
            })
            .collect();
        Self { components }
    }
}

pub struct DisplayOptions {
    pub unicode_support: bool,
    pub color_support: bool,
    pub quiet: bool,
}

pub fn detect_unicode_support() -> bool {
    supports_unicode::on(supports_unicode::Stream::Stdout)
}

pub fn detect_color_support() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

pub fn get_status_symbols(unicode_support: bool) -> (&'static str, &'static str) {
    if unicode_support {
        ("✓", "!")
    } else {
        ("+", "!")
    }
}

fn tree_branches(unicode_support: bool) -> (&'static str, &'static str) {
    if unicode_support {
        ("├─", "└─")
    } else {
        ("|-", "`-")
    }
}

fn status_style(secure: bool, options: &DisplayOptions) -> Style {
    if !options.color_support {
        Style::new()
    } else if secure {
        Style::new().green()
    } else {
        Style::new().yellow()
    }
}

fn plural(count: usize, one: &'static str, many: &'static str) -> &'static str {
    if count == 1 { one } else { many }
}

/// Warns about control characters and asks whether to keep the input.
fn validate_control_characters(s: &str, input_name: &str, messages: &Messages) -> Result<()> {
    let control_chars: Vec<usize> = s
        .chars()
        .enumerate()
        .filter(|(_, c)| c.is_control())
        .map(|(pos, _)| pos)
        .collect();

    if control_chars.is_empty() {
        return Ok(());
    }

    let term = Term::stderr();
    term.write_line(&format!(
        "WARNING: {} contains {} control character(s) at position(s): {}",
        input_name,
        control_chars.len(),
        control_chars
            .iter()
            .map(|pos| pos.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    ))?;
    term.write_str("Continue anyway? [y/N]: ")?;
    term.flush()?;

    let response = read_line()?;
    term.clear_last_lines(2)?;

    if !is_confirmation(&response) {
        anyhow::bail!(messages.aborted);
    }

    Ok(())
}

fn warn_if_not_nfc(s: &str, input_name: &str, messages: &Messages) -> Result<()> {
    if !is_nfc(s) {
        Term::stderr().write_line(&format!(
            "WARNING: {} {}",
            input_name, messages.warning_not_nfc
        ))?;
    }
    Ok(())
}

fn check_input(s: &str, input_name: &str, messages: &Messages) -> Result<()> {
    warn_if_not_nfc(s, input_name, messages)?;
    validate_control_characters(s, input_name, messages)
}

/// Checks command-line components the same way prompted ones are checked.
pub fn check_components<S: AsRef<str>>(components: &[S], messages: &Messages) -> Result<()> {
    for (index, component) in components.iter().enumerate() {
        check_input(component.as_ref(), &component_name(index), messages)?;
    }
    Ok(())
}

fn component_name(index: usize) -> String {
    if index == 0 {
        "Website name".to_string()
    } else {
        format!("Answer {}", index)
    }
}

fn strip_line_ending(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}

/// Reads one line without its line ending, `None` at end of input.
fn read_line_from<R: BufRead>(reader: &mut R) -> Result<Option<Zeroizing<String>>> {
    let mut input = Zeroizing::new(String::new());
    let read = reader
        .read_line(&mut input)
        .context("Failed to read from standard input")?;

    if read == 0 {
        return Ok(None);
    }

    let stripped = strip_line_ending(&input).len();
    input.truncate(stripped);
    Ok(Some(input))
}

fn read_line() -> Result<Zeroizing<String>> {
    read_line_from(&mut io::stdin().lock())?.context("Unexpected end of input")
}

/// A missing answer counts as "no".
fn confirm_from<R: BufRead>(reader: &mut R) -> Result<bool> {
    Ok(read_line_from(reader)?.is_some_and(|answer| is_confirmation(&answer)))
}

fn prompt(text: &str) -> Result<Zeroizing<String>> {
    print!("{}", text);
    io::stdout().flush()?;
    read_line()
}

pub fn is_confirmation(answer: &str) -> bool {
    matches!(answer.trim_start().chars().next(), Some('y' | 'Y'))
}

/// Splits one line of answers into components, dropping blank pieces.
pub fn split_answers(line: &str) -> Vec<Zeroizing<String>> {
    line.split(ANSWER_DELIMITER)
        .filter(|answer| !answer.trim().is_empty())
        .map(|answer| Zeroizing::new(answer.to_string()))
        .collect()
}

pub fn prompt_welcome(messages: &Messages) -> Result<()> {
    println!("{}", messages.welcome);
    read_line()?;
    Ok(())
}

pub fn prompt_website_name(messages: &Messages) -> Result<Zeroizing<String>> {
    loop {
        let name = prompt(messages.question_website_name)?;
        if name.trim().is_empty() {
            println!("{}", messages.error_required_answer);
            continue;
        }

        check_input(&name, &component_name(0), messages)?;
        return Ok(name);
    }
}

pub fn prompt_answers(messages: &Messages) -> Result<Vec<Zeroizing<String>>> {
    print!("{}", messages.question_security_questions);
    io::stdout().flush()?;

    let line = if io::stdin().is_terminal() {
        Zeroizing::new(read_password().context("Failed to read security answers")?)
    } else {
        read_line_from(&mut io::stdin().lock())?.unwrap_or_default()
    };
    let answers = split_answers(&line);

    for (i, answer) in answers.iter().enumerate() {
        check_input(answer, &component_name(i + 1), messages)?;
    }

    tracing::debug!(count = answers.len(), "security answers collected");
    Ok(answers)
}

pub fn prompt_max_length(messages: &Messages, fallback: MaxLength) -> Result<MaxLength> {
    loop {
        let input = prompt(messages.question_password_length)?;
        if input.trim().is_empty() {
            return Ok(fallback);
        }

        match input.parse::<MaxLength>() {
            Ok(max_length) => return Ok(max_length),
            Err(e) => {
                tracing::debug!(error = %e, "rejected length");
                println!("{}", messages.error_invalid_integer);
            }
        }
    }
}

pub fn prompt_clipboard(messages: &Messages) -> Result<bool> {
    print!("{}", messages.clipboard);
    io::stdout().flush()?;

    let confirmed = confirm_from(&mut io::stdin().lock())?;
    tracing::debug!(confirmed, "clipboard prompt answered");
    Ok(confirmed)
}

pub fn display_output(
    password: &Zeroizing<String>,
    input_info: &InputInfo,
    version: Version,
    max_length: MaxLength,
    options: &DisplayOptions,
    messages: &Messages,
) {
    if options.quiet {
        println!("{}", &**password);
        return;
    }

    println!("{} {}\n", messages.result, &**password);

    let alphabet_size = version.alphabet().len();
    let keyspace_bits = password.len() as f64 * (alphabet_size as f64).log2();

    display_settings(input_info, version, max_length, options);
    display_stats(keyspace_bits, password.len(), alphabet_size, options);
}

fn display_settings(
    input_info: &InputInfo,
    version: Version,
    max_length: MaxLength,
    options: &DisplayOptions,
) {
    let (check_ok, check_warn) = get_status_symbols(options.unicode_support);
    let (branch, last) = tree_branches(options.unicode_support);
    let pipe = if options.unicode_support { "│" } else { "|" };

    let components_secure = input_info.components.len() >= MIN_SAFE_COMPONENTS;
    let components_style = status_style(components_secure, options);
    let components_status = if components_secure {
        check_ok
    } else {
        check_warn
    };

    println!("Settings:");
    println!("  {} Algorithm  {} ({})", branch, version, version.digest_name());
    println!(
        "  {} Inputs     {} {} {}",
        branch,
        components_style.apply_to(format!("[{}]", components_status)),
        components_style.apply_to(input_info.components.len()),
        plural(input_info.components.len(), "component", "components")
    );

    for (i, component) in input_info.components.iter().enumerate() {
        let prefix = if i == input_info.components.len() - 1 {
            last
        } else {
            branch
        };
        println!(
            "  {}  {} In [{}]: {} {} ({} {})",
            pipe,
            prefix,
            component.index,
            component.byte_length,
            plural(component.byte_length, "byte", "bytes"),
            component.char_count,
            plural(component.char_count, "char", "chars")
        );
    }

    println!(
        "  {} Maximum    {} {}",
        last,
        max_length,
        plural(max_length.get(), "char", "chars")
    );
    println!();
}

/// Describes the output keyspace without rating it; the inputs bound the real strength.
fn keyspace_summary(keyspace_bits: f64) -> String {
    format!(
        "{:.1} bits of output; strength is bounded by how guessable the inputs are",
        keyspace_bits
    )
}

fn display_stats(keyspace_bits: f64, length: usize, alphabet_size: usize, options: &DisplayOptions) {
    let (check_ok, check_warn) = get_status_symbols(options.unicode_support);
    let (branch, last) = tree_branches(options.unicode_support);

    let length_secure = length >= MIN_SAFE_PASSWORD_LENGTH;
    let length_style = status_style(length_secure, options);
    let length_status = if length_secure { check_ok } else { check_warn };

    println!("Stats:");
    println!(
        "  {} Length     {} {} {}",
        branch,
        length_style.apply_to(format!("[{}]", length_status)),
        length_style.apply_to(length),
        plural(length, "char", "chars")
    );
    println!("  {} Charset    {} chars", branch, alphabet_size);
    println!("  {} Keyspace   {}", last, keyspace_summary(keyspace_bits));
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_status_symbols_unicode() {
        let (ok, warn) = get_status_symbols(true);
        assert_eq!(ok, "✓");
        assert_eq!(warn, "!");
    }

    #[test]
    fn test_get_status_symbols_ascii() {
        let (ok, warn) = get_status_symbols(false);
        assert_eq!(ok, "+");
        assert_eq!(warn, "!");
    }

    #[test]
    fn test_split_answers() {
        let answers = split_answers("Fluffy&Springfield");
        assert_eq!(answers.len(), 2);
        assert_eq!(answers[0].as_str(), "Fluffy");
        assert_eq!(answers[1].as_str(), "Springfield");
    }

    #[test]
    fn test_split_answers_keeps_text_verbatim() {
        let answers = split_answers(" Fluffy & New York ");
        assert_eq!(answers[0].as_str(), " Fluffy ");
        assert_eq!(answers[1].as_str(), " New York ");
    }

    #[test]
    fn test_split_answers_drops_blank_pieces() {
        assert!(split_answers("").is_empty());
        assert!(split_answers("   ").is_empty());
        assert!(split_answers("&&").is_empty());

        let answers = split_answers("a&&  &b&");
        assert_eq!(answers.len(), 2);
        assert_eq!(answers[0].as_str(), "a");
        assert_eq!(answers[1].as_str(), "b");
    }

    #[test]
    fn test_is_confirmation() {
        for answer in ["y", "Y", "yes", "Yes", "  y", "yep"] {
            assert!(is_confirmation(answer), "{:?} should confirm", answer);
        }
        for answer in ["", "n", "no", "N", " ", "maybe", "sí"] {
            assert!(!is_confirmation(answer), "{:?} should not confirm", answer);
        }
    }

    #[test]
    fn test_keyspace_summary_has_no_rating() {
        let summary = keyspace_summary(15.0 * 76f64.log2());
        assert!(summary.starts_with("93.7 bits of output"), "{}", summary);
        assert!(summary.contains("inputs"));
        for rating in ["Strong", "Good", "Weak"] {
            assert!(!summary.contains(rating), "{}", summary);
        }
    }

    #[test]
    fn test_read_line_from() {
        let mut input = io::Cursor::new("site\r\n  answer \nlast");
        assert_eq!(read_line_from(&mut input).unwrap().unwrap().as_str(), "site");
        assert_eq!(read_line_from(&mut input).unwrap().unwrap().as_str(), "  answer ");
        assert_eq!(read_line_from(&mut input).unwrap().unwrap().as_str(), "last");
        assert!(read_line_from(&mut input).unwrap().is_none());
    }

    #[test]
    fn test_confirm_from_end_of_input_is_no() {
        assert!(!confirm_from(&mut io::Cursor::new("")).unwrap());
        assert!(!confirm_from(&mut io::Cursor::new("\n")).unwrap());
        assert!(!confirm_from(&mut io::Cursor::new("n\n")).unwrap());
        assert!(confirm_from(&mut io::Cursor::new("y\n")).unwrap());
        assert!(confirm_from(&mut io::Cursor::new("Yes")).unwrap());
    }

    #[test]
    fn test_strip_line_ending() {
        assert_eq!(strip_line_ending("site\n"), "site");
        assert_eq!(strip_line_ending("site\r\n"), "site");
        assert_eq!(strip_line_ending(" site \n"), " site ");
        assert_eq!(strip_line_ending("site"), "site");
    }

    #[test]
    fn test_component_name() {
        assert_eq!(component_name(0), "Website name");
        assert_eq!(component_name(1), "Answer 1");
        assert_eq!(component_name(3), "Answer 3");
    }

    #[test]
    fn test_input_info_counts() {
        let info = InputInfo::from_components(&["example.com", "жизнь", "🔐"]);
        assert_eq!(info.components.len(), 3);

        assert_eq!(info.components[0].byte_length, 11);
        assert_eq!(info.components[0].char_count, 11);

        assert_eq!(info.components[1].index, 1);
        assert_eq!(info.components[1].byte_length, 10);
        assert_eq!(info.components[1].char_count, 5);

        assert_eq!(info.components[2].byte_length, 4);
        assert_eq!(info.components[2].char_count, 1);
    }

    #[test]
    fn test_check_components_accepts_plain_text() {
        let messages = Messages::ENGLISH;
        assert!(check_components(&["example.com", "café", "New York"], &messages).is_ok());
    }

    #[test]
    fn test_nfc_detection() {
        assert!(is_nfc("caf\u{00e9}"));
        assert!(!is_nfc("cafe\u{0301}"));
    }

    #[test]
    fn test_plural() {
        assert_eq!(plural(1, "char", "chars"), "char");
        assert_eq!(plural(0, "char", "chars"), "chars");
        assert_eq!(plural(15, "char", "chars"), "chars");
    }
}
