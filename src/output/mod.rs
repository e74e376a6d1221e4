//! Styled terminal output for stackparams

use owo_colors::OwoColorize;

const MINT: (u8, u8, u8) = (152, 225, 152);
const CORAL: (u8, u8, u8) = (255, 160, 160);
const CREAM: (u8, u8, u8) = (255, 230, 160);
const LAVENDER: (u8, u8, u8) = (181, 174, 254);
const MUTED: (u8, u8, u8) = (160, 160, 160);

fn marker(symbol: &str, (r, g, b): (u8, u8, u8)) -> String {
    symbol.truecolor(r, g, b).bold().to_string()
}

fn muted(text: &str) -> String {
    let (r, g, b) = MUTED;
    text.truecolor(r, g, b).to_string()
}

/// Print a success message with a green checkmark
pub fn success(message: &str) {
    println!("{} {}", marker("✓", MINT), message.bright_white());
}

/// Print an error message to stderr
pub fn error(message: &str) {
    eprintln!("{} {}", marker("✗", CORAL), message.bright_white());
}

/// Print a warning to stderr so stdout stays parseable
pub fn warning(message: &str) {
    eprintln!("{} {}", marker("⚠", CREAM), message.bright_white());
}

/// Print a section header with a separator line
pub fn section(title: &str) {
    let (r, g, b) = LAVENDER;
    println!("\n{}", title.truecolor(r, g, b).bold());
    println!("{}", muted(&"─".repeat(50)));
}

/// Print one resolved parameter line
pub fn key_value(key: &str, value: &str) {
    println!("  {} {}", muted(&format!("{}:", key)), value.bright_white());
}

pub fn list_item(text: &str) {
    println!("  {} {}", muted("•"), text.bright_white());
}

pub fn dimmed(message: &str) {
    println!("{}", muted(message));
}

pub fn blank() {
    println!();
}

/// Print the environment whose answer file is in play
pub fn environment_badge(env_name: &str) {
    let (r, g, b) = MINT;
    println!(
        "  {} {}",
        "Environment:".dimmed(),
        env_name.truecolor(r, g, b).bold()
    );
}
