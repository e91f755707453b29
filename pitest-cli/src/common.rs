use clap::builder::Styles;

pub static DEFAULT_RESOURCE_DIR: &str = "./resources";
pub static DEFAULT_STATIC_PREFIX: &str = "/static";
pub const DEFAULT_PORT: u16 = 9000;

/// Colours follow the report: green for headings, red for errors.
pub fn clap_styles() -> Styles {
    use clap::builder::styling::*;
    let green = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green)));
    let red = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red)));
    Styles::styled()
        .header(green.bold().underline())
        .usage(green.bold())
        .literal(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan))).bold())
        .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan))))
        .valid(green)
        .invalid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow))).bold())
        .error(red.bold())
}
