use console::style;

const STATUS_WIDTH: usize = 12;

pub fn status(label: &str, message: impl AsRef<str>) {
    eprintln!(
        "{:>width$} {}",
        style(label).green().bold(),
        message.as_ref(),
        width = STATUS_WIDTH
    );
}

pub fn error(message: impl AsRef<str>) {
    eprintln!("{}: {}", style("error").red().bold(), message.as_ref());
}

pub fn step(message: impl AsRef<str>) {
    eprintln!("    {}", message.as_ref());
}
