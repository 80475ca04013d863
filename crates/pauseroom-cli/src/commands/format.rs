use clap::Subcommand;
use pauseroom_core::{format_long, format_short};

#[derive(Subcommand)]
pub enum FormatStyle {
    /// MM:SS
    Short {
        #[arg(allow_negative_numbers = true)]
        seconds: i64,
    },
    /// 1h 2m 5s
    Long {
        #[arg(allow_negative_numbers = true)]
        seconds: i64,
    },
}

pub fn run(style: FormatStyle) -> Result<(), Box<dyn std::error::Error>> {
    let text = match style {
        FormatStyle::Short { seconds } => format_short(seconds),
        FormatStyle::Long { seconds } => format_long(seconds),
    };
    println!("{text}");
    Ok(())
}
