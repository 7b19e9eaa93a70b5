//! Command line arguments.

use std::path::PathBuf;

use chrono::NaiveTime;
use clap::Parser;

/// Desktop simulator for the Circle Squared watchface.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Window and screenshot scale factor.
    #[arg(long, default_value_t = 3)]
    pub scale: u32,

    /// Emulate a black and white panel.
    #[arg(long)]
    pub monochrome: bool,

    /// Settings file. Defaults to the platform config directory.
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Freeze the clock at HH:MM:SS instead of following the system time.
    #[arg(long, value_parser = parse_time)]
    pub time: Option<NaiveTime>,

    /// Send this background colour (RRGGBB hex) as a configuration message at startup.
    #[arg(long, value_parser = parse_hex_color)]
    pub background: Option<i32>,

    /// Render a single frame to this PNG file and exit.
    #[arg(long)]
    pub screenshot: Option<PathBuf>,
}

/// Parse `HH:MM:SS`.
pub fn parse_time(s: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s, "%H:%M:%S").map_err(|e| format!("expected HH:MM:SS: {e}"))
}

/// Parse a 24-bit colour written as `RRGGBB`, `#RRGGBB` or `0xRRGGBB`.
pub fn parse_hex_color(s: &str) -> Result<i32, String> {
    let digits = s
        .strip_prefix('#')
        .or_else(|| s.strip_prefix("0x"))
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    let code = u32::from_str_radix(digits, 16).map_err(|e| format!("invalid hex colour {s:?}: {e}"))?;
    if code > 0x00FF_FFFF {
        return Err(format!("colour {s:?} does not fit in 24 bits"));
    }
    Ok(code as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("FF0000"), Ok(0xFF0000));
        assert_eq!(parse_hex_color("#00aa55"), Ok(0x00AA55));
        assert_eq!(parse_hex_color("0x0000ff"), Ok(0x0000FF));
        assert!(parse_hex_color("1000000").is_err());
        assert!(parse_hex_color("red").is_err());
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(parse_time("15:45:30"), Ok(NaiveTime::from_hms_opt(15, 45, 30).unwrap()));
        assert!(parse_time("25:00:00").is_err());
        assert!(parse_time("noon").is_err());
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["simulator"]).unwrap();
        assert_eq!(args.scale, 3);
        assert!(!args.monochrome);
        assert!(args.time.is_none());
        assert!(args.background.is_none());
    }

    #[test]
    fn test_args_full() {
        let args = Args::try_parse_from([
            "simulator",
            "--scale",
            "1",
            "--monochrome",
            "--time",
            "00:00:00",
            "--background",
            "#AAAAAA",
            "--screenshot",
            "face.png",
        ])
        .unwrap();
        assert_eq!(args.scale, 1);
        assert!(args.monochrome);
        assert_eq!(args.time, NaiveTime::from_hms_opt(0, 0, 0));
        assert_eq!(args.background, Some(0xAAAAAA));
        assert_eq!(args.screenshot, Some(PathBuf::from("face.png")));
    }
}
