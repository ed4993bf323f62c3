use handwrite::layout::RandomJitter;
use handwrite::{
    render_text, write_page, write_preview, HandwritingError, Settings, FONTS_DIR, OUTPUT_DIR,
    SETTINGS_FILE,
};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

mod logging;

const USAGE: &str = "\
usage: handwrite [TEXT_FILE|-] [options]

Writes TEXT_FILE (or stdin) onto a handwriting-styled page and saves it as a PNG.

options:
  --settings PATH       settings document (default: settings.json)
  --font PATH           handwriting font, overrides the settings
  --background PATH     page texture, or `none` for a plain page
  --output DIR          where pages are saved (default: Output)
  --preview             also save a thumbnail next to the page
  --save-settings       write the effective settings back to the settings document
  -h, --help            show this message";

#[derive(Debug, Default)]
struct Args {
    input: Option<PathBuf>,
    settings: Option<PathBuf>,
    font: Option<PathBuf>,
    background: Option<String>,
    output: Option<PathBuf>,
    preview: bool,
    save_settings: bool,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Option<Args>, String> {
    let mut parsed = Args::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        let mut value = |flag: &str| {
            args.next()
                .ok_or_else(|| format!("{flag} needs a value"))
        };
        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "--settings" => parsed.settings = Some(value("--settings")?.into()),
            "--font" => parsed.font = Some(value("--font")?.into()),
            "--background" => parsed.background = Some(value("--background")?),
            "--output" => parsed.output = Some(value("--output")?.into()),
            "--preview" => parsed.preview = true,
            "--save-settings" => parsed.save_settings = true,
            flag if flag.starts_with("--") => return Err(format!("unknown option {flag}")),
            _ if parsed.input.is_none() => parsed.input = Some(arg.into()),
            _ => return Err(format!("unexpected argument {arg}")),
        }
    }
    Ok(Some(parsed))
}

fn read_text(input: Option<&PathBuf>) -> Result<String, HandwritingError> {
    match input {
        Some(path) if path.as_os_str() != "-" => Ok(std::fs::read_to_string(path)?),
        _ => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

/// Record `font` as the configured handwriting font. Settings only name fonts inside
/// `fonts_dir`, so a font elsewhere is used for this run but left out of the settings.
fn remember_font(settings: &mut Settings, font: &Path, fonts_dir: &Path) -> bool {
    let name = font.file_name().filter(|_| font.parent() == Some(fonts_dir));
    match name {
        Some(name) => {
            settings.handwriting_font = Some(name.to_string_lossy().into_owned());
            true
        }
        None => {
            tracing::warn!(
                font = %font.display(),
                fonts_dir = %fonts_dir.display(),
                "font is outside the fonts directory, not recording it in the settings"
            );
            false
        }
    }
}

fn run(args: Args) -> Result<(), HandwritingError> {
    let settings_path = args.settings.unwrap_or_else(|| PathBuf::from(SETTINGS_FILE));
    let mut settings = Settings::load(&settings_path);

    match args.background.as_deref() {
        Some("none") | Some("") => settings.background.current = None,
        Some(path) => settings.background.current = Some(PathBuf::from(path)),
        None => {}
    }
    if let Some(font) = &args.font {
        remember_font(&mut settings, font, Path::new(FONTS_DIR));
    }

    let text = read_text(args.input.as_ref())?;

    let mut request = settings.render_request(&PathBuf::from(FONTS_DIR));
    if let Some(font) = args.font {
        request.font = Some(font);
    }

    let rendered = render_text(&text, &request, &mut RandomJitter::from_os_rng())?;
    for notice in &rendered.notices {
        eprintln!("note: {notice}");
    }

    let output_dir = args.output.unwrap_or_else(|| PathBuf::from(OUTPUT_DIR));
    let page_path = write_page(&rendered.image, &output_dir)?;
    println!("{}", page_path.display());

    if args.preview {
        let preview_path = write_preview(&rendered.image, &page_path)?;
        println!("{}", preview_path.display());
    }

    if args.save_settings {
        settings.save(&settings_path)?;
        tracing::info!(path = %settings_path.display(), "saved settings");
    }

    Ok(())
}

fn main() -> ExitCode {
    logging::init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(Some(args)) => args,
        Ok(None) => {
            println!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Err(message) => {
            eprintln!("{message}\n\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(HandwritingError::EmptyInput) => {
            eprintln!("please enter some text to convert");
            ExitCode::from(2)
        }
        Err(err) => {
            tracing::error!(%err, "render failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Option<Args>, String> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn parses_flags_and_input() {
        let parsed = args(&["poem.txt", "--font", "fonts/a.ttf", "--background", "none", "--preview"])
            .unwrap()
            .unwrap();
        assert_eq!(parsed.input, Some(PathBuf::from("poem.txt")));
        assert_eq!(parsed.font, Some(PathBuf::from("fonts/a.ttf")));
        assert_eq!(parsed.background.as_deref(), Some("none"));
        assert!(parsed.preview);
        assert!(!parsed.save_settings);
    }

    #[test]
    fn only_fonts_in_the_fonts_dir_are_remembered() {
        let fonts = Path::new("fonts");
        let mut settings = Settings::default();
        settings.handwriting_font = Some("Kept.ttf".to_string());

        assert!(!remember_font(&mut settings, Path::new("/elsewhere/x.ttf"), fonts));
        assert_eq!(settings.handwriting_font.as_deref(), Some("Kept.ttf"));

        assert!(remember_font(&mut settings, Path::new("fonts/Script.ttf"), fonts));
        assert_eq!(settings.handwriting_font.as_deref(), Some("Script.ttf"));
    }

    #[test]
    fn help_and_errors() {
        assert!(args(&["--help"]).unwrap().is_none());
        assert!(args(&["--font"]).is_err());
        assert!(args(&["--bogus"]).is_err());
        assert!(args(&["a.txt", "b.txt"]).is_err());
    }
}
