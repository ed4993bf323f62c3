use handwrite::layout::{LayoutConfig, Margins, RandomJitter};
use handwrite::{colours, render_text, write_page, Colour, RenderRequest};
use std::path::{Path, PathBuf};

fn main() {
    // pass a font path as the first argument to write with it
    let font = std::env::args().nth(1).map(PathBuf::from);

    let request = RenderRequest {
        config: LayoutConfig {
            margins: Margins::symmetric(60, 40),
            chaos_level: 7,
            font_size: 28,
            text_colour: Colour::new_rgb_bytes(0x1f, 0x2a, 0x44),
            opacity: 0.9,
            ..LayoutConfig::default()
        },
        font,
        background: None,
        background_colour: colours::PAPER,
    };

    let text = format!("{}\n\n{}", lipsum::lipsum_title(), lipsum::lipsum(400));
    let rendered = render_text(&text, &request, &mut RandomJitter::from_os_rng())
        .expect("can render text");
    for notice in &rendered.notices {
        eprintln!("{notice}");
    }

    let path = write_page(&rendered.image, Path::new(".")).expect("can write page");
    println!("{} characters written to {}", rendered.placed, path.display());
}
