use console::{style, Term};
use tui_banner::{Align, Banner, ColorMode, Fill, Gradient, GradientDirection, Palette};

const TAGLINE: &str = "News-Intelligence Pipeline Operations Console";

/// Print the console banner and a short orientation line.
pub fn show() {
    let term = Term::stdout();
    let (_, term_cols) = term.size();
    let term_w = term_cols as usize;

    let palette = Palette::from_hex(&[
        "#AFD7FF", // pale sky (glow)
        "#5FAFD7", // steel blue (core)
        "#005F87", // deep teal (mid)
        "#5F5FAF", // slate violet (deep)
    ]);
    let gradient = Gradient::new(palette.colors().to_vec(), GradientDirection::Diagonal);

    let banner = match Banner::new("TENDERWATCH") {
        Ok(b) => b
            .gradient(gradient)
            .fill(Fill::Keep)
            .align(Align::Center)
            .trim_vertical(true)
            .color_mode(ColorMode::TrueColor)
            .width(term_w)
            .render(),
        Err(_) => format!("  {}\n", style("TENDERWATCH").cyan().bold()),
    };

    println!("{}", banner);
    println!(
        "  {}  {}",
        style(TAGLINE).white(),
        style(format!("v{}", env!("CARGO_PKG_VERSION"))).dim(),
    );
    println!(
        "  {}\n",
        style("Type /help for commands, /exit to quit.").dim(),
    );
}
