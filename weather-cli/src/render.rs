use std::fmt;

use crossterm::style::{Color, Stylize};
use weather_core::{Screen, WeatherView};

/// Draw the view as colored text, top to bottom like the widget card.
pub fn render(view: &WeatherView) -> String {
    Painted(view).to_string()
}

struct Painted<'a>(&'a WeatherView);

impl fmt::Display for Painted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = self.0;
        let theme = &view.theme;
        let text = hex_color(theme.text);
        let card = hex_color(theme.container_background);
        let mode = if theme.dark { "dark" } else { "light" };

        writeln!(f, "{}", format!("Weather App  [{mode}]").with(text).on(card))?;
        if !view.search_text.is_empty() {
            let search = format!("Search: {}", view.search_text);
            writeln!(f, "{}", search.with(hex_color(theme.search_border)))?;
        }
        writeln!(f)?;

        let weather = match &view.screen {
            Screen::Loading => return writeln!(f, "  {}", "Loading..".with(text)),
            Screen::Weather(weather) => weather,
        };

        let icon = format!("{} ({})", weather.icon.glyph(), weather.icon.name());
        for line in [&weather.location_name, &weather.country_code] {
            writeln!(f, "  {}", line.as_str().with(text).on(card))?;
        }
        writeln!(f, "  {}", icon.with(hex_color(weather.icon.color())))?;
        for line in [&weather.temperature, &weather.condition] {
            writeln!(f, "  {}", line.as_str().with(text).on(card))?;
        }
        writeln!(f)?;

        let info = hex_color(theme.bottom_info_background);
        writeln!(f, "  {}", format!("Humidity    {}", weather.humidity).with(text).on(info))?;
        writeln!(f, "  {}", format!("Wind speed  {}", weather.wind).with(text).on(info))
    }
}

/// `#rrggbb` to a true-color value; anything else leaves the terminal default.
fn hex_color(hex: &str) -> Color {
    let parse = |range: std::ops::Range<usize>| {
        hex.strip_prefix('#')
            .filter(|h| h.len() == 6)
            .and_then(|h| h.get(range))
            .and_then(|c| u8::from_str_radix(c, 16).ok())
    };

    match (parse(0..2), parse(2..4), parse(4..6)) {
        (Some(r), Some(g), Some(b)) => Color::Rgb { r, g, b },
        _ => Color::Reset,
    }
}
