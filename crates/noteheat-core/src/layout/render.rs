//! Text rendering of a [`GridLayout`] for terminals.

use super::{GridLayout, Intensity, WeekColumn};

/// Default base color when no custom color is configured.
pub const DEFAULT_ACCENT: Rgb = Rgb(0x40, 0xc4, 0x63);

const BACKGROUND: Rgb = Rgb(0x16, 0x1b, 0x22);
const EMPTY_CELL: Rgb = Rgb(0x2d, 0x33, 0x3b);
const AXIS_COLUMNS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Parse `#rgb` or `#rrggbb`.
    pub fn parse_hex(value: &str) -> Option<Self> {
        let hex = value.trim().strip_prefix('#')?;
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            3 => {
                let mut digits = hex.chars().map(|c| c.to_digit(16).map(|d| (d * 17) as u8));
                Some(Rgb(digits.next()??, digits.next()??, digits.next()??))
            }
            6 if hex.is_ascii() => Some(Rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            _ => None,
        }
    }

    /// Linear blend from `self` toward `other`.
    fn mix(self, other: Rgb, t: f64) -> Rgb {
        let lerp = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
        Rgb(lerp(self.0, other.0), lerp(self.1, other.1), lerp(self.2, other.2))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Five shades, one per intensity level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    shades: [Rgb; 5],
}

impl Default for Palette {
    fn default() -> Self {
        Self::from_base(DEFAULT_ACCENT)
    }
}

impl Palette {
    /// Gradient from the background toward `base`.
    pub fn from_base(base: Rgb) -> Self {
        Self {
            shades: [
                EMPTY_CELL,
                BACKGROUND.mix(base, 0.3),
                BACKGROUND.mix(base, 0.55),
                BACKGROUND.mix(base, 0.8),
                base,
            ],
        }
    }

    /// Palette for the configured custom color. Blank or unparseable values
    /// fall back to the default accent.
    pub fn from_custom_color(custom: &str) -> Self {
        if custom.trim().is_empty() {
            return Self::default();
        }
        match Rgb::parse_hex(custom) {
            Some(base) => Self::from_base(base),
            None => {
                tracing::warn!(color = custom, "unsupported custom color, using default accent");
                Self::default()
            }
        }
    }

    pub fn shade(&self, intensity: Intensity) -> Rgb {
        self.shades[intensity.level() as usize]
    }

    fn paint(&self, intensity: Intensity) -> String {
        let Rgb(r, g, b) = self.shade(intensity);
        format!("\x1b[38;2;{r};{g};{b}m{}\x1b[0m", intensity.glyph())
    }
}

fn month_line(weeks: &[WeekColumn]) -> String {
    let mut line = vec![' '; weeks.len() * 2];
    let mut next_free = 0;
    for (i, week) in weeks.iter().enumerate() {
        let Some(label) = &week.month_label else {
            continue;
        };
        let pos = i * 2;
        if pos < next_free {
            continue;
        }
        for (slot, ch) in line.iter_mut().skip(pos).zip(label.chars()) {
            *slot = ch;
        }
        next_free = pos + label.chars().count() + 1;
    }
    line.into_iter().collect()
}

/// Draw the grid one text line per weekday. Days after `today` are blank.
/// With a palette, cells are wrapped in 24-bit ANSI color escapes.
pub fn render_text(layout: &GridLayout, palette: Option<&Palette>) -> String {
    let mut output = String::new();

    for (i, row) in layout.rows.iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }
        let axis_pad = if row.day_axis.is_some() { AXIS_COLUMNS } else { 0 };

        if layout.show_month_labels {
            let line = format!("{}{}", " ".repeat(axis_pad), month_line(&row.weeks));
            output.push_str(line.trim_end());
            output.push('\n');
        }

        for day in 0..7 {
            let mut line = String::new();
            if let Some(axis) = &row.day_axis {
                line.push_str(&format!("{:<width$}", axis.labels[day], width = AXIS_COLUMNS));
            }
            for week in &row.weeks {
                let cell = &week.days[day];
                if cell.date > layout.today {
                    line.push(' ');
                } else if let Some(palette) = palette {
                    line.push_str(&palette.paint(cell.intensity));
                } else {
                    line.push(cell.intensity.glyph());
                }
                line.push(' ');
            }
            output.push_str(line.trim_end());
            output.push('\n');
        }
    }

    output.push_str("\nLess ");
    for intensity in Intensity::ALL {
        match palette {
            Some(palette) => output.push_str(&palette.paint(intensity)),
            None => output.push(intensity.glyph()),
        }
    }
    output.push_str(" More\n");
    output
}
