use comfy_table::{presets, Attribute, Cell, ColumnConstraint, Table, Width};
use crossterm::style::{Color, Stylize};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use threadsum::notice::Notice;
use threadsum::preprocess::EmailMetadata;
use threadsum::storage::Theme;
use threadsum::view::ResultsView;

struct Palette {
    heading: Color,
    text: Color,
    muted: Color,
    accent: Color,
}

impl From<Theme> for Palette {
    fn from(theme: Theme) -> Self {
        match theme {
            Theme::Light => Palette {
                heading: Color::DarkBlue,
                text: Color::Black,
                muted: Color::DarkGrey,
                accent: Color::DarkGreen,
            },
            Theme::Dark => Palette {
                heading: Color::Cyan,
                text: Color::White,
                muted: Color::Grey,
                accent: Color::Green,
            },
        }
    }
}

pub fn print_notice(notice: &Notice) {
    if notice.is_destructive() {
        eprintln!(
            "{} {}",
            format!("✗ {}:", notice.title).with(Color::Red).bold(),
            notice.description
        );
    } else {
        eprintln!(
            "{} {}",
            format!("✓ {}:", notice.title).with(Color::Green).bold(),
            notice.description
        );
    }
}

pub fn spinner(message: &'static str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

pub fn render_results(view: &ResultsView, theme: Theme) -> String {
    let palette = Palette::from(theme);
    let mut output = format!(
        "{}  {}\n",
        "Summary Results".with(palette.accent).bold(),
        "AI Generated".with(palette.muted)
    );

    for section in view.sections() {
        output.push('\n');
        output.push_str(&format!("{}\n", section.title.with(palette.heading).bold()));

        if section.is_empty() {
            output.push_str(&format!(
                "  {}\n",
                section.empty_message().with(palette.muted).italic()
            ));
            continue;
        }

        if section.kind == threadsum::sections::SectionKind::Summary {
            for line in section.lines.iter().flat_map(|x| x.lines()) {
                output.push_str(&format!("  {}\n", line.with(palette.text)));
            }
        } else {
            for line in &section.lines {
                output.push_str(&format!(
                    "  {} {}\n",
                    "•".with(palette.accent),
                    line.as_str().with(palette.text)
                ));
            }
        }
    }

    output
}

pub fn render_original(email_thread: &str, theme: Theme) -> String {
    let palette = Palette::from(theme);
    let mut output = format!("{}\n", "Original Email Thread".with(palette.heading).bold());
    for line in email_thread.lines() {
        output.push_str(&format!("  {}\n", line.with(palette.muted)));
    }
    output
}

pub fn print_metadata_table(metadata: &EmailMetadata, cleaned_length: usize) {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.set_header(vec![
        Cell::new("Property").add_attribute(Attribute::Bold),
        Cell::new("Value").add_attribute(Attribute::Bold),
    ]);
    table.set_constraints(vec![
        ColumnConstraint::ContentWidth,
        ColumnConstraint::LowerBoundary(Width::Fixed(40)),
    ]);

    table.add_row(vec![
        Cell::new("Cleaned Length").add_attribute(Attribute::Italic),
        Cell::new(format!("{cleaned_length} characters")),
    ]);
    table.add_row(vec![
        Cell::new("Participants").add_attribute(Attribute::Italic),
        Cell::new(if metadata.participants.is_empty() {
            "None found".to_string()
        } else {
            metadata.participants.join("\n")
        }),
    ]);
    table.add_row(vec![
        Cell::new("Dates").add_attribute(Attribute::Italic),
        Cell::new(if metadata.timestamps.is_empty() {
            "None found".to_string()
        } else {
            metadata.timestamps.join("\n")
        }),
    ]);

    println!("{table}");
}
