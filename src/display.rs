use core::fmt::Write as _;

use heapless::String;

use crate::heating::Stage;
use crate::profile::Filament;
use crate::VERSION;

/// Character cells per row.
pub const COLS: usize = 16;
/// Rows on the panel.
pub const ROWS: usize = 2;

/// One full row of text. Longer content is silently truncated, the same way
/// the panel itself would drop it.
pub type Line = String<COLS>;

/// Two-row fixed-width text surface.
#[allow(async_fn_in_trait)]
pub trait TextDisplay {
    async fn clear(&mut self);
    async fn write(&mut self, row: u8, col: u8, text: &str);
}

/// Pad with trailing spaces to the full row width so leftovers from a longer
/// previous string cannot survive the repaint.
fn pad(line: &mut Line) {
    while line.push(' ').is_ok() {}
}

fn padded(text: &str) -> Line {
    let mut line = Line::new();
    let _ = line.push_str(text);
    pad(&mut line);
    line
}

/// Top status row: profile, target vs. current temperature, heater marker.
pub fn status_line(filament: &Filament, temp_c: i16, heater_on: bool) -> Line {
    let mut line = Line::new();
    let _ = write!(line, "{} {} / {}*", filament.name, filament.temp_c, temp_c);
    if heater_on {
        let _ = line.push_str(" H");
    }
    pad(&mut line);
    line
}

/// Bottom time row: countdown while Working, count-up while preheating.
pub fn time_line(stage: Stage, filament: &Filament, seconds: u32) -> Line {
    let mut line = Line::new();
    if stage == Stage::Working {
        // Clamped: the completion check may run a beat after the countdown
        // hits zero.
        let remaining = filament.time_secs.saturating_sub(seconds);
        let _ = write!(
            line,
            "ETA {:02}:{:02}:{:02}",
            remaining / 3600,
            (remaining % 3600) / 60,
            remaining % 60
        );
    } else {
        let _ = write!(
            line,
            "Preheating {:02}:{:02}",
            (seconds % 3600) / 60,
            seconds % 60
        );
    }
    pad(&mut line);
    line
}

/// Menu rows for one catalog entry.
pub fn menu_lines(filament: &Filament) -> (Line, Line) {
    let mut top = Line::new();
    let _ = write!(top, "{} ?", filament.name);
    pad(&mut top);

    let mut bottom = Line::new();
    let _ = write!(
        bottom,
        "{} hours at {}*",
        filament.time_secs / 3600,
        filament.temp_c
    );
    pad(&mut bottom);

    (top, bottom)
}

pub async fn draw_boot<D: TextDisplay>(display: &mut D) {
    display.clear().await;
    display.write(0, 0, &padded("Filament dryer")).await;
    display.write(1, 0, &padded(VERSION)).await;
}

pub async fn draw_menu<D: TextDisplay>(display: &mut D, filament: &Filament) {
    let (top, bottom) = menu_lines(filament);
    display.write(0, 0, &top).await;
    display.write(1, 0, &bottom).await;
}

pub async fn draw_status<D: TextDisplay>(
    display: &mut D,
    filament: &Filament,
    temp_c: i16,
    heater_on: bool,
    stage: Stage,
    seconds: u32,
) {
    display
        .write(0, 0, &status_line(filament, temp_c, heater_on))
        .await;
    display
        .write(1, 0, &time_line(stage, filament, seconds))
        .await;
}

pub async fn draw_finished<D: TextDisplay>(display: &mut D) {
    display.clear().await;
    display.write(0, 0, &padded("Finished!")).await;
    display.write(1, 0, &padded("Press any key...")).await;
}

pub async fn draw_fault<D: TextDisplay>(display: &mut D, reason: &str) {
    display.clear().await;
    display.write(0, 0, &padded("PANIC! Reason:")).await;
    display.write(1, 0, &padded(reason)).await;
}
