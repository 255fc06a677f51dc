//! Terminal rendering of pairing QR codes.

use prosperez_core::error::BotError;
use qrcode::{Color, EcLevel, QrCode};

/// Render QR data as text using Unicode half blocks.
///
/// Each output line covers two module rows (`▀` top, `▄` bottom, `█` both),
/// framed by a one-module light border.
pub fn generate_qr_terminal(qr_data: &str) -> Result<String, BotError> {
    let code = QrCode::with_error_correction_level(qr_data.as_bytes(), EcLevel::L)
        .map_err(|e| BotError::Channel(format!("QR generation failed: {e}")))?;

    let width = code.width();
    let modules = code.into_colors();
    // Coordinates include the border: row/col 0 and width+1 are always light.
    let dark = |row: usize, col: usize| {
        (1..=width).contains(&row)
            && (1..=width).contains(&col)
            && modules[(row - 1) * width + (col - 1)] == Color::Dark
    };

    let framed = width + 2;
    let mut out = String::with_capacity(framed * (framed / 2 + 1) * 3);
    for row in (0..framed).step_by(2) {
        for col in 0..framed {
            out.push(match (dark(row, col), dark(row + 1, col)) {
                (true, true) => '█',
                (true, false) => '▀',
                (false, true) => '▄',
                (false, false) => ' ',
            });
        }
        out.push('\n');
    }

    Ok(out)
}
