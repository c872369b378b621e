use eframe::egui::{self, Align2, FontId, Pos2, Rect, Sense, Stroke, Ui, Vec2};

use crate::color::{contrast_text, coolwarm};
use crate::data::model::{Channel, CHANNEL_COUNT};
use crate::data::stats::CorrelationMatrix;

const CELL: f32 = 64.0;
const LABEL_WIDTH: f32 = 150.0;
const HEADER_HEIGHT: f32 = 36.0;

// ---------------------------------------------------------------------------
// Correlation heatmap
// ---------------------------------------------------------------------------

/// Paint the channel correlation matrix as an annotated grid.
///
/// Cells without a coefficient (constant or too-sparse channels) are drawn
/// in the panel background with "n/a".
pub fn correlation_heatmap(ui: &mut Ui, matrix: &CorrelationMatrix) {
    let size = Vec2::new(
        LABEL_WIDTH + CELL * CHANNEL_COUNT as f32,
        HEADER_HEIGHT + CELL * CHANNEL_COUNT as f32,
    );
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let origin = response.rect.min;
    let text_color = ui.visuals().text_color();
    let font = FontId::proportional(11.0);

    for ch in Channel::ALL {
        let col_center = Pos2::new(
            origin.x + LABEL_WIDTH + CELL * (ch.index() as f32 + 0.5),
            origin.y + HEADER_HEIGHT * 0.5,
        );
        painter.text(col_center, Align2::CENTER_CENTER, ch.label(), font.clone(), text_color);

        let row_anchor = Pos2::new(
            origin.x + LABEL_WIDTH - 6.0,
            origin.y + HEADER_HEIGHT + CELL * (ch.index() as f32 + 0.5),
        );
        painter.text(row_anchor, Align2::RIGHT_CENTER, ch.column_name(), font.clone(), text_color);
    }

    for row in Channel::ALL {
        for col in Channel::ALL {
            let rect = cell_rect(origin, row.index(), col.index());
            let (fill, label) = match matrix[row.index()][col.index()] {
                Some(r) => (coolwarm(r), format!("{r:.2}")),
                None => (ui.visuals().extreme_bg_color, "n/a".to_string()),
            };
            painter.rect_filled(rect, 0.0, fill);
            painter.rect_stroke(
                rect,
                0.0,
                Stroke::new(1.0, ui.visuals().window_stroke.color),
                egui::StrokeKind::Inside,
            );
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                label,
                FontId::monospace(12.0),
                contrast_text(fill),
            );
        }
    }

    if let Some(pos) = response.hover_pos() {
        if let Some((row, col)) = cell_at(origin, pos) {
            let value = matrix[row.index()][col.index()]
                .map_or_else(|| "n/a".to_string(), |r| format!("{r:.3}"));
            response.on_hover_text(format!("{row} × {col}: {value}"));
        }
    }
}

fn cell_rect(origin: Pos2, row: usize, col: usize) -> Rect {
    Rect::from_min_size(
        Pos2::new(
            origin.x + LABEL_WIDTH + CELL * col as f32,
            origin.y + HEADER_HEIGHT + CELL * row as f32,
        ),
        Vec2::splat(CELL),
    )
}

/// Which (row, column) channel pair lies under `pos`, if any.
fn cell_at(origin: Pos2, pos: Pos2) -> Option<(Channel, Channel)> {
    let x = pos.x - origin.x - LABEL_WIDTH;
    let y = pos.y - origin.y - HEADER_HEIGHT;
    if x < 0.0 || y < 0.0 {
        return None;
    }
    let col = Channel::ALL.get((x / CELL) as usize)?;
    let row = Channel::ALL.get((y / CELL) as usize)?;
    Some((*row, *col))
}
