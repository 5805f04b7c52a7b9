use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, Plot};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Answer chart (central panel)
// ---------------------------------------------------------------------------

/// Horizontal bars, one per answer, highest estimate on top.
pub fn answer_chart(ui: &mut Ui, state: &AppState) {
    let Some(results) = &state.results else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading(state.placeholder());
        });
        return;
    };
    if results.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No responses for this selection");
        });
        return;
    }

    // Bar i sits at y = n-1-i so the first-ranked answer is drawn at the top.
    let n = results.len();
    let bars: Vec<Bar> = results
        .iter()
        .enumerate()
        .filter_map(|(i, r)| {
            let estimate = r.estimate?;
            Some(
                Bar::new((n - 1 - i) as f64, estimate)
                    .name(&r.answer)
                    .fill(state.color_map.color_for(&r.answer))
                    .width(0.7),
            )
        })
        .collect();

    let labels: Vec<String> = results.iter().rev().map(|r| r.answer.clone()).collect();

    Plot::new(("answer_chart", state.active))
        .height(ui.available_height() * 0.65)
        .x_axis_label("Percentage")
        .include_x(0.0)
        .y_grid_spacer(egui_plot::uniform_grid_spacer(|_| [1.0, 5.0, 25.0]))
        .y_axis_formatter(move |mark, _range| {
            let pos = mark.value.round();
            if (mark.value - pos).abs() > 1e-6 || pos < 0.0 {
                return String::new();
            }
            labels.get(pos as usize).cloned().unwrap_or_default()
        })
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal());
        });

    ui.separator();

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::initial(420.0).resizable(true))
        .column(Column::remainder())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("Answer");
            });
            header.col(|ui| {
                ui.strong("Estimate (%)");
            });
        })
        .body(|mut body| {
            for r in results {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(&r.answer);
                    });
                    row.col(|ui| {
                        ui.label(r.estimate.map_or_else(|| "–".to_string(), |v| format!("{v:.1}")));
                    });
                });
            }
        });
}
