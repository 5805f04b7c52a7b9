use eframe::egui::{self, RichText, ScrollArea, Ui};

use crate::data::model::Dimension;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Top bar – title and one tab per dimension
// ---------------------------------------------------------------------------

pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(RichText::new("How are US Businesses Adopting AI?").strong());
    });
    ui.separator();

    ui.horizontal(|ui: &mut Ui| {
        for dim in Dimension::ALL {
            if ui.selectable_label(state.active == dim, dim.title()).clicked() {
                state.select_tab(dim);
            }
        }

        ui.separator();
        ui.label(format!("{} estimates", state.table().len()));
    });
}

// ---------------------------------------------------------------------------
// Left side panel – question and segment selectors
// ---------------------------------------------------------------------------

pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    // Clone what we need so we can mutate state inside the widgets.
    let questions = state.table().questions();
    let segments = state.table().segment_values();
    let selection = state.selection();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.strong("Pick a question");
            egui::ComboBox::from_id_salt(("question", state.active))
                .width(ui.available_width())
                .selected_text(selection.question.unwrap_or("Select question"))
                .show_ui(ui, |ui: &mut Ui| {
                    for question in &questions {
                        if ui
                            .selectable_label(selection.question == Some(*question), *question)
                            .clicked()
                        {
                            state.set_question(*question);
                        }
                    }
                });

            let Some(segment_name) = state.active.segment_name() else {
                return;
            };

            ui.add_space(8.0);
            ui.strong(format!("Pick a {segment_name}"));
            egui::ComboBox::from_id_salt(("segment", state.active))
                .width(ui.available_width())
                .selected_text(
                    selection
                        .segment
                        .clone()
                        .unwrap_or_else(|| format!("Select {segment_name}")),
                )
                .show_ui(ui, |ui: &mut Ui| {
                    for value in &segments {
                        if ui
                            .selectable_label(selection.segment.as_ref() == Some(value), value)
                            .clicked()
                        {
                            state.set_segment(value.clone());
                        }
                    }
                });
        });
}
