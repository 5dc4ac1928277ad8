use crate::SketchApp;
use crate::layout::Tool;

pub fn toolbar(app: &mut SketchApp, ctx: &egui::Context) {
    egui::SidePanel::left("toolbar")
        .resizable(false)
        .default_width(150.0)
        .show(ctx, |ui| {
            ui.heading("Tools");

            let active = app.tool();
            for tool in Tool::ALL {
                if ui.selectable_label(active == tool, tool.name()).clicked() {
                    app.select_tool(tool);
                }
            }

            ui.separator();

            ui.horizontal(|ui| {
                if ui
                    .add_enabled(app.can_undo(), egui::Button::new("Undo"))
                    .clicked()
                {
                    app.undo();
                }
                if ui
                    .add_enabled(app.can_redo(), egui::Button::new("Redo"))
                    .clicked()
                {
                    app.redo();
                }
            });

            if ui.button("Clear").clicked() {
                app.clear();
            }

            ui.separator();

            let mut buffering = app.buffering();
            if ui
                .checkbox(&mut buffering, "Buffered repaint")
                .on_hover_text("Paint a newly finished shape on top instead of replaying everything")
                .changed()
            {
                app.set_buffering(buffering);
            }

            let mut render_loop = app.render_loop();
            if ui
                .checkbox(&mut render_loop, "Per-frame render loop")
                .on_hover_text("Coalesce pointer moves into one render per frame while drawing")
                .changed()
            {
                app.set_render_loop(render_loop);
            }

            ui.separator();

            let (current, last) = app.step_bounds();
            ui.label(format!("Step {current} of {last}"));
        });
}
