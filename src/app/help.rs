use eframe::egui;

pub(super) fn draw_help_window(ctx: &egui::Context, open: &mut bool) {
    egui::Window::new("Help")
        .open(open)
        .resizable(true)
        .default_width(480.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("Keyboard Shortcuts");
                ui.separator();

                help_row(ui, "F1", "Show this window");
                help_row(ui, "⌘B", "Add a bubble to the current panel");
                help_row(ui, "⌘O", "Set the current panel's image");
                help_row(ui, "⌘⇧S", "Export the bubble overlay as SVG");
                help_row(ui, "Delete", "Delete the bubble under the pointer");
                help_row(ui, "Escape", "Cancel a move, resize or tail drag");

                ui.add_space(10.0);
                ui.label("Editing text");
                help_row(ui, "Double-click", "Edit bubble text");
                help_row(ui, "Enter", "Finish editing");
                help_row(ui, "Shift + Enter", "New line");
                help_row(ui, "Escape", "Discard edits");

                ui.separator();
                ui.label("• Drag a bubble to move it; it stays inside the panel");
                ui.label("• Hover a bubble to show its resize handles and toolbar");
                ui.label("• Drag the round handle to point the tail at the speaker");
                ui.label("• Thought bubbles are drawn with a dashed outline");
                ui.label("• Click an open storybook again to close it");
            });
        });
}

fn help_row(ui: &mut egui::Ui, shortcut: &str, description: &str) {
    ui.horizontal(|ui| {
        ui.add_sized(
            [110.0, 16.0],
            egui::Label::new(egui::RichText::new(shortcut).monospace().strong()),
        );
        ui.label(description);
    });
}
