//! The module that handles the user interface of the console.
//!
//! Key handling feeds [`ConsoleInput`]s into the [`ConsoleOverlay`]; the
//! renderer reads the overlay, the [`LogBuffer`] and the [`LogView`] layout
//! back to draw the window.
//!
//! [`LogView`]: crate::core::LogView

use bevy::prelude::*;
use bevy_egui::egui::text::LayoutJob;
use bevy_egui::*;

use crate::core::{
    format_time, CommandQueue, ConsoleInput, ConsoleOverlay, LogBuffer, LogEntry, Severity,
    ViewLayout,
};

/// Keys driving the console.
#[derive(Resource, Debug, Clone)]
pub struct ConsoleKeys {
    /// Show/hide the console.
    pub toggle: KeyCode,
    /// Submit the edit line.
    pub submit: KeyCode,
    /// Previous history entry.
    pub history_up: KeyCode,
    /// Next history entry.
    pub history_down: KeyCode,
}

impl Default for ConsoleKeys {
    fn default() -> Self {
        Self {
            toggle: KeyCode::Backquote,
            submit: KeyCode::Enter,
            history_up: KeyCode::ArrowUp,
            history_down: KeyCode::ArrowDown,
        }
    }
}

/// Colors and font of the console window.
#[derive(Resource, Debug, Clone)]
pub struct ConsoleTheme {
    /// Font for log lines and the edit line.
    pub font: egui::FontId,
    /// Timestamps and annotations.
    pub dark: egui::Color32,
    /// Message text.
    pub text: egui::Color32,
    /// `[info]` tag.
    pub info: egui::Color32,
    /// `[warn]` tag.
    pub warn: egui::Color32,
    /// `[error]` tag.
    pub error: egui::Color32,
}

impl Default for ConsoleTheme {
    fn default() -> Self {
        Self {
            font: egui::FontId::monospace(14.0),
            dark: egui::Color32::from_gray(110),
            text: egui::Color32::from_gray(215),
            info: egui::Color32::from_rgb(90, 200, 120),
            warn: egui::Color32::from_rgb(230, 190, 60),
            error: egui::Color32::from_rgb(235, 85, 80),
        }
    }
}

impl ConsoleTheme {
    fn format(&self, color: egui::Color32) -> egui::TextFormat {
        egui::TextFormat::simple(self.font.clone(), color)
    }

    /// Format for message text.
    pub fn format_text(&self) -> egui::TextFormat {
        self.format(self.text)
    }

    /// Format for timestamps and annotations.
    pub fn format_dark(&self) -> egui::TextFormat {
        self.format(self.dark)
    }

    /// Format for a severity tag.
    pub fn format_severity(&self, severity: Severity) -> egui::TextFormat {
        self.format(match severity {
            Severity::Info => self.info,
            Severity::Warn => self.warn,
            Severity::Error => self.error,
        })
    }
}

/// egui-specific state next to the [`ConsoleOverlay`].
#[derive(Default, Resource)]
pub struct ConsoleUiState {
    /// Move keyboard focus into the edit line on the next frame.
    pub(crate) request_focus: bool,
}

pub(crate) fn open_close_ui(
    mut overlay: ResMut<ConsoleOverlay>,
    mut state: ResMut<ConsoleUiState>,
    key: Option<Res<ButtonInput<KeyCode>>>,
    keys: Res<ConsoleKeys>,
    queue: Res<CommandQueue>,
) {
    let Some(key) = key else { return };
    if key.just_pressed(keys.toggle) {
        overlay.handle(ConsoleInput::Toggle, &queue);
        state.request_focus = overlay.is_visible();
    }
}

pub(crate) fn render_ui_system(
    mut contexts: EguiContexts,
    mut overlay: ResMut<ConsoleOverlay>,
    mut state: ResMut<ConsoleUiState>,
    key: Res<ButtonInput<KeyCode>>,
    keys: Res<ConsoleKeys>,
    theme: Res<ConsoleTheme>,
    queue: Res<CommandQueue>,
    log: Res<LogBuffer>,
) -> Result<(), BevyError> {
    egui::Window::new("Developer Console")
        .collapsible(false)
        .default_width(900.)
        .default_height(400.)
        .show(contexts.ctx_mut()?, |ui| {
            render_ui(ui, &mut overlay, &mut state, &key, &keys, &theme, &queue, &log)
        });
    Ok(())
}

/// The function that renders the UI of the developer console.
#[allow(clippy::too_many_arguments)]
pub fn render_ui(
    ui: &mut egui::Ui,
    overlay: &mut ConsoleOverlay,
    state: &mut ConsoleUiState,
    key: &ButtonInput<KeyCode>,
    keys: &ConsoleKeys,
    theme: &ConsoleTheme,
    queue: &CommandQueue,
    log: &LogBuffer,
) {
    let row_height = theme.font.size.max(1.0) + ui.spacing().item_spacing.y;
    let visible_rows = (ui.available_height() / row_height).floor() as usize;

    if key.just_pressed(keys.history_up) {
        overlay.handle(ConsoleInput::HistoryUp, queue);
    }
    if key.just_pressed(keys.history_down) {
        overlay.handle(ConsoleInput::HistoryDown, queue);
    }
    if key.just_pressed(keys.submit) && overlay.is_edit_active() {
        overlay.handle(ConsoleInput::Submit, queue);
        // egui drops focus on Enter; take it back
        state.request_focus = true;
    }

    egui::TopBottomPanel::bottom("bottom panel")
        .frame(egui::Frame::NONE.outer_margin(egui::Margin {
            left: 5,
            right: 5,
            top: 11,
            bottom: 5,
        }))
        .show_inside(ui, |ui| {
            let text_edit_id = egui::Id::new("text_edit");

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Submit").clicked() {
                    overlay.commit(queue);
                    state.request_focus = true;
                }

                let text_edit = egui::TextEdit::singleline(overlay.edit_mut().as_mut_string())
                    .id(text_edit_id)
                    .desired_width(ui.available_width())
                    .margin(egui::Vec2::splat(4.0))
                    .font(theme.font.clone())
                    .lock_focus(true)
                    .show(ui);
                overlay.edit_mut().enforce_limit();

                let response = text_edit.response;
                if response.gained_focus() {
                    overlay.handle(ConsoleInput::Focus, queue);
                }
                if response.lost_focus() {
                    overlay.handle(ConsoleInput::Blur, queue);
                }

                if state.request_focus {
                    state.request_focus = false;
                    ui.ctx().memory_mut(|mem| mem.request_focus(text_edit_id));
                    overlay.handle(ConsoleInput::Focus, queue);
                }
            });
        });

    let snap = overlay.view_mut().observe(log.total_logged());
    let layout = overlay.view().layout(log.len(), visible_rows);
    let entries = log.snapshot(layout.lines());

    match layout {
        ViewLayout::Pinned { blank_rows, .. } => {
            ui.vertical(|ui| {
                ui.add_space(blank_rows as f32 * row_height);
                for (id, entry) in entries.iter().enumerate() {
                    add_log(ui, id, entry, false, theme);
                }
            });
        }
        ViewLayout::Flow { .. } => {
            egui::ScrollArea::new([false, true])
                .auto_shrink([false, true])
                .show(ui, |ui| {
                    ui.vertical(|ui| {
                        let last = entries.len().saturating_sub(1);
                        for (id, entry) in entries.iter().enumerate() {
                            add_log(ui, id, entry, snap && id == last, theme);
                        }
                    });
                });
        }
    }
}

fn add_log(ui: &mut egui::Ui, id: usize, entry: &LogEntry, scroll_to: bool, theme: &ConsoleTheme) {
    ui.push_id(id, |ui| {
        let label = ui.add(egui::Label::new(format_line(entry, theme)).sense(egui::Sense::click()));

        if scroll_to {
            label.scroll_to_me(Some(egui::Align::Max));
        }

        // Copy message to clipboard on click
        if label.clicked() {
            ui.ctx().copy_text(entry.message.clone());
        }

        label.on_hover_text("Click to copy message");
    });
}

/// Lay out one entry: timestamp, repeat count, colored tag, message.
fn format_line(entry: &LogEntry, theme: &ConsoleTheme) -> LayoutJob {
    let mut text = LayoutJob::default();
    text.append(&format_time(entry.timestamp), 0.0, theme.format_dark());
    if entry.repeats > 1 {
        text.append(&format!(" ({} times)", entry.repeats), 0.0, theme.format_dark());
    }
    text.append(
        &format!(" [{}]", entry.severity.tag()),
        0.0,
        theme.format_severity(entry.severity),
    );
    text.append(&format!(" {}", entry.message), 0.0, theme.format_text());
    text
}
