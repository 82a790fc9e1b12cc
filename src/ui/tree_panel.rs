//! Tree panel UI rendering
//!
//! Handles the left panel with the category → mod tree, its filter box and
//! the category editor. Rows are drag sources and drop targets.

use crate::ui::rows::{render_row, ROW_HEIGHT};
use crate::ui::table_header::{render_sort_header, Column};
use eframe::egui;
use egui::{RichText, ScrollArea};
use modshelf::app::AppState;
use modshelf::domain::drag::DropTarget;
use modshelf::domain::markup::strip_inline_markup;
use modshelf::domain::sorting::TreeSortKey;
use modshelf::domain::visibility::TreeRow;
use modshelf::model::{CategoryId, ModId, TreeNode};
use modshelf::state::{Panel, SelectModifiers, SelectionSummary};

/// Result of tree panel interactions that need to be handled by the application.
pub enum TreePanelInteraction {
    /// A row was clicked
    NodeClicked {
        node: TreeNode,
        modifiers: SelectModifiers,
    },
    ExpandToggled(CategoryId),
    CheckedToggled { id: ModId, enabled: bool },
    SortRequested(TreeSortKey),
    FilterChanged(String),
    ModDragStarted(ModId),
    CategoryDragStarted(CategoryId),
    CreateCategory(String),
    RenameCategory { old: CategoryId, new: String },
    RemoveSelectedCategories,
}

const INDENT: f32 = 18.0;
const CHECK_WIDTH: f32 = 22.0;

fn columns() -> [Column<TreeSortKey>; 4] {
    [
        Column { label: "Name", key: TreeSortKey::Name, width: Some(240.0) },
        Column { label: "Type", key: TreeSortKey::Type, width: Some(80.0) },
        Column { label: "Creator", key: TreeSortKey::Creator, width: Some(120.0) },
        Column { label: "Size", key: TreeSortKey::Size, width: None },
    ]
}

/// Renders the complete tree panel.
///
/// `hovered` receives the drop target under the pointer while a drag is in
/// progress.
pub fn render_tree_panel(
    ui: &mut egui::Ui,
    state: &mut AppState,
    hovered: &mut Option<DropTarget>,
) -> Vec<TreePanelInteraction> {
    let mut out = Vec::new();

    render_toolbar(ui, state, &mut out);
    ui.separator();

    if state.status.is_blocked(Panel::Tree) {
        ui.centered_and_justified(|ui| {
            ui.spinner();
        });
        return out;
    }

    if let Some(key) = render_sort_header(ui, INDENT + CHECK_WIDTH, &columns(), state.tree_view.sort()) {
        out.push(TreePanelInteraction::SortRequested(key));
    }
    ui.separator();

    let rows = state.tree_rows();
    let input = ui.input(|i| i.modifiers);
    let modifiers = SelectModifiers {
        extend: input.command,
        range: input.shift,
    };

    ScrollArea::vertical()
        .id_salt("tree_scroll_area")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            if rows.is_empty() {
                ui.weak("Nothing matches the filter");
            }
            for row in &rows {
                match row {
                    TreeRow::Category {
                        id,
                        expanded,
                        visible_children,
                    } => render_category_row(ui, state, id, *expanded, *visible_children, modifiers, hovered, &mut out),
                    TreeRow::Mod { id, category } => {
                        render_mod_row(ui, state, id, category, modifiers, hovered, &mut out)
                    }
                }
            }
        });

    out
}

fn render_toolbar(ui: &mut egui::Ui, state: &mut AppState, out: &mut Vec<TreePanelInteraction>) {
    ui.horizontal(|ui| {
        ui.label("🔍");
        let mut filter = state.tree_view.filter_text().to_string();
        let response = ui.add(
            egui::TextEdit::singleline(&mut filter)
                .hint_text("Filter mods and categories")
                .desired_width(f32::INFINITY),
        );
        if response.changed() {
            out.push(TreePanelInteraction::FilterChanged(filter));
        }
    });

    ui.horizontal(|ui| {
        let response = ui.add(
            egui::TextEdit::singleline(state.layout.new_category_text_mut())
                .hint_text("New category")
                .desired_width(140.0),
        );
        let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if ui.button("➕ Add").clicked() || submitted {
            let name = std::mem::take(state.layout.new_category_text_mut());
            out.push(TreePanelInteraction::CreateCategory(name));
        }

        if let SelectionSummary::Single(TreeNode::Category(id)) = state.selection.summary() {
            if !state.tree.is_default(id.as_str()) {
                ui.separator();
                ui.add(
                    egui::TextEdit::singleline(state.layout.rename_text_mut())
                        .hint_text(id.as_str())
                        .desired_width(140.0),
                );
                if ui.button("✏ Rename").clicked() {
                    let new = std::mem::take(state.layout.rename_text_mut());
                    out.push(TreePanelInteraction::RenameCategory { old: id, new });
                }
            }
        }

        let removable = state
            .selection
            .selected_categories()
            .iter()
            .any(|id| !state.tree.is_default(id.as_str()));
        if removable && ui.button("🗑 Delete").clicked() {
            out.push(TreePanelInteraction::RemoveSelectedCategories);
        }
    });
}

#[allow(clippy::too_many_arguments)]
fn render_category_row(
    ui: &mut egui::Ui,
    state: &AppState,
    id: &CategoryId,
    expanded: bool,
    visible_children: usize,
    modifiers: SelectModifiers,
    hovered: &mut Option<DropTarget>,
    out: &mut Vec<TreePanelInteraction>,
) {
    let node = TreeNode::Category(id.clone());
    let target = DropTarget::Category(id.clone());
    let selected = state.selection.is_selected(&node);
    let highlighted = state.drag.is_highlighted(&target);

    let response = render_row(ui, ("category", id.as_str()), selected, highlighted, |ui| {
        let arrow = if expanded { "⏷" } else { "⏵" };
        if ui.small_button(arrow).clicked() {
            out.push(TreePanelInteraction::ExpandToggled(id.clone()));
        }
        ui.add(
            egui::Label::new(RichText::new(format!("{id} ({visible_children})")).strong())
                .selectable(false),
        );
    });

    if response.drag_started() {
        out.push(TreePanelInteraction::CategoryDragStarted(id.clone()));
    }
    if response.double_clicked() {
        out.push(TreePanelInteraction::ExpandToggled(id.clone()));
    } else if response.clicked() {
        out.push(TreePanelInteraction::NodeClicked { node, modifiers });
    }
    if state.drag.is_dragging() && response.contains_pointer() {
        *hovered = Some(target);
    }
}

fn render_mod_row(
    ui: &mut egui::Ui,
    state: &AppState,
    id: &ModId,
    category: &CategoryId,
    modifiers: SelectModifiers,
    hovered: &mut Option<DropTarget>,
    out: &mut Vec<TreePanelInteraction>,
) {
    let Some(item) = state.tree.mod_item(id.as_str()) else {
        return;
    };
    let node = TreeNode::Mod(id.clone());
    // Mod rows hand drops to their category.
    let target = DropTarget::Category(category.clone());
    let selected = state.selection.is_selected(&node);
    let highlighted = state.drag.is_highlighted(&target);
    let [name_w, type_w, creator_w, _] = columns().map(|c| c.width.unwrap_or(0.0));

    let response = render_row(ui, ("mod", id.as_str()), selected, highlighted, |ui| {
        ui.add_space(INDENT);
        let mut checked = item.is_checked;
        if ui.checkbox(&mut checked, "").changed() {
            out.push(TreePanelInteraction::CheckedToggled {
                id: id.clone(),
                enabled: checked,
            });
        }
        cell(ui, name_w, &strip_inline_markup(&item.name));
        cell(ui, type_w, &item.mod_type);
        cell(ui, creator_w, &item.creator);
        ui.add(egui::Label::new(item.size.as_str()).selectable(false));
    });

    if response.drag_started() {
        out.push(TreePanelInteraction::ModDragStarted(id.clone()));
    }
    if response.clicked() {
        out.push(TreePanelInteraction::NodeClicked { node, modifiers });
    }
    if state.drag.is_dragging() && response.contains_pointer() {
        *hovered = Some(target);
    }
}

fn cell(ui: &mut egui::Ui, width: f32, text: &str) {
    ui.add_sized(
        [width, ROW_HEIGHT],
        egui::Label::new(text).selectable(false).truncate(),
    );
}
