//! UI components using egui.

use egui::{Context, Id, Pos2, Rect, RichText, Vec2, pos2, vec2};
use tableau_core::{BoundsPolicy, DragVariant, PointerTarget, ToolRegistry, WidgetId, WidgetKind};
use tableau_render::{GridStyle, widget_rect};
use tableau_widgets::{
    IconButton, Palette, menu_item, menu_separator, panel_frame, section_label, sidebar_frame,
};

use crate::board::Board;
use crate::grab::{card_area, grab_surface, grip_press, surface_press};
use crate::icons;
use crate::loader::MediaLoader;
use crate::views::{RosterStatus, ViewCx, show_clock, show_widget};

#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;
#[cfg(target_arch = "wasm32")]
use web_time::Instant;

const SIDEBAR_WIDTH: f32 = 240.0;
const MARGIN: f32 = 12.0;

/// UI state that lives outside the board.
#[derive(Debug, Clone)]
pub struct UiState {
    pub sidebar_open: bool,
    pub grid_style: GridStyle,
    pub bounds: BoundsPolicy,
    /// Page host, for video embed URLs.
    pub host: String,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            sidebar_open: true,
            grid_style: GridStyle::default(),
            bounds: BoundsPolicy::default(),
            host: crate::platform::page_host(),
        }
    }
}

/// Actions triggered by the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    AddTool(WidgetKind),
    ToggleTheme,
    CycleGrid,
    ToggleBounds,
    ToggleSidebar,
    RefetchUsers,
}

/// What the UI reported this frame.
#[derive(Debug, Clone)]
pub struct UiOutput {
    pub action: Option<UiAction>,
    /// Screen region of the canvas, in logical pixels.
    pub canvas_rect: Rect,
    /// Grab surface a primary press landed on this frame.
    pub pressed: Option<PointerTarget>,
}

/// Render all UI and return any triggered action.
pub fn render_ui(
    ctx: &Context,
    ui_state: &UiState,
    board: &mut Board,
    loader: &MediaLoader,
    now: Instant,
) -> UiOutput {
    egui_extras::install_image_loaders(ctx);

    let dark = board.app_state.theme().is_dark();
    if ctx.style().visuals.dark_mode != dark {
        ctx.set_visuals(Palette::for_dark_mode(dark).visuals(dark));
    }
    let palette = Palette::for_dark_mode(dark);

    let sidebar_action = if ui_state.sidebar_open {
        render_sidebar(ctx, palette)
    } else {
        None
    };

    #[allow(deprecated)]
    let screen = ctx.input(|i| i.content_rect());
    let left = if ui_state.sidebar_open { screen.left() + SIDEBAR_WIDTH } else { screen.left() };
    let canvas_rect = Rect::from_min_max(pos2(left, screen.top()), screen.max);

    let toolbar_action = render_toolbar(ctx, ui_state, board, canvas_rect.min);
    let (pressed, refetch) = render_canvas(ctx, ui_state, board, loader, canvas_rect.min, now);
    show_clock(ctx, palette);

    let action = sidebar_action
        .or(toolbar_action)
        .or(refetch.then_some(UiAction::RefetchUsers));
    UiOutput {
        action,
        canvas_rect,
        pressed,
    }
}

/// Tool sidebar: tools by category, then every tool.
fn render_sidebar(ctx: &Context, palette: &Palette) -> Option<UiAction> {
    let mut action = None;

    egui::SidePanel::left("tool_sidebar")
        .resizable(false)
        .exact_width(SIDEBAR_WIDTH)
        .frame(sidebar_frame(palette))
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new("Outils").size(28.0).italics().strong());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if IconButton::new(icons::menu(), "Fermer le panneau").show(ui) {
                        action = Some(UiAction::ToggleSidebar);
                    }
                });
            });
            ui.add_space(8.0);

            egui::ScrollArea::vertical().show(ui, |ui| {
                section_label(ui, "Outils par Catégorie");
                for (category, kinds) in ToolRegistry::catalog() {
                    egui::CollapsingHeader::new(RichText::new(category.label()).strong())
                        .id_salt(("category", category.label()))
                        .default_open(category == tableau_core::ToolCategory::Media)
                        .show(ui, |ui| {
                            for kind in kinds {
                                if menu_item(ui, icons::tool(kind), kind.display_name()) {
                                    action = Some(UiAction::AddTool(kind));
                                }
                            }
                        });
                }

                menu_separator(ui);
                section_label(ui, "Tous les Outils");
                for kind in WidgetKind::ALL {
                    if menu_item(ui, icons::tool(kind), kind.display_name()) {
                        action = Some(UiAction::AddTool(kind));
                    }
                }
            });
        });

    action
}

/// Top-left toolbar over the canvas: sidebar trigger, theme, wallpaper, bounds.
fn render_toolbar(ctx: &Context, ui_state: &UiState, board: &Board, origin: Pos2) -> Option<UiAction> {
    let mut action = None;
    let palette = Palette::for_dark_mode(board.app_state.theme().is_dark());

    egui::Area::new(Id::new("toolbar"))
        .fixed_pos(origin + vec2(MARGIN, MARGIN))
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            panel_frame(palette).show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.spacing_mut().item_spacing = Vec2::new(6.0, 0.0);
                    if !ui_state.sidebar_open
                        && IconButton::new(icons::menu(), "Ouvrir le panneau").show(ui)
                    {
                        action = Some(UiAction::ToggleSidebar);
                    }

                    let (icon, tip) = if board.app_state.theme().is_dark() {
                        (icons::sun(), "Thème clair")
                    } else {
                        (icons::moon(), "Thème sombre")
                    };
                    if IconButton::new(icon, tip).show(ui) {
                        action = Some(UiAction::ToggleTheme);
                    }

                    let grid_tip = format!("Fond : {}", ui_state.grid_style.name());
                    if IconButton::new(icons::grid(), &grid_tip).show(ui) {
                        action = Some(UiAction::CycleGrid);
                    }

                    let (icon, tip) = match ui_state.bounds {
                        BoundsPolicy::Viewport => (icons::lock(), "Widgets gardés dans l'écran"),
                        BoundsPolicy::Unbounded => (icons::unlock(), "Widgets libres"),
                    };
                    if IconButton::new(icon, tip)
                        .selected(ui_state.bounds == BoundsPolicy::Viewport)
                        .show(ui)
                    {
                        action = Some(UiAction::ToggleBounds);
                    }
                });
            });
        });

    action
}

/// One area per widget, in paint order, at its live position.
///
/// Returns the grab surface a press landed on, and whether a view asked to
/// reload the user directory.
fn render_canvas(
    ctx: &Context,
    ui_state: &UiState,
    board: &mut Board,
    loader: &MediaLoader,
    origin: Pos2,
    now: Instant,
) -> (Option<PointerTarget>, bool) {
    let roster = RosterStatus::from_query(board.directory.cache().state());
    let mut pressed = None;
    let mut refetch = false;

    if board.canvas.session().is_some() {
        ctx.set_cursor_icon(egui::CursorIcon::Grabbing);
    }

    let widgets: Vec<(WidgetId, WidgetKind)> = board
        .canvas
        .paint_order()
        .into_iter()
        .map(|d| (d.id.clone(), d.kind))
        .collect();

    for (id, kind) in widgets {
        let lifted = board.canvas.is_dragging(&id);
        let pos = board.canvas.visual_position(&id);
        let surface_rect = match kind.layout().variant {
            DragVariant::Wrapper => widget_rect(&board.canvas, &id).map(|r| to_screen(r, origin)),
            DragVariant::Item => None,
        };
        let Some((state, app_state, rng)) = board.view_parts(&id) else {
            continue;
        };

        let shown = card_area(&id, origin + vec2(pos.x as f32, pos.y as f32), lifted).show(ctx, |ui| {
            let surface = surface_rect.map(|rect| grab_surface(ui, rect));
            let mut cx = ViewCx {
                app_state,
                rng,
                loader,
                roster: &roster,
                host: &ui_state.host,
                lifted,
                now,
            };
            let response = show_widget(ui, &id, state, &mut cx);
            let target = match (&surface, &response.grip) {
                (Some(surface), _) => surface_press(ctx, &id, surface),
                (None, Some(grip)) => grip_press(ctx, &id, grip),
                (None, None) => None,
            };
            (target, response.refetch_users)
        });

        let (target, wants_refetch) = shown.inner;
        refetch |= wants_refetch;
        if target.is_some() {
            pressed = target;
        }

        let rect = shown.response.rect;
        board.canvas.record_layout(
            &id,
            kurbo::Rect::new(
                (rect.min.x - origin.x) as f64,
                (rect.min.y - origin.y) as f64,
                (rect.max.x - origin.x) as f64,
                (rect.max.y - origin.y) as f64,
            ),
        );
    }

    (pressed, refetch)
}

/// Canvas rectangle to screen coordinates.
fn to_screen(rect: kurbo::Rect, origin: Pos2) -> Rect {
    Rect::from_min_max(
        origin + vec2(rect.x0 as f32, rect.y0 as f32),
        origin + vec2(rect.x1 as f32, rect.y1 as f32),
    )
}
