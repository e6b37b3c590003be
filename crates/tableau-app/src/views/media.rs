//! Picture and video cards.
//!
//! Both are wrapper cards: the whole surface drags the card, so every control
//! here is a regular egui widget that wins the pointer over that surface.

use egui::{Align2, Color32, CornerRadius, FontId, Key, Rect, RichText, Sense, Stroke, Ui, vec2};
use kurbo::Size;
use tableau_core::widgets::{Loadable, MAX_CAPTION_CHARS, MediaKind, MediaState, VideoSource};
use tableau_core::{WidgetId, WidgetKind};
use tableau_widgets::{Card, CardPart, CardWidth, IconButton, Palette, TextButton, empty_slot};

use super::{ViewCx, WidgetResponse};
use crate::board::{PictureWidget, VideoWidget, submit_picture_url, submit_video_url};
use crate::icons;
use crate::platform;

/// Height of the caption strip under the media.
const CAPTION_HEIGHT: f32 = 60.0;
const RESIZE_HANDLE: f32 = 16.0;
/// Horizontal inner margin of a card body, both sides.
const BODY_MARGIN: f32 = 20.0;

pub(super) fn show_picture(ui: &mut Ui, id: &WidgetId, widget: &mut PictureWidget, cx: &mut ViewCx<'_>) -> WidgetResponse {
    let card = Card::new(WidgetKind::Picture.layout().title, media_width(&widget.media)).lifted(cx.lifted);

    card.show(ui, |part, ui| match part {
        CardPart::Actions => {
            if let Some(action) = header_actions(ui, &widget.media) {
                match action {
                    HeaderAction::Pick => cx.loader.pick_file(id.clone(), MediaKind::Picture),
                    HeaderAction::ToggleUrl => widget.media.toggle_url_panel(),
                    HeaderAction::Remove => widget.media.remove(),
                    HeaderAction::Open => {}
                }
            }
        }
        CardPart::Body => {
            if widget.media.url_panel_open()
                && url_panel(ui, &mut widget.media, "https://exemple.com/image.jpg")
            {
                submit_picture_url(widget, id, cx.loader);
            }

            let area = media_area(&widget.media);
            let (rect, response) = ui.allocate_exact_size(area, Sense::hover());
            match widget.media.load() {
                Loadable::Idle => {
                    let slot = ui.put(rect, |ui: &mut Ui| {
                        empty_slot(ui, area, "Cliquez pour charger une image")
                    });
                    if slot.clicked() {
                        cx.loader.pick_file(id.clone(), MediaKind::Picture);
                    }
                }
                Loadable::Loading { .. } => loading(ui, rect),
                Loadable::Ready(picture) => {
                    let texture = egui::load::SizedTexture::from_handle(&picture.texture);
                    egui::Image::new(texture)
                        .fit_to_exact_size(area)
                        .corner_radius(CornerRadius::same(4))
                        .paint_at(ui, rect);
                }
                Loadable::Failed(err) => failed(ui, rect, "Image introuvable", &err.to_string()),
            }
            resize_handle(ui, rect, &response, &mut widget.media);
            caption_strip(ui, &mut widget.media, &mut widget.caption_input);
        }
    });

    WidgetResponse::default()
}

pub(super) fn show_video(ui: &mut Ui, id: &WidgetId, widget: &mut VideoWidget, cx: &mut ViewCx<'_>) -> WidgetResponse {
    let card = Card::new(WidgetKind::Video.layout().title, media_width(&widget.media)).lifted(cx.lifted);
    let host = cx.host;

    card.show(ui, |part, ui| match part {
        CardPart::Actions => {
            if let Some(action) = header_actions(ui, &widget.media) {
                match action {
                    HeaderAction::Pick => cx.loader.pick_file(id.clone(), MediaKind::Video),
                    HeaderAction::ToggleUrl => widget.media.toggle_url_panel(),
                    HeaderAction::Remove => {
                        widget.media.remove();
                        widget.playback = Default::default();
                    }
                    HeaderAction::Open => {
                        if let Some(source) = widget.media.load().ready() {
                            platform::open_url(ui.ctx(), &source.open_url(host));
                        }
                    }
                }
            }
        }
        CardPart::Body => {
            if widget.media.url_panel_open()
                && url_panel(ui, &mut widget.media, "https://youtube.com/watch?v=...")
            {
                submit_video_url(widget);
            }

            let area = media_area(&widget.media);
            let (rect, response) = ui.allocate_exact_size(area, Sense::hover());
            match widget.media.load() {
                Loadable::Idle => {
                    let slot = ui.put(rect, |ui: &mut Ui| {
                        empty_slot(ui, area, "Cliquez pour charger une vidéo")
                    });
                    if slot.clicked() {
                        cx.loader.pick_file(id.clone(), MediaKind::Video);
                    }
                }
                Loadable::Loading { .. } => loading(ui, rect),
                Loadable::Ready(source) => {
                    let source = source.clone();
                    player(ui, rect, widget, &source, host);
                }
                Loadable::Failed(err) => failed(ui, rect, "Vidéo introuvable", &err.to_string()),
            }
            resize_handle(ui, rect, &response, &mut widget.media);
            caption_strip(ui, &mut widget.media, &mut widget.caption_input);
        }
    });

    WidgetResponse::default()
}

/// Poster with the player controls.
///
/// egui cannot decode video, so playback happens in the browser or the
/// system player. Embeddable hosts open their player page; direct files get
/// play and mute buttons that hand the file over when playback starts.
fn player(ui: &mut Ui, rect: Rect, widget: &mut VideoWidget, source: &VideoSource, host: &str) {
    let palette = Palette::of(ui);
    ui.painter()
        .rect_filled(rect, CornerRadius::same(4), Color32::from_gray(20));
    ui.painter().text(
        rect.center() - vec2(0.0, 24.0),
        Align2::CENTER_CENTER,
        source.label(),
        FontId::proportional(24.0),
        Color32::WHITE,
    );
    ui.painter().text(
        rect.center(),
        Align2::CENTER_CENTER,
        widget.media.caption(),
        FontId::proportional(13.0),
        Color32::from_gray(180),
    );

    let controls = Rect::from_center_size(rect.center() + vec2(0.0, 36.0), vec2(rect.width(), 32.0));
    ui.scope_builder(egui::UiBuilder::new().max_rect(controls), |ui| {
        ui.horizontal_centered(|ui| {
            ui.add_space((controls.width() - 3.0 * 36.0).max(0.0) / 2.0);
            if source.is_direct() {
                let (icon, tip) = if widget.playback.playing {
                    (icons::pause(), "Pause")
                } else {
                    (icons::play(), "Lecture")
                };
                if IconButton::new(icon, tip).show(ui) {
                    widget.playback.toggle_play();
                    if widget.playback.playing {
                        platform::open_url(ui.ctx(), &source.open_url(host));
                    }
                }
                let (icon, tip) = if widget.playback.muted {
                    (icons::volume_off(), "Activer le son")
                } else {
                    (icons::volume(), "Couper le son")
                };
                if IconButton::new(icon, tip).selected(widget.playback.muted).show(ui) {
                    widget.playback.toggle_mute();
                }
            } else if IconButton::new(icons::play(), "Lecture").show(ui) {
                platform::open_url(ui.ctx(), &source.open_url(host));
            }
            if IconButton::new(icons::external_link(), "Ouvrir dans un nouvel onglet").show(ui) {
                platform::open_url(ui.ctx(), &source.open_url(host));
            }
        });
    });

    if widget.playback.playing {
        ui.painter().rect_stroke(
            rect,
            CornerRadius::same(4),
            Stroke::new(2.0, palette.chart(0)),
            egui::StrokeKind::Inside,
        );
    }
}

enum HeaderAction {
    Pick,
    ToggleUrl,
    Remove,
    Open,
}

/// Title bar buttons, laid out right to left.
fn header_actions<T>(ui: &mut Ui, media: &MediaState<T>) -> Option<HeaderAction> {
    let busy = media.load().is_loading();
    let (pick_tip, url_tip) = match media.kind() {
        MediaKind::Picture => ("Charger une image depuis un fichier", "Charger une image depuis une URL"),
        MediaKind::Video => ("Charger une vidéo depuis un fichier", "Charger une vidéo depuis une URL"),
    };
    let mut action = None;
    if media.load().ready().is_some() {
        let remove_tip = match media.kind() {
            MediaKind::Picture => "Supprimer l'image",
            MediaKind::Video => "Supprimer la vidéo",
        };
        if IconButton::new(icons::trash(), remove_tip).small().show(ui) {
            action = Some(HeaderAction::Remove);
        }
        if media.kind() == MediaKind::Video
            && IconButton::new(icons::external_link(), "Ouvrir dans un nouvel onglet").small().show(ui)
        {
            action = Some(HeaderAction::Open);
        }
    }
    if IconButton::new(icons::link(), url_tip)
        .small()
        .selected(media.url_panel_open())
        .enabled(!busy)
        .show(ui)
    {
        action = Some(HeaderAction::ToggleUrl);
    }
    if IconButton::new(icons::upload(), pick_tip).small().enabled(!busy).show(ui) {
        action = Some(HeaderAction::Pick);
    }
    action
}

/// URL field with OK and cancel. Returns true when the URL was submitted.
fn url_panel<T>(ui: &mut Ui, media: &mut MediaState<T>, hint: &str) -> bool {
    let palette = Palette::of(ui);
    let mut submit = false;
    ui.horizontal(|ui| {
        let response = ui.add(
            egui::TextEdit::singleline(&mut media.url_input)
                .hint_text(hint)
                .desired_width(ui.available_width() - 80.0),
        );
        if response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter)) {
            submit = true;
        }
        if TextButton::new("OK")
            .fill(palette.chart(0))
            .height(24.0)
            .enabled(!media.url_input.trim().is_empty())
            .show(ui)
        {
            submit = true;
        }
        if IconButton::new(icons::close(), "Annuler").small().show(ui) {
            media.toggle_url_panel();
        }
    });
    if let Loadable::Failed(_) = media.load() {
        let message = match media.kind() {
            MediaKind::Picture => "Impossible de charger l'image. Vérifiez l'URL.",
            MediaKind::Video => "Impossible de charger la vidéo. Vérifiez l'URL.",
        };
        ui.label(RichText::new(message).size(11.0).color(palette.chart(2)));
    }
    ui.add_space(6.0);
    submit
}

/// Caption under the media. Double-click to edit, Enter or leaving the
/// field applies, Escape cancels.
fn caption_strip<T>(ui: &mut Ui, media: &mut MediaState<T>, editing: &mut Option<String>) {
    let palette = Palette::of(ui);
    let width = media.size().width as f32;
    let (rect, _) = ui.allocate_exact_size(vec2(width, CAPTION_HEIGHT), Sense::hover());
    ui.painter().hline(rect.x_range(), rect.top(), Stroke::new(2.0, palette.border));
    let inner = rect.shrink2(vec2(12.0, 8.0));

    ui.scope_builder(egui::UiBuilder::new().max_rect(inner), |ui| {
        ui.horizontal_centered(|ui| match editing {
            Some(text) => {
                let response = ui.add(
                    egui::TextEdit::singleline(text)
                        .char_limit(MAX_CAPTION_CHARS)
                        .desired_width(inner.width()),
                );
                if !response.has_focus() && !response.lost_focus() {
                    response.request_focus();
                }
                if response.lost_focus() {
                    if !ui.input(|i| i.key_pressed(Key::Escape)) {
                        media.set_caption(text);
                    }
                    *editing = None;
                }
            }
            None => {
                let label = egui::Label::new(RichText::new(media.caption()).size(15.0).strong())
                    .truncate()
                    .sense(Sense::click());
                if ui.add(label).on_hover_text("Double-cliquez pour éditer").double_clicked() {
                    *editing = Some(media.caption().to_string());
                }
            }
        });
    });
}

/// Drag the bottom-right corner to resize.
fn resize_handle<T>(ui: &mut Ui, media_rect: Rect, media_response: &egui::Response, media: &mut MediaState<T>) {
    let palette = Palette::of(ui);
    let corner = Rect::from_min_size(
        media_rect.max - vec2(RESIZE_HANDLE, RESIZE_HANDLE),
        vec2(RESIZE_HANDLE, RESIZE_HANDLE),
    );
    let response = ui
        .interact(corner, media_response.id.with("resize"), Sense::drag())
        .on_hover_cursor(egui::CursorIcon::ResizeNwSe);
    if response.dragged() {
        let delta = response.drag_delta();
        let size = media.size();
        media.resize(Size::new(size.width + delta.x as f64, size.height + delta.y as f64));
    }
    let color = if response.hovered() || response.dragged() {
        palette.accent
    } else {
        palette.text_muted
    };
    for offset in [4.0, 8.0, 12.0] {
        ui.painter().line_segment(
            [
                corner.right_bottom() - vec2(offset, 2.0),
                corner.right_bottom() - vec2(2.0, offset),
            ],
            Stroke::new(1.5, color),
        );
    }
}

fn loading(ui: &mut Ui, rect: Rect) {
    let palette = Palette::of(ui);
    ui.painter().rect_filled(rect, CornerRadius::same(4), palette.background);
    let spinner = Rect::from_center_size(rect.center() - vec2(0.0, 12.0), vec2(24.0, 24.0));
    ui.put(spinner, egui::Spinner::new().size(24.0));
    ui.painter().text(
        rect.center() + vec2(0.0, 20.0),
        Align2::CENTER_CENTER,
        "Chargement...",
        FontId::proportional(13.0),
        palette.text_muted,
    );
}

fn failed(ui: &mut Ui, rect: Rect, title: &str, detail: &str) {
    let palette = Palette::of(ui);
    ui.painter().rect_filled(rect, CornerRadius::same(4), palette.background);
    ui.painter().text(
        rect.center() - vec2(0.0, 12.0),
        Align2::CENTER_CENTER,
        title,
        FontId::proportional(17.0),
        palette.text_muted,
    );
    ui.painter().text(
        rect.center() + vec2(0.0, 12.0),
        Align2::CENTER_CENTER,
        detail,
        FontId::proportional(11.0),
        palette.chart(2),
    );
}

fn media_width<T>(media: &MediaState<T>) -> CardWidth {
    CardWidth::exact(media.size().width as f32 + BODY_MARGIN)
}

/// Media area: the stored size minus the caption strip.
fn media_area<T>(media: &MediaState<T>) -> egui::Vec2 {
    let size = media.size();
    vec2(size.width as f32, (size.height as f32 - CAPTION_HEIGHT).max(RESIZE_HANDLE * 2.0))
}
