//! Tool registry: the kinds of widget a teacher can place on the board.

use std::collections::HashMap;

use kurbo::Point;
use serde::{Deserialize, Serialize};

use crate::position::WidgetId;

/// Available widget kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WidgetKind {
    Picture,
    Video,
    Instruction,
    Timer,
    Groups,
}

/// Sidebar section a tool is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolCategory {
    Media,
    Pedagogy,
    Collaboration,
}

impl ToolCategory {
    pub const ALL: [ToolCategory; 3] = [
        ToolCategory::Media,
        ToolCategory::Pedagogy,
        ToolCategory::Collaboration,
    ];

    /// Section heading.
    pub fn label(self) -> &'static str {
        match self {
            ToolCategory::Media => "Outils Média",
            ToolCategory::Pedagogy => "Outils Pédagogiques",
            ToolCategory::Collaboration => "Outils Collaboratifs",
        }
    }
}

/// How a widget is grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DragVariant {
    /// The whole surface is the grab handle.
    Wrapper,
    /// A card with a title bar and a grip handle.
    Item,
}

/// Width constraint of a widget card.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WidthPolicy {
    /// Always exactly this wide.
    Fixed(f64),
    /// Fit the content, but no narrower than `min` nor wider than `max`.
    Auto { min: f64, max: f64 },
    /// Free width between `min` and `max`.
    Bounded { min: f64, max: f64 },
}

impl Default for WidthPolicy {
    fn default() -> Self {
        WidthPolicy::Bounded { min: 300.0, max: 500.0 }
    }
}

impl WidthPolicy {
    /// Resolve the `(min, max)` width for the given content width.
    pub fn resolve(self, content_width: f64) -> (f64, f64) {
        match self {
            WidthPolicy::Fixed(w) => (w, w),
            WidthPolicy::Auto { min, max } => {
                let max = max.max(min);
                let w = content_width.max(min).min(max);
                (w, w)
            }
            WidthPolicy::Bounded { min, max } => (min, max.max(min)),
        }
    }
}

/// Default placement and chrome of a widget kind.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetLayout {
    pub title: &'static str,
    pub variant: DragVariant,
    pub initial_position: Point,
    pub width: WidthPolicy,
    pub show_grip: bool,
}

impl WidgetKind {
    pub const ALL: [WidgetKind; 5] = [
        WidgetKind::Picture,
        WidgetKind::Video,
        WidgetKind::Instruction,
        WidgetKind::Timer,
        WidgetKind::Groups,
    ];

    /// Name shown in the sidebar.
    pub fn display_name(self) -> &'static str {
        match self {
            WidgetKind::Picture => "Photo",
            WidgetKind::Video => "Vidéo",
            WidgetKind::Instruction => "Consigne",
            WidgetKind::Timer => "Timer",
            WidgetKind::Groups => "Groupe",
        }
    }

    /// Prefix of generated widget ids.
    pub fn slug(self) -> &'static str {
        match self {
            WidgetKind::Picture => "picture",
            WidgetKind::Video => "video",
            WidgetKind::Instruction => "instruction",
            WidgetKind::Timer => "timer",
            WidgetKind::Groups => "groups",
        }
    }

    pub fn category(self) -> ToolCategory {
        match self {
            WidgetKind::Picture | WidgetKind::Video => ToolCategory::Media,
            WidgetKind::Instruction | WidgetKind::Timer => ToolCategory::Pedagogy,
            WidgetKind::Groups => ToolCategory::Collaboration,
        }
    }

    /// Icon name (file stem of the sidebar SVG).
    pub fn icon(self) -> &'static str {
        match self {
            WidgetKind::Picture => "image",
            WidgetKind::Video => "video",
            WidgetKind::Instruction => "text",
            WidgetKind::Timer => "timer",
            WidgetKind::Groups => "users",
        }
    }

    /// Default layout of a freshly added widget.
    pub fn layout(self) -> WidgetLayout {
        let card = WidthPolicy::Auto { min: 200.0, max: 1300.0 };
        match self {
            WidgetKind::Picture => WidgetLayout {
                title: "Image",
                variant: DragVariant::Wrapper,
                initial_position: Point::new(700.0, 200.0),
                width: WidthPolicy::Bounded { min: 300.0, max: 2560.0 },
                show_grip: false,
            },
            WidgetKind::Video => WidgetLayout {
                title: "Vidéo",
                variant: DragVariant::Wrapper,
                initial_position: Point::new(400.0, 200.0),
                width: WidthPolicy::Bounded { min: 300.0, max: 1920.0 },
                show_grip: false,
            },
            WidgetKind::Instruction => WidgetLayout {
                title: "Consigne",
                variant: DragVariant::Item,
                initial_position: Point::new(400.0, 200.0),
                width: card,
                show_grip: true,
            },
            WidgetKind::Timer => WidgetLayout {
                title: "Timer",
                variant: DragVariant::Item,
                initial_position: Point::new(800.0, 400.0),
                width: card,
                show_grip: true,
            },
            WidgetKind::Groups => WidgetLayout {
                title: "Groupe",
                variant: DragVariant::Item,
                initial_position: Point::new(400.0, 200.0),
                width: card,
                show_grip: true,
            },
        }
    }
}

/// A mounted widget.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetDescriptor {
    pub id: WidgetId,
    pub kind: WidgetKind,
    pub initial_position: Point,
}

/// Ordered list of the widgets on the board.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    active: Vec<WidgetDescriptor>,
    counters: HashMap<WidgetKind, u32>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tool kinds grouped by sidebar section.
    pub fn catalog() -> Vec<(ToolCategory, Vec<WidgetKind>)> {
        ToolCategory::ALL
            .into_iter()
            .map(|category| {
                let kinds = WidgetKind::ALL
                    .into_iter()
                    .filter(|kind| kind.category() == category)
                    .collect();
                (category, kinds)
            })
            .collect()
    }

    /// Append a new widget of `kind` with a fresh id.
    ///
    /// Adding the same kind twice yields two independent widgets.
    pub fn add(&mut self, kind: WidgetKind) -> &WidgetDescriptor {
        let counter = self.counters.entry(kind).or_insert(0);
        let id = WidgetId::new(format!("{}-{}", kind.slug(), counter));
        *counter += 1;
        log::info!("Added {} widget {}", kind.display_name(), id);
        self.active.push(WidgetDescriptor {
            id,
            kind,
            initial_position: kind.layout().initial_position,
        });
        let index = self.active.len() - 1;
        &self.active[index]
    }

    /// Widgets in insertion order.
    pub fn descriptors(&self) -> &[WidgetDescriptor] {
        &self.active
    }

    pub fn get(&self, id: &WidgetId) -> Option<&WidgetDescriptor> {
        self.active.iter().find(|d| &d.id == id)
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}
