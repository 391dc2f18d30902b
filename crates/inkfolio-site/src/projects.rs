//! Project showcase: static catalogue, category filter, detail selection.

use std::cell::{Cell, RefCell};

use inkfolio_core::{AnimationSpec, Rect, Runtime, Size};
use inkfolio_fx::{DEFAULT_PARTICLE_COUNT, ParticleEffect, ScrollSpeedLines, Stagger};
use serde::{Deserialize, Serialize};
use web_time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    All,
    Web,
    Mobile,
    Design,
}

impl Category {
    pub const ALL: [Category; 4] = [Category::All, Category::Web, Category::Mobile, Category::Design];

    pub fn label(self) -> &'static str {
        match self {
            Category::All => "Tous",
            Category::Web => "Web",
            Category::Mobile => "Mobile",
            Category::Design => "Design",
        }
    }

    pub fn matches(self, project: &Project) -> bool {
        self == Category::All || self == project.category
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Project {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub image_url: &'static str,
    pub category: Category,
    pub technologies: &'static [&'static str],
}

pub static PROJECTS: [Project; 4] = [
    Project {
        id: "1",
        title: "E-commerce Moderne",
        description: "Une plateforme de commerce électronique avec une interface utilisateur innovante et des animations fluides.",
        image_url: "https://images.unsplash.com/photo-1607799279861-4dd421887fb3?w=800&auto=format&fit=crop&q=60",
        category: Category::Web,
        technologies: &["React", "Node.js", "MongoDB"],
    },
    Project {
        id: "2",
        title: "Application Mobile Fitness",
        description: "Application de suivi de fitness avec des visualisations de données dynamiques et un design épuré.",
        image_url: "https://images.unsplash.com/photo-1476480862126-209bfaa8edc8?w=800&auto=format&fit=crop&q=60",
        category: Category::Mobile,
        technologies: &["React Native", "Firebase"],
    },
    Project {
        id: "3",
        title: "Portfolio Artistique",
        description: "Portfolio numérique pour un artiste avec des galeries interactives et des transitions fluides.",
        image_url: "https://images.unsplash.com/photo-1513542789411-b6a5d4f31634?w=800&auto=format&fit=crop&q=60",
        category: Category::Design,
        technologies: &["React", "Three.js"],
    },
    Project {
        id: "4",
        title: "Tableau de Bord Analytics",
        description: "Interface de tableau de bord avec des graphiques animés et une expérience utilisateur intuitive.",
        image_url: "https://images.unsplash.com/photo-1551288049-bebda4e38f71?w=800&auto=format&fit=crop&q=60",
        category: Category::Web,
        technologies: &["Vue.js", "D3.js"],
    },
];

pub fn filter(category: Category) -> Vec<&'static Project> {
    PROJECTS.iter().filter(|p| category.matches(p)).collect()
}

pub fn find(id: &str) -> Option<&'static Project> {
    PROJECTS.iter().find(|p| p.id == id)
}

const GRID_COLUMNS: usize = 3;
const GRID_TOP: f32 = 320.0;
const CARD_SIZE: Size = Size {
    width: 320.0,
    height: 180.0,
};
const CARD_GAP: f32 = 32.0;
const CHIP_SIZE: Size = Size {
    width: 110.0,
    height: 40.0,
};

/// Card slot `index` of the grid, centered in `viewport`.
pub fn card_rect(viewport: Size, index: usize) -> Rect {
    let row = (index / GRID_COLUMNS) as f32;
    let col = (index % GRID_COLUMNS) as f32;
    let grid_w = GRID_COLUMNS as f32 * CARD_SIZE.width + (GRID_COLUMNS - 1) as f32 * CARD_GAP;
    let x0 = (viewport.width - grid_w) / 2.0;
    Rect {
        x: x0 + col * (CARD_SIZE.width + CARD_GAP),
        y: GRID_TOP + row * (CARD_SIZE.height + CARD_GAP),
        w: CARD_SIZE.width,
        h: CARD_SIZE.height,
    }
}

pub fn chip_rect(viewport: Size, index: usize) -> Rect {
    let gap = 16.0;
    let n = Category::ALL.len() as f32;
    let row_w = n * CHIP_SIZE.width + (n - 1.0) * gap;
    let x0 = (viewport.width - row_w) / 2.0;
    Rect {
        x: x0 + index as f32 * (CHIP_SIZE.width + gap),
        y: 240.0,
        w: CHIP_SIZE.width,
        h: CHIP_SIZE.height,
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CardFrame {
    pub project: &'static str,
    pub rect: Rect,
    /// Entrance progress: y 20→0, opacity 0→1.
    pub enter: f32,
    pub hover_lift: f32,
    pub particles: usize,
}

pub struct ProjectsPage {
    rt: Runtime,
    category: Cell<Category>,
    selected: Cell<Option<&'static Project>>,
    hovered: Cell<Option<&'static str>>,
    grid_shown_at: Cell<Instant>,
    grid: Stagger,
    particles: RefCell<Vec<(&'static str, ParticleEffect)>>,
    lines: ScrollSpeedLines,
}

impl ProjectsPage {
    pub fn mount(rt: &Runtime) -> Self {
        let mut rng = rt.rng();
        let particles = PROJECTS
            .iter()
            .map(|p| (p.id, ParticleEffect::new(rng.fork(), DEFAULT_PARTICLE_COUNT)))
            .collect();
        Self {
            rt: rt.clone(),
            category: Cell::new(Category::All),
            selected: Cell::new(None),
            hovered: Cell::new(None),
            grid_shown_at: Cell::new(rt.now()),
            grid: Stagger::new(
                Duration::ZERO,
                Duration::from_millis(100),
                AnimationSpec::page_spring(),
            ),
            particles: RefCell::new(particles),
            lines: ScrollSpeedLines::mount(rt),
        }
    }

    pub fn category(&self) -> Category {
        self.category.get()
    }

    /// Changing the category replays the grid entrance.
    pub fn select_category(&self, category: Category) {
        if self.category.replace(category) != category {
            log::debug!("projects: filter {category:?}");
            self.grid_shown_at.set(self.rt.now());
            self.set_hover(None);
        }
    }

    pub fn visible(&self) -> Vec<&'static Project> {
        filter(self.category.get())
    }

    pub fn select(&self, id: &str) -> Option<&'static Project> {
        let project = find(id)?;
        self.selected.set(Some(project));
        Some(project)
    }

    pub fn deselect(&self) -> bool {
        self.selected.take().is_some()
    }

    pub fn selected(&self) -> Option<&'static Project> {
        self.selected.get()
    }

    pub fn set_hover(&self, id: Option<&'static str>) {
        if self.hovered.get() == id {
            return;
        }
        self.hovered.set(id);
        let now = self.rt.now();
        for (pid, fx) in self.particles.borrow_mut().iter_mut() {
            fx.set_active(Some(*pid) == id, now);
        }
    }

    pub fn hovered(&self) -> Option<&'static str> {
        self.hovered.get()
    }

    pub fn scroll_lines(&self) -> &ScrollSpeedLines {
        &self.lines
    }

    pub fn tick(&self) {
        self.lines.tick();
    }

    pub fn cards(&self) -> Vec<CardFrame> {
        let now = self.rt.now();
        let viewport = self.rt.input().viewport();
        let elapsed = now.saturating_duration_since(self.grid_shown_at.get());
        let particles = self.particles.borrow();
        self.visible()
            .into_iter()
            .enumerate()
            .map(|(i, p)| CardFrame {
                project: p.id,
                rect: card_rect(viewport, i),
                enter: self.grid.progress(i, elapsed),
                hover_lift: if self.hovered.get() == Some(p.id) { -5.0 } else { 0.0 },
                particles: particles
                    .iter()
                    .find(|(id, _)| *id == p.id)
                    .map(|(_, fx)| fx.frame(now).len())
                    .unwrap_or(0),
            })
            .collect()
    }
}
