//! About page: skill bars, experience timeline and the CV download.

use inkfolio_core::{Rect, Runtime, Size};
use inkfolio_fx::{ScrollSpeedLines, Stagger};
use web_time::Instant;

pub const CV_PATH: &str = "/cv.pdf";
pub const CV_LABEL: &str = "Télécharger mon CV";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Skill {
    pub name: &'static str,
    /// Percent.
    pub level: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimelineEvent {
    pub year: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

pub const SKILLS: [Skill; 5] = [
    Skill { name: "HTML/CSS", level: 90 },
    Skill { name: "PHP / Symfony", level: 80 },
    Skill { name: "JavaScript", level: 85 },
    Skill { name: "Java (Spring, Hibernate, SpringBoot)", level: 75 },
    Skill { name: "Linux", level: 70 },
];

pub const TIMELINE: [TimelineEvent; 4] = [
    TimelineEvent {
        year: "2024-2025",
        title: "Licence pro en systèmes d'information",
        description: "Formation au CNAM pour approfondir mes compétences en gestion de données.",
    },
    TimelineEvent {
        year: "2022-2023",
        title: "Stage en conception d'applications",
        description: "11 semaines chez Greta l’Essonne axées sur la création d'applications innovantes.",
    },
    TimelineEvent {
        year: "2021-2022",
        title: "Stage en développement web",
        description: "9 semaines chez Philiance formation, où j'ai développé des interfaces créatives.",
    },
    TimelineEvent {
        year: "Avant 2021",
        title: "Diverses expériences",
        description: "De missions de livraison et de service polyvalent à une première expérience en laboratoire, autant d'expériences qui ont forgé mon adaptabilité et mon esprit d'équipe.",
    },
];

/// Fixed download button in the top-right corner.
pub fn cv_link_rect(viewport: Size) -> Rect {
    Rect {
        x: viewport.width - 220.0,
        y: 80.0,
        w: 200.0,
        h: 44.0,
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AboutFrame {
    /// Current fill width of each skill bar, in percent.
    pub skill_fill: Vec<f32>,
    /// Entrance progress of each timeline entry.
    pub timeline: Vec<f32>,
}

pub struct AboutPage {
    rt: Runtime,
    shown_at: Instant,
    lines: ScrollSpeedLines,
}

impl AboutPage {
    pub fn mount(rt: &Runtime) -> Self {
        Self {
            rt: rt.clone(),
            shown_at: rt.now(),
            lines: ScrollSpeedLines::mount(rt),
        }
    }

    pub fn scroll_lines(&self) -> &ScrollSpeedLines {
        &self.lines
    }

    pub fn tick(&self) {
        self.lines.tick();
    }

    pub fn frame(&self) -> AboutFrame {
        let elapsed = self.rt.now().saturating_duration_since(self.shown_at);
        let bars = Stagger::skill_bars();
        let timeline = Stagger::timeline();
        AboutFrame {
            skill_fill: SKILLS
                .iter()
                .enumerate()
                .map(|(i, s)| bars.progress(i, elapsed) * f32::from(s.level))
                .collect(),
            timeline: (0..TIMELINE.len())
                .map(|i| timeline.progress(i, elapsed))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkfolio_core::{DEFAULT_VIEWPORT, ManualClock};
    use web_time::Duration;

    #[test]
    fn bars_fill_in_order_then_settle() {
        let clock = ManualClock::new();
        let rt = Runtime::with_options(clock.shared(), DEFAULT_VIEWPORT, Some(0));
        let page = AboutPage::mount(&rt);
        assert!(page.frame().skill_fill.iter().all(|w| *w == 0.0));

        rt.advance(&clock, Duration::from_millis(250));
        let f = page.frame();
        assert!(f.skill_fill[0] > f.skill_fill[2]);
        assert_eq!(f.timeline[2], 0.0);

        rt.advance(&clock, Duration::from_secs(2));
        let f = page.frame();
        let levels: Vec<f32> = SKILLS.iter().map(|s| f32::from(s.level)).collect();
        assert_eq!(f.skill_fill, levels);
        assert!(f.timeline.iter().all(|p| *p == 1.0));
    }

    #[test]
    fn cv_link_points_at_the_asset() {
        assert_eq!(CV_PATH, "/cv.pdf");
        let r = cv_link_rect(DEFAULT_VIEWPORT);
        assert!(r.x + r.w <= DEFAULT_VIEWPORT.width);
    }
}
