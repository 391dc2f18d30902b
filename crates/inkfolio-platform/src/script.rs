//! Scripted input for the headless runner.
//!
//! One event per line; blank lines and `#` comments are skipped:
//!
//! ```text
//! wait 2000
//! move 640 400
//! click 640 620
//! go /contact
//! type email aiko@example.jp
//! submit
//! scroll 300
//! resize 1024 768
//! back
//! ```

use anyhow::{Context, anyhow, bail};
use inkfolio_core::{Size, Vec2};
use inkfolio_site::Field;
use web_time::Duration;

#[derive(Clone, Debug, PartialEq)]
pub enum ScriptEvent {
    PointerMove(Vec2),
    Click(Vec2),
    Navigate(String),
    Back,
    Scroll(f32),
    Resize(Size),
    Type { field: Field, value: String },
    Submit,
    Wait(Duration),
}

fn number(word: Option<&str>, what: &str) -> anyhow::Result<f32> {
    let word = word.ok_or_else(|| anyhow!("missing {what}"))?;
    word.parse::<f32>()
        .with_context(|| format!("{what} {word:?} is not a number"))
}

fn point(words: &mut std::str::SplitWhitespace<'_>) -> anyhow::Result<Vec2> {
    let x = number(words.next(), "x")?;
    let y = number(words.next(), "y")?;
    Ok(Vec2::new(x, y))
}

impl ScriptEvent {
    pub fn parse(line: &str) -> anyhow::Result<Option<ScriptEvent>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(None);
        };
        let event = match verb {
            "move" => ScriptEvent::PointerMove(point(&mut words)?),
            "click" => ScriptEvent::Click(point(&mut words)?),
            "go" => ScriptEvent::Navigate(
                words.next().ok_or_else(|| anyhow!("missing path"))?.to_string(),
            ),
            "back" => ScriptEvent::Back,
            "scroll" => ScriptEvent::Scroll(number(words.next(), "offset")?),
            "resize" => {
                let w = number(words.next(), "width")?;
                let h = number(words.next(), "height")?;
                ScriptEvent::Resize(Size::new(w, h))
            }
            "type" => {
                let name = words.next().ok_or_else(|| anyhow!("missing field"))?;
                let field = Field::parse(name).ok_or_else(|| anyhow!("unknown field {name:?}"))?;
                let value = words.collect::<Vec<_>>().join(" ");
                ScriptEvent::Type { field, value }
            }
            "submit" => ScriptEvent::Submit,
            "wait" => {
                let word = words.next().ok_or_else(|| anyhow!("missing milliseconds"))?;
                let ms = word
                    .parse::<u64>()
                    .with_context(|| format!("wait of {word:?} is not a whole number of milliseconds"))?;
                ScriptEvent::Wait(Duration::from_millis(ms))
            }
            other => bail!("unknown script verb {other:?}"),
        };
        Ok(Some(event))
    }
}

pub fn parse_script(src: &str) -> anyhow::Result<Vec<ScriptEvent>> {
    let mut events = Vec::new();
    for (n, line) in src.lines().enumerate() {
        if let Some(ev) = ScriptEvent::parse(line).with_context(|| format!("script line {}", n + 1))? {
            events.push(ev);
        }
    }
    Ok(events)
}

/// A short tour of the site: home, a project, the about page, a message.
pub const DEMO_SCRIPT: &str = "\
# let the loading gate open and the title type out
wait 3500
move 640 620
wait 400
click 640 624
wait 900
click 640 410
wait 300
click 10 790
scroll 400
wait 600
go /about
wait 1500
go /contact
type name Aiko
type email aiko@example.jp
type subject Commission
type message Bonjour, j'adore votre travail !
submit
wait 1600
back
wait 1000
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_verb() {
        let events = parse_script(
            "move 1 2\nclick 3 4\n\n# note\ngo /about\nback\nscroll 10\nresize 800 600\ntype message a b  c\nsubmit\nwait 250",
        )
        .unwrap();
        assert_eq!(events.len(), 9);
        assert_eq!(events[0], ScriptEvent::PointerMove(Vec2::new(1.0, 2.0)));
        assert_eq!(events[2], ScriptEvent::Navigate("/about".into()));
        assert_eq!(
            events[6],
            ScriptEvent::Type {
                field: Field::Message,
                value: "a b c".into()
            }
        );
        assert_eq!(events[8], ScriptEvent::Wait(Duration::from_millis(250)));
    }

    #[test]
    fn reports_the_failing_line() {
        let err = parse_script("wait 10\nfly 1 2").unwrap_err();
        assert_eq!(err.to_string(), "script line 2");
        assert!(format!("{err:#}").contains("unknown script verb \"fly\""));

        assert!(parse_script("type colour red").is_err());
        assert!(parse_script("move 1").is_err());
        assert!(parse_script("wait -5").is_err());
        assert!(parse_script("wait 1e30").is_err());
        assert!(parse_script("wait 2.5").is_err());
    }

    #[test]
    fn long_waits_stay_exact() {
        let events = parse_script("wait 20000000").unwrap();
        assert_eq!(events, vec![ScriptEvent::Wait(Duration::from_millis(20_000_000))]);
    }

    #[test]
    fn demo_script_parses() {
        assert!(parse_script(DEMO_SCRIPT).unwrap().len() > 10);
    }
}
