use inkfolio_navigation::Route;
use inkfolio_platform::*;
use inkfolio_site::{ClickAction, SubmitError};
use web_time::Duration;

fn seeded() -> SiteConfig {
    SiteConfig {
        seed: Some(9),
        ..SiteConfig::default()
    }
}

#[test]
fn demo_tour_backs_out_of_contact() {
    let script = parse_script(DEMO_SCRIPT).unwrap();
    let report = run_headless(seeded(), &script).unwrap();

    assert_eq!(report.summaries.len(), script.len());
    assert_eq!(
        report.actions,
        vec![
            ClickAction::Navigated(Route::Projects),
            ClickAction::Selected("2"),
            ClickAction::Deselected,
        ]
    );
    assert!(report.rejected_submissions.is_empty());
    assert_eq!(report.route, Route::About);
    assert!(report.elapsed >= Duration::from_millis(3500));
}

#[test]
fn same_script_same_summaries() {
    let script = parse_script("wait 2600\nmove 640 620\nwait 200\ngo /projects\nwait 100").unwrap();
    let a = run_headless(seeded(), &script).unwrap();
    let b = run_headless(seeded(), &script).unwrap();
    assert_eq!(a.summaries, b.summaries);
}

#[test]
fn typing_off_the_contact_page_fails() {
    let script = parse_script("type name Aiko").unwrap();
    let err = run_headless(seeded(), &script).unwrap_err();
    assert!(err.to_string().contains("cannot type into Name on /"));
}

#[test]
fn invalid_submission_is_reported_not_fatal() {
    let script = parse_script("go /contact\ntype email nope\nsubmit").unwrap();
    let report = run_headless(seeded(), &script).unwrap();
    assert_eq!(report.rejected_submissions, vec![SubmitError::Invalid(4)]);
    assert_eq!(report.route, Route::Contact);

    let kept = report.clone();
    assert_eq!(kept, report);
}

#[test]
fn invalid_config_is_refused() {
    let mut cfg = seeded();
    cfg.viewport = (0.0, 600.0);
    let err = run_headless(cfg, &[]).unwrap_err();
    assert!(format!("{err:#}").contains("invalid value for viewport"));
}

#[test]
fn contact_round_trip_summary() {
    let script = parse_script(
        "go /contact\ntype name Aiko\ntype email aiko@example.jp\ntype subject Hi\ntype message Yo\nsubmit\nwait 1500",
    )
    .unwrap();
    let report = run_headless(seeded(), &script).unwrap();
    insta::assert_snapshot!(report.summaries.last().unwrap(), @r"
    route /contact (Contact)
    nav Accueil | À Propos | Projets | [Contact]
    overlay idle
    page contact phase=Sent errors=0
    ");
}
