//! Integration tests - mobile checks and multi-device runs
//!
//! Pages come from JSON fixtures the same way the replay tool loads them.

use std::time::Duration;

use fos_audit::{
    audit_fixture, audit_sessions, AuditConfig, AuditError, Check, DeviceProfile, MatchMode,
    PageAudit, PageFixture, Session, SimulatedHost, Status, MOBILE_CHECKS,
};

const LANDING_PAGE: &str = r#"{
    "url": "https://news.test/",
    "viewport_meta": "width=device-width, initial-scale=1",
    "elements": [
        {"identity": "logo", "role": "link", "tag": "a", "text": "News",
         "attributes": {"href": "/"}, "geometry": {"width": 120, "height": 48}},
        {"identity": "burger", "role": "button", "tag": "button",
         "attributes": {"class": "hamburger", "aria-label": "Open menu", "aria-expanded": "false"},
         "geometry": {"width": 48, "height": 48}},
        {"identity": "email", "role": "input", "tag": "input",
         "attributes": {"id": "email", "type": "email"}, "geometry": {"width": 300, "height": 48}},
        {"identity": "lead", "tag": "p", "text": "Top stories today", "style": {"font-size": "16px"}},
        {"identity": "byline", "tag": "span", "text": "By staff", "style": {"font-size": "16px"}}
    ],
    "labels": ["email"]
}"#;

fn fixture() -> PageFixture {
    PageFixture::from_json(LANDING_PAGE).unwrap()
}

fn session(fixture: PageFixture) -> Session<SimulatedHost> {
    Session::new(SimulatedHost::from_fixture(fixture), DeviceProfile::iphone_15(), Duration::from_secs(1))
}

fn run_one(fixture: PageFixture, config: &AuditConfig, check: Check) -> fos_audit::Verdict {
    let mut session = session(fixture);
    let audit = PageAudit::with_checks(config, vec![check]);
    let mut verdicts = Vec::new();
    smol::block_on(audit.run(&mut session, &mut verdicts));
    verdicts.remove(0)
}

// ============================================================================
// WELL-FORMED PAGE
// ============================================================================

#[test]
fn test_landing_page_passes_mobile_checks() {
    let config = AuditConfig::default();
    let mut session = session(fixture());
    let audit = PageAudit::with_checks(&config, MOBILE_CHECKS.to_vec());
    let report = smol::block_on(audit.report(&mut session));

    assert_eq!(report.device, "iPhone 15");
    assert_eq!(report.verdicts.len(), 8);
    // No carousel on the page
    assert_eq!(report.get(Check::GestureAlternatives).unwrap().status, Status::Warning);
    assert!(report.passes(), "unexpected failures: {:#?}", report.verdicts);
}

// ============================================================================
// POLICY VIOLATIONS
// ============================================================================

#[test]
fn test_touch_targets_bucketed_by_role() {
    let mut page = fixture();
    page.elements[0].geometry.height = 20.0;
    page.elements[1].geometry.width = 30.0;

    let verdict = run_one(page, &AuditConfig::default(), Check::TouchTargets);

    assert_eq!(verdict.status, Status::Failed);
    assert_eq!(verdict.summary, "2 of 3 touch targets are smaller than 44x44px");
    assert_eq!(verdict.evidence[0], "Links below minimum: 1");
    assert_eq!(verdict.evidence[1], "a - News - 120x20px");
    assert_eq!(verdict.evidence[2], "Buttons below minimum: 1");
}

#[test]
fn test_viewport_zoom_modes() {
    let mut page = fixture();
    page.viewport_meta = Some("width=device-width, maximum-scale=10".to_string());

    let lenient = run_one(page.clone(), &AuditConfig::default(), Check::ViewportZoom);
    assert_eq!(lenient.status, Status::Failed);

    let typed = AuditConfig { css_matching: MatchMode::Typed, ..AuditConfig::default() };
    assert_eq!(run_one(page, &typed, Check::ViewportZoom).status, Status::Passed);
}

#[test]
fn test_orientation_missing_in_landscape() {
    let mut page = fixture();
    page.landscape_counts.insert(fos_audit::ElementQuery::LinksAndButtons, 0);

    let verdict = run_one(page, &AuditConfig::default(), Check::Orientation);
    assert_eq!(verdict.status, Status::Failed);
    assert_eq!(verdict.evidence[1], "Landscape (852x393): 0 interactive elements");
}

#[test]
fn test_carousel_without_controls_fails() {
    let mut page = fixture();
    page.elements.push(fos_audit::NodeSnapshot::new("hero", "div").with_attr("class", "hero-slider"));

    let verdict = run_one(page, &AuditConfig::default(), Check::GestureAlternatives);
    assert_eq!(verdict.status, Status::Failed);
    assert_eq!(verdict.summary, "1 carousel(s) without previous/next controls");
}

#[test]
fn test_small_text_ratio() {
    let mut page = fixture();
    for i in 0..3 {
        page.elements.push(
            fos_audit::NodeSnapshot::new(format!("legal{}", i), "span")
                .with_text("Terms apply")
                .with_style("font-size", "11px"),
        );
    }

    let verdict = run_one(page, &AuditConfig::default(), Check::TextReadability);
    assert_eq!(verdict.status, Status::Failed);
    assert_eq!(verdict.summary, "2 readable and 3 small (< 14px) text blocks");
    assert_eq!(verdict.evidence[0], "11px - Terms apply");
}

#[test]
fn test_menu_missing_expanded_state() {
    let mut page = fixture();
    page.elements[1].attributes.remove("aria-expanded");

    let verdict = run_one(page, &AuditConfig::default(), Check::MobileMenu);
    assert_eq!(verdict.status, Status::Failed);
    assert_eq!(verdict.summary, "Mobile menu toggle is missing: aria-expanded");
}

#[test]
fn test_hidden_menu_toggle_is_skipped() {
    let desktop = fos_audit::NodeSnapshot::new("desktop-menu", "button")
        .with_attr("aria-label", "menu")
        .with_size(10.0, 10.0);

    for toggle in [desktop.clone().hidden(), desktop.disabled()] {
        let mut page = fixture();
        page.elements.insert(1, toggle);

        let verdict = run_one(page, &AuditConfig::default(), Check::MobileMenu);
        assert_eq!(verdict.status, Status::Passed, "{:?}", verdict);
        assert_eq!(verdict.summary, "Mobile menu toggle is accessible");
    }
}

#[test]
fn test_menu_without_visible_toggle_warns() {
    let mut page = fixture();
    page.elements[1].displayed = false;

    let verdict = run_one(page, &AuditConfig::default(), Check::MobileMenu);
    assert_eq!(verdict.status, Status::Warning);
}

#[test]
fn test_disabled_elements_leave_verdicts_unchanged() {
    let mut page = fixture();
    page.elements.push(fos_audit::NodeSnapshot::new("tiny", "button").with_size(10.0, 10.0).disabled());
    page.elements.push(fos_audit::NodeSnapshot::new("legacy", "input").with_attr("type", "text").disabled());
    page.elements.push(
        fos_audit::NodeSnapshot::new("fine-print", "span")
            .with_text("Terms apply")
            .with_style("font-size", "9px")
            .disabled(),
    );

    let config = AuditConfig::default();
    let checks = vec![Check::TouchTargets, Check::FormInputs, Check::TextReadability];
    let mut session = session(page);
    let report = smol::block_on(PageAudit::with_checks(&config, checks).report(&mut session));

    assert!(report.passes(), "unexpected failures: {:#?}", report.verdicts);
    assert_eq!(
        report.get(Check::TouchTargets).unwrap().summary,
        "All 3 touch targets are at least 44x44px"
    );
    assert_eq!(
        report.get(Check::FormInputs).unwrap().summary,
        "All 1 inputs have a label and a mobile-friendly type"
    );
}

#[test]
fn test_horizontal_overflow() {
    let mut page = fixture();
    page.document_width = Some(480.0);

    let verdict = run_one(page, &AuditConfig::default(), Check::HorizontalOverflow);
    assert_eq!(verdict.status, Status::Failed);
    assert_eq!(verdict.summary, "Page scrolls horizontally by 87px");
}

// ============================================================================
// MULTI-DEVICE RUNS
// ============================================================================

#[test]
fn test_audit_sessions_keeps_device_order() {
    let config = AuditConfig::default();
    let sessions = DeviceProfile::presets()
        .into_iter()
        .map(|device| Session::new(SimulatedHost::from_fixture(fixture()), device, Duration::from_secs(1)))
        .collect();

    let reports = audit_sessions(&PageAudit::new(&config), sessions);

    let devices: Vec<_> = reports.iter().map(|r| r.device.as_str()).collect();
    assert_eq!(devices, vec!["iPhone 15", "Samsung Galaxy S21", "iPad"]);
    assert!(reports.iter().all(|r| r.verdicts.len() == 15));
}

#[test]
fn test_audit_fixture_resizes_to_device() {
    let mut page = fixture();
    // Fits the iPad but overflows the phones
    page.document_width = Some(700.0);
    let json = serde_json::to_string(&page).unwrap();

    let reports = audit_fixture(&json, &AuditConfig::default(), &DeviceProfile::presets()).unwrap();
    let overflow: Vec<_> = reports
        .iter()
        .map(|r| r.get(Check::HorizontalOverflow).unwrap().status)
        .collect();
    assert_eq!(overflow, vec![Status::Failed, Status::Failed, Status::Passed]);
}

#[test]
fn test_audit_fixture_rejects_bad_input() {
    let config = AuditConfig::default();
    assert!(matches!(audit_fixture("{", &config, &[DeviceProfile::ipad()]), Err(AuditError::Fixture(_))));

    let invalid = AuditConfig { trap_threshold: 0, ..AuditConfig::default() };
    assert!(matches!(audit_fixture(LANDING_PAGE, &invalid, &[]), Err(AuditError::Config(_))));
}
