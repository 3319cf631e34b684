//! Mobile Audit
//!
//! Checks over the emulated device viewport. None of them move focus.

use crate::classify::layout::{gesture_support, horizontal_overflow, orientation_passes, GestureSupport};
use crate::classify::{input_semantics, menu, touch_target, viewport};
use crate::classify::{MenuCompleteness, ReadabilityTally, TouchTargetTally, ViewportPolicy};
use crate::config::AuditConfig;
use crate::host::{ElementQuery, FocusHost, HostError};
use crate::session::Session;
use crate::verdict::{Check, Verdict};

/// Small-text lines kept as evidence
const MAX_TEXT_ISSUES: usize = 10;

/// Mobile checks for one session
#[derive(Debug, Clone, Copy)]
pub struct MobileAudit<'a> {
    config: &'a AuditConfig,
}

impl<'a> MobileAudit<'a> {
    pub fn new(config: &'a AuditConfig) -> Self {
        Self { config }
    }

    pub async fn touch_targets<H: FocusHost>(&self, session: &mut Session<H>) -> Result<Verdict, HostError> {
        let min = self.config.min_target_size;
        let elements = session.query(ElementQuery::Interactive).await?;

        let mut tally = TouchTargetTally::default();
        for node in elements.iter().filter(|n| n.is_classifiable()) {
            tally.add(node, touch_target::classify(node, min));
        }

        let total = tally.passed + tally.failed();
        if total == 0 {
            return Ok(Verdict::warning(Check::TouchTargets, "No interactive elements found"));
        }
        if tally.failed() == 0 {
            return Ok(Verdict::passed(
                Check::TouchTargets,
                format!("All {} touch targets are at least {}x{}px", total, min, min),
            ));
        }

        Ok(Verdict::failed(
            Check::TouchTargets,
            format!("{} of {} touch targets are smaller than {}x{}px", tally.failed(), total, min, min),
        )
        .with_evidence(tally.evidence()))
    }

    pub async fn viewport_zoom<H: FocusHost>(&self, session: &mut Session<H>) -> Result<Verdict, HostError> {
        let meta = session.viewport_meta().await?;
        let content = format!("Viewport: {}", meta.as_deref().unwrap_or("[none]"));

        let verdict = match viewport::evaluate(meta.as_deref(), self.config.css_matching) {
            ViewportPolicy::Missing => Verdict::failed(Check::ViewportZoom, "Missing viewport declaration"),
            ViewportPolicy::Restricted(restrictions) => {
                let mut evidence = vec![content];
                evidence.extend(restrictions.iter().map(|r| r.label().to_string()));
                Verdict::failed(Check::ViewportZoom, "Viewport prevents users from zooming").with_evidence(evidence)
            }
            ViewportPolicy::Allowed => {
                Verdict::passed(Check::ViewportZoom, "Viewport allows zoom").with_evidence(vec![content])
            }
        };
        Ok(verdict)
    }

    /// Count links and buttons in portrait and landscape, then restore the
    /// viewport even if the landscape count failed
    pub async fn orientation<H: FocusHost>(&self, session: &mut Session<H>) -> Result<Verdict, HostError> {
        let (width, height) = session.viewport_size().await?;
        let portrait = session.device().clone();
        let landscape = portrait.rotated();

        session.resize(portrait.width, portrait.height).await?;
        let portrait_count = session.count(ElementQuery::LinksAndButtons).await;
        let landscape_count = match portrait_count {
            Ok(_) => match session.resize(landscape.width, landscape.height).await {
                Ok(()) => session.count(ElementQuery::LinksAndButtons).await,
                Err(e) => Err(e),
            },
            Err(ref e) => Err(e.clone()),
        };
        session.resize(width, height).await?;

        let (portrait_count, landscape_count) = (portrait_count?, landscape_count?);
        let evidence = vec![
            format!("Portrait ({}x{}): {} interactive elements", portrait.width, portrait.height, portrait_count),
            format!("Landscape ({}x{}): {} interactive elements", landscape.width, landscape.height, landscape_count),
        ];

        let verdict = if orientation_passes(portrait_count, landscape_count) {
            Verdict::passed(Check::Orientation, "Content is available in both orientations")
        } else {
            Verdict::failed(Check::Orientation, "Interactive content is missing in one orientation")
        };
        Ok(verdict.with_evidence(evidence))
    }

    /// Carousels need previous/next controls as a single-pointer alternative
    pub async fn gesture_alternatives<H: FocusHost>(&self, session: &mut Session<H>) -> Result<Verdict, HostError> {
        let carousels = session.count(ElementQuery::Carousels).await?;
        let controls = session.count(ElementQuery::CarouselControls).await?;

        let verdict = match gesture_support(carousels, controls) {
            GestureSupport::NoCarousel => {
                Verdict::warning(Check::GestureAlternatives, "No carousels or sliders found")
            }
            GestureSupport::MissingControls { carousels } => Verdict::failed(
                Check::GestureAlternatives,
                format!("{} carousel(s) without previous/next controls", carousels),
            ),
            GestureSupport::Controlled { carousels, controls } => Verdict::passed(
                Check::GestureAlternatives,
                format!("{} carousel(s) with {} button controls", carousels, controls),
            ),
        };
        Ok(verdict)
    }

    pub async fn text_readability<H: FocusHost>(&self, session: &mut Session<H>) -> Result<Verdict, HostError> {
        let min = self.config.min_font_size;
        let blocks = session.query(ElementQuery::TextBlocks).await?;

        let mut tally = ReadabilityTally::default();
        for node in &blocks {
            tally.add(node, min);
        }

        let summary = format!(
            "{} readable and {} small (< {}px) text blocks",
            tally.good, tally.small, min
        );
        if tally.passes(self.config.small_text_tolerance) {
            return Ok(Verdict::passed(Check::TextReadability, summary));
        }

        let mut evidence: Vec<String> = tally.issues.iter().take(MAX_TEXT_ISSUES).cloned().collect();
        if tally.issues.len() > MAX_TEXT_ISSUES {
            evidence.push(format!("... and {} more", tally.issues.len() - MAX_TEXT_ISSUES));
        }
        Ok(Verdict::failed(Check::TextReadability, summary).with_evidence(evidence))
    }

    /// Label and keyboard type of every visible input
    pub async fn form_inputs<H: FocusHost>(&self, session: &mut Session<H>) -> Result<Verdict, HostError> {
        let inputs = session.query(ElementQuery::Inputs).await?;

        let mut good = 0;
        let mut issues = Vec::new();
        for node in inputs.iter().filter(|n| n.is_classifiable()) {
            let labelled = match node.non_empty_attr("id") {
                Some(id) => match session.label_exists_for(id).await {
                    Ok(found) => found,
                    Err(e) if e.is_stale() => {
                        tracing::debug!("{} - skipping", e);
                        continue;
                    }
                    Err(e) => return Err(e),
                },
                None => false,
            };

            let result = input_semantics::classify(node, labelled, &self.config.recognized_input_types);
            if result.passed() {
                good += 1;
            } else {
                issues.push(result.describe(node));
            }
        }

        let total = good + issues.len();
        if total == 0 {
            return Ok(Verdict::warning(Check::FormInputs, "No form inputs found"));
        }
        if issues.is_empty() {
            return Ok(Verdict::passed(
                Check::FormInputs,
                format!("All {} inputs have a label and a mobile-friendly type", total),
            ));
        }

        Ok(Verdict::failed(
            Check::FormInputs,
            format!("{} of {} inputs need a label or a better type", issues.len(), total),
        )
        .with_evidence(issues))
    }

    pub async fn mobile_menu<H: FocusHost>(&self, session: &mut Session<H>) -> Result<Verdict, HostError> {
        let toggles = session.query(ElementQuery::MenuToggles).await?;

        let candidate = toggles.iter().find(|n| n.is_classifiable());

        let verdict = match menu::classify(candidate, self.config.min_target_size) {
            MenuCompleteness::Absent => Verdict::warning(Check::MobileMenu, "No mobile menu toggle found"),
            MenuCompleteness::Checked { findings, missing } if missing.is_empty() => {
                Verdict::passed(Check::MobileMenu, "Mobile menu toggle is accessible").with_evidence(findings)
            }
            MenuCompleteness::Checked { findings, missing } => {
                let names: Vec<&str> = missing.iter().map(|d| d.label()).collect();
                Verdict::failed(Check::MobileMenu, format!("Mobile menu toggle is missing: {}", names.join(", ")))
                    .with_evidence(findings)
            }
        };
        Ok(verdict)
    }

    pub async fn horizontal_overflow<H: FocusHost>(&self, session: &mut Session<H>) -> Result<Verdict, HostError> {
        let metrics = session.layout_metrics().await?;
        let evidence = vec![format!(
            "Document width: {}px, viewport width: {}px",
            metrics.document_width, metrics.viewport_width
        )];

        let verdict = match horizontal_overflow(metrics, self.config.overflow_tolerance) {
            Some(overflow) => Verdict::failed(
                Check::HorizontalOverflow,
                format!("Page scrolls horizontally by {}px", overflow),
            ),
            None => Verdict::passed(Check::HorizontalOverflow, "No horizontal scrolling"),
        };
        Ok(verdict.with_evidence(evidence))
    }
}
