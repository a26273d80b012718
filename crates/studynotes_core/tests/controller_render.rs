use std::collections::{BTreeMap, BTreeSet};

use studynotes_core::{
    BindError, ContentBlock, Controller, Effect, JobHandle, JobResult, Msg, Placement,
    ProcessReply, Region, SelectedFile, Tips, UiSurface,
};

/// Headless surface that records the last value written to each region.
#[derive(Debug, Default)]
struct RecordingSurface {
    regions: BTreeSet<Region>,
    results_has_sibling: bool,
    inserted: Vec<(Region, Placement)>,
    text: BTreeMap<Region, String>,
    visible: BTreeMap<Region, bool>,
    enabled: BTreeMap<Region, bool>,
    checked: BTreeMap<Region, bool>,
    links: BTreeMap<Region, String>,
    styles: BTreeMap<Region, String>,
    progress: BTreeMap<Region, u8>,
    content: BTreeMap<Region, Vec<ContentBlock>>,
}

impl RecordingSurface {
    fn complete() -> Self {
        Self {
            regions: Region::REQUIRED.into_iter().collect(),
            results_has_sibling: true,
            ..Self::default()
        }
    }

    fn without(region: Region) -> Self {
        let mut surface = Self::complete();
        surface.regions.remove(&region);
        surface
    }

    fn is_visible(&self, region: Region) -> bool {
        self.visible.get(&region).copied().unwrap_or(false)
    }
}

impl UiSurface for RecordingSurface {
    fn has_region(&self, region: Region) -> bool {
        self.regions.contains(&region)
    }

    fn has_next_sibling(&self, region: Region) -> bool {
        region == Region::Results && self.results_has_sibling
    }

    fn insert_region(&mut self, region: Region, placement: Placement) {
        self.regions.insert(region);
        self.inserted.push((region, placement));
    }

    fn set_text(&mut self, region: Region, text: &str) {
        self.text.insert(region, text.to_string());
    }

    fn set_visible(&mut self, region: Region, visible: bool) {
        self.visible.insert(region, visible);
    }

    fn set_enabled(&mut self, region: Region, enabled: bool) {
        self.enabled.insert(region, enabled);
    }

    fn set_checked(&mut self, region: Region, checked: bool) {
        self.checked.insert(region, checked);
    }

    fn set_link(&mut self, region: Region, href: &str) {
        self.links.insert(region, href.to_string());
    }

    fn set_style(&mut self, region: Region, class: &str) {
        self.styles.insert(region, class.to_string());
    }

    fn set_progress(&mut self, region: Region, percent: u8) {
        self.progress.insert(region, percent);
    }

    fn set_content(&mut self, region: Region, blocks: &[ContentBlock]) {
        self.content.insert(region, blocks.to_vec());
    }
}

fn result_with_tips(handle: &str, steps: &[&str]) -> JobResult {
    JobResult {
        preview: "notes".to_string(),
        latex_url: Some(format!("/api/download/{handle}.tex")),
        pdf_url: None,
        handle: JobHandle::new(handle),
        tips: Some(Tips {
            latex_quality: Some("Excellent".to_string()),
            overleaf_steps: steps.iter().map(|s| s.to_string()).collect(),
            ..Tips::default()
        }),
    }
}

fn processed(controller: &mut Controller<RecordingSurface>, result: JobResult) {
    controller.dispatch(Msg::FilesPicked(vec![SelectedFile::new(
        "slides.pdf",
        vec![0u8; 100],
    )]));
    controller.dispatch(Msg::ProcessClicked);
    controller.dispatch(Msg::ProcessFinished(ProcessReply::Completed(result)));
}

#[test]
fn construction_fails_when_a_region_is_missing() {
    let err = Controller::new(RecordingSurface::without(Region::ProcessButton))
        .err()
        .expect("bind error");
    assert_eq!(err, BindError::MissingRegion(Region::ProcessButton));
    assert_eq!(
        err.to_string(),
        "required UI region 'processBtn' is missing"
    );
}

#[test]
fn construction_renders_idle_view_and_checks_health() {
    let (controller, effects) = Controller::new(RecordingSurface::complete()).expect("bind");
    let surface = controller.surface();

    assert_eq!(effects, vec![Effect::CheckHealth]);
    assert_eq!(surface.enabled.get(&Region::ProcessButton), Some(&false));
    assert_eq!(surface.enabled.get(&Region::CompileDirectly), Some(&false));
    assert_eq!(surface.checked.get(&Region::IncludeQuestions), Some(&true));
    assert!(!surface.is_visible(Region::Results));
    assert!(!surface.is_visible(Region::DownloadLatex));
    assert!(!surface.is_visible(Region::DownloadPdf));
    assert!(!surface.is_visible(Region::CompileButton));
    assert!(!surface.has_region(Region::Tips));
}

#[test]
fn selecting_a_file_renders_name_size_and_progress() {
    let (mut controller, _) = Controller::new(RecordingSurface::complete()).expect("bind");
    controller.dispatch(Msg::FilesPicked(vec![SelectedFile::new(
        "slides.pdf",
        vec![0u8; 1024 * 1024],
    )]));
    let surface = controller.surface();

    assert_eq!(surface.text[&Region::FileName], "slides.pdf");
    assert_eq!(surface.text[&Region::FileSize], "1.00 MB");
    assert!(surface.is_visible(Region::FileInfo));
    assert_eq!(surface.progress[&Region::ProgressBar], 10);
    assert_eq!(surface.enabled[&Region::ProcessButton], true);
    assert_eq!(
        surface.styles[&Region::Status],
        "alert alert-success alert-dismissible fade show"
    );
}

#[test]
fn success_renders_links_and_results() {
    let (mut controller, _) = Controller::new(RecordingSurface::complete()).expect("bind");
    processed(&mut controller, result_with_tips("slides_1", &[]));
    let surface = controller.surface();

    assert!(surface.is_visible(Region::Results));
    assert_eq!(surface.styles[&Region::Results], "slide-in");
    assert_eq!(surface.text[&Region::PreviewContent], "notes");
    assert_eq!(
        surface.links[&Region::DownloadLatex],
        "/api/download/slides_1.tex"
    );
    assert!(surface.is_visible(Region::DownloadLatex));
    assert!(!surface.is_visible(Region::DownloadPdf));
    assert!(surface.is_visible(Region::CompileButton));
}

#[test]
fn tips_container_is_inserted_once_and_overwritten() {
    let (mut controller, _) = Controller::new(RecordingSurface::complete()).expect("bind");
    processed(&mut controller, result_with_tips("first", &["Upload", "Compile"]));
    processed(&mut controller, result_with_tips("second", &[]));
    let surface = controller.surface();

    assert_eq!(
        surface.inserted,
        vec![(Region::Tips, Placement::After(Region::Results))]
    );
    let blocks = &surface.content[&Region::Tips];
    // Second payload had no steps, so the list and link are gone.
    assert!(!blocks
        .iter()
        .any(|block| matches!(block, ContentBlock::OrderedList(_))));
    assert!(blocks.contains(&ContentBlock::Labeled {
        label: "LaTeX quality".to_string(),
        value: "Excellent".to_string(),
    }));
}

#[test]
fn tips_fall_back_to_main_container() {
    let mut surface = RecordingSurface::complete();
    surface.results_has_sibling = false;
    let (mut controller, _) = Controller::new(surface).expect("bind");
    processed(&mut controller, result_with_tips("first", &["Upload"]));

    assert_eq!(
        controller.surface().inserted,
        vec![(Region::Tips, Placement::AppendTo(Region::Main))]
    );
}

#[test]
fn dismiss_timer_hides_status_region() {
    let (mut controller, _) = Controller::new(RecordingSurface::complete()).expect("bind");
    controller.dispatch(Msg::FilesPicked(vec![SelectedFile::new("a.pdf", vec![1u8])]));
    assert!(controller.surface().is_visible(Region::Status));

    controller.dispatch(Msg::StatusDismissElapsed);
    assert!(!controller.surface().is_visible(Region::Status));
}
