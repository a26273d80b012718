//! UI region abstraction.
//!
//! The controller never touches a concrete widget toolkit. It talks to a
//! [`UiSurface`]: a set of named regions that can show text, toggle
//! visibility, carry a link target, and so on. The app injects a real surface;
//! tests inject a recording one.

use crate::AppViewModel;

/// Stable identifiers of the regions the controller binds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Region {
    Main,
    UploadArea,
    FileInput,
    ProcessButton,
    Results,
    Loading,
    Status,
    PreviewContent,
    DownloadLatex,
    DownloadPdf,
    CompileButton,
    NoteType,
    IncludeQuestions,
    CompileDirectly,
    UseOverleaf,
    ApiStatus,
    FileInfo,
    ProgressBar,
    FileName,
    FileSize,
    /// Created on demand the first time tips arrive.
    Tips,
}

impl Region {
    /// Regions that must exist before the controller can be constructed.
    pub const REQUIRED: [Region; 20] = [
        Region::Main,
        Region::UploadArea,
        Region::FileInput,
        Region::ProcessButton,
        Region::Results,
        Region::Loading,
        Region::Status,
        Region::PreviewContent,
        Region::DownloadLatex,
        Region::DownloadPdf,
        Region::CompileButton,
        Region::NoteType,
        Region::IncludeQuestions,
        Region::CompileDirectly,
        Region::UseOverleaf,
        Region::ApiStatus,
        Region::FileInfo,
        Region::ProgressBar,
        Region::FileName,
        Region::FileSize,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Region::Main => "mainContainer",
            Region::UploadArea => "uploadArea",
            Region::FileInput => "fileInput",
            Region::ProcessButton => "processBtn",
            Region::Results => "results",
            Region::Loading => "loading",
            Region::Status => "status",
            Region::PreviewContent => "previewContent",
            Region::DownloadLatex => "downloadLatexBtn",
            Region::DownloadPdf => "downloadPdfBtn",
            Region::CompileButton => "compileBtn",
            Region::NoteType => "noteType",
            Region::IncludeQuestions => "includeQuestions",
            Region::CompileDirectly => "compileDirectly",
            Region::UseOverleaf => "useOverleaf",
            Region::ApiStatus => "apiStatus",
            Region::FileInfo => "fileInfo",
            Region::ProgressBar => "progressBar",
            Region::FileName => "fileName",
            Region::FileSize => "fileSize",
            Region::Tips => "overleafTips",
        }
    }
}

/// Where a region created on demand is inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    After(Region),
    AppendTo(Region),
}

/// Structured content for regions that hold more than a line of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentBlock {
    Heading(String),
    Labeled { label: String, value: String },
    OrderedList(Vec<String>),
    Link { text: String, href: String },
}

/// Capability set of a rendering surface.
pub trait UiSurface {
    fn has_region(&self, region: Region) -> bool;
    /// Whether a region can be inserted directly after `region`.
    fn has_next_sibling(&self, region: Region) -> bool;
    fn insert_region(&mut self, region: Region, placement: Placement);
    fn set_text(&mut self, region: Region, text: &str);
    fn set_visible(&mut self, region: Region, visible: bool);
    fn set_enabled(&mut self, region: Region, enabled: bool);
    fn set_checked(&mut self, region: Region, checked: bool);
    fn set_link(&mut self, region: Region, href: &str);
    fn set_style(&mut self, region: Region, class: &str);
    fn set_progress(&mut self, region: Region, percent: u8);
    /// Replaces the whole content of `region`.
    fn set_content(&mut self, region: Region, blocks: &[ContentBlock]);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
    #[error("required UI region '{}' is missing", .0.id())]
    MissingRegion(Region),
}

pub(crate) fn check_bindings(surface: &dyn UiSurface) -> Result<(), BindError> {
    match Region::REQUIRED
        .into_iter()
        .find(|region| !surface.has_region(*region))
    {
        Some(missing) => Err(BindError::MissingRegion(missing)),
        None => Ok(()),
    }
}

/// Writes the whole view model into the surface.
pub fn render(view: &AppViewModel, surface: &mut dyn UiSurface) {
    surface.set_style(
        Region::UploadArea,
        if view.upload_highlight {
            "upload-area dragover"
        } else {
            "upload-area"
        },
    );
    surface.set_enabled(Region::ProcessButton, view.process_enabled);

    match &view.file_info {
        Some(info) => {
            surface.set_text(Region::FileName, &info.name);
            surface.set_text(Region::FileSize, &info.size_label);
            surface.set_visible(Region::FileInfo, true);
        }
        None => surface.set_visible(Region::FileInfo, false),
    }

    surface.set_progress(Region::ProgressBar, view.progress);
    surface.set_visible(Region::Loading, view.loading);

    match &view.status {
        Some(status) => {
            surface.set_text(Region::Status, &status.text);
            surface.set_style(
                Region::Status,
                &format!(
                    "alert alert-{} alert-dismissible fade show",
                    status.severity.class()
                ),
            );
            surface.set_visible(Region::Status, true);
        }
        None => surface.set_visible(Region::Status, false),
    }

    surface.set_text(Region::ApiStatus, &view.api_status.text);
    surface.set_style(Region::ApiStatus, view.api_status.class());

    surface.set_text(Region::NoteType, view.note_type.as_str());
    surface.set_checked(Region::IncludeQuestions, view.include_questions);
    surface.set_checked(Region::CompileDirectly, view.compile_pdf);
    surface.set_enabled(Region::CompileDirectly, view.compile_directly_enabled);
    surface.set_checked(Region::UseOverleaf, view.use_overleaf);

    surface.set_visible(Region::Results, view.results_visible);
    if view.results_visible {
        surface.set_style(Region::Results, "slide-in");
    }
    surface.set_text(Region::PreviewContent, &view.preview);
    render_link(surface, Region::DownloadLatex, view.latex_link.as_deref());
    render_link(surface, Region::DownloadPdf, view.pdf_link.as_deref());
    surface.set_visible(Region::CompileButton, view.compile_visible);

    if let Some(blocks) = &view.tips {
        render_tips(surface, blocks);
    }
}

fn render_link(surface: &mut dyn UiSurface, region: Region, href: Option<&str>) {
    match href {
        Some(href) => {
            surface.set_link(region, href);
            surface.set_visible(region, true);
        }
        None => surface.set_visible(region, false),
    }
}

fn render_tips(surface: &mut dyn UiSurface, blocks: &[ContentBlock]) {
    if !surface.has_region(Region::Tips) {
        let placement = if surface.has_next_sibling(Region::Results) {
            Placement::After(Region::Results)
        } else {
            Placement::AppendTo(Region::Main)
        };
        surface.insert_region(Region::Tips, placement);
    }
    surface.set_content(Region::Tips, blocks);
    surface.set_visible(Region::Tips, true);
}
