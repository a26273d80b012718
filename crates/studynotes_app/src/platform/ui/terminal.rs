use std::collections::BTreeMap;
use std::io::Write;

use chrono::Local;
use studynotes_core::{ContentBlock, Placement, Region, UiSurface};

const BAR_WIDTH: usize = 20;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct RegionState {
    text: String,
    visible: bool,
    enabled: bool,
    checked: bool,
    link: Option<String>,
    style: String,
    progress: u8,
    content: Vec<ContentBlock>,
}

/// Line-oriented rendering surface.
///
/// Every region the controller binds to exists up front except the tips
/// panel. Only changes worth reading are printed.
pub struct TerminalSurface<W: Write> {
    out: W,
    regions: BTreeMap<Region, RegionState>,
    /// Last status line printed, to avoid repeating it on unrelated renders.
    shown_status: Option<(String, String)>,
    shown_file: Option<(String, String)>,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        let regions = Region::REQUIRED
            .into_iter()
            .map(|region| (region, RegionState::default()))
            .collect();
        Self {
            out,
            regions,
            shown_status: None,
            shown_file: None,
        }
    }

    /// Prints a line that does not belong to any region (hints, input errors).
    pub fn notice(&mut self, text: &str) {
        let _ = writeln!(self.out, "{text}");
        let _ = self.out.flush();
    }

    #[cfg(test)]
    fn output(&self) -> &W {
        &self.out
    }

    fn line(&mut self, text: String) {
        self.notice(&text);
    }

    fn state_mut(&mut self, region: Region) -> &mut RegionState {
        self.regions.entry(region).or_default()
    }

    fn state(&self, region: Region) -> RegionState {
        self.regions.get(&region).cloned().unwrap_or_default()
    }

    fn announce_status(&mut self) {
        let status = self.state(Region::Status);
        let key = (status.text.clone(), status.style.clone());
        if self.shown_status.as_ref() == Some(&key) {
            return;
        }
        let severity = status
            .style
            .split_whitespace()
            .find_map(|class| class.strip_prefix("alert-"))
            .filter(|class| *class != "dismissible")
            .unwrap_or("info")
            .to_ascii_uppercase();
        self.line(format!(
            "[{}] {:<7} {}",
            Local::now().format("%H:%M:%S"),
            severity,
            status.text
        ));
        self.shown_status = Some(key);
    }

    fn announce_visibility(&mut self, region: Region, visible: bool) {
        match (region, visible) {
            (Region::Status, true) => self.announce_status(),
            (Region::Status, false) => self.shown_status = None,
            (Region::Loading, true) => self.line("Generating study notes...".to_string()),
            (Region::FileInfo, true) => {
                let key = (
                    self.state(Region::FileName).text,
                    self.state(Region::FileSize).text,
                );
                if self.shown_file.as_ref() != Some(&key) {
                    self.line(format!("Selected: {} ({})", key.0, key.1));
                    self.shown_file = Some(key);
                }
            }
            (Region::FileInfo, false) => self.shown_file = None,
            (Region::DownloadLatex, true) => self.announce_link(region, "latex"),
            (Region::DownloadPdf, true) => self.announce_link(region, "pdf"),
            (Region::CompileButton, true) => {
                self.line("PDF not compiled yet: type 'compile' to build it.".to_string())
            }
            _ => {}
        }
    }

    fn announce_link(&mut self, region: Region, kind: &str) {
        if let Some(href) = self.state(region).link {
            self.line(format!("  {kind}: {href}  (download {kind})"));
        }
    }

    fn print_blocks(&mut self, blocks: &[ContentBlock]) {
        for block in blocks {
            match block {
                ContentBlock::Heading(text) => self.line(format!("== {text} ==")),
                ContentBlock::Labeled { label, value } => self.line(format!("{label}: {value}")),
                ContentBlock::OrderedList(items) => {
                    for (index, item) in items.iter().enumerate() {
                        self.line(format!("  {}. {item}", index + 1));
                    }
                }
                ContentBlock::Link { text, href } => self.line(format!("{text}: {href}")),
            }
        }
    }
}

impl<W: Write> UiSurface for TerminalSurface<W> {
    fn has_region(&self, region: Region) -> bool {
        self.regions.contains_key(&region)
    }

    fn has_next_sibling(&self, _region: Region) -> bool {
        true
    }

    fn insert_region(&mut self, region: Region, _placement: Placement) {
        self.regions.entry(region).or_default();
    }

    fn set_text(&mut self, region: Region, text: &str) {
        let state = self.state_mut(region);
        if state.text == text {
            return;
        }
        state.text = text.to_string();
        match region {
            Region::ApiStatus => self.line(format!("Service: {text}")),
            Region::NoteType => self.line(format!("Note type: {text}")),
            Region::PreviewContent if !text.is_empty() => {
                self.line("---- preview ----".to_string());
                self.line(text.to_string());
                self.line("-----------------".to_string());
            }
            _ => {}
        }
    }

    fn set_visible(&mut self, region: Region, visible: bool) {
        let state = self.state_mut(region);
        let changed = state.visible != visible;
        state.visible = visible;
        // Status and file text can change while the region stays visible.
        if changed || (matches!(region, Region::Status | Region::FileInfo) && visible) {
            self.announce_visibility(region, visible);
        }
    }

    fn set_enabled(&mut self, region: Region, enabled: bool) {
        let state = self.state_mut(region);
        if state.enabled == enabled {
            return;
        }
        state.enabled = enabled;
        if region == Region::CompileDirectly && enabled {
            self.line("LaTeX available on the server: 'direct on' compiles immediately.".to_string());
        }
    }

    fn set_checked(&mut self, region: Region, checked: bool) {
        let state = self.state_mut(region);
        if state.checked == checked {
            return;
        }
        state.checked = checked;
        let label = match region {
            Region::IncludeQuestions => "Include questions",
            Region::CompileDirectly => "Compile directly",
            Region::UseOverleaf => "Use Overleaf",
            _ => return,
        };
        self.line(format!("{label}: {}", if checked { "on" } else { "off" }));
    }

    fn set_link(&mut self, region: Region, href: &str) {
        let state = self.state_mut(region);
        if state.link.as_deref() == Some(href) {
            return;
        }
        state.link = Some(href.to_string());
        if state.visible {
            let kind = if region == Region::DownloadPdf { "pdf" } else { "latex" };
            self.announce_link(region, kind);
        }
    }

    fn set_style(&mut self, region: Region, class: &str) {
        self.state_mut(region).style = class.to_string();
    }

    fn set_progress(&mut self, region: Region, percent: u8) {
        let state = self.state_mut(region);
        if state.progress == percent {
            return;
        }
        state.progress = percent;
        let filled = usize::from(percent) * BAR_WIDTH / 100;
        self.line(format!(
            "[{}{}] {percent:>3}%",
            "#".repeat(filled),
            "-".repeat(BAR_WIDTH - filled)
        ));
    }

    fn set_content(&mut self, region: Region, blocks: &[ContentBlock]) {
        let state = self.state_mut(region);
        if state.content == blocks {
            return;
        }
        state.content = blocks.to_vec();
        self.print_blocks(blocks);
    }
}
