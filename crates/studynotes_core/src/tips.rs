use crate::{ContentBlock, Tips};

pub const OVERLEAF_URL: &str = "https://www.overleaf.com";

/// Builds the tips panel content. Fields that are absent simply drop their block.
pub fn tips_blocks(tips: &Tips) -> Vec<ContentBlock> {
    let mut blocks = vec![ContentBlock::Heading("Output tips".to_string())];

    if let Some(quality) = &tips.latex_quality {
        blocks.push(ContentBlock::Labeled {
            label: "LaTeX quality".to_string(),
            value: quality.clone(),
        });
    }
    if let Some(quality) = &tips.pdf_quality {
        blocks.push(ContentBlock::Labeled {
            label: "PDF quality".to_string(),
            value: quality.clone(),
        });
    }
    if let Some(advice) = &tips.for_professional_output {
        blocks.push(ContentBlock::Labeled {
            label: "For professional output".to_string(),
            value: advice.clone(),
        });
    }
    if !tips.overleaf_steps.is_empty() {
        blocks.push(ContentBlock::Heading("Compile on Overleaf".to_string()));
        blocks.push(ContentBlock::OrderedList(tips.overleaf_steps.clone()));
        blocks.push(ContentBlock::Link {
            text: "Open Overleaf".to_string(),
            href: OVERLEAF_URL.to_string(),
        });
    }

    blocks
}
